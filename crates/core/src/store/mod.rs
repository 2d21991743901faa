//! Store module - the observable collections of accounts, currencies and
//! allocation rules, and their persistence contract.

mod in_memory_repository;
mod portfolio_store;
mod store_model;
mod store_traits;

#[cfg(test)]
mod portfolio_store_tests;

pub use in_memory_repository::InMemoryPortfolioRepository;
pub use portfolio_store::PortfolioStore;
pub use store_model::{CollectionName, CollectionUpdate, PortfolioSnapshot, StoredCollections};
pub use store_traits::PortfolioRepositoryTrait;
