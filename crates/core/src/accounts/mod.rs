//! Accounts module - brokerage accounts, their positions and snapshot merging.

mod accounts_model;
mod brokerage_model;


// Re-export the public interface
pub(crate) use accounts_model::{deserialize_upper, normalize_code};
pub use accounts_model::{brokerage_account_id, Account, AccountType, AccountUpdate, Position};
pub use brokerage_model::{
    replacement_positions, BrokerageSnapshot, SnapshotAccount, SnapshotDiagnostics,
};
