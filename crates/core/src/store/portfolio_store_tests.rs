//! Tests for the portfolio store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::accounts::{
        Account, AccountType, AccountUpdate, BrokerageSnapshot, Position, SnapshotAccount,
        SnapshotDiagnostics,
    };
    use crate::allocations::{Allocation, AllocationRule, AssetClassWeight};
    use crate::errors::{Error, ValidationError};
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::fx::CurrencyEntry;
    use crate::portfolio::AggregationOptions;
    use crate::store::*;
    use rust_decimal_macros::dec;

    struct Fixture {
        store: PortfolioStore,
        repository: Arc<InMemoryPortfolioRepository>,
        sink: MockDomainEventSink,
    }

    fn fixture(initial: StoredCollections) -> Fixture {
        let repository = Arc::new(InMemoryPortfolioRepository::new(initial));
        let sink = MockDomainEventSink::new();
        let store = PortfolioStore::open(repository.clone(), Arc::new(sink.clone())).unwrap();
        sink.clear();
        Fixture {
            store,
            repository,
            sink,
        }
    }

    fn tfsa() -> Account {
        Account::new(
            "questrade",
            "TFSA",
            vec![
                Position::new("AAPL", dec!(150), Some("USD")),
                Position::new("XIU", dec!(100), Some("CAD")),
            ],
        )
    }

    fn seeded() -> StoredCollections {
        StoredCollections {
            accounts: vec![tfsa()],
            currencies: vec![
                CurrencyEntry::resolved("USD", dec!(1.0)),
                CurrencyEntry::resolved("CAD", dec!(0.8)),
            ],
            allocations: vec![
                AllocationRule::from_description("AAPL", "Equity").unwrap(),
                AllocationRule::from_description("XIU", "Equity:50,Bonds:50").unwrap(),
            ],
        }
    }

    fn snapshot(
        account_type: Option<AccountType>,
        positions: Vec<Position>,
    ) -> BrokerageSnapshot {
        BrokerageSnapshot {
            brokerage: "questrade".to_string(),
            account: SnapshotAccount {
                id: "questrade:TFSA".to_string(),
                name: "TFSA".to_string(),
                account_type,
                positions,
            },
            diagnostics: SnapshotDiagnostics::default(),
        }
    }

    fn tickers(account: &Account) -> Vec<&str> {
        account.positions.iter().map(|p| p.ticker.as_str()).collect()
    }

    // ==================== Loading ====================

    #[test]
    fn test_open_loads_and_fills_gaps() {
        let mut stored = seeded();
        stored.currencies.pop();
        stored.allocations.push(AllocationRule::unresolved("XIU"));
        let f = fixture(stored);

        let snapshot = f.store.snapshot();
        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.unresolved_currency_codes(), vec!["CAD"]);
        assert!(snapshot.unresolved_tickers().is_empty());
        assert_eq!(snapshot.allocations.len(), 2);
    }

    #[test]
    fn test_stored_keys_match_positions_case_insensitively() {
        let stored: StoredCollections = serde_json::from_value(serde_json::json!({
            "accounts": [{
                "id": "questrade:TFSA",
                "name": "TFSA",
                "positions": [{"ticker": "XIU", "value": 100, "currency": "CAD"}]
            }],
            "currencies": [{"code": " cad", "multiplier": 0.8}],
            "allocations": [{"ticker": "xiu", "assetClasses": [{"name": "Equity", "percentage": 1}]}]
        }))
        .unwrap();
        let f = fixture(stored);

        let snapshot = f.store.snapshot();
        assert!(snapshot.unresolved_currency_codes().is_empty());
        assert!(snapshot.unresolved_tickers().is_empty());
        assert_eq!(snapshot.currencies[0].code, "CAD");
        assert_eq!(snapshot.allocations[0].ticker, "XIU");

        let summary = f.store.summary(&AggregationOptions::default());
        assert_eq!(summary.items[0].asset_class, "Equity");
        assert_eq!(summary.total, dec!(80));
    }

    #[test]
    fn test_load_emits_collections_loaded() {
        let f = fixture(StoredCollections::default());
        f.store.load(seeded());
        assert_eq!(f.sink.events(), vec![DomainEvent::CollectionsLoaded]);
        assert_eq!(f.store.snapshot().accounts, vec![tfsa()]);
    }

    #[test]
    fn test_summary_matches_aggregation() {
        let f = fixture(seeded());
        let summary = f.store.summary(&AggregationOptions::default());
        assert_eq!(summary.total, dec!(230));
        assert_eq!(summary.items[0].asset_class, "Equity");
        assert_eq!(summary.items[0].value, dec!(190));
    }

    // ==================== Accounts ====================

    #[test]
    fn test_import_new_account_goes_first() {
        let f = fixture(seeded());
        let mut incoming = snapshot(None, vec![Position::new("VFV", dec!(10), Some("CAD"))]);
        incoming.account.id = "questrade:RRSP".to_string();
        incoming.account.name = "RRSP".to_string();

        let account = f.store.import_snapshot(&incoming, true).unwrap();
        assert_eq!(account.id, "questrade:RRSP");

        let snapshot = f.store.snapshot();
        assert_eq!(snapshot.accounts[0].id, "questrade:RRSP");
        assert_eq!(snapshot.unresolved_tickers(), vec!["VFV"]);
        assert_eq!(
            f.sink.events(),
            vec![DomainEvent::accounts_changed(vec!["questrade:RRSP".to_string()])]
        );
        assert_eq!(f.repository.collections().accounts.len(), 2);
    }

    #[test]
    fn test_import_cash_only_keeps_securities() {
        let mut stored = seeded();
        stored.accounts[0].hidden = true;
        stored.accounts[0]
            .positions
            .push(Position::new("CASH", dec!(5), Some("CAD")));
        let f = fixture(stored);

        let incoming = snapshot(
            Some(AccountType::CashOnly),
            vec![Position::new("CASH", dec!(20), Some("CAD"))],
        );
        let account = f.store.import_snapshot(&incoming, true).unwrap();

        assert_eq!(tickers(&account), vec!["AAPL", "XIU", "CASH"]);
        assert_eq!(account.positions[2].value, dec!(20));
        assert!(account.hidden);
        assert_eq!(f.store.snapshot().accounts.len(), 1);
    }

    #[test]
    fn test_import_excludes_cash_keeps_cash() {
        let mut stored = seeded();
        stored.accounts[0]
            .positions
            .push(Position::new("CASH", dec!(5), Some("CAD")));
        let f = fixture(stored);

        let incoming = snapshot(
            Some(AccountType::ExcludesCash),
            vec![Position::new("MSFT", dec!(40), Some("USD"))],
        );
        let account = f.store.import_snapshot(&incoming, true).unwrap();
        assert_eq!(tickers(&account), vec!["CASH", "MSFT"]);
    }

    #[test]
    fn test_import_without_cash() {
        let f = fixture(seeded());
        let incoming = snapshot(
            None,
            vec![
                Position::new("AAPL", dec!(10), Some("USD")),
                Position::new("CASH", dec!(3), Some("USD")),
            ],
        );
        let account = f.store.import_snapshot(&incoming, false).unwrap();
        assert_eq!(tickers(&account), vec!["AAPL"]);
    }

    #[test]
    fn test_import_rejects_unusable_snapshot() {
        let f = fixture(seeded());

        let mut failed = snapshot(None, vec![]);
        failed.diagnostics.error = Some("Positions table not found".to_string());
        assert!(matches!(
            f.store.import_snapshot(&failed, true),
            Err(Error::SourceUnavailable(msg)) if msg == "Positions table not found"
        ));

        let mut nameless = snapshot(None, vec![]);
        nameless.account.name = String::new();
        assert!(matches!(
            f.store.import_snapshot(&nameless, true),
            Err(Error::SourceUnavailable(_))
        ));

        assert!(f.sink.is_empty());
        assert_eq!(f.store.snapshot().accounts, vec![tfsa()]);
    }

    #[test]
    fn test_import_with_info_proceeds() {
        let f = fixture(seeded());
        let mut incoming = snapshot(None, vec![Position::new("AAPL", dec!(1), None)]);
        incoming.diagnostics.info = Some("Currency column missing".to_string());
        assert!(f.store.import_snapshot(&incoming, true).is_ok());
    }

    #[test]
    fn test_add_update_remove_account() {
        let f = fixture(StoredCollections::default());

        f.store.add_account(tfsa()).unwrap();
        assert!(matches!(
            f.store.add_account(tfsa()),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));

        let updated = f
            .store
            .update_account("questrade:TFSA", AccountUpdate::hidden(true))
            .unwrap();
        assert!(updated.hidden);
        assert!(f.repository.collections().accounts[0].hidden);

        assert!(matches!(
            f.store.update_account("nope", AccountUpdate::default()),
            Err(Error::NotFound(_))
        ));

        f.store.remove_account("questrade:TFSA").unwrap();
        assert!(f.store.snapshot().accounts.is_empty());
        assert!(f.store.snapshot().currencies.is_empty());
        assert!(matches!(
            f.store.remove_account("questrade:TFSA"),
            Err(Error::NotFound(_))
        ));

        // add, update, remove
        assert_eq!(f.sink.len(), 3);
    }

    // ==================== Currencies ====================

    #[test]
    fn test_upsert_currency_resolves_placeholder() {
        let mut stored = seeded();
        stored.currencies.clear();
        let f = fixture(stored);
        assert_eq!(f.store.snapshot().unresolved_currency_codes(), vec!["USD", "CAD"]);

        f.store
            .upsert_currency(CurrencyEntry::resolved("cad", dec!(0.75)))
            .unwrap();

        let snapshot = f.store.snapshot();
        assert_eq!(snapshot.unresolved_currency_codes(), vec!["USD"]);
        assert_eq!(
            snapshot.currency_table().multiplier_for(Some("CAD")),
            Some(dec!(0.75))
        );
        assert_eq!(
            f.repository.collections().currencies,
            vec![CurrencyEntry::resolved("CAD", dec!(0.75))]
        );
        assert_eq!(
            f.sink.events(),
            vec![DomainEvent::currencies_changed(vec!["CAD".to_string()])]
        );
    }

    #[test]
    fn test_upsert_currency_replaces_in_place() {
        let f = fixture(seeded());
        f.store
            .upsert_currency(CurrencyEntry::resolved("USD", dec!(1.35)))
            .unwrap();
        let codes: Vec<_> = f
            .repository
            .collections()
            .currencies
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["USD", "CAD"]);
    }

    #[test]
    fn test_invalid_currency_changes_nothing() {
        let f = fixture(seeded());
        assert!(f
            .store
            .upsert_currency(CurrencyEntry::resolved("USD", dec!(-2)))
            .is_err());
        assert!(matches!(
            f.store.remove_currency("EUR"),
            Err(Error::NotFound(_))
        ));
        assert!(f.sink.is_empty());
        assert_eq!(f.repository.collections(), seeded());
    }

    #[test]
    fn test_remove_referenced_currency_leaves_placeholder() {
        let f = fixture(seeded());
        f.store.remove_currency("usd").unwrap();
        assert_eq!(f.store.snapshot().unresolved_currency_codes(), vec!["USD"]);
    }

    // ==================== Allocations ====================

    #[test]
    fn test_set_allocation_updates_summary() {
        let f = fixture(seeded());
        let rule = f.store.set_allocation("xiu", "Bonds").unwrap();
        assert_eq!(rule.ticker, "XIU");

        let summary = f.store.summary(&AggregationOptions::default());
        assert_eq!(summary.items[0].asset_class, "Equity");
        assert_eq!(summary.items[0].value, dec!(150));
        assert_eq!(summary.items[1].value, dec!(80));
        assert_eq!(
            f.sink.events(),
            vec![DomainEvent::allocations_changed(vec!["XIU".to_string()])]
        );
    }

    #[test]
    fn test_set_allocation_validation_error_changes_nothing() {
        let f = fixture(seeded());
        let result = f.store.set_allocation("XIU", "Equity:60,Bonds:50");
        assert_eq!(
            result.unwrap_err().as_validation(),
            Some(&ValidationError::TotalExceeds)
        );
        assert!(f.sink.is_empty());
        assert_eq!(f.store.snapshot().allocations, seeded().allocations);
    }

    #[test]
    fn test_blank_description_clears_rule() {
        let f = fixture(seeded());
        f.store.set_allocation("AAPL", "  ").unwrap();
        assert_eq!(f.store.snapshot().unresolved_tickers(), vec!["AAPL"]);
        assert_eq!(f.repository.collections().allocations.len(), 1);
    }

    #[test]
    fn test_upsert_allocation_requires_full_weight() {
        let f = fixture(seeded());
        let mut rule = AllocationRule::from_description("VFV", "US:60,CA:40").unwrap();
        if let Allocation::Resolved(weights) = &mut rule.allocation {
            weights.pop();
        }
        assert!(matches!(
            f.store.upsert_allocation(rule),
            Err(Error::Validation(ValidationError::IncompleteTotal))
        ));
        assert!(f.store.upsert_allocation(AllocationRule::unresolved(" ")).is_err());
    }

    #[test]
    fn test_upsert_allocation_rejects_out_of_range_weights() {
        let f = fixture(seeded());
        let rule = AllocationRule {
            ticker: "VFV".to_string(),
            allocation: Allocation::Resolved(vec![
                AssetClassWeight::new("A", dec!(1.5)),
                AssetClassWeight::new("B", dec!(-0.5)),
            ]),
        };
        assert!(matches!(
            f.store.upsert_allocation(rule),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));

        let rule = AllocationRule {
            ticker: "VFV".to_string(),
            allocation: Allocation::Resolved(vec![
                AssetClassWeight::new("A", dec!(1)),
                AssetClassWeight::new("B", dec!(0)),
            ]),
        };
        assert!(f.store.upsert_allocation(rule).is_err());

        assert_eq!(f.repository.collections().allocations, seeded().allocations);
        assert!(f.sink.events().is_empty());
    }

    #[test]
    fn test_remove_allocation() {
        let f = fixture(seeded());
        f.store.remove_allocation("aapl").unwrap();
        assert_eq!(f.store.snapshot().unresolved_tickers(), vec!["AAPL"]);
        assert!(matches!(
            f.store.remove_allocation("AAPL"),
            Err(Error::NotFound(_))
        ));
    }

    // ==================== External changes ====================

    #[test]
    fn test_apply_changes_dispatches_per_collection() {
        let f = fixture(seeded());
        f.store.apply_changes(vec![
            CollectionUpdate::Currencies(vec![CurrencyEntry::resolved("USD", dec!(2))]),
            CollectionUpdate::Allocations(vec![]),
        ]);

        let snapshot = f.store.snapshot();
        assert_eq!(snapshot.unresolved_currency_codes(), vec!["CAD"]);
        assert_eq!(snapshot.unresolved_tickers(), vec!["AAPL", "XIU"]);
        assert_eq!(f.sink.len(), 2);
        assert_eq!(f.sink.events()[1], DomainEvent::allocations_changed(vec![]));

        // external changes are not written back
        assert_eq!(f.repository.collections(), seeded());
    }

    #[test]
    fn test_collection_update_from_json() {
        let name: CollectionName = "currencies".parse().unwrap();
        let update =
            CollectionUpdate::from_json(name, serde_json::json!([{"code": "usd", "multiplier": 1.2}]))
                .unwrap();
        assert_eq!(update.name(), CollectionName::Currencies);
        assert!("positions".parse::<CollectionName>().is_err());
    }

    // ==================== Exports ====================

    #[test]
    fn test_csv_exports() {
        let f = fixture(seeded());
        let portfolio = f.store.portfolio_csv().unwrap();
        assert_eq!(portfolio.lines().count(), 4);

        let assets = f.store.assets_csv(&AggregationOptions::default()).unwrap();
        let lines: Vec<_> = assets.lines().collect();
        assert_eq!(lines[0], "Asset Class,Value,% Portfolio");
        assert!(lines[1].starts_with("Equity,190,"));
        assert!(lines[2].starts_with("Bonds,40,"));
    }
}
