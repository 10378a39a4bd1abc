use portfolio_rebalancer_core::models::asset::{normalize_ticker, Asset, AssetClass};
use portfolio_rebalancer_core::models::holdings::Holdings;
use portfolio_rebalancer_core::models::portfolio::PortfolioSnapshot;
use portfolio_rebalancer_core::models::settings::{AllocationSettings, AllocationValidation};
use portfolio_rebalancer_core::models::suggestion::{Suggestion, SuggestionPlan};
use portfolio_rebalancer_core::models::valuation::{format_money, Distribution};
use std::collections::HashSet;

fn suggestion(ticker: &str, price: f64, quantity: u64, class: AssetClass) -> Suggestion {
    Suggestion {
        ticker: ticker.into(),
        name: format!("{ticker} name"),
        price,
        quantity,
        value: price * quantity as f64,
        class,
        deficit_pct: 10.0,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AssetClass
// ═══════════════════════════════════════════════════════════════════

mod asset_class {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(AssetClass::Equity.to_string(), "Equity");
        assert_eq!(AssetClass::IncomeFund.to_string(), "IncomeFund");
    }

    #[test]
    fn all_lists_equity_first() {
        assert_eq!(AssetClass::ALL, [AssetClass::Equity, AssetClass::IncomeFund]);
    }

    #[test]
    fn serde_roundtrip_json() {
        for class in AssetClass::ALL {
            let json = serde_json::to_string(&class).unwrap();
            let back: AssetClass = serde_json::from_str(&json).unwrap();
            assert_eq!(class, back);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Asset
// ═══════════════════════════════════════════════════════════════════

mod asset {
    use super::*;

    #[test]
    fn new_uppercases_and_trims_ticker() {
        let a = Asset::equity("  petr4 ", "Petrobras", 36.78, 3);
        assert_eq!(a.ticker, "PETR4");
        assert_eq!(a.class, AssetClass::Equity);
    }

    #[test]
    fn income_fund_constructor() {
        let a = Asset::income_fund("hglg11", "CSHG Logística", 162.5, 2);
        assert_eq!(a.ticker, "HGLG11");
        assert_eq!(a.class, AssetClass::IncomeFund);
    }

    #[test]
    fn value_is_price_times_quantity() {
        let a = Asset::equity("VALE3", "Vale", 12.5, 4);
        assert_eq!(a.value(), 50.0);
    }

    #[test]
    fn zero_quantity_is_worth_nothing() {
        let a = Asset::equity("VALE3", "Vale", 12.5, 0);
        assert_eq!(a.value(), 0.0);
    }

    #[test]
    fn equality_ignores_everything_but_ticker() {
        let a = Asset::equity("ABEV3", "Ambev", 14.92, 1);
        let b = Asset::income_fund("abev3", "Other name", 99.0, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(Asset::equity("ABEV3", "Ambev", 14.92, 1));
        set.insert(Asset::equity("ABEV3", "Ambev S.A.", 15.0, 2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn normalize_ticker_helper() {
        assert_eq!(normalize_ticker(" mxrf11\t"), "MXRF11");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holdings
// ═══════════════════════════════════════════════════════════════════

mod holdings {
    use super::*;

    #[test]
    fn new_is_empty() {
        let h = Holdings::new();
        assert!(h.is_empty());
        assert_eq!(h.len(), 0);
    }

    #[test]
    fn from_assets_merges_duplicate_tickers() {
        let h = Holdings::from_assets(vec![
            Asset::equity("PETR4", "Petrobras", 30.0, 2),
            Asset::equity("VALE3", "Vale", 60.0, 1),
            Asset::equity("petr4", "Petrobras", 40.0, 3),
        ]);
        assert_eq!(h.len(), 2);
        let petr = h.get("PETR4").unwrap();
        assert_eq!(petr.quantity, 5);
        // first recorded price wins
        assert_eq!(petr.price, 30.0);
    }

    #[test]
    fn from_assets_drops_zero_quantity() {
        let h = Holdings::from_assets(vec![
            Asset::equity("PETR4", "Petrobras", 30.0, 0),
            Asset::equity("VALE3", "Vale", 60.0, 1),
        ]);
        assert_eq!(h.len(), 1);
        assert!(!h.contains("PETR4"));
    }

    #[test]
    fn preserves_insertion_order() {
        let h: Holdings = vec![
            Asset::income_fund("MXRF11", "Maxi Renda", 10.0, 1),
            Asset::equity("PETR4", "Petrobras", 30.0, 1),
            Asset::equity("ABEV3", "Ambev", 15.0, 1),
        ]
        .into_iter()
        .collect();
        let tickers: Vec<&str> = h.iter().map(|a| a.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["MXRF11", "PETR4", "ABEV3"]);
    }

    #[test]
    fn get_is_case_insensitive() {
        let h = Holdings::from_assets(vec![Asset::equity("PETR4", "Petrobras", 30.0, 1)]);
        assert!(h.get("petr4").is_some());
        assert!(h.get("VALE3").is_none());
    }

    #[test]
    fn of_class_filters() {
        let h = Holdings::from_assets(vec![
            Asset::equity("PETR4", "Petrobras", 30.0, 1),
            Asset::income_fund("MXRF11", "Maxi Renda", 10.0, 1),
            Asset::equity("VALE3", "Vale", 60.0, 1),
        ]);
        assert_eq!(h.tickers_of_class(AssetClass::Equity), vec!["PETR4", "VALE3"]);
        assert_eq!(h.tickers_of_class(AssetClass::IncomeFund), vec!["MXRF11"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let h = Holdings::from_assets(vec![Asset::equity("PETR4", "Petrobras", 30.0, 1)]);
        let json = serde_json::to_value(&h).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["ticker"], "PETR4");
    }

    #[test]
    fn deserializing_enforces_uniqueness() {
        let json = r#"[
            {"ticker":"PETR4","name":"Petrobras","price":30.0,"quantity":2,"class":"Equity"},
            {"ticker":"PETR4","name":"Petrobras","price":30.0,"quantity":1,"class":"Equity"},
            {"ticker":"VALE3","name":"Vale","price":60.0,"quantity":0,"class":"Equity"}
        ]"#;
        let h: Holdings = serde_json::from_str(json).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h.get("PETR4").unwrap().quantity, 3);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AllocationSettings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn default_is_70_30_without_weights() {
        let s = AllocationSettings::default();
        assert_eq!(s.equity_pct, 70.0);
        assert_eq!(s.income_fund_pct, 30.0);
        assert!(s.ticker_weights.is_empty());
        assert!(!s.has_weights());
    }

    #[test]
    fn class_pct() {
        let s = AllocationSettings::default();
        assert_eq!(s.class_pct(AssetClass::Equity), 70.0);
        assert_eq!(s.class_pct(AssetClass::IncomeFund), 30.0);
    }

    #[test]
    fn missing_weight_reads_as_zero() {
        let s = AllocationSettings::default();
        assert_eq!(s.weight("PETR4"), 0.0);
    }

    #[test]
    fn weight_lookup_normalizes_ticker() {
        let mut s = AllocationSettings::default();
        s.ticker_weights.insert("PETR4".into(), 40.0);
        assert_eq!(s.weight(" petr4"), 40.0);
        assert!(s.has_weights());
    }

    #[test]
    fn validation_flags() {
        let ok = AllocationValidation::default();
        assert!(ok.is_valid());

        let bad = AllocationValidation {
            equity_overflow: false,
            income_fund_overflow: true,
        };
        assert!(!bad.is_valid());
        assert!(bad.overflows(AssetClass::IncomeFund));
        assert!(!bad.overflows(AssetClass::Equity));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Distribution & formatting
// ═══════════════════════════════════════════════════════════════════

mod valuation_models {
    use super::*;

    #[test]
    fn distribution_default_is_zero() {
        let d = Distribution::default();
        assert_eq!(d.class_pct(AssetClass::Equity), 0.0);
        assert_eq!(d.class_pct(AssetClass::IncomeFund), 0.0);
    }

    #[test]
    fn format_money_rounds_to_cents() {
        assert_eq!(format_money(10.0), "10.00");
        assert_eq!(format_money(3.14159), "3.14");
        assert_eq!(format_money(2.5), "2.50");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  SuggestionPlan
// ═══════════════════════════════════════════════════════════════════

mod suggestion_plan {
    use super::*;

    fn plan() -> SuggestionPlan {
        SuggestionPlan::new(
            100.0,
            70.0,
            30.0,
            vec![
                suggestion("PETR4", 20.0, 3, AssetClass::Equity),
                suggestion("MXRF11", 10.0, 3, AssetClass::IncomeFund),
            ],
        )
    }

    #[test]
    fn everything_selected_initially() {
        let p = plan();
        assert_eq!(p.selected, vec!["PETR4".to_string(), "MXRF11".to_string()]);
        assert!(p.is_selected("petr4"));
    }

    #[test]
    fn totals() {
        let p = plan();
        assert_eq!(p.suggested_total(), 90.0);
        assert_eq!(p.unallocated(), 10.0);
        assert_eq!(p.class_cash(AssetClass::Equity), 70.0);
        assert_eq!(p.class_cash(AssetClass::IncomeFund), 30.0);
    }

    #[test]
    fn toggle_flips_selection() {
        let mut p = plan();
        assert_eq!(p.toggle("PETR4"), Some(false));
        assert!(!p.is_selected("PETR4"));
        assert_eq!(p.toggle("petr4"), Some(true));
        assert!(p.is_selected("PETR4"));
    }

    #[test]
    fn toggle_unknown_ticker() {
        let mut p = plan();
        assert_eq!(p.toggle("VALE3"), None);
        assert_eq!(p.selected.len(), 2);
    }

    #[test]
    fn selected_suggestions_keep_suggestion_order() {
        let mut p = plan();
        p.clear_selection();
        p.toggle("MXRF11");
        p.toggle("PETR4");
        let tickers: Vec<&str> = p.selected_suggestions().iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["PETR4", "MXRF11"]);
    }

    #[test]
    fn summary_reports_remaining() {
        let mut p = plan();
        p.toggle("MXRF11");
        let s = p.summary();
        assert_eq!(s.selected_total, 60.0);
        assert_eq!(s.remaining, 40.0);
        assert_eq!(s.excess, 0.0);
        assert!(s.can_confirm);
    }

    #[test]
    fn summary_reports_excess_and_blocks_confirmation() {
        let p = SuggestionPlan::new(
            50.0,
            50.0,
            0.0,
            vec![suggestion("PETR4", 20.0, 3, AssetClass::Equity)],
        );
        let s = p.summary();
        assert_eq!(s.selected_total, 60.0);
        assert_eq!(s.remaining, 0.0);
        assert_eq!(s.excess, 10.0);
        assert!(!s.can_confirm);
    }

    #[test]
    fn empty_selection_cannot_be_confirmed() {
        let mut p = plan();
        p.clear_selection();
        let s = p.summary();
        assert_eq!(s.selected_total, 0.0);
        assert_eq!(s.remaining, 100.0);
        assert!(!s.can_confirm);
        p.select_all();
        assert!(p.summary().can_confirm);
    }

    #[test]
    fn empty_plan() {
        let p = SuggestionPlan::new(100.0, 0.0, 100.0, Vec::new());
        assert!(p.is_empty());
        assert!(p.selected.is_empty());
        assert_eq!(p.unallocated(), 100.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioSnapshot
// ═══════════════════════════════════════════════════════════════════

mod snapshot {
    use super::*;

    #[test]
    fn missing_settings_default() {
        let json = r#"{"holdings":[]}"#;
        let snap: PortfolioSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.holdings.is_empty());
        assert_eq!(snap.settings, AllocationSettings::default());
    }

    #[test]
    fn json_roundtrip() {
        let mut settings = AllocationSettings::default();
        settings.ticker_weights.insert("PETR4".into(), 100.0);
        let snap = PortfolioSnapshot {
            holdings: Holdings::from_assets(vec![Asset::equity("PETR4", "Petrobras", 30.0, 2)]),
            settings,
        };
        let json = serde_json::to_string(&snap).unwrap();
        let back: PortfolioSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.settings, snap.settings);
        assert_eq!(back.holdings.get("PETR4").unwrap().quantity, 2);
    }
}
