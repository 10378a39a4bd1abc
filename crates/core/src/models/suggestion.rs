use serde::{Deserialize, Serialize};

use super::asset::{normalize_ticker, AssetClass};

/// A proposed whole-unit purchase produced by the rebalancer.
/// Never persisted; applied to holdings only once the user confirms it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub ticker: String,
    pub name: String,

    /// Unit price used for the suggestion
    pub price: f64,

    /// Whole units to buy (always ≥ 1)
    pub quantity: u64,

    /// price × quantity
    pub value: f64,

    pub class: AssetClass,

    /// Target weight minus current share of the portfolio, in percentage points.
    /// Suggestions inside a class were produced in descending order of this score.
    pub deficit_pct: f64,
}

/// Totals for the currently selected suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    /// Sum of the selected suggestions' values
    pub selected_total: f64,

    /// Cash left over when the selection fits the budget (0 otherwise)
    pub remaining: f64,

    /// Amount by which the selection exceeds the budget (0 otherwise)
    pub excess: f64,

    /// Confirmation is allowed: something is selected and nothing exceeds the budget
    pub can_confirm: bool,
}

/// Output of one rebalancing run: the ordered suggestions plus the user's selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionPlan {
    /// Cash the user asked to invest
    pub cash: f64,

    /// Cash routed to equities by the class-level split
    pub equity_cash: f64,

    /// Cash routed to income funds by the class-level split
    pub income_fund_cash: f64,

    /// Equity suggestions first, then income-fund suggestions
    pub suggestions: Vec<Suggestion>,

    /// Tickers currently selected for confirmation (initially all)
    pub selected: Vec<String>,
}

impl SuggestionPlan {
    /// Build a plan with every suggestion pre-selected.
    pub fn new(cash: f64, equity_cash: f64, income_fund_cash: f64, suggestions: Vec<Suggestion>) -> Self {
        let selected = suggestions.iter().map(|s| s.ticker.clone()).collect();
        Self {
            cash,
            equity_cash,
            income_fund_cash,
            suggestions,
            selected,
        }
    }

    /// Cash allocated to a class by the class-level split.
    pub fn class_cash(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Equity => self.equity_cash,
            AssetClass::IncomeFund => self.income_fund_cash,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Sum of every suggestion's value, selected or not.
    pub fn suggested_total(&self) -> f64 {
        self.suggestions.iter().map(|s| s.value).sum()
    }

    /// Cash the greedy pass could not place.
    pub fn unallocated(&self) -> f64 {
        self.cash - self.suggested_total()
    }

    pub fn is_selected(&self, ticker: &str) -> bool {
        let key = normalize_ticker(ticker);
        self.selected.iter().any(|t| *t == key)
    }

    /// Flip the selection state of a suggestion.
    /// Returns the new state, or `None` if the plan has no suggestion for `ticker`.
    pub fn toggle(&mut self, ticker: &str) -> Option<bool> {
        let key = normalize_ticker(ticker);
        if !self.suggestions.iter().any(|s| s.ticker == key) {
            return None;
        }
        if let Some(idx) = self.selected.iter().position(|t| *t == key) {
            self.selected.remove(idx);
            Some(false)
        } else {
            self.selected.push(key);
            Some(true)
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.suggestions.iter().map(|s| s.ticker.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected suggestions, in suggestion order.
    pub fn selected_suggestions(&self) -> Vec<&Suggestion> {
        self.suggestions
            .iter()
            .filter(|s| self.selected.contains(&s.ticker))
            .collect()
    }

    /// Compare the selected total against the cash amount.
    pub fn summary(&self) -> SelectionSummary {
        let selected_total: f64 = self.selected_suggestions().iter().map(|s| s.value).sum();
        let diff = self.cash - selected_total;
        let (remaining, excess) = if diff >= 0.0 { (diff, 0.0) } else { (0.0, -diff) };
        SelectionSummary {
            selected_total,
            remaining,
            excess,
            can_confirm: excess == 0.0 && !self.selected.is_empty(),
        }
    }
}
