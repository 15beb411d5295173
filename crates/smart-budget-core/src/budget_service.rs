//! Budget aggregation over the item collection.

use std::fmt;

use serde::Serialize;
use smart_budget_domain::{total_amount, BudgetSettings, ShoppingItem};

/// Percentage of the budget at which spending is flagged.
pub const DEFAULT_WARNING_THRESHOLD_PERCENT: f64 = 80.0;

/// Spending state relative to the monthly budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::OnTrack => "On track",
            BudgetStatus::Warning => "Warning",
            BudgetStatus::OverBudget => "Over budget",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub monthly_budget: f64,
    pub spent: f64,
    /// Budget minus spent. Negative once overspent.
    pub remaining: f64,
    pub percent_used: f64,
    pub status: BudgetStatus,
    pub item_count: usize,
    pub purchased_count: usize,
}

impl BudgetSummary {
    pub fn pending_count(&self) -> usize {
        self.item_count - self.purchased_count
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining < 0.0
    }
}

/// Stateless budgeting utilities operating over item snapshots.
pub struct BudgetService;

impl BudgetService {
    /// Sum of the prices of purchased items.
    pub fn spent(items: &[ShoppingItem]) -> f64 {
        total_amount(items.iter().filter(|item| item.purchased))
    }

    /// Monthly budget minus spending. A missing budget counts as zero.
    pub fn remaining(settings: Option<&BudgetSettings>, items: &[ShoppingItem]) -> f64 {
        Self::budget_amount(settings) - Self::spent(items)
    }

    pub fn summarize(settings: Option<&BudgetSettings>, items: &[ShoppingItem]) -> BudgetSummary {
        Self::summarize_with_threshold(settings, items, DEFAULT_WARNING_THRESHOLD_PERCENT)
    }

    pub fn summarize_with_threshold(
        settings: Option<&BudgetSettings>,
        items: &[ShoppingItem],
        warning_threshold_percent: f64,
    ) -> BudgetSummary {
        let monthly_budget = Self::budget_amount(settings);
        let spent = Self::spent(items);
        let percent_used = if monthly_budget > 0.0 {
            spent / monthly_budget * 100.0
        } else {
            0.0
        };
        let status = if percent_used >= 100.0 || (monthly_budget <= 0.0 && spent > 0.0) {
            BudgetStatus::OverBudget
        } else if percent_used >= warning_threshold_percent {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        };
        BudgetSummary {
            monthly_budget,
            spent,
            remaining: monthly_budget - spent,
            percent_used,
            status,
            item_count: items.len(),
            purchased_count: items.iter().filter(|item| item.purchased).count(),
        }
    }

    fn budget_amount(settings: Option<&BudgetSettings>) -> f64 {
        settings.map(|s| s.monthly_budget).unwrap_or(0.0)
    }
}
