//! Monthly budget settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::ValidationError;

/// Fixed key of the singleton budget record.
pub const BUDGET_SETTINGS_KEY: &str = "budget";

/// Singleton record holding the monthly spending budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetSettings {
    pub monthly_budget: f64,
    pub updated_at: DateTime<Utc>,
}

impl BudgetSettings {
    pub fn new(monthly_budget: f64, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::validate_amount(monthly_budget)?;
        Ok(Self {
            monthly_budget,
            updated_at: now,
        })
    }

    pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(())
        } else {
            Err(ValidationError::NegativeBudget(amount))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_allowed() {
        assert!(BudgetSettings::new(0.0, Utc::now()).is_ok());
    }

    #[test]
    fn negative_budget_is_rejected() {
        let err = BudgetSettings::new(-5.0, Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::NegativeBudget(-5.0));
    }
}
