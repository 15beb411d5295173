//! Shared traits and validation errors for shopping-list primitives.

use std::fmt;

use uuid::Uuid;

/// Exposes a stable identifier for entities kept in the item store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Sums the amounts of the provided entities in iteration order.
pub fn total_amount<'a, T, I>(entries: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entries.into_iter().map(Amounted::amount).sum()
}

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    InvalidPrice(f64),
    NegativeBudget(f64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => f.write_str("item name must not be empty"),
            ValidationError::InvalidPrice(price) => {
                write!(f, "price must be a positive amount (got {price})")
            }
            ValidationError::NegativeBudget(amount) => {
                write!(f, "monthly budget must not be negative (got {amount})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(())
    }
}

pub(crate) fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidPrice(price))
    }
}
