//! smart-budget-domain
//!
//! Pure domain models (ShoppingItem, Tier, BudgetSettings).
//! No I/O, no CLI, no storage. Only data types, validation and core enums.

pub mod budget;
pub mod common;
pub mod item;
pub mod tier;

pub use budget::*;
pub use common::*;
pub use item::*;
pub use tier::*;
