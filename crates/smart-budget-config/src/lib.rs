//! smart-budget-config
//!
//! Persistent user preferences for the shopping list front ends.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, ConfigKey, HOME_ENV_VAR};
