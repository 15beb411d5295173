//! smart-budget-core
//!
//! Business logic and services for the Smart Budget shopping list.
//! Depends on smart-budget-domain. No CLI, no terminal I/O; durable storage is
//! reached only through the [`ItemStore`] trait.

pub mod budget_service;
pub mod error;
pub mod events;
pub mod ordering;
pub mod recommendation;
pub mod shopping_list;
pub mod storage;
pub mod time;
pub mod undo;

pub use budget_service::*;
pub use error::{CoreError, CoreResult};
pub use events::*;
pub use ordering::*;
pub use recommendation::*;
pub use shopping_list::*;
pub use storage::{InMemoryItemStore, ItemStore, ItemTable};
pub use time::{Clock, SystemClock};
pub use undo::*;
