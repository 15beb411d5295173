//! Smart Budget wires the shopping-list core, JSON persistence and user
//! preferences into an interactive shell.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Smart Budget tracing initialized.");
    });
}
