use std::{path::PathBuf, sync::Once};

use smart_budget_config::Config;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. `RUST_LOG` directives are added on top of
/// `smart_budget=info`; output goes to stderr so it never mixes with shell output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "smart_budget=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Returns the application data directory, honouring `SMART_BUDGET_HOME`.
pub fn app_data_dir() -> PathBuf {
    Config::app_home()
}
