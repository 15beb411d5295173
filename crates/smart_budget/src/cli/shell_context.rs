//! Shared runtime state for CLI interactions and command execution.

use std::{future::Future, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use smart_budget_config::{Config, ConfigManager};
use smart_budget_core::{BudgetUpdate, ListSettings, ShoppingList};
use smart_budget_storage_json::JsonItemStore;
use tokio::{
    runtime::{Builder, Runtime},
    sync::broadcast::{self, error::TryRecvError},
};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::utils;

use super::{
    commands,
    output::{self, OutputPreferences},
    registry::CommandTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub commands: CommandTable,
    pub theme: ColorfulTheme,
    pub runtime: Runtime,
    pub list: ShoppingList,
    pub updates: broadcast::Receiver<BudgetUpdate>,
    pub home: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Item ids in the order of the last `list`, addressed by 1-based index.
    pub last_listing: Vec<Uuid>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> AppResult<Self> {
        Self::with_home(mode, utils::app_data_dir())
    }

    /// Builds a context rooted at `home`, which holds `config/` and the default data root.
    pub fn with_home(mode: CliMode, home: PathBuf) -> AppResult<Self> {
        let config_manager = ConfigManager::for_home(&home);
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let runtime = Builder::new_current_thread().enable_all().build()?;
        let data_root = config.resolve_data_root(&home);
        let store = runtime.block_on(JsonItemStore::open_in_dir(&data_root))?;
        tracing::info!(path = %store.path().display(), "shopping list store ready");

        let settings = ListSettings {
            undo_window: config.undo_window(),
            warning_threshold_percent: config.warning_threshold_percent,
        };
        let list = ShoppingList::new(Arc::new(store), settings);
        let updates = list.subscribe();

        Ok(Self {
            mode,
            commands: commands::table(),
            theme: ColorfulTheme::default(),
            runtime,
            list,
            updates,
            home,
            config_manager,
            config,
            last_listing: Vec::new(),
            running: true,
        })
    }

    /// Drives `future` to completion on the shell's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Drains pending `budgetUpdate` notifications. Returns whether any arrived.
    pub fn take_updates(&mut self) -> bool {
        let mut updated = false;
        loop {
            match self.updates.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => updated = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        updated
    }
}
