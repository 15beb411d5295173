//! Loading and saving `config/config.json` under the application home.

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError, ConfigKey};

const CONFIG_RELATIVE_PATH: [&str; 2] = ["config", "config.json"];

/// Reads and writes one config document.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for `<home>/config/config.json`. Nothing is created until the first save.
    pub fn for_home(home: &Path) -> Self {
        let path = CONFIG_RELATIVE_PATH
            .iter()
            .fold(home.to_path_buf(), |path, part| path.join(part));
        Self::new(path)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Defaults when the file does not exist yet; otherwise the parsed and
    /// validated document.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let data = match fs::read_to_string(&self.config_path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(err) => return Err(err.into()),
        };
        let config: Config =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates and writes `config`, replacing the previous file in one rename.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let staging = self.config_path.with_extension("json.tmp");
        let mut file = File::create(&staging)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, &self.config_path)?;
        Ok(())
    }

    /// Sets `key` on a copy of `config`, saves it and only then updates `config`.
    pub fn update(
        &self,
        config: &mut Config,
        key: ConfigKey,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut next = config.clone();
        next.set(key, value)?;
        self.save(&next)?;
        *config = next;
        Ok(())
    }
}
