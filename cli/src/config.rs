// Configuration management for the contactbook CLI
//
// Cross-platform config stored in:
// - macOS: ~/Library/Application Support/contactbook/config.json
// - Linux: ~/.config/contactbook/config.json
// - Windows: %APPDATA%\contactbook\config.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "contactbook";
const DEFAULT_BOOK_FILE: &str = "address_book.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address book file; defaults to the data directory
    pub book_path: Option<String>,

    /// Contacts shown per page by `show`
    pub page_size: usize,

    /// Save after one-shot edits and when the shell exits
    pub autosave: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            book_path: None,
            page_size: 3,
            autosave: true,
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DIR);

        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get the data directory path (cross-platform)
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to determine data directory")?
            .join(APP_DIR);

        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        Ok(data_dir)
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Address book path: explicit setting, else the data directory
    pub fn book_path(&self) -> Result<PathBuf> {
        match &self.book_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Self::data_dir()?.join(DEFAULT_BOOK_FILE)),
        }
    }

    /// Set a config value (in memory; call `save` to persist)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "book_path" => {
                self.book_path = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "page_size" => {
                let size: usize = value.parse().context("Invalid number")?;
                if size == 0 {
                    anyhow::bail!("page_size must be at least 1");
                }
                self.page_size = size;
            }
            "autosave" => {
                self.autosave = value.parse().context("Invalid boolean value")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "book_path" => self.book_path.clone(),
            "page_size" => Some(self.page_size.to_string()),
            "autosave" => Some(self.autosave.to_string()),
            _ => None,
        }
    }

    /// List all config values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            (
                "book_path".to_string(),
                self.book_path.clone().unwrap_or_else(|| "(auto)".to_string()),
            ),
            ("page_size".to_string(), self.page_size.to_string()),
            ("autosave".to_string(), self.autosave.to_string()),
        ]
    }
}
