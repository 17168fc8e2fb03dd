use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

const DEFAULT_LEDGER_NAME: &str = "financer";

/// User preferences shared by the Financer front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for ledgers. Defaults to `~/Documents/Financer`.
    pub default_ledger_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `<ledger root>/backups`.
    pub default_backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "EUR".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            last_opened_ledger: None,
            default_ledger_root: None,
            default_backup_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backup_retention == 0 {
            return Err(ConfigError::InvalidValue {
                key: "backup_retention".into(),
                value: "0".into(),
            });
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "currency".into(),
                value: self.currency.clone(),
            });
        }
        Ok(())
    }

    pub fn resolve_default_ledger_root(&self) -> PathBuf {
        if let Some(path) = &self.default_ledger_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Financer")
    }

    pub fn resolve_default_backup_root(&self) -> PathBuf {
        self.default_backup_root
            .clone()
            .unwrap_or_else(|| self.resolve_default_ledger_root().join("backups"))
    }

    /// File of the ledger opened on startup.
    pub fn resolve_ledger_path(&self) -> PathBuf {
        let name = self
            .last_opened_ledger
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_LEDGER_NAME);
        self.resolve_default_ledger_root()
            .join(format!("{}.json", name))
    }
}
