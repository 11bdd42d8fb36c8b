use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::store::StoreDefaults;

/// Application configuration loaded from environment variables.
/// Every variable has a default, so a bare environment starts a working builder.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub snapshot_dir: PathBuf,
    pub snapshot_key: String,
    pub default_template: String,
    pub default_phone: String,
    pub recalculate_on_restore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            snapshot_dir: PathBuf::from(".cv-builder"),
            snapshot_key: "cv-builder-storage".to_string(),
            default_template: "modern".to_string(),
            default_phone: "+966".to_string(),
            recalculate_on_restore: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys take the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: match lookup("PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            snapshot_dir: lookup("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_dir),
            snapshot_key: lookup("SNAPSHOT_KEY").unwrap_or(defaults.snapshot_key),
            default_template: lookup("DEFAULT_TEMPLATE").unwrap_or(defaults.default_template),
            default_phone: lookup("DEFAULT_PHONE").unwrap_or(defaults.default_phone),
            recalculate_on_restore: match lookup("RECALCULATE_ON_RESTORE") {
                Some(v) => v
                    .parse::<bool>()
                    .context("RECALCULATE_ON_RESTORE must be 'true' or 'false'")?,
                None => defaults.recalculate_on_restore,
            },
        })
    }

    pub fn store_defaults(&self) -> StoreDefaults {
        StoreDefaults {
            template: self.default_template.clone(),
            phone: self.default_phone.clone(),
        }
    }
}
