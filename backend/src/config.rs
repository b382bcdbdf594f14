//! # Application Configuration
//!
//! A single YAML file, `config.yaml`, at the root of the default data
//! directory:
//!
//! ```yaml
//! data_directory: "/home/me/.local/share/Donation Tracker"
//! log_filter: "info"
//! admin_user: "admin"
//! ```
//!
//! `data_directory` may point somewhere other than the directory holding the
//! config file; the stores are opened wherever it points.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "DONATION_TRACKER_DATA_DIR";

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the table files live
    pub data_directory: PathBuf,
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// User id of the administrator session the binary acts as
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_admin_user() -> String {
    "admin".to_string()
}

impl AppConfig {
    pub fn with_data_directory<P: AsRef<Path>>(data_directory: P) -> Self {
        Self {
            data_directory: data_directory.as_ref().to_path_buf(),
            log_filter: default_log_filter(),
            admin_user: default_admin_user(),
        }
    }

    /// `$DONATION_TRACKER_DATA_DIR`, else `<platform data dir>/Donation Tracker`,
    /// else `./donation_data`
    pub fn default_data_directory() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir.trim());
            }
        }
        dirs::data_dir()
            .map(|dir| dir.join("Donation Tracker"))
            .unwrap_or_else(|| PathBuf::from("donation_data"))
    }

    /// Load the config from the default data directory
    pub fn load() -> Result<Self> {
        Self::load_or_create(Self::default_data_directory())
    }

    /// Load `config.yaml` from `directory`, writing a default one if missing
    pub fn load_or_create<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        let config_path = directory.join(CONFIG_FILE);

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: AppConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::with_data_directory(directory);
            config.save(directory)?;
            info!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Write `config.yaml` into `directory`
    pub fn save<P: AsRef<Path>>(&self, directory: P) -> Result<()> {
        let directory = directory.as_ref();
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }

        let config_path = directory.join(CONFIG_FILE);
        let temp_path = config_path.with_extension("yaml.tmp");
        fs::write(&temp_path, serde_yaml::to_string(self)?)?;
        fs::rename(&temp_path, &config_path)?;
        Ok(())
    }
}
