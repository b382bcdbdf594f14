//! # File Store
//!
//! A `KeyValueStore` that keeps each key in its own JSON file under a data
//! directory:
//!
//! ```text
//! data/
//! ├── config.yaml
//! ├── donations.json
//! ├── donation_food.json
//! ├── donation_apparel.json
//! ├── donation_money.json
//! └── notifications.json
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! reader never sees a half-written table.

use anyhow::{anyhow, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStore;

/// File-backed key-value store rooted at a data directory
#[derive(Clone, Debug)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Open a store in `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the file holding `key`. Keys are restricted to
    /// `[A-Za-z0-9_-]` so they can never escape the data directory.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow!("Invalid storage key: {:?}", key));
        }
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("Removed {:?}", path);
        }
        Ok(())
    }
}
