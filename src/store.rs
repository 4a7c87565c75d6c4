/*!
 * Configuration storage for collectfs
 *
 * Two storage locations exist: the global record in the user's config
 * directory and the local record at a fixed filename inside the
 * collection root. Both use the same JSON record dump, so seeding the
 * local record from the global one is a verbatim file copy.
 */

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use crate::config::{ConfigRecord, GLOBAL_CONFIG_FILENAME, LOCAL_CONFIG_FILENAME};
use crate::error::Result;
use crate::{bail, ensure, error};

/// Default location of the global configuration record
pub static DEFAULT_GLOBAL_CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("collectfs")
        .join(GLOBAL_CONFIG_FILENAME)
});

/// Reads and writes the two persisted configuration forms
pub struct ConfigStore {
    root: PathBuf,
    global_path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the given collection root, using the default
    /// global configuration location
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_global_path(root, DEFAULT_GLOBAL_CONFIG_PATH.clone())
    }

    /// Create a store with an explicit global configuration path
    pub fn with_global_path(root: impl Into<PathBuf>, global_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global_path: global_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    /// Path of the local configuration record for this root
    pub fn local_path(&self) -> PathBuf {
        self.root.join(LOCAL_CONFIG_FILENAME)
    }

    pub fn global_exists(&self) -> bool {
        self.global_path.exists()
    }

    pub fn local_exists(&self) -> bool {
        self.local_path().exists()
    }

    /// Read the global record; absence degrades to built-in defaults
    /// with a warning, a present-but-unreadable file is a storage error
    pub fn read_global(&self) -> Result<ConfigRecord> {
        if !self.global_exists() {
            log::warn!(
                "Global configuration not found at {}, using default settings",
                self.global_path.display()
            );
            return Ok(ConfigRecord::default());
        }
        read_record(&self.global_path)
    }

    /// Read the local record; returns the record and whether local
    /// storage existed (a default record is returned when it did not)
    pub fn read_local(&self) -> Result<(ConfigRecord, bool)> {
        let path = self.local_path();
        if !path.exists() {
            return Ok((ConfigRecord::default(), false));
        }
        Ok((read_record(&path)?, true))
    }

    pub fn write_global(&self, record: &ConfigRecord) -> Result<()> {
        write_record(&self.global_path, record)
    }

    pub fn write_local(&self, record: &ConfigRecord) -> Result<()> {
        write_record(&self.local_path(), record)
    }

    /// Copy the global record verbatim to the local location, creating
    /// the local storage file
    pub fn seed_local_from_global(&self) -> Result<()> {
        ensure!(
            self.global_exists(),
            Storage,
            "cannot seed local config: global configuration missing at {}",
            self.global_path.display()
        );
        let local_path = self.local_path();
        fs::copy(&self.global_path, &local_path).map_err(|e| {
            error!(
                Storage,
                "failed to seed {} from {}: {}",
                local_path.display(),
                self.global_path.display(),
                e
            )
        })?;
        log::info!(
            "Seeded local configuration at {} from {}",
            local_path.display(),
            self.global_path.display()
        );
        Ok(())
    }
}

fn read_record(path: &Path) -> Result<ConfigRecord> {
    let content = fs::read_to_string(path)
        .map_err(|e| error!(Storage, "failed to read {}: {}", path.display(), e))?;
    let mut record: ConfigRecord = serde_json::from_str(&content)
        .map_err(|e| error!(Storage, "failed to parse {}: {}", path.display(), e))?;
    record.normalize();
    Ok(record)
}

fn write_record(path: &Path, record: &ConfigRecord) -> Result<()> {
    // Single whole-record write; parents are not auto-created
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            bail!(
                Storage,
                "cannot write {}: parent directory {} does not exist",
                path.display(),
                parent.display()
            );
        }
    }
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json)
        .map_err(|e| error!(Storage, "failed to write {}: {}", path.display(), e))?;
    log::debug!("Wrote configuration to {}", path.display());
    Ok(())
}
