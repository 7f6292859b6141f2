//! Configuration storage adapters.
//!
//! Both implement [`ConfigPort`]:
//!
//! - [`JsonConfigFile`]: human-edited JSON on the host filesystem.
//! - [`BlobConfigStore`]: postcard blob in memory, standing in for the
//!   EEPROM image a firmware build persists.
//!
//! Every save is validated first; a rejected config never reaches storage.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::FirmwareConfig;
use crate::error::Error;

fn validate(config: &FirmwareConfig) -> Result<(), ConfigError> {
    config.validate().map_err(|e| match e {
        Error::Config(msg) => ConfigError::ValidationFailed(msg),
        _ => ConfigError::ValidationFailed("invalid configuration"),
    })
}

// ───────────────────────────────────────────────────────────────
// JSON file
// ───────────────────────────────────────────────────────────────

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<FirmwareConfig, ConfigError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{}: not found, using defaults", self.path.display());
                return Ok(FirmwareConfig::default());
            }
            Err(e) => {
                warn!("{}: read failed: {e}", self.path.display());
                return Err(ConfigError::IoError);
            }
        };
        let config: FirmwareConfig =
            serde_json::from_slice(&bytes).map_err(|_| ConfigError::Corrupted)?;
        info!("{}: loaded board {}", self.path.display(), config.board_id);
        Ok(config)
    }

    fn save(&self, config: &FirmwareConfig) -> Result<(), ConfigError> {
        validate(config)?;
        let json = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::IoError)?;
        std::fs::write(&self.path, json).map_err(|_| ConfigError::IoError)?;
        info!("{}: config saved", self.path.display());
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Postcard blob
// ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct BlobConfigStore {
    blob: RefCell<Option<Vec<u8>>>,
}

impl BlobConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored bytes, if any.
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob.borrow().clone()
    }

    /// Overwrite storage with arbitrary bytes (simulates corruption).
    pub fn set_blob(&self, bytes: Vec<u8>) {
        *self.blob.borrow_mut() = Some(bytes);
    }
}

impl ConfigPort for BlobConfigStore {
    fn load(&self) -> Result<FirmwareConfig, ConfigError> {
        match self.blob.borrow().as_deref() {
            Some(bytes) => postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted),
            None => {
                info!("BlobConfigStore: no stored config, using defaults");
                Ok(FirmwareConfig::default())
            }
        }
    }

    fn save(&self, config: &FirmwareConfig) -> Result<(), ConfigError> {
        validate(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        *self.blob.borrow_mut() = Some(bytes);
        Ok(())
    }
}
