//! Ingestion configuration.
//!
//! A TOML file looks like this:
//!
//! ```toml
//! parameter_file = "room.cfd"
//! mask_file = "zeroone.dat"   # optional
//! read_settings = true        # optional
//! ```

use crate::error::{Result, SciError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional name of the solid mask file.
pub const DEFAULT_MASK_FILE: &str = "zeroone.dat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Primary SCI parameter file.
    pub parameter_file: PathBuf,
    /// Solid mask. A relative path is taken from the parameter file's directory.
    #[serde(default = "default_mask_file")]
    pub mask_file: PathBuf,
    /// Whether to parse the solver settings trailer.
    #[serde(default = "default_read_settings")]
    pub read_settings: bool,
}

fn default_mask_file() -> PathBuf {
    PathBuf::from(DEFAULT_MASK_FILE)
}

fn default_read_settings() -> bool {
    true
}

impl IngestConfig {
    pub fn new(parameter_file: impl Into<PathBuf>) -> Self {
        Self {
            parameter_file: parameter_file.into(),
            mask_file: default_mask_file(),
            read_settings: default_read_settings(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SciError::Config(format!("Failed to read config file '{}': {e}", path.display()))
        })?;

        let config: IngestConfig = toml::from_str(&content)
            .map_err(|e| SciError::Config(format!("Failed to parse TOML config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.parameter_file.as_os_str().is_empty() {
            return Err(SciError::Config("parameter_file must not be empty".into()));
        }
        if self.mask_file.as_os_str().is_empty() {
            return Err(SciError::Config("mask_file must not be empty".into()));
        }
        Ok(())
    }

    /// Mask location after resolving a relative `mask_file`.
    pub fn mask_path(&self) -> PathBuf {
        if self.mask_file.is_absolute() {
            return self.mask_file.clone();
        }
        match self.parameter_file.parent() {
            Some(dir) => dir.join(&self.mask_file),
            None => self.mask_file.clone(),
        }
    }
}
