//! Configuration for FlatDB
//!
//! Where the catalog and row stores live, and the bounds applied when
//! tables and rows are validated.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::catalog::RECORD_COLUMNS;
use crate::error::{Error, Result};

/// Default catalog file name
pub const DEFAULT_CATALOG_FILE: &str = "__tables_data.dat";

/// Default prefix for atomic-replace temporary files
pub const DEFAULT_TEMP_PREFIX: &str = "__database_Temporary_";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the catalog and every row store
    pub data_dir: PathBuf,
    /// Catalog file name inside `data_dir`
    pub catalog_file: String,
    /// Maximum columns per table, and values per inserted row
    pub max_columns: usize,
    /// Prefix of temporary files used to replace a row store
    pub temp_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            max_columns: RECORD_COLUMNS,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the catalog file name
    pub fn catalog_file(mut self, name: impl Into<String>) -> Self {
        self.catalog_file = name.into();
        self
    }

    /// Set the column bound
    pub fn max_columns(mut self, max: usize) -> Self {
        self.max_columns = max;
        self
    }

    /// Set the temporary file prefix
    pub fn temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    /// Full path of the catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    /// Check the config for values the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_columns == 0 || self.max_columns > RECORD_COLUMNS {
            return Err(Error::Config(format!(
                "max_columns must be between 1 and {}, got {}",
                RECORD_COLUMNS, self.max_columns
            )));
        }
        if self.catalog_file.is_empty() {
            return Err(Error::Config("catalog_file must not be empty".to_string()));
        }
        if self.temp_prefix.is_empty() {
            return Err(Error::Config("temp_prefix must not be empty".to_string()));
        }
        Ok(())
    }
}
