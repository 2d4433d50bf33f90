//! `socukai.toml` settings.
//!
//! Every key is optional:
//!
//! ```toml
//! [tables]
//! brackets = "data/brackets_2024.csv"
//! reliefs = "data/reliefs_2024.toml"
//!
//! [deductions]
//! epf_cap = 4000
//! prs_cap = 3000
//!
//! [logging]
//! level = "info"
//! file = "socukai.log"
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use socukai_core::DeductionCaps;
use socukai_core::calculations::ReliefCatalog;
use socukai_data::{
    BracketLoaderError, ReliefCatalogLoader, ReliefLoaderError, TaxTables,
};
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "socukai.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub tables: TablesConfig,
    pub deductions: DeductionsConfig,
    pub logging: LoggingConfig,
}

/// Data files overriding the built-in 2024 tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    pub brackets: Option<PathBuf>,
    pub reliefs: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeductionsConfig {
    pub epf_cap: Decimal,
    pub prs_cap: Decimal,
}

impl Default for DeductionsConfig {
    fn default() -> Self {
        let caps = DeductionCaps::default();
        Self {
            epf_cap: caps.epf,
            prs_cap: caps.prs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Settings {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads `path`, or `socukai.toml` from the working directory when it
    /// exists, or the defaults.
    ///
    /// An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        let settings = Self::from_toml(&source)?;
        Ok(match path.parent() {
            Some(base) => settings.relative_to(base),
            None => settings,
        })
    }

    /// Rebases relative file paths onto `base`. Absolute paths are kept.
    fn relative_to(
        mut self,
        base: &Path,
    ) -> Self {
        for path in [
            &mut self.tables.brackets,
            &mut self.tables.reliefs,
            &mut self.logging.file,
        ]
        .into_iter()
        .flatten()
        {
            *path = base.join(&*path);
        }
        self
    }

    pub fn caps(&self) -> DeductionCaps {
        DeductionCaps {
            epf: self.deductions.epf_cap,
            prs: self.deductions.prs_cap,
        }
    }

    pub fn tax_tables(&self) -> Result<TaxTables, BracketLoaderError> {
        match &self.tables.brackets {
            Some(path) => TaxTables::from_path(path),
            None => Ok(TaxTables::builtin()),
        }
    }

    pub fn relief_catalog(&self) -> Result<ReliefCatalog, ReliefLoaderError> {
        match &self.tables.reliefs {
            Some(path) => ReliefCatalogLoader::load_path(path),
            None => Ok(ReliefCatalog::malaysia_2024()),
        }
    }
}
