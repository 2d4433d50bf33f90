use std::path::{Path, PathBuf};

use serde::Deserialize;
use socukai_core::ReliefDefinition;
use socukai_core::calculations::{ReliefCatalog, ReliefCatalogError};
use thiserror::Error;
use tracing::info;

/// Relief catalogue shipped with the crate.
pub const RELIEFS_2024_TOML: &str = include_str!("../data/reliefs_2024.toml");

/// Errors that can occur when loading a relief catalogue.
#[derive(Debug, Error)]
pub enum ReliefLoaderError {
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalogue: {0}")]
    Catalog(#[from] ReliefCatalogError),
}

#[derive(Debug, Deserialize)]
struct ReliefFile {
    #[serde(default)]
    relief: Vec<ReliefDefinition>,
}

/// Loader for relief catalogues stored as TOML.
///
/// Each entry is a `[[relief]]` table; sub-options are nested
/// `[[relief.options]]` tables.
pub struct ReliefCatalogLoader;

impl ReliefCatalogLoader {
    pub fn parse(source: &str) -> Result<ReliefCatalog, ReliefLoaderError> {
        let file: ReliefFile = toml::from_str(source)?;
        Ok(ReliefCatalog::new(file.relief)?)
    }

    pub fn load_path(path: &Path) -> Result<ReliefCatalog, ReliefLoaderError> {
        let source = std::fs::read_to_string(path).map_err(|source| ReliefLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&source)?;
        info!(
            path = %path.display(),
            reliefs = catalog.definitions().len(),
            "loaded relief catalogue"
        );
        Ok(catalog)
    }
}
