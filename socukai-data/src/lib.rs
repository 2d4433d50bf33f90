//! Loaders for bracket tables and relief catalogues kept in data files.
//!
//! The shipped 2024 files mirror the built-in tables in `socukai-core`;
//! point the CLI at edited copies to try other years or rates.

mod brackets;
mod reliefs;

pub use brackets::{
    BRACKETS_2024_CSV, BracketLoaderError, BracketRecord, BracketTableLoader, TaxTables,
};
pub use reliefs::{RELIEFS_2024_TOML, ReliefCatalogLoader, ReliefLoaderError};
