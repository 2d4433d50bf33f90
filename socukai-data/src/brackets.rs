use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use socukai_core::calculations::{CompanyTaxCalculator, schedules};
use socukai_core::{BracketTable, BracketTableError, TaxBracket};
use thiserror::Error;
use tracing::{debug, info};

/// Bracket file shipped with the crate.
pub const BRACKETS_2024_CSV: &str = include_str!("../data/brackets_2024.csv");

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid table: {0}")]
    Table(#[from] BracketTableError),

    #[error("schedule '{0}' not found in bracket file")]
    MissingSchedule(String),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the brackets CSV file.
///
/// - `schedule`: table name (`individual`, `company-sme`, ...)
/// - `lower_bound`: where the bracket starts
/// - `upper_bound`: where it ends (empty for the unbounded top bracket)
/// - `rate`: marginal rate as a fraction (e.g. `0.19` for 19%)
/// - `label`: human-readable description
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub schedule: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables from CSV files.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by schedule, in order of first appearance, and
    /// validates each group as a [`BracketTable`].
    pub fn build(records: &[BracketRecord]) -> Result<Vec<BracketTable>, BracketLoaderError> {
        let mut groups: Vec<(&str, Vec<TaxBracket>)> = Vec::new();

        for record in records {
            let bracket = TaxBracket::new(
                record.lower_bound,
                record.upper_bound,
                record.rate,
                record.label.clone(),
            );
            match groups.iter_mut().find(|(name, _)| *name == record.schedule) {
                Some((_, brackets)) => brackets.push(bracket),
                None => groups.push((&record.schedule, vec![bracket])),
            }
        }

        let tables = groups
            .into_iter()
            .map(|(name, brackets)| BracketTable::new(name, brackets))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(tables = tables.len(), "bracket tables built");
        Ok(tables)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<Vec<BracketTable>, BracketLoaderError> {
        Self::build(&Self::parse(reader)?)
    }

    pub fn load_path(path: &Path) -> Result<Vec<BracketTable>, BracketLoaderError> {
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::load(file)?;
        info!(path = %path.display(), tables = tables.len(), "loaded bracket file");
        Ok(tables)
    }
}

/// The three schedules an estimator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTables {
    pub individual: BracketTable,
    pub company_sme: BracketTable,
    pub company_non_sme: BracketTable,
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TaxTables {
    /// The hard-coded 2024 schedules.
    pub fn builtin() -> Self {
        Self {
            individual: schedules::individual_2024(),
            company_sme: schedules::company_sme_2024(),
            company_non_sme: schedules::company_non_sme_2024(),
        }
    }

    /// Picks the three named schedules out of `tables`. Extra schedules are
    /// ignored.
    pub fn from_tables(tables: Vec<BracketTable>) -> Result<Self, BracketLoaderError> {
        let mut tables = tables;
        let mut take = |name: &str| {
            tables
                .iter()
                .position(|t| t.name() == name)
                .map(|index| tables.swap_remove(index))
                .ok_or_else(|| BracketLoaderError::MissingSchedule(name.to_string()))
        };

        Ok(Self {
            individual: take(schedules::INDIVIDUAL)?,
            company_sme: take(schedules::COMPANY_SME)?,
            company_non_sme: take(schedules::COMPANY_NON_SME)?,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, BracketLoaderError> {
        Self::from_tables(BracketTableLoader::load_path(path)?)
    }

    /// Company calculator backed by these tables.
    pub fn company(&self) -> CompanyTaxCalculator {
        CompanyTaxCalculator::new(self.company_sme.clone(), self.company_non_sme.clone())
    }
}
