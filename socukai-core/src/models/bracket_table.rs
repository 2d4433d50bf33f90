use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::TaxBracket;

/// Errors raised when a set of brackets does not form a valid schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table '{0}' has no brackets")]
    Empty(String),

    #[error("bracket table '{table}' must start at 0, first bracket starts at {found}")]
    NonZeroStart { table: String, found: Decimal },

    #[error("bracket {index} of '{table}' starts at {found}, expected {expected}")]
    NotContiguous {
        table: String,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} of '{table}' has upper bound {upper} not above lower bound {lower}")]
    EmptyRange {
        table: String,
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("bracket {index} of '{table}' is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { table: String, index: usize },

    #[error("last bracket of '{0}' must be unbounded")]
    BoundedTop(String),

    #[error("bracket {index} of '{table}' has rate {rate} outside [0, 1]")]
    InvalidRate {
        table: String,
        index: usize,
        rate: Decimal,
    },
}

/// An ordered, validated progressive schedule.
///
/// Brackets are contiguous, ascending from zero, and the last one is
/// unbounded. The table cannot be mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    name: String,
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Builds a table after checking the ordering and contiguity invariant.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] naming the first offending bracket.
    pub fn new(
        name: impl Into<String>,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, BracketTableError> {
        let name = name.into();
        validate(&name, &brackets)?;
        Ok(Self { name, brackets })
    }

    /// Builds a table from brackets already known to satisfy the invariant.
    pub(crate) fn from_trusted(
        name: impl Into<String>,
        brackets: Vec<TaxBracket>,
    ) -> Self {
        let name = name.into();
        debug_assert!(validate(&name, &brackets).is_ok(), "invalid built-in table {name}");
        Self { name, brackets }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

fn validate(
    name: &str,
    brackets: &[TaxBracket],
) -> Result<(), BracketTableError> {
    let first = brackets
        .first()
        .ok_or_else(|| BracketTableError::Empty(name.to_string()))?;

    if first.lower_bound != Decimal::ZERO {
        return Err(BracketTableError::NonZeroStart {
            table: name.to_string(),
            found: first.lower_bound,
        });
    }

    let last_index = brackets.len() - 1;
    let mut expected_lower = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(BracketTableError::InvalidRate {
                table: name.to_string(),
                index,
                rate: bracket.rate,
            });
        }

        if bracket.lower_bound != expected_lower {
            return Err(BracketTableError::NotContiguous {
                table: name.to_string(),
                index,
                expected: expected_lower,
                found: bracket.lower_bound,
            });
        }

        match bracket.upper_bound {
            Some(upper) if upper <= bracket.lower_bound => {
                return Err(BracketTableError::EmptyRange {
                    table: name.to_string(),
                    index,
                    lower: bracket.lower_bound,
                    upper,
                });
            }
            Some(_) if index == last_index => {
                return Err(BracketTableError::BoundedTop(name.to_string()));
            }
            Some(upper) => expected_lower = upper,
            None if index != last_index => {
                return Err(BracketTableError::UnboundedBeforeEnd {
                    table: name.to_string(),
                    index,
                });
            }
            None => {}
        }
    }

    Ok(())
}
