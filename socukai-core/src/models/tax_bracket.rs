use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous income range taxed at a single marginal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    /// `None` marks the final, unbounded bracket.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub label: String,
}

/// Which bracket owns an income that sits exactly on a boundary when
/// picking the marginal bracket.
///
/// The bracket walk itself is unaffected: the slice up to the boundary is
/// always taxed in the lower bracket and the upper bracket receives a zero
/// slice, which is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarginalConvention {
    /// `lower < income <= upper`: a boundary value belongs to the lower bracket.
    #[default]
    UpperInclusive,
    /// `lower <= income < upper`: a boundary value belongs to the upper bracket.
    LowerInclusive,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
            label: label.into(),
        }
    }

    /// Width of the bracket, or `None` when unbounded.
    pub fn width(&self) -> Option<Decimal> {
        self.upper_bound.map(|upper| upper - self.lower_bound)
    }

    /// Returns true when `income` falls in this bracket under `convention`.
    pub fn contains(
        &self,
        income: Decimal,
        convention: MarginalConvention,
    ) -> bool {
        match convention {
            MarginalConvention::UpperInclusive => {
                income > self.lower_bound && self.upper_bound.is_none_or(|upper| income <= upper)
            }
            MarginalConvention::LowerInclusive => {
                income >= self.lower_bound && self.upper_bound.is_none_or(|upper| income < upper)
            }
        }
    }

    /// Portion of `income` that falls inside this bracket. Zero when the
    /// income does not reach the bracket floor.
    pub fn slice_of(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.lower_bound {
            return Decimal::ZERO;
        }
        let above_floor = income - self.lower_bound;
        match self.width() {
            Some(width) => above_floor.min(width),
            None => above_floor,
        }
    }
}
