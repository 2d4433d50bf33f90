use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marginal label reported when chargeable income is zero.
pub const NO_TAX_PAYABLE: &str = "No tax payable";

/// One row of the per-bracket breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub label: String,
    pub taxable_slice: Decimal,
    pub rate: Decimal,
    pub tax_for_slice: Decimal,
}

/// Output of a single bracket walk.
///
/// Amounts are exact; callers round for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub chargeable_income: Decimal,
    pub total_tax: Decimal,
    /// `total_tax / chargeable_income` as a fraction, zero when income is zero.
    pub effective_rate: Decimal,
    /// Only brackets with a positive slice, in ascending order.
    pub breakdown: Vec<BracketSlice>,
    pub marginal_bracket_label: String,
    pub marginal_rate: Option<Decimal>,
}

impl TaxComputationResult {
    /// Result for zero chargeable income.
    pub fn no_tax() -> Self {
        Self {
            chargeable_income: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            breakdown: Vec::new(),
            marginal_bracket_label: NO_TAX_PAYABLE.to_string(),
            marginal_rate: None,
        }
    }
}
