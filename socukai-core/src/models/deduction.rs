use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw deduction figures as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionInput {
    pub epf: Decimal,
    pub prs: Decimal,
    pub other_deductions: Decimal,
}

/// Statutory ceilings applied to EPF and PRS contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCaps {
    pub epf: Decimal,
    pub prs: Decimal,
}

impl Default for DeductionCaps {
    fn default() -> Self {
        Self {
            epf: Decimal::from(4000),
            prs: Decimal::from(3000),
        }
    }
}
