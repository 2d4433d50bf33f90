use serde::{Deserialize, Serialize};

/// Corporate income tax schedule.
///
/// SME status depends on paid-up capital and gross income thresholds, which
/// the caller decides; it is never inferred from the profit figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyTaxSchedule {
    /// 17% on the first RM600,000 of chargeable profit, 24% on the rest.
    Sme,
    /// Flat 24%.
    NonSme,
}

impl CompanyTaxSchedule {
    pub fn from_is_sme(is_sme: bool) -> Self {
        if is_sme { Self::Sme } else { Self::NonSme }
    }

    pub fn is_sme(&self) -> bool {
        matches!(self, Self::Sme)
    }
}
