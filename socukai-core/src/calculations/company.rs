//! Corporate income tax.
//!
//! SME companies pay 17% on the first RM600,000 of chargeable profit and 24%
//! on the remainder; other companies pay a flat 24%. Both schedules are
//! bracket tables run through [`ProgressiveTaxEngine`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use socukai_core::calculations::compute_company_tax;
//!
//! let result = compute_company_tax(dec!(750000), true);
//!
//! assert_eq!(result.total_tax, dec!(138000));
//! assert_eq!(result.effective_rate, dec!(0.184));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::ProgressiveTaxEngine;
use crate::calculations::schedules;
use crate::models::{BracketTable, CompanyTaxSchedule, MarginalConvention, TaxComputationResult};

/// Corporate tax calculator holding one table per schedule.
#[derive(Debug, Clone)]
pub struct CompanyTaxCalculator {
    sme: BracketTable,
    non_sme: BracketTable,
}

impl Default for CompanyTaxCalculator {
    fn default() -> Self {
        Self::new(schedules::company_sme_2024(), schedules::company_non_sme_2024())
    }
}

impl CompanyTaxCalculator {
    pub fn new(
        sme: BracketTable,
        non_sme: BracketTable,
    ) -> Self {
        Self { sme, non_sme }
    }

    pub fn table(
        &self,
        schedule: CompanyTaxSchedule,
    ) -> &BracketTable {
        match schedule {
            CompanyTaxSchedule::Sme => &self.sme,
            CompanyTaxSchedule::NonSme => &self.non_sme,
        }
    }

    /// Computes tax on `profit` under `schedule`.
    ///
    /// A loss (negative profit) is floored at zero and pays no tax.
    pub fn compute(
        &self,
        profit: Decimal,
        schedule: CompanyTaxSchedule,
    ) -> TaxComputationResult {
        self.compute_with(profit, schedule, MarginalConvention::default())
    }

    /// As [`compute`](Self::compute) with an explicit boundary convention.
    pub fn compute_with(
        &self,
        profit: Decimal,
        schedule: CompanyTaxSchedule,
        convention: MarginalConvention,
    ) -> TaxComputationResult {
        if profit < Decimal::ZERO {
            warn!(%profit, "negative company profit treated as zero");
        }

        ProgressiveTaxEngine::new(self.table(schedule))
            .with_convention(convention)
            .compute(profit)
    }
}

/// Computes company tax with the built-in 2024 schedules.
pub fn compute_company_tax(
    profit: Decimal,
    is_sme: bool,
) -> TaxComputationResult {
    CompanyTaxCalculator::default().compute(profit, CompanyTaxSchedule::from_is_sme(is_sme))
}
