//! Entity-level tax estimator.
//!
//! One estimator type serves all three audience segments. A profile picks
//! the labels and the schedule; the pipeline is always the same:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Cap EPF / PRS, floor other deductions |
//! | 2    | Total the relief claims the entity may use (clamped) |
//! | 3    | Chargeable income = gross − deductions − reliefs, floored at 0 |
//! | 4    | Bracket walk |
//!
//! Companies skip steps 1–2 and go straight to the corporate schedule.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use socukai_core::calculations::{EstimateInput, TaxEstimator};
//!
//! let estimator = TaxEstimator::individual();
//! let input = EstimateInput {
//!     gross_amount: dec!(85000),
//!     epf: Some(dec!(4000)),
//!     prs: Some(dec!(1000)),
//!     ..EstimateInput::default()
//! };
//!
//! let estimate = estimator.estimate(&input);
//!
//! assert_eq!(estimate.computation.chargeable_income, dec!(80000));
//! assert_eq!(estimate.computation.total_tax, dec!(5600));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculations::company::CompanyTaxCalculator;
use crate::calculations::deductions::{CappedDeductions, apply_caps};
use crate::calculations::progressive::{ProgressiveTaxEngine, chargeable_income};
use crate::calculations::reliefs::{ReliefCatalog, ReliefSummary, ReliefValidationErrors};
use crate::calculations::schedules;
use crate::models::{
    BracketTable, CompanyTaxSchedule, DeductionCaps, DeductionInput, EntityType,
    MarginalConvention, ReliefLineItem, TaxComputationResult,
};

/// Labels and defaults for one audience segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorProfile {
    pub entity: EntityType,
    pub title: String,
    pub gross_label: String,
    pub other_deductions_label: String,
}

impl EstimatorProfile {
    pub fn for_entity(entity: EntityType) -> Self {
        let (title, gross_label, other_deductions_label) = match entity {
            EntityType::Individual => (
                "Individual Tax Estimator",
                "Annual Net Profit (RM)",
                "Other Deductions (RM)",
            ),
            EntityType::SoleProprietorship => (
                "Sole Proprietor Tax Estimator",
                "Annual Net Business Profit (RM)",
                "Other Personal Deductions (RM)",
            ),
            EntityType::Company => (
                "Company Tax Estimator",
                "Profit Before Tax (RM)",
                "Other Deductions (RM)",
            ),
        };

        Self {
            entity,
            title: title.to_string(),
            gross_label: gross_label.to_string(),
            other_deductions_label: other_deductions_label.to_string(),
        }
    }
}

/// One input snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateInput {
    pub gross_amount: Decimal,
    pub epf: Option<Decimal>,
    pub prs: Option<Decimal>,
    pub other_deductions: Option<Decimal>,
    #[serde(default)]
    pub relief_line_items: Vec<ReliefLineItem>,
    /// Companies only. Defaults to SME.
    pub is_sme: Option<bool>,
}

impl EstimateInput {
    pub fn deductions(&self) -> DeductionInput {
        DeductionInput {
            epf: self.epf.unwrap_or_default(),
            prs: self.prs.unwrap_or_default(),
            other_deductions: self.other_deductions.unwrap_or_default(),
        }
    }

    pub fn schedule(&self) -> CompanyTaxSchedule {
        CompanyTaxSchedule::from_is_sme(self.is_sme.unwrap_or(true))
    }
}

/// Everything a result screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub entity: EntityType,
    pub gross_amount: Decimal,
    pub deductions: CappedDeductions,
    pub reliefs: ReliefSummary,
    /// Set for companies only.
    pub schedule: Option<CompanyTaxSchedule>,
    pub computation: TaxComputationResult,
}

impl TaxEstimate {
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.total.saturating_add(self.reliefs.total)
    }
}

/// Parameterised estimator shared by every entity type.
#[derive(Debug, Clone)]
pub struct TaxEstimator {
    profile: EstimatorProfile,
    personal_table: BracketTable,
    company: CompanyTaxCalculator,
    reliefs: ReliefCatalog,
    caps: DeductionCaps,
    convention: MarginalConvention,
}

impl TaxEstimator {
    pub fn new(
        profile: EstimatorProfile,
        personal_table: BracketTable,
        company: CompanyTaxCalculator,
        reliefs: ReliefCatalog,
        caps: DeductionCaps,
    ) -> Self {
        Self {
            profile,
            personal_table,
            company,
            reliefs,
            caps,
            convention: MarginalConvention::default(),
        }
    }

    /// Estimator for `entity` using the built-in 2024 tables.
    pub fn for_entity(entity: EntityType) -> Self {
        Self::new(
            EstimatorProfile::for_entity(entity),
            schedules::individual_2024(),
            CompanyTaxCalculator::default(),
            ReliefCatalog::malaysia_2024(),
            DeductionCaps::default(),
        )
    }

    pub fn individual() -> Self {
        Self::for_entity(EntityType::Individual)
    }

    pub fn sole_proprietorship() -> Self {
        Self::for_entity(EntityType::SoleProprietorship)
    }

    pub fn company() -> Self {
        Self::for_entity(EntityType::Company)
    }

    pub fn with_convention(
        mut self,
        convention: MarginalConvention,
    ) -> Self {
        self.convention = convention;
        self
    }

    pub fn profile(&self) -> &EstimatorProfile {
        &self.profile
    }

    pub fn reliefs(&self) -> &ReliefCatalog {
        &self.reliefs
    }

    /// Live estimate. Never fails; invalid relief claims are clamped and
    /// listed in `reliefs.errors`.
    pub fn estimate(
        &self,
        input: &EstimateInput,
    ) -> TaxEstimate {
        let estimate = match self.profile.entity {
            EntityType::Company => self.estimate_company(input),
            EntityType::Individual | EntityType::SoleProprietorship => {
                self.estimate_personal(input)
            }
        };

        debug!(
            entity = self.profile.entity.as_str(),
            gross = %estimate.gross_amount,
            chargeable = %estimate.computation.chargeable_income,
            tax = %estimate.computation.total_tax,
            "estimate computed"
        );

        estimate
    }

    /// Submit path: fails when any relief claim is invalid.
    ///
    /// # Errors
    ///
    /// Returns the collected [`ReliefValidationErrors`].
    pub fn finalize(
        &self,
        input: &EstimateInput,
    ) -> Result<TaxEstimate, ReliefValidationErrors> {
        let estimate = self.estimate(input);
        if !estimate.reliefs.is_valid() {
            return Err(estimate.reliefs.errors);
        }

        info!(
            entity = self.profile.entity.as_str(),
            tax = %estimate.computation.total_tax,
            "estimate finalized"
        );
        Ok(estimate)
    }

    fn estimate_personal(
        &self,
        input: &EstimateInput,
    ) -> TaxEstimate {
        let deductions = apply_caps(&input.deductions(), &self.caps);
        let reliefs = self
            .reliefs
            .preview_for(self.profile.entity, &input.relief_line_items);
        let chargeable = chargeable_income(input.gross_amount, deductions.total, reliefs.total);
        let computation = ProgressiveTaxEngine::new(&self.personal_table)
            .with_convention(self.convention)
            .compute(chargeable);

        TaxEstimate {
            entity: self.profile.entity,
            gross_amount: input.gross_amount,
            deductions,
            reliefs,
            schedule: None,
            computation,
        }
    }

    fn estimate_company(
        &self,
        input: &EstimateInput,
    ) -> TaxEstimate {
        let schedule = input.schedule();
        let computation = self
            .company
            .compute_with(input.gross_amount, schedule, self.convention);

        TaxEstimate {
            entity: self.profile.entity,
            gross_amount: input.gross_amount,
            deductions: CappedDeductions::none(),
            reliefs: ReliefSummary::empty(),
            schedule: Some(schedule),
            computation,
        }
    }
}
