//! Statutory deduction capping.
//!
//! EPF and PRS contributions are clamped to their ceilings and floored at
//! zero. Other deductions are only floored. Clamping never fails; each
//! adjustment is reported as a [`DeductionNotice`] so the caller can show it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{floor_at_zero, saturating_sum};
use crate::models::{DeductionCaps, DeductionInput};

/// Clamps `raw` into `[0, ceiling]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use socukai_core::calculations::deductions::cap;
///
/// assert_eq!(cap(dec!(6000), dec!(4000)), dec!(4000));
/// assert_eq!(cap(dec!(-50), dec!(4000)), dec!(0));
/// assert_eq!(cap(dec!(1000), dec!(3000)), dec!(1000));
/// ```
pub fn cap(
    raw: Decimal,
    ceiling: Decimal,
) -> Decimal {
    floor_at_zero(raw).min(ceiling)
}

/// Which deduction field was adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeductionField {
    Epf,
    Prs,
    OtherDeductions,
}

impl DeductionField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Epf => "EPF",
            Self::Prs => "PRS",
            Self::OtherDeductions => "Other deductions",
        }
    }
}

/// A non-blocking record that an input was clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionNotice {
    pub field: DeductionField,
    pub entered: Decimal,
    pub applied: Decimal,
}

/// Deductions after capping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappedDeductions {
    pub epf: Decimal,
    pub prs: Decimal,
    pub other_deductions: Decimal,
    pub total: Decimal,
    pub notices: Vec<DeductionNotice>,
}

impl CappedDeductions {
    pub fn none() -> Self {
        Self {
            epf: Decimal::ZERO,
            prs: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            total: Decimal::ZERO,
            notices: Vec::new(),
        }
    }
}

/// Applies `caps` to each field of `input`.
pub fn apply_caps(
    input: &DeductionInput,
    caps: &DeductionCaps,
) -> CappedDeductions {
    let mut notices = Vec::new();

    let epf = capped_field(DeductionField::Epf, input.epf, Some(caps.epf), &mut notices);
    let prs = capped_field(DeductionField::Prs, input.prs, Some(caps.prs), &mut notices);
    let other_deductions = capped_field(
        DeductionField::OtherDeductions,
        input.other_deductions,
        None,
        &mut notices,
    );

    CappedDeductions {
        epf,
        prs,
        other_deductions,
        total: saturating_sum([epf, prs, other_deductions]),
        notices,
    }
}

fn capped_field(
    field: DeductionField,
    entered: Decimal,
    ceiling: Option<Decimal>,
    notices: &mut Vec<DeductionNotice>,
) -> Decimal {
    let applied = match ceiling {
        Some(ceiling) => cap(entered, ceiling),
        None => floor_at_zero(entered),
    };

    if applied != entered {
        warn!(
            field = field.label(),
            %entered,
            %applied,
            "deduction clamped"
        );
        notices.push(DeductionNotice {
            field,
            entered,
            applied,
        });
    }

    applied
}
