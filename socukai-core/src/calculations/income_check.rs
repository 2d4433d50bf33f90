//! Quick check of whether an employee must declare income.
//!
//! Annualises a monthly salary, subtracts the employee EPF share and
//! compares the result with the declaration threshold.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{floor_at_zero, ratio_or_zero};

/// Annual chargeable income at which declaration becomes mandatory.
pub const DECLARATION_THRESHOLD: Decimal = Decimal::from_parts(34_000, 0, 0, false, 0);

/// Default employee EPF contribution rate, in percent.
pub const DEFAULT_EPF_RATE_PERCENT: Decimal = Decimal::from_parts(11, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeCheckInput {
    pub monthly_income: Decimal,
    pub epf_rate_percent: Decimal,
    pub contributes_to_epf: bool,
}

impl Default for IncomeCheckInput {
    fn default() -> Self {
        Self {
            monthly_income: Decimal::ZERO,
            epf_rate_percent: DEFAULT_EPF_RATE_PERCENT,
            contributes_to_epf: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeCheckResult {
    pub yearly_income: Decimal,
    pub epf_deduction: Decimal,
    pub net_chargeable_income: Decimal,
    /// Share of the threshold reached, 0–100.
    pub progress_percent: Decimal,
    pub must_declare: bool,
}

/// Runs the check. Returns `None` when no income has been entered.
pub fn check_income(input: &IncomeCheckInput) -> Option<IncomeCheckResult> {
    let monthly = floor_at_zero(input.monthly_income);
    if monthly.is_zero() {
        return None;
    }

    let months = Decimal::from(12);
    let yearly_income = monthly.saturating_mul(months);
    let epf_deduction = if input.contributes_to_epf {
        let rate = floor_at_zero(input.epf_rate_percent).min(Decimal::ONE_HUNDRED);
        (yearly_income / Decimal::ONE_HUNDRED).saturating_mul(rate)
    } else {
        Decimal::ZERO
    };
    let net_chargeable_income = yearly_income - epf_deduction;
    let progress_percent = ratio_or_zero(net_chargeable_income, DECLARATION_THRESHOLD)
        .saturating_mul(Decimal::ONE_HUNDRED)
        .min(Decimal::ONE_HUNDRED);

    Some(IncomeCheckResult {
        yearly_income,
        epf_deduction,
        net_chargeable_income,
        progress_percent,
        must_declare: net_chargeable_income >= DECLARATION_THRESHOLD,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input(monthly: Decimal) -> IncomeCheckInput {
        IncomeCheckInput {
            monthly_income: monthly,
            ..IncomeCheckInput::default()
        }
    }

    #[test]
    fn zero_income_has_no_result() {
        assert_eq!(check_income(&input(dec!(0))), None);
    }

    #[test]
    fn defaults_to_eleven_percent_epf() {
        let result = check_income(&input(dec!(5000))).unwrap();

        assert_eq!(result.yearly_income, dec!(60000));
        assert_eq!(result.epf_deduction, dec!(6600));
        assert_eq!(result.net_chargeable_income, dec!(53400));
        assert_eq!(result.progress_percent, dec!(100));
        assert!(result.must_declare);
    }

    #[test]
    fn below_threshold_does_not_require_declaration() {
        let result = check_income(&input(dec!(2500))).unwrap();

        // 30000 - 3300 = 26700
        assert_eq!(result.net_chargeable_income, dec!(26700));
        assert!(!result.must_declare);
        assert!(result.progress_percent < dec!(100));
    }

    #[test]
    fn just_below_threshold_does_not_require_declaration() {
        let result = check_income(&IncomeCheckInput {
            monthly_income: dec!(2833.33),
            contributes_to_epf: false,
            ..IncomeCheckInput::default()
        })
        .unwrap();

        assert_eq!(result.net_chargeable_income, dec!(33999.96));
        assert_eq!(result.epf_deduction, dec!(0));
        assert!(!result.must_declare);
    }

    #[test]
    fn threshold_without_epf() {
        let result = check_income(&IncomeCheckInput {
            monthly_income: dec!(3000),
            contributes_to_epf: false,
            ..IncomeCheckInput::default()
        })
        .unwrap();

        assert_eq!(result.net_chargeable_income, dec!(36000));
        assert!(result.must_declare);
    }

    #[test]
    fn custom_epf_rate() {
        let result = check_income(&IncomeCheckInput {
            monthly_income: dec!(4000),
            epf_rate_percent: dec!(9),
            contributes_to_epf: true,
        })
        .unwrap();

        assert_eq!(result.epf_deduction, dec!(4320));
    }

    #[test]
    fn extreme_monthly_income_saturates() {
        let result = check_income(&input(Decimal::MAX)).unwrap();

        assert_eq!(result.yearly_income, Decimal::MAX);
        assert!(result.net_chargeable_income > dec!(0));
        assert_eq!(result.progress_percent, dec!(100));
        assert!(result.must_declare);
    }
}
