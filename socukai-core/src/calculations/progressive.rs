//! Progressive bracket walk.
//!
//! Given a chargeable income and a validated [`BracketTable`], the engine
//! taxes each bracket's slice of the income at that bracket's rate and
//! reports the aggregate figures.
//!
//! # Walk
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Zero income: no tax, empty breakdown, "No tax payable" |
//! | 2    | For each bracket while income exceeds its floor: slice = min(income − lower, upper − lower) |
//! | 3    | Positive slices are taxed at the bracket rate and appended to the breakdown |
//! | 4    | Effective rate = total tax / chargeable income |
//! | 5    | Marginal bracket chosen by [`MarginalConvention`] |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use socukai_core::calculations::{ProgressiveTaxEngine, schedules};
//!
//! let table = schedules::individual_2024();
//! let engine = ProgressiveTaxEngine::new(&table);
//! let result = engine.compute(dec!(80000));
//!
//! assert_eq!(result.total_tax, dec!(5600));
//! assert_eq!(result.effective_rate, dec!(0.07));
//! assert_eq!(result.marginal_bracket_label, "19% on next RM30,000");
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{floor_at_zero, ratio_or_zero, saturating_sum};
use crate::models::{
    BracketSlice, BracketTable, MarginalConvention, NO_TAX_PAYABLE, TaxBracket,
    TaxComputationResult,
};

/// Chargeable income after deductions and reliefs, floored at zero.
pub fn chargeable_income(
    gross_amount: Decimal,
    total_deductions: Decimal,
    total_reliefs: Decimal,
) -> Decimal {
    floor_at_zero(gross_amount.saturating_sub(total_deductions.saturating_add(total_reliefs)))
}

/// Calculator for a single bracket table.
#[derive(Debug, Clone)]
pub struct ProgressiveTaxEngine<'a> {
    table: &'a BracketTable,
    convention: MarginalConvention,
}

impl<'a> ProgressiveTaxEngine<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self {
            table,
            convention: MarginalConvention::default(),
        }
    }

    pub fn with_convention(
        mut self,
        convention: MarginalConvention,
    ) -> Self {
        self.convention = convention;
        self
    }

    /// Walks the table for `chargeable_income`.
    ///
    /// Negative input is treated as zero.
    pub fn compute(
        &self,
        chargeable_income: Decimal,
    ) -> TaxComputationResult {
        let chargeable_income = floor_at_zero(chargeable_income);
        if chargeable_income.is_zero() {
            return TaxComputationResult::no_tax();
        }

        let breakdown = self.breakdown(chargeable_income);
        let total_tax = saturating_sum(breakdown.iter().map(|s| s.tax_for_slice));
        let effective_rate = ratio_or_zero(total_tax, chargeable_income);
        let marginal = self.marginal_bracket(chargeable_income);

        debug!(
            table = self.table.name(),
            %chargeable_income,
            %total_tax,
            slices = breakdown.len(),
            "bracket walk complete"
        );

        TaxComputationResult {
            chargeable_income,
            total_tax,
            effective_rate,
            breakdown,
            marginal_bracket_label: marginal
                .map(|b| b.label.clone())
                .unwrap_or_else(|| NO_TAX_PAYABLE.to_string()),
            marginal_rate: marginal.map(|b| b.rate),
        }
    }

    fn breakdown(
        &self,
        chargeable_income: Decimal,
    ) -> Vec<BracketSlice> {
        self.table
            .brackets()
            .iter()
            .take_while(|b| chargeable_income > b.lower_bound)
            .filter_map(|bracket| {
                let taxable_slice = bracket.slice_of(chargeable_income);
                (taxable_slice > Decimal::ZERO).then(|| BracketSlice {
                    label: bracket.label.clone(),
                    taxable_slice,
                    rate: bracket.rate,
                    tax_for_slice: taxable_slice.saturating_mul(bracket.rate),
                })
            })
            .collect()
    }

    fn marginal_bracket(
        &self,
        chargeable_income: Decimal,
    ) -> Option<&'a TaxBracket> {
        self.table
            .brackets()
            .iter()
            .find(|b| b.contains(chargeable_income, self.convention))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::schedules;

    fn short_table() -> BracketTable {
        BracketTable::new(
            "short",
            vec![
                TaxBracket::new(dec!(0), Some(dec!(5000)), dec!(0), "0%"),
                TaxBracket::new(dec!(5000), Some(dec!(20000)), dec!(0.01), "1%"),
                TaxBracket::new(dec!(20000), Some(dec!(35000)), dec!(0.03), "3%"),
                TaxBracket::new(dec!(35000), None, dec!(0.06), "6%"),
            ],
        )
        .unwrap()
    }

    fn assert_partition(result: &TaxComputationResult) {
        let slices: Decimal = result.breakdown.iter().map(|s| s.taxable_slice).sum();
        let tax: Decimal = result
            .breakdown
            .iter()
            .map(|s| s.taxable_slice * s.rate)
            .sum();

        assert_eq!(slices, result.chargeable_income);
        assert_eq!(tax, result.total_tax);
    }

    // =========================================================================
    // chargeable_income tests
    // =========================================================================

    #[test]
    fn chargeable_income_subtracts_deductions_and_reliefs() {
        assert_eq!(chargeable_income(dec!(85000), dec!(5000), dec!(9000)), dec!(71000));
    }

    #[test]
    fn chargeable_income_floors_at_zero() {
        assert_eq!(chargeable_income(dec!(10000), dec!(7000), dec!(9000)), dec!(0));
    }

    // =========================================================================
    // compute tests
    // =========================================================================

    #[test]
    fn compute_zero_income_is_no_tax() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(0));

        assert_eq!(result.total_tax, dec!(0));
        assert!(result.breakdown.is_empty());
        assert_eq!(result.effective_rate, dec!(0));
        assert_eq!(result.marginal_bracket_label, NO_TAX_PAYABLE);
        assert_eq!(result.marginal_rate, None);
    }

    #[test]
    fn compute_negative_income_is_no_tax() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(-100));

        assert_eq!(result, TaxComputationResult::no_tax());
    }

    #[test]
    fn compute_inside_first_bracket_lists_zero_rate_slice() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(3000));

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(
            result.breakdown,
            vec![BracketSlice {
                label: "0%".to_string(),
                taxable_slice: dec!(3000),
                rate: dec!(0),
                tax_for_slice: dec!(0),
            }]
        );
        assert_eq!(result.marginal_bracket_label, "0%");
    }

    #[test]
    fn compute_spans_several_brackets() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(40000));

        // 5000@0 + 15000@1% + 15000@3% + 5000@6% = 150 + 450 + 300
        assert_eq!(result.total_tax, dec!(900));
        assert_eq!(result.breakdown.len(), 4);
        assert_eq!(result.marginal_rate, Some(dec!(0.06)));
        assert_partition(&result);
    }

    #[test]
    fn compute_reaches_unbounded_bracket() {
        let table = schedules::individual_2024();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(2500000));

        // 0 + 150 + 450 + 900 + 2200 + 5700 + 75000 + 52000 + 392000 + 150000
        assert_eq!(result.total_tax, dec!(678400));
        assert_eq!(result.breakdown.len(), 10);
        assert_eq!(result.marginal_bracket_label, "30% on remaining amount");
        assert_partition(&result);
    }

    #[test]
    fn compute_80000_against_2024_table() {
        let table = schedules::individual_2024();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(80000));

        // 5000@0 + 15000@1% + 15000@3% + 15000@6% + 20000@11% + 10000@19%
        assert_eq!(result.total_tax, dec!(5600));
        assert_eq!(result.effective_rate, dec!(0.07));
        assert_eq!(
            result
                .breakdown
                .iter()
                .map(|s| s.tax_for_slice)
                .collect::<Vec<_>>(),
            vec![
                dec!(0),
                dec!(150),
                dec!(450),
                dec!(900),
                dec!(2200),
                dec!(1900)
            ]
        );
        assert_eq!(result.marginal_bracket_label, "19% on next RM30,000");
        assert_partition(&result);
    }

    #[test]
    fn compute_handles_fractional_income() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(5000.50));

        assert_eq!(result.total_tax, dec!(0.0050));
        assert_partition(&result);
    }

    // =========================================================================
    // boundary convention tests
    // =========================================================================

    #[test]
    fn boundary_value_taxed_in_lower_bracket() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table).compute(dec!(5000));

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].taxable_slice, dec!(5000));
    }

    #[test]
    fn boundary_value_upper_inclusive_reports_lower_bracket() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table)
            .with_convention(MarginalConvention::UpperInclusive)
            .compute(dec!(5000));

        assert_eq!(result.marginal_bracket_label, "0%");
        assert_eq!(result.marginal_rate, Some(dec!(0)));
    }

    #[test]
    fn boundary_value_lower_inclusive_reports_upper_bracket() {
        let table = short_table();

        let result = ProgressiveTaxEngine::new(&table)
            .with_convention(MarginalConvention::LowerInclusive)
            .compute(dec!(5000));

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.marginal_bracket_label, "1%");
        assert_eq!(result.marginal_rate, Some(dec!(0.01)));
    }

    #[test]
    fn conventions_agree_away_from_boundaries() {
        let table = short_table();
        let engine = ProgressiveTaxEngine::new(&table);

        let upper = engine.clone().compute(dec!(27500));
        let lower = engine
            .with_convention(MarginalConvention::LowerInclusive)
            .compute(dec!(27500));

        assert_eq!(upper, lower);
    }

    // =========================================================================
    // property tests
    // =========================================================================

    #[test]
    fn slices_partition_income_across_range() {
        let table = schedules::individual_2024();
        let engine = ProgressiveTaxEngine::new(&table);

        let mut income = dec!(0);
        while income <= dec!(2100000) {
            let result = engine.compute(income);
            assert_partition(&result);
            income += dec!(12345.67);
        }
    }

    #[test]
    fn tax_is_monotonic_in_income() {
        let table = schedules::individual_2024();
        let engine = ProgressiveTaxEngine::new(&table);

        let mut previous = dec!(0);
        let mut income = dec!(0);
        while income <= dec!(2100000) {
            let tax = engine.compute(income).total_tax;
            assert!(tax >= previous, "tax fell at income {income}");
            previous = tax;
            income += dec!(2500);
        }
    }

    #[test]
    fn breakdown_never_contains_non_positive_slices() {
        let table = schedules::individual_2024();
        let engine = ProgressiveTaxEngine::new(&table);

        for income in [dec!(5000), dec!(20000), dec!(100000), dec!(2000000)] {
            let result = engine.compute(income);
            assert!(result.breakdown.iter().all(|s| s.taxable_slice > dec!(0)));
        }
    }
}
