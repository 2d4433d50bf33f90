//! Built-in 2024 Malaysian tax schedules.
//!
//! These are the defaults used when no bracket file is configured.

use rust_decimal::Decimal;

use crate::models::{BracketTable, TaxBracket};

pub const INDIVIDUAL: &str = "individual";
pub const COMPANY_SME: &str = "company-sme";
pub const COMPANY_NON_SME: &str = "company-non-sme";

/// Profit taxed at the preferential SME rate.
pub const SME_FIRST_TIER_LIMIT: Decimal = Decimal::from_parts(600_000, 0, 0, false, 0);

fn rm(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn pct(percent: i64) -> Decimal {
    Decimal::new(percent, 2)
}

/// Resident individual rates for year of assessment 2024.
pub fn individual_2024() -> BracketTable {
    let rows: [(i64, Option<i64>, i64, &str); 10] = [
        (0, Some(5_000), 0, "0% on first RM5,000"),
        (5_000, Some(20_000), 1, "1% on next RM15,000"),
        (20_000, Some(35_000), 3, "3% on next RM15,000"),
        (35_000, Some(50_000), 6, "6% on next RM15,000"),
        (50_000, Some(70_000), 11, "11% on next RM20,000"),
        (70_000, Some(100_000), 19, "19% on next RM30,000"),
        (100_000, Some(400_000), 25, "25% on next RM300,000"),
        (400_000, Some(600_000), 26, "26% on next RM200,000"),
        (600_000, Some(2_000_000), 28, "28% on next RM1,400,000"),
        (2_000_000, None, 30, "30% on remaining amount"),
    ];

    let brackets = rows
        .into_iter()
        .map(|(lower, upper, rate, label)| TaxBracket::new(rm(lower), upper.map(rm), pct(rate), label))
        .collect();

    BracketTable::from_trusted(INDIVIDUAL, brackets)
}

/// Two-tier SME corporate schedule.
pub fn company_sme_2024() -> BracketTable {
    BracketTable::from_trusted(
        COMPANY_SME,
        vec![
            TaxBracket::new(
                Decimal::ZERO,
                Some(SME_FIRST_TIER_LIMIT),
                pct(17),
                "17% on first RM600,000",
            ),
            TaxBracket::new(SME_FIRST_TIER_LIMIT, None, pct(24), "24% on the rest"),
        ],
    )
}

/// Flat corporate schedule for companies that do not qualify as SMEs.
pub fn company_non_sme_2024() -> BracketTable {
    BracketTable::from_trusted(
        COMPANY_NON_SME,
        vec![TaxBracket::new(Decimal::ZERO, None, pct(24), "24% flat rate")],
    )
}
