//! Income and expense net-profit calculator.
//!
//! Figures are entered either per month or per year; both views are
//! produced.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::saturating_sum;
use crate::models::EntityType;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Whether the entered figures are monthly or annual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Monthly,
    Annual,
}

/// Problems with a single line item.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineItemError {
    #[error("description is required")]
    MissingDescription,

    #[error("category is required")]
    MissingCategory,

    #[error("amount must be a positive number, got {0}")]
    NonPositiveAmount(Decimal),
}

/// An income or expense line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    /// Returns every rule this item breaks.
    pub fn validate(&self) -> Vec<LineItemError> {
        let mut errors = Vec::new();
        if self.description.trim().is_empty() {
            errors.push(LineItemError::MissingDescription);
        }
        if self.amount <= Decimal::ZERO {
            errors.push(LineItemError::NonPositiveAmount(self.amount));
        }
        if self.category.trim().is_empty() {
            errors.push(LineItemError::MissingCategory);
        }
        errors
    }
}

/// Income, expenses and profit for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFigures {
    pub income: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
}

impl PeriodFigures {
    fn scaled(
        &self,
        factor: Decimal,
    ) -> Self {
        Self {
            income: self.income.saturating_mul(factor),
            expenses: self.expenses.saturating_mul(factor),
            profit: self.profit.saturating_mul(factor),
        }
    }

    fn divided(
        &self,
        divisor: Decimal,
    ) -> Self {
        Self {
            income: self.income / divisor,
            expenses: self.expenses / divisor,
            profit: self.profit / divisor,
        }
    }
}

/// Totals in the entered period plus monthly and annual views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetProfitSummary {
    pub period: Period,
    pub entered: PeriodFigures,
    pub monthly: PeriodFigures,
    pub annual: PeriodFigures,
}

/// Totals income and expense items.
///
/// Profit may be negative. Invalid items still count towards the totals;
/// use [`LineItem::validate`] to gate submission. Totals saturate at
/// [`Decimal::MAX`].
pub fn summarize(
    period: Period,
    income_items: &[LineItem],
    expense_items: &[LineItem],
) -> NetProfitSummary {
    let income = saturating_sum(income_items.iter().map(|i| i.amount));
    let expenses = saturating_sum(expense_items.iter().map(|i| i.amount));
    let entered = PeriodFigures {
        income,
        expenses,
        profit: income.saturating_sub(expenses),
    };

    let (monthly, annual) = match period {
        Period::Monthly => (entered, entered.scaled(MONTHS_PER_YEAR)),
        Period::Annual => (entered.divided(MONTHS_PER_YEAR), entered),
    };

    NetProfitSummary {
        period,
        entered,
        monthly,
        annual,
    }
}

/// Suggested income categories per entity type.
pub fn income_categories(entity: EntityType) -> &'static [&'static str] {
    match entity {
        EntityType::Individual => &[
            "Employment Salary",
            "Bonus & Commission",
            "Freelance Income",
            "Rental Income",
            "Dividends",
            "Interest",
            "Other Income",
        ],
        EntityType::SoleProprietorship => &[
            "Sales Revenue",
            "Consulting Fees",
            "Service Income",
            "Commission",
            "Rental Income",
            "Other Business Income",
        ],
        EntityType::Company => &[
            "Service Revenue",
            "Product Sales",
            "Licensing Income",
            "Interest Income",
            "Rental Income",
            "Other Revenue",
        ],
    }
}

/// Suggested expense categories per entity type.
pub fn expense_categories(entity: EntityType) -> &'static [&'static str] {
    match entity {
        EntityType::Individual => &[
            "Transportation",
            "Meals",
            "Professional Development",
            "Insurance",
            "Medical",
            "Other Expenses",
        ],
        EntityType::SoleProprietorship => &[
            "Office Rental",
            "Utilities",
            "Supplies",
            "Marketing",
            "Travel",
            "Professional Fees",
            "Other Business Expenses",
        ],
        EntityType::Company => &[
            "Employee Costs",
            "Office Rental",
            "Utilities",
            "Marketing",
            "Depreciation",
            "Professional Fees",
            "Other Operating Expenses",
        ],
    }
}
