//! Relief and deduction worksheet per entity type.
//!
//! | Entity          | Net business income              | Taxable income                          |
//! |-----------------|----------------------------------|-----------------------------------------|
//! | Individual      | n/a                              | n/a (total reliefs only)                |
//! | Sole proprietor | business income − business costs | net business + other income − reliefs   |
//! | Company         | business income − business costs | net business − incentives               |
//!
//! Taxable income is floored at zero; net business income is reported as-is
//! so a loss stays visible.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::floor_at_zero;
use crate::calculations::reliefs::{ReliefCatalog, ReliefSummary};
use crate::models::{EntityType, ReliefCategory, ReliefLineItem};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetInput {
    pub business_income: Decimal,
    pub other_income: Decimal,
    /// Personal reliefs, business deductions and incentives in one list;
    /// each is routed by its catalogue category.
    pub claims: Vec<ReliefLineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetSummary {
    pub entity: EntityType,
    pub total_reliefs: Decimal,
    pub business_deductions: Decimal,
    pub incentives: Decimal,
    pub net_business_income: Option<Decimal>,
    pub taxable_income: Option<Decimal>,
    pub reliefs: ReliefSummary,
}

/// Fills the worksheet for `entity`.
///
/// Claims whose category does not apply to the entity (for example an
/// incentive on an individual's worksheet) are ignored.
pub fn fill_worksheet(
    entity: EntityType,
    catalog: &ReliefCatalog,
    input: &WorksheetInput,
) -> WorksheetSummary {
    let applicable: Vec<ReliefLineItem> = input
        .claims
        .iter()
        .filter(|item| {
            catalog
                .get(&item.relief_id)
                .is_none_or(|d| d.category.applies_to(entity))
        })
        .cloned()
        .collect();
    let reliefs = catalog.preview(&applicable);

    let total_reliefs = reliefs.total_for(ReliefCategory::Personal);
    let business_deductions = reliefs.total_for(ReliefCategory::Business);
    let incentives = reliefs.total_for(ReliefCategory::Incentive);

    let (net_business_income, taxable_income) = match entity {
        EntityType::Individual => (None, None),
        EntityType::SoleProprietorship => {
            let net = input.business_income.saturating_sub(business_deductions);
            let taxable = floor_at_zero(
                net.saturating_add(input.other_income)
                    .saturating_sub(total_reliefs),
            );
            (Some(net), Some(taxable))
        }
        EntityType::Company => {
            let net = input.business_income.saturating_sub(business_deductions);
            (Some(net), Some(floor_at_zero(net.saturating_sub(incentives))))
        }
    };

    WorksheetSummary {
        entity,
        total_reliefs,
        business_deductions,
        incentives,
        net_business_income,
        taxable_income,
        reliefs,
    }
}
