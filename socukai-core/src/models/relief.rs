use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::EntityType;

/// Grouping used by the relief worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReliefCategory {
    /// Personal reliefs claimed by individuals and sole proprietors.
    Personal,
    /// Allowable business expenses of a sole proprietor or company.
    Business,
    /// Company tax incentives such as capital allowance.
    Incentive,
}

impl ReliefCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Business => "business",
            Self::Incentive => "incentive",
        }
    }

    /// Whether `entity` may claim reliefs of this category.
    pub fn applies_to(
        &self,
        entity: EntityType,
    ) -> bool {
        matches!(
            (entity, self),
            (EntityType::Individual, Self::Personal)
                | (EntityType::SoleProprietorship, Self::Personal | Self::Business)
                | (EntityType::Company, Self::Business | Self::Incentive)
        )
    }
}

/// A mutually exclusive sub-option of a relief, carrying its own ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefOption {
    pub label: String,
    pub max: Decimal,
}

/// Static description of a relief and its ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefDefinition {
    pub id: String,
    pub name: String,
    pub category: ReliefCategory,
    /// Nominal ceiling. `None` means uncapped.
    #[serde(default)]
    pub max: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<ReliefOption>,
}

impl ReliefDefinition {
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn option(
        &self,
        label: &str,
    ) -> Option<&ReliefOption> {
        self.options.iter().find(|o| o.label == label)
    }
}

/// A single relief claimed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefLineItem {
    pub relief_id: String,
    #[serde(default)]
    pub chosen_option: Option<String>,
    pub claimed_amount: Decimal,
}

impl ReliefLineItem {
    pub fn new(
        relief_id: impl Into<String>,
        claimed_amount: Decimal,
    ) -> Self {
        Self {
            relief_id: relief_id.into(),
            chosen_option: None,
            claimed_amount,
        }
    }

    pub fn with_option(
        mut self,
        option: impl Into<String>,
    ) -> Self {
        self.chosen_option = Some(option.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn individuals_claim_personal_reliefs_only() {
        assert!(ReliefCategory::Personal.applies_to(EntityType::Individual));
        assert!(!ReliefCategory::Business.applies_to(EntityType::Individual));
        assert!(!ReliefCategory::Incentive.applies_to(EntityType::Individual));
    }

    #[test]
    fn sole_prop_claims_personal_and_business() {
        assert!(ReliefCategory::Personal.applies_to(EntityType::SoleProprietorship));
        assert!(ReliefCategory::Business.applies_to(EntityType::SoleProprietorship));
        assert!(!ReliefCategory::Incentive.applies_to(EntityType::SoleProprietorship));
    }

    #[test]
    fn company_claims_business_and_incentives() {
        assert!(!ReliefCategory::Personal.applies_to(EntityType::Company));
        assert!(ReliefCategory::Business.applies_to(EntityType::Company));
        assert!(ReliefCategory::Incentive.applies_to(EntityType::Company));
    }
}
