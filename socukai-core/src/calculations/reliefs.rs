//! Relief catalogue and claim validation for the tax-relief estimator.
//!
//! Two paths share the same rules:
//!
//! * [`ReliefCatalog::preview`] is the live path. It never fails; every
//!   claim is clamped into `[0, applicable_max]` and problems are collected
//!   alongside the running total.
//! * [`ReliefCatalog::finalize`] is the submit path. Any collected problem
//!   blocks it.
//!
//! A relief that defines sub-options needs one chosen; its ceiling is then
//! the option's ceiling. Without a choice the claim is an error and the
//! preview clamps to the relief's nominal ceiling rather than guessing an
//! option.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{floor_at_zero, saturating_sum};
use crate::models::{EntityType, ReliefCategory, ReliefDefinition, ReliefLineItem, ReliefOption};

/// Problems with a catalogue definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReliefCatalogError {
    #[error("relief id '{0}' is defined more than once")]
    DuplicateId(String),

    #[error("relief '{relief}' defines option '{option}' more than once")]
    DuplicateOption { relief: String, option: String },

    #[error("relief '{relief}' has negative ceiling {max}")]
    NegativeCeiling { relief: String, max: Decimal },
}

/// Problems with a single claimed relief.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliefValidationError {
    #[error("unknown relief")]
    UnknownRelief,

    #[error("select one of: {}", .options.join(", "))]
    MissingOption { options: Vec<String> },

    #[error("'{0}' is not an option of this relief")]
    UnknownOption(String),

    #[error("this relief has no options, got '{0}'")]
    UnexpectedOption(String),

    #[error("claimed amount {0} is negative")]
    NegativeAmount(Decimal),

    #[error("claimed amount {claimed} exceeds the maximum of {max}")]
    ExceedsCeiling { claimed: Decimal, max: Decimal },

    #[error("relief claimed more than once")]
    DuplicateClaim,

    #[error("{} reliefs are not available to entity type '{}'", .category.as_str(), .entity.as_str())]
    NotApplicable {
        category: ReliefCategory,
        entity: EntityType,
    },
}

/// Validation problems keyed by relief id.
#[derive(Debug, Clone, Default, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", joined(.0))]
pub struct ReliefValidationErrors(BTreeMap<String, ReliefValidationError>);

fn joined(errors: &BTreeMap<String, ReliefValidationError>) -> String {
    errors
        .iter()
        .map(|(id, error)| format!("{id}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ReliefValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(
        &self,
        relief_id: &str,
    ) -> Option<&ReliefValidationError> {
        self.0.get(relief_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReliefValidationError)> {
        self.0.iter().map(|(id, e)| (id.as_str(), e))
    }

    fn record(
        &mut self,
        relief_id: &str,
        error: ReliefValidationError,
    ) {
        self.0.entry(relief_id.to_string()).or_insert(error);
    }
}

/// A claim after clamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRelief {
    pub relief_id: String,
    pub name: String,
    pub category: ReliefCategory,
    pub chosen_option: Option<String>,
    pub claimed_amount: Decimal,
    pub applicable_max: Option<Decimal>,
    pub applied_amount: Decimal,
}

/// Running totals for a set of claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefSummary {
    pub lines: Vec<AppliedRelief>,
    pub total: Decimal,
    pub errors: ReliefValidationErrors,
}

impl ReliefSummary {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Decimal::ZERO,
            errors: ReliefValidationErrors::default(),
        }
    }

    pub fn total_for(
        &self,
        category: ReliefCategory,
    ) -> Decimal {
        saturating_sum(
            self.lines
                .iter()
                .filter(|l| l.category == category)
                .map(|l| l.applied_amount),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The set of reliefs a user can claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReliefCatalog {
    definitions: Vec<ReliefDefinition>,
}

impl ReliefCatalog {
    /// Builds a catalogue, rejecting duplicate ids, duplicate options and
    /// negative ceilings.
    pub fn new(definitions: Vec<ReliefDefinition>) -> Result<Self, ReliefCatalogError> {
        let mut ids = HashSet::new();
        for definition in &definitions {
            if !ids.insert(definition.id.as_str()) {
                return Err(ReliefCatalogError::DuplicateId(definition.id.clone()));
            }
            if let Some(max) = definition.max.filter(|m| *m < Decimal::ZERO) {
                return Err(ReliefCatalogError::NegativeCeiling {
                    relief: definition.id.clone(),
                    max,
                });
            }
            let mut labels = HashSet::new();
            for option in &definition.options {
                if !labels.insert(option.label.as_str()) {
                    return Err(ReliefCatalogError::DuplicateOption {
                        relief: definition.id.clone(),
                        option: option.label.clone(),
                    });
                }
                if option.max < Decimal::ZERO {
                    return Err(ReliefCatalogError::NegativeCeiling {
                        relief: definition.id.clone(),
                        max: option.max,
                    });
                }
            }
        }

        Ok(Self { definitions })
    }

    /// Built-in 2024 catalogue.
    pub fn malaysia_2024() -> Self {
        let rm = |amount: i64| Decimal::from(amount);
        let personal = |id: &str, name: &str, max: i64, description: &str| ReliefDefinition {
            id: id.to_string(),
            name: name.to_string(),
            category: ReliefCategory::Personal,
            max: Some(rm(max)),
            description: description.to_string(),
            options: Vec::new(),
        };
        let uncapped =
            |id: &str, name: &str, category: ReliefCategory, description: &str| ReliefDefinition {
                id: id.to_string(),
                name: name.to_string(),
                category,
                max: None,
                description: description.to_string(),
                options: Vec::new(),
            };

        let mut parent_medical = personal(
            "parent_medical",
            "Medical expenses for parents",
            8000,
            "Medical, dental, special needs, and carer expenses for parents (with doctor certification).",
        );
        parent_medical.options = vec![
            ReliefOption {
                label: "Treatment and carer expenses".to_string(),
                max: rm(8000),
            },
            ReliefOption {
                label: "Complete medical examination".to_string(),
                max: rm(1000),
            },
        ];

        Self {
            definitions: vec![
                personal(
                    "individual",
                    "Individual and dependent relatives",
                    9000,
                    "Standard relief for all taxpayers and their dependents.",
                ),
                parent_medical,
                personal(
                    "disabled",
                    "Disabled individual",
                    6000,
                    "For individuals registered as disabled.",
                ),
                uncapped(
                    "rent",
                    "Business Rent",
                    ReliefCategory::Business,
                    "Rental paid for business premises.",
                ),
                uncapped(
                    "utilities",
                    "Utilities",
                    ReliefCategory::Business,
                    "Electricity, water, and other utilities for business use.",
                ),
                uncapped(
                    "supplies",
                    "Supplies",
                    ReliefCategory::Business,
                    "Office and business supplies.",
                ),
                uncapped(
                    "capital_allowance",
                    "Capital Allowance",
                    ReliefCategory::Incentive,
                    "Claim depreciation on business assets.",
                ),
            ],
        }
    }

    pub fn definitions(&self) -> &[ReliefDefinition] {
        &self.definitions
    }

    pub fn get(
        &self,
        relief_id: &str,
    ) -> Option<&ReliefDefinition> {
        self.definitions.iter().find(|d| d.id == relief_id)
    }

    /// Live total. Never fails; errors are reported in the summary.
    pub fn preview(
        &self,
        items: &[ReliefLineItem],
    ) -> ReliefSummary {
        self.tally(None, items)
    }

    /// Like [`preview`](Self::preview), but a claim whose category `entity`
    /// may not use is an error and contributes nothing.
    pub fn preview_for(
        &self,
        entity: EntityType,
        items: &[ReliefLineItem],
    ) -> ReliefSummary {
        self.tally(Some(entity), items)
    }

    fn tally(
        &self,
        entity: Option<EntityType>,
        items: &[ReliefLineItem],
    ) -> ReliefSummary {
        let mut summary = ReliefSummary::empty();
        let mut seen = HashSet::new();

        for item in items {
            if !seen.insert(item.relief_id.as_str()) {
                summary
                    .errors
                    .record(&item.relief_id, ReliefValidationError::DuplicateClaim);
                continue;
            }

            let Some(definition) = self.get(&item.relief_id) else {
                summary
                    .errors
                    .record(&item.relief_id, ReliefValidationError::UnknownRelief);
                continue;
            };

            if let Some(entity) = entity.filter(|e| !definition.category.applies_to(*e)) {
                summary.errors.record(
                    &item.relief_id,
                    ReliefValidationError::NotApplicable {
                        category: definition.category,
                        entity,
                    },
                );
                continue;
            }

            let (applicable_max, problem) = check_claim(definition, item);
            if let Some(error) = problem {
                summary.errors.record(&item.relief_id, error);
            }

            let floored = floor_at_zero(item.claimed_amount);
            let applied_amount = applicable_max.map_or(floored, |max| floored.min(max));
            summary.total = summary.total.saturating_add(applied_amount);
            summary.lines.push(AppliedRelief {
                relief_id: definition.id.clone(),
                name: definition.name.clone(),
                category: definition.category,
                chosen_option: item.chosen_option.clone(),
                claimed_amount: item.claimed_amount,
                applicable_max,
                applied_amount,
            });
        }

        debug!(
            claims = items.len(),
            total = %summary.total,
            errors = summary.errors.len(),
            "relief preview"
        );

        summary
    }

    /// Submit path: the summary is only returned when every claim is valid.
    ///
    /// # Errors
    ///
    /// Returns every collected [`ReliefValidationError`], keyed by relief id.
    pub fn finalize(
        &self,
        items: &[ReliefLineItem],
    ) -> Result<ReliefSummary, ReliefValidationErrors> {
        let summary = self.preview(items);
        if summary.errors.is_empty() {
            Ok(summary)
        } else {
            Err(summary.errors)
        }
    }
}

/// Returns the ceiling that applies to `item` and the first rule it breaks.
fn check_claim(
    definition: &ReliefDefinition,
    item: &ReliefLineItem,
) -> (Option<Decimal>, Option<ReliefValidationError>) {
    let applicable_max = match (&item.chosen_option, definition.has_options()) {
        (Some(chosen), true) => match definition.option(chosen) {
            Some(option) => Some(option.max),
            None => {
                return (
                    definition.max,
                    Some(ReliefValidationError::UnknownOption(chosen.clone())),
                );
            }
        },
        (None, true) => {
            let options = definition.options.iter().map(|o| o.label.clone()).collect();
            return (
                definition.max,
                Some(ReliefValidationError::MissingOption { options }),
            );
        }
        (Some(chosen), false) => {
            return (
                definition.max,
                Some(ReliefValidationError::UnexpectedOption(chosen.clone())),
            );
        }
        (None, false) => definition.max,
    };

    if item.claimed_amount < Decimal::ZERO {
        return (
            applicable_max,
            Some(ReliefValidationError::NegativeAmount(item.claimed_amount)),
        );
    }

    match applicable_max {
        Some(max) if item.claimed_amount > max => (
            applicable_max,
            Some(ReliefValidationError::ExceedsCeiling {
                claimed: item.claimed_amount,
                max,
            }),
        ),
        _ => (applicable_max, None),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn option_relief() -> ReliefDefinition {
        ReliefDefinition {
            id: "medical".to_string(),
            name: "Medical".to_string(),
            category: ReliefCategory::Personal,
            max: Some(dec!(8000)),
            description: String::new(),
            options: vec![
                ReliefOption {
                    label: "A".to_string(),
                    max: dec!(8000),
                },
                ReliefOption {
                    label: "B".to_string(),
                    max: dec!(1000),
                },
            ],
        }
    }

    fn flat_relief() -> ReliefDefinition {
        ReliefDefinition {
            id: "individual".to_string(),
            name: "Individual".to_string(),
            category: ReliefCategory::Personal,
            max: Some(dec!(9000)),
            description: String::new(),
            options: Vec::new(),
        }
    }

    fn catalog() -> ReliefCatalog {
        ReliefCatalog::new(vec![option_relief(), flat_relief()]).unwrap()
    }

    // =========================================================================
    // catalogue construction tests
    // =========================================================================

    #[test]
    fn new_rejects_duplicate_ids() {
        let result = ReliefCatalog::new(vec![flat_relief(), flat_relief()]);

        assert_eq!(
            result,
            Err(ReliefCatalogError::DuplicateId("individual".to_string()))
        );
    }

    #[test]
    fn new_rejects_duplicate_options() {
        let mut relief = option_relief();
        relief.options[1].label = "A".to_string();

        let result = ReliefCatalog::new(vec![relief]);

        assert_eq!(
            result,
            Err(ReliefCatalogError::DuplicateOption {
                relief: "medical".to_string(),
                option: "A".to_string(),
            })
        );
    }

    #[test]
    fn new_rejects_negative_ceiling() {
        let mut relief = flat_relief();
        relief.max = Some(dec!(-1));

        let result = ReliefCatalog::new(vec![relief]);

        assert!(matches!(
            result,
            Err(ReliefCatalogError::NegativeCeiling { .. })
        ));
    }

    #[test]
    fn built_in_catalogue_is_valid() {
        let built_in = ReliefCatalog::malaysia_2024();

        let rebuilt = ReliefCatalog::new(built_in.definitions().to_vec());

        assert_eq!(rebuilt, Ok(built_in));
    }

    // =========================================================================
    // preview tests
    // =========================================================================

    #[test]
    fn preview_sums_valid_claims() {
        let items = vec![
            ReliefLineItem::new("individual", dec!(9000)),
            ReliefLineItem::new("medical", dec!(500)).with_option("B"),
        ];

        let summary = catalog().preview(&items);

        assert_eq!(summary.total, dec!(9500));
        assert!(summary.is_valid());
    }

    #[test]
    fn preview_clamps_to_chosen_option_ceiling() {
        let items = vec![ReliefLineItem::new("medical", dec!(3000)).with_option("B")];

        let summary = catalog().preview(&items);

        assert_eq!(summary.total, dec!(1000));
        assert_eq!(summary.lines[0].applicable_max, Some(dec!(1000)));
        assert_eq!(
            summary.errors.get("medical"),
            Some(&ReliefValidationError::ExceedsCeiling {
                claimed: dec!(3000),
                max: dec!(1000),
            })
        );
    }

    #[test]
    fn preview_missing_option_is_error_and_uses_nominal_ceiling() {
        let items = vec![ReliefLineItem::new("medical", dec!(1000))];

        let summary = catalog().preview(&items);

        assert_eq!(
            summary.errors.get("medical"),
            Some(&ReliefValidationError::MissingOption {
                options: vec!["A".to_string(), "B".to_string()],
            })
        );
        assert_eq!(summary.lines[0].applicable_max, Some(dec!(8000)));
        assert_eq!(summary.lines[0].chosen_option, None);
        assert_eq!(summary.total, dec!(1000));
    }

    #[test]
    fn preview_unknown_option_is_error() {
        let items = vec![ReliefLineItem::new("medical", dec!(100)).with_option("C")];

        let summary = catalog().preview(&items);

        assert_eq!(
            summary.errors.get("medical"),
            Some(&ReliefValidationError::UnknownOption("C".to_string()))
        );
    }

    #[test]
    fn preview_option_on_flat_relief_is_error() {
        let items = vec![ReliefLineItem::new("individual", dec!(100)).with_option("A")];

        let summary = catalog().preview(&items);

        assert_eq!(
            summary.errors.get("individual"),
            Some(&ReliefValidationError::UnexpectedOption("A".to_string()))
        );
        assert_eq!(summary.total, dec!(100));
    }

    #[test]
    fn preview_unknown_relief_contributes_nothing() {
        let items = vec![ReliefLineItem::new("lifestyle", dec!(2500))];

        let summary = catalog().preview(&items);

        assert_eq!(summary.total, dec!(0));
        assert!(summary.lines.is_empty());
        assert_eq!(
            summary.errors.get("lifestyle"),
            Some(&ReliefValidationError::UnknownRelief)
        );
    }

    #[test]
    fn preview_negative_claim_is_floored_and_flagged() {
        let items = vec![ReliefLineItem::new("individual", dec!(-10))];

        let summary = catalog().preview(&items);

        assert_eq!(summary.total, dec!(0));
        assert_eq!(
            summary.errors.get("individual"),
            Some(&ReliefValidationError::NegativeAmount(dec!(-10)))
        );
    }

    #[test]
    fn preview_duplicate_claim_counts_once() {
        let items = vec![
            ReliefLineItem::new("individual", dec!(9000)),
            ReliefLineItem::new("individual", dec!(9000)),
        ];

        let summary = catalog().preview(&items);

        assert_eq!(summary.total, dec!(9000));
        assert_eq!(
            summary.errors.get("individual"),
            Some(&ReliefValidationError::DuplicateClaim)
        );
    }

    #[test]
    fn preview_uncapped_relief_passes_through() {
        let catalog = ReliefCatalog::malaysia_2024();
        let items = vec![ReliefLineItem::new("rent", dec!(36000))];

        let summary = catalog.preview(&items);

        assert_eq!(summary.total, dec!(36000));
        assert_eq!(summary.total_for(ReliefCategory::Business), dec!(36000));
        assert_eq!(summary.total_for(ReliefCategory::Personal), dec!(0));
    }

    #[test]
    fn preview_total_saturates_instead_of_overflowing() {
        let catalog = ReliefCatalog::malaysia_2024();
        let items = vec![
            ReliefLineItem::new("rent", Decimal::MAX),
            ReliefLineItem::new("utilities", Decimal::MAX),
        ];

        let summary = catalog.preview(&items);

        assert_eq!(summary.total, Decimal::MAX);
        assert_eq!(summary.total_for(ReliefCategory::Business), Decimal::MAX);
    }

    // =========================================================================
    // preview_for tests
    // =========================================================================

    #[test]
    fn preview_for_individual_rejects_business_and_incentive_claims() {
        let catalog = ReliefCatalog::malaysia_2024();
        let items = vec![
            ReliefLineItem::new("individual", dec!(9000)),
            ReliefLineItem::new("rent", dec!(24000)),
            ReliefLineItem::new("capital_allowance", dec!(500000)),
        ];

        let summary = catalog.preview_for(EntityType::Individual, &items);

        assert_eq!(summary.total, dec!(9000));
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(
            summary.errors.get("capital_allowance"),
            Some(&ReliefValidationError::NotApplicable {
                category: ReliefCategory::Incentive,
                entity: EntityType::Individual,
            })
        );
        assert_eq!(
            summary.errors.get("rent").map(ToString::to_string),
            Some("business reliefs are not available to entity type 'individual'".to_string())
        );
    }

    #[test]
    fn preview_for_sole_prop_accepts_business_claims() {
        let catalog = ReliefCatalog::malaysia_2024();
        let items = vec![
            ReliefLineItem::new("individual", dec!(9000)),
            ReliefLineItem::new("rent", dec!(24000)),
        ];

        let summary = catalog.preview_for(EntityType::SoleProprietorship, &items);

        assert_eq!(summary.total, dec!(33000));
        assert!(summary.is_valid());
    }

    // =========================================================================
    // finalize tests
    // =========================================================================

    #[test]
    fn finalize_accepts_valid_claims() {
        let items = vec![ReliefLineItem::new("medical", dec!(8000)).with_option("A")];

        let summary = catalog().finalize(&items).unwrap();

        assert_eq!(summary.total, dec!(8000));
    }

    #[test]
    fn finalize_blocks_on_missing_option() {
        let items = vec![
            ReliefLineItem::new("individual", dec!(9000)),
            ReliefLineItem::new("medical", dec!(1000)),
        ];

        let errors = catalog().finalize(&items).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.get("medical"),
            Some(ReliefValidationError::MissingOption { .. })
        ));
    }

    #[test]
    fn errors_display_lists_each_relief() {
        let items = vec![
            ReliefLineItem::new("medical", dec!(1000)),
            ReliefLineItem::new("unknown", dec!(1)),
        ];

        let errors = catalog().finalize(&items).unwrap_err();

        assert_eq!(
            errors.to_string(),
            "medical: select one of: A, B; unknown: unknown relief"
        );
    }
}
