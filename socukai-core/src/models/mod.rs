mod bracket_table;
mod company_schedule;
mod computation;
mod deduction;
mod entity_type;
mod relief;
mod tax_bracket;

pub use bracket_table::{BracketTable, BracketTableError};
pub use company_schedule::CompanyTaxSchedule;
pub use computation::{BracketSlice, NO_TAX_PAYABLE, TaxComputationResult};
pub use deduction::{DeductionCaps, DeductionInput};
pub use entity_type::EntityType;
pub use relief::{ReliefCategory, ReliefDefinition, ReliefLineItem, ReliefOption};
pub use tax_bracket::{MarginalConvention, TaxBracket};
