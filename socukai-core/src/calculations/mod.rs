//! Tax calculation modules for the Malaysian estimators.
//!
//! The progressive engine does the bracket walk; everything else feeds it
//! (deduction caps, relief validation) or presents its inputs (net profit,
//! income check, worksheets).

pub mod common;
pub mod company;
pub mod deductions;
pub mod estimator;
pub mod income_check;
pub mod net_profit;
pub mod progressive;
pub mod reliefs;
pub mod schedules;
pub mod worksheet;

pub use company::{CompanyTaxCalculator, compute_company_tax};
pub use deductions::{CappedDeductions, DeductionField, DeductionNotice, apply_caps, cap};
pub use estimator::{EstimateInput, EstimatorProfile, TaxEstimate, TaxEstimator};
pub use income_check::{
    DECLARATION_THRESHOLD, DEFAULT_EPF_RATE_PERCENT, IncomeCheckInput, IncomeCheckResult,
    check_income,
};
pub use net_profit::{LineItem, LineItemError, NetProfitSummary, Period, PeriodFigures, summarize};
pub use progressive::{ProgressiveTaxEngine, chargeable_income};
pub use reliefs::{
    AppliedRelief, ReliefCatalog, ReliefCatalogError, ReliefSummary, ReliefValidationError,
    ReliefValidationErrors,
};
pub use worksheet::{WorksheetInput, WorksheetSummary, fill_worksheet};
