use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use socukai_core::calculations::{DEFAULT_EPF_RATE_PERCENT, LineItem, Period};
use socukai_core::input::{ParseMoneyError, parse_money};
use socukai_core::{EntityType, MarginalConvention, ReliefLineItem};
use thiserror::Error;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Malaysian income tax estimator for individuals, sole proprietors and
/// companies (year of assessment 2024).
#[derive(Debug, Parser)]
#[command(name = "socukai", version)]
pub struct Cli {
    /// Settings file. Defaults to `socukai.toml` in the working directory
    /// when it exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate tax for an employed or self-employed individual.
    Individual(PersonalArgs),

    /// Estimate tax for a sole proprietor on personal rates.
    SoleProp(PersonalArgs),

    /// Estimate corporate tax.
    Company(CompanyArgs),

    /// List the relief catalogue, or fill a relief worksheet with claims.
    Reliefs(ReliefsArgs),

    /// Check whether a monthly salary must be declared.
    IncomeCheck(IncomeCheckArgs),

    /// Total income and expense items into monthly and annual profit.
    NetProfit(NetProfitArgs),

    /// Print the bracket tables in use.
    Tables,
}

#[derive(Debug, Args)]
pub struct PersonalArgs {
    /// Annual net profit or income, e.g. `85000` or `"RM 85,000"`.
    #[arg(long, value_parser = money)]
    pub gross: Decimal,

    /// EPF contributions (capped at the configured limit).
    #[arg(long, value_parser = money)]
    pub epf: Option<Decimal>,

    /// PRS contributions (capped at the configured limit).
    #[arg(long, value_parser = money)]
    pub prs: Option<Decimal>,

    /// Other deductions.
    #[arg(long, value_parser = money)]
    pub other: Option<Decimal>,

    /// Relief claim as `ID=AMOUNT` or `ID:OPTION=AMOUNT`. Repeatable.
    #[arg(long = "relief", value_parser = relief_claim)]
    pub reliefs: Vec<ReliefLineItem>,

    /// Fail instead of clamping when a relief claim is invalid.
    #[arg(long)]
    pub finalize: bool,

    /// Which bracket owns an income exactly on a boundary.
    #[arg(long, value_enum, default_value_t = ConventionArg::UpperInclusive)]
    pub convention: ConventionArg,
}

#[derive(Debug, Args)]
pub struct CompanyArgs {
    /// Chargeable profit before tax.
    #[arg(long, value_parser = money)]
    pub profit: Decimal,

    /// Use the flat non-SME rate.
    #[arg(long)]
    pub non_sme: bool,
}

#[derive(Debug, Args)]
pub struct ReliefsArgs {
    /// Worksheet entity.
    #[arg(long, value_enum, default_value_t = EntityArg::Individual)]
    pub entity: EntityArg,

    /// Claim as `ID=AMOUNT` or `ID:OPTION=AMOUNT`. Repeatable.
    #[arg(long = "claim", value_parser = relief_claim)]
    pub claims: Vec<ReliefLineItem>,

    /// Business income (sole proprietors and companies).
    #[arg(long, value_parser = money)]
    pub business_income: Option<Decimal>,

    /// Other income (sole proprietors).
    #[arg(long, value_parser = money)]
    pub other_income: Option<Decimal>,
}

impl ReliefsArgs {
    /// Without any figures only the catalogue is listed.
    pub fn has_worksheet(&self) -> bool {
        !self.claims.is_empty() || self.business_income.is_some() || self.other_income.is_some()
    }
}

#[derive(Debug, Args)]
pub struct IncomeCheckArgs {
    /// Monthly salary.
    #[arg(long, value_parser = money)]
    pub monthly: Decimal,

    /// Employee EPF rate in percent.
    #[arg(long, default_value_t = DEFAULT_EPF_RATE_PERCENT)]
    pub epf_rate: Decimal,

    /// The salary has no EPF deduction.
    #[arg(long)]
    pub no_epf: bool,
}

#[derive(Debug, Args)]
pub struct NetProfitArgs {
    #[arg(long, value_enum, default_value_t = EntityArg::Individual)]
    pub entity: EntityArg,

    /// Whether the amounts are monthly or annual.
    #[arg(long, value_enum, default_value_t = PeriodArg::Monthly)]
    pub period: PeriodArg,

    /// Income item as `DESCRIPTION:CATEGORY=AMOUNT`. Repeatable.
    #[arg(long = "income", value_parser = line_item)]
    pub income: Vec<LineItem>,

    /// Expense item as `DESCRIPTION:CATEGORY=AMOUNT`. Repeatable.
    #[arg(long = "expense", value_parser = line_item)]
    pub expenses: Vec<LineItem>,

    /// List the suggested categories for the entity and exit.
    #[arg(long)]
    pub categories: bool,
}

// ─── value enums ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    Individual,
    SoleProp,
    Company,
}

impl From<EntityArg> for EntityType {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Individual => EntityType::Individual,
            EntityArg::SoleProp => EntityType::SoleProprietorship,
            EntityArg::Company => EntityType::Company,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Monthly,
    Annual,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Monthly => Period::Monthly,
            PeriodArg::Annual => Period::Annual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConventionArg {
    UpperInclusive,
    LowerInclusive,
}

impl From<ConventionArg> for MarginalConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::UpperInclusive => MarginalConvention::UpperInclusive,
            ConventionArg::LowerInclusive => MarginalConvention::LowerInclusive,
        }
    }
}

// ─── argument parsers ────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("expected {expected}, got '{input}'")]
    Format {
        expected: &'static str,
        input: String,
    },

    #[error(transparent)]
    Money(#[from] ParseMoneyError),
}

fn money(s: &str) -> Result<Decimal, ParseMoneyError> {
    parse_money(s)
}

/// `ID=AMOUNT` or `ID:OPTION=AMOUNT`.
pub fn relief_claim(s: &str) -> Result<ReliefLineItem, ArgError> {
    let format_error = || ArgError::Format {
        expected: "ID=AMOUNT or ID:OPTION=AMOUNT",
        input: s.to_string(),
    };

    let (key, amount) = s.rsplit_once('=').ok_or_else(format_error)?;
    let amount = parse_money(amount)?;
    let item = match key.split_once(':') {
        Some((id, option)) if !id.trim().is_empty() && !option.trim().is_empty() => {
            ReliefLineItem::new(id.trim(), amount).with_option(option.trim())
        }
        Some(_) => return Err(format_error()),
        None if key.trim().is_empty() => return Err(format_error()),
        None => ReliefLineItem::new(key.trim(), amount),
    };
    Ok(item)
}

/// `DESCRIPTION:CATEGORY=AMOUNT`.
pub fn line_item(s: &str) -> Result<LineItem, ArgError> {
    let format_error = || ArgError::Format {
        expected: "DESCRIPTION:CATEGORY=AMOUNT",
        input: s.to_string(),
    };

    let (key, amount) = s.rsplit_once('=').ok_or_else(format_error)?;
    let (description, category) = key.split_once(':').ok_or_else(format_error)?;
    Ok(LineItem::new(
        description.trim(),
        parse_money(amount)?,
        category.trim(),
    ))
}
