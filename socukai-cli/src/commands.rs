//! Command execution. Every command returns its rendered output so the
//! binary only has to print it.

use anyhow::{Context, Result, bail};
use socukai_core::calculations::{
    EstimateInput, EstimatorProfile, IncomeCheckInput, TaxEstimator, WorksheetInput,
    check_income, fill_worksheet, summarize,
};
use socukai_core::calculations::net_profit::{expense_categories, income_categories};
use socukai_core::{EntityType, MarginalConvention};
use tracing::{debug, info};

use crate::cli::{
    Cli, Command, CompanyArgs, IncomeCheckArgs, NetProfitArgs, PersonalArgs, ReliefsArgs,
};
use crate::config::Settings;
use crate::output;

/// Runs `cli.command` and returns what should be printed.
pub fn run(
    cli: &Cli,
    settings: &Settings,
) -> Result<String> {
    match &cli.command {
        Command::Individual(args) => personal(EntityType::Individual, args, settings, cli.json),
        Command::SoleProp(args) => {
            personal(EntityType::SoleProprietorship, args, settings, cli.json)
        }
        Command::Company(args) => company(args, settings, cli.json),
        Command::Reliefs(args) => reliefs(args, settings, cli.json),
        Command::IncomeCheck(args) => income_check(args, cli.json),
        Command::NetProfit(args) => net_profit(args, cli.json),
        Command::Tables => tables(settings, cli.json),
    }
}

fn build_estimator(
    entity: EntityType,
    settings: &Settings,
    convention: MarginalConvention,
) -> Result<TaxEstimator> {
    let tables = settings.tax_tables().context("failed to load bracket tables")?;
    let reliefs = settings
        .relief_catalog()
        .context("failed to load relief catalogue")?;

    debug!(entity = entity.as_str(), "building estimator");
    Ok(TaxEstimator::new(
        EstimatorProfile::for_entity(entity),
        tables.individual.clone(),
        tables.company(),
        reliefs,
        settings.caps(),
    )
    .with_convention(convention))
}

fn personal(
    entity: EntityType,
    args: &PersonalArgs,
    settings: &Settings,
    json: bool,
) -> Result<String> {
    let estimator = build_estimator(entity, settings, args.convention.into())?;
    let input = EstimateInput {
        gross_amount: args.gross,
        epf: args.epf,
        prs: args.prs,
        other_deductions: args.other,
        relief_line_items: args.reliefs.clone(),
        is_sme: None,
    };

    let estimate = if args.finalize {
        estimator
            .finalize(&input)
            .context("relief claims are invalid")?
    } else {
        estimator.estimate(&input)
    };

    if json {
        Ok(output::to_json(&estimate)?)
    } else {
        Ok(output::render_estimate(&estimator.profile().title, &estimate))
    }
}

fn company(
    args: &CompanyArgs,
    settings: &Settings,
    json: bool,
) -> Result<String> {
    let estimator = build_estimator(
        EntityType::Company,
        settings,
        MarginalConvention::default(),
    )?;
    let estimate = estimator.estimate(&EstimateInput {
        gross_amount: args.profit,
        is_sme: Some(!args.non_sme),
        ..EstimateInput::default()
    });

    if json {
        Ok(output::to_json(&estimate)?)
    } else {
        Ok(output::render_estimate(&estimator.profile().title, &estimate))
    }
}

fn reliefs(
    args: &ReliefsArgs,
    settings: &Settings,
    json: bool,
) -> Result<String> {
    let catalog = settings
        .relief_catalog()
        .context("failed to load relief catalogue")?;

    if !args.has_worksheet() {
        return if json {
            Ok(output::to_json(&catalog)?)
        } else {
            Ok(output::render_catalog(&catalog))
        };
    }

    let summary = fill_worksheet(
        args.entity.into(),
        &catalog,
        &WorksheetInput {
            business_income: args.business_income.unwrap_or_default(),
            other_income: args.other_income.unwrap_or_default(),
            claims: args.claims.clone(),
        },
    );

    if json {
        Ok(output::to_json(&summary)?)
    } else {
        Ok(output::render_worksheet(&summary))
    }
}

fn income_check(
    args: &IncomeCheckArgs,
    json: bool,
) -> Result<String> {
    let result = check_income(&IncomeCheckInput {
        monthly_income: args.monthly,
        epf_rate_percent: args.epf_rate,
        contributes_to_epf: !args.no_epf,
    });

    if json {
        Ok(output::to_json(&result)?)
    } else {
        Ok(output::render_income_check(result.as_ref()))
    }
}

fn net_profit(
    args: &NetProfitArgs,
    json: bool,
) -> Result<String> {
    let entity: EntityType = args.entity.into();

    if args.categories {
        let income = income_categories(entity);
        let expenses = expense_categories(entity);
        return if json {
            Ok(output::to_json(&serde_json::json!({
                "income": income,
                "expenses": expenses,
            }))?)
        } else {
            Ok(format!(
                "Income categories:\n  {}\nExpense categories:\n  {}\n",
                income.join("\n  "),
                expenses.join("\n  ")
            ))
        };
    }

    let problems: Vec<String> = args
        .income
        .iter()
        .chain(&args.expenses)
        .flat_map(|item| {
            item.validate()
                .into_iter()
                .map(move |error| format!("'{}': {error}", item.description))
        })
        .collect();
    if !problems.is_empty() {
        bail!("invalid line items:\n  {}", problems.join("\n  "));
    }

    let summary = summarize(args.period.into(), &args.income, &args.expenses);
    info!(
        entity = entity.as_str(),
        annual_profit = %summary.annual.profit,
        "net profit summarized"
    );

    if json {
        Ok(output::to_json(&summary)?)
    } else {
        Ok(output::render_net_profit(&summary))
    }
}

fn tables(
    settings: &Settings,
    json: bool,
) -> Result<String> {
    let tables = settings.tax_tables().context("failed to load bracket tables")?;
    let all = [&tables.individual, &tables.company_sme, &tables.company_non_sme];

    if json {
        Ok(output::to_json(&all)?)
    } else {
        Ok(output::render_tables(&all))
    }
}
