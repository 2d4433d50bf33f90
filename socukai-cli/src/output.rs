//! Text and JSON rendering for command results.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use socukai_core::BracketTable;
use socukai_core::calculations::common::{as_percentage, round_half_up};
use socukai_core::calculations::{
    DECLARATION_THRESHOLD, IncomeCheckResult, NetProfitSummary, ReliefCatalog, ReliefSummary,
    TaxEstimate, WorksheetSummary,
};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

/// Pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// `RM 1,234.56`, rounded half up to sen.
pub fn format_rm(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}RM {grouped}.{cents}")
}

/// Fraction as a percentage with two decimals, e.g. `0.184` → `18.40%`.
pub fn format_percent(fraction: Decimal) -> String {
    format!("{:.2}%", round_half_up(as_percentage(fraction)))
}

/// Whole percentage rounded half up, e.g. `62.5` → `63%`.
pub fn format_whole_percent(percent: Decimal) -> String {
    format!(
        "{}%",
        percent.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    value: String,
}

impl SummaryRow {
    fn new(
        item: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            value: value.into(),
        }
    }
}

#[derive(Tabled)]
struct SliceRow {
    #[tabled(rename = "Bracket")]
    label: String,
    #[tabled(rename = "Taxable")]
    taxable: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

#[derive(Tabled)]
struct ReliefRow {
    #[tabled(rename = "Relief")]
    name: String,
    #[tabled(rename = "Claimed")]
    claimed: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Applied")]
    applied: String,
}

fn limit_text(max: Option<Decimal>) -> String {
    max.map_or_else(|| "no limit".to_string(), format_rm)
}

fn relief_rows(summary: &ReliefSummary) -> Vec<ReliefRow> {
    summary
        .lines
        .iter()
        .map(|line| ReliefRow {
            name: match &line.chosen_option {
                Some(option) => format!("{} ({option})", line.name),
                None => line.name.clone(),
            },
            claimed: format_rm(line.claimed_amount),
            limit: limit_text(line.applicable_max),
            applied: format_rm(line.applied_amount),
        })
        .collect()
}

fn error_lines(summary: &ReliefSummary) -> String {
    summary
        .errors
        .iter()
        .map(|(id, error)| format!("  ! {id}: {error}\n"))
        .collect()
}

pub fn render_estimate(
    title: &str,
    estimate: &TaxEstimate,
) -> String {
    let computation = &estimate.computation;
    let mut out = format!("{title}\n");

    let mut summary = vec![SummaryRow::new("Gross", format_rm(estimate.gross_amount))];
    if let Some(schedule) = estimate.schedule {
        let name = if schedule.is_sme() { "SME" } else { "Non-SME" };
        summary.push(SummaryRow::new("Schedule", name));
    } else {
        summary.push(SummaryRow::new("EPF", format_rm(estimate.deductions.epf)));
        summary.push(SummaryRow::new("PRS", format_rm(estimate.deductions.prs)));
        summary.push(SummaryRow::new(
            "Other deductions",
            format_rm(estimate.deductions.other_deductions),
        ));
        summary.push(SummaryRow::new("Reliefs", format_rm(estimate.reliefs.total)));
    }
    summary.extend([
        SummaryRow::new("Chargeable income", format_rm(computation.chargeable_income)),
        SummaryRow::new("Tax payable", format_rm(computation.total_tax)),
        SummaryRow::new("Effective rate", format_percent(computation.effective_rate)),
        SummaryRow::new("Marginal bracket", computation.marginal_bracket_label.clone()),
    ]);
    out.push_str(&table(&summary));
    out.push('\n');

    if !computation.breakdown.is_empty() {
        let slices: Vec<SliceRow> = computation
            .breakdown
            .iter()
            .map(|slice| SliceRow {
                label: slice.label.clone(),
                taxable: format_rm(slice.taxable_slice),
                rate: format_percent(slice.rate),
                tax: format_rm(slice.tax_for_slice),
            })
            .collect();
        out.push_str(&table(&slices));
        out.push('\n');
    }

    if !estimate.reliefs.lines.is_empty() {
        out.push_str(&table(&relief_rows(&estimate.reliefs)));
        out.push('\n');
    }

    for notice in &estimate.deductions.notices {
        out.push_str(&format!(
            "  note: {} of {} exceeds the limit; {} applied\n",
            notice.field.label(),
            format_rm(notice.entered),
            format_rm(notice.applied),
        ));
    }
    out.push_str(&error_lines(&estimate.reliefs));

    out
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Relief")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
}

pub fn render_catalog(catalog: &ReliefCatalog) -> String {
    let mut rows = Vec::new();
    for definition in catalog.definitions() {
        rows.push(CatalogRow {
            id: definition.id.clone(),
            name: definition.name.clone(),
            category: definition.category.as_str().to_string(),
            limit: limit_text(definition.max),
        });
        for option in &definition.options {
            rows.push(CatalogRow {
                id: String::new(),
                name: format!("  {}", option.label),
                category: String::new(),
                limit: format_rm(option.max),
            });
        }
    }
    format!("{}\n", table(&rows))
}

pub fn render_worksheet(summary: &WorksheetSummary) -> String {
    let mut rows = vec![SummaryRow::new("Total reliefs", format_rm(summary.total_reliefs))];
    if let Some(net) = summary.net_business_income {
        rows.push(SummaryRow::new(
            "Business deductions",
            format_rm(summary.business_deductions),
        ));
        rows.push(SummaryRow::new("Incentives", format_rm(summary.incentives)));
        rows.push(SummaryRow::new("Net business income", format_rm(net)));
    }
    if let Some(taxable) = summary.taxable_income {
        rows.push(SummaryRow::new("Taxable income", format_rm(taxable)));
    }

    let mut out = format!("{} worksheet\n", summary.entity.label());
    if !summary.reliefs.lines.is_empty() {
        out.push_str(&table(&relief_rows(&summary.reliefs)));
        out.push('\n');
    }
    out.push_str(&table(&rows));
    out.push('\n');
    out.push_str(&error_lines(&summary.reliefs));
    out
}

pub fn render_income_check(result: Option<&IncomeCheckResult>) -> String {
    let Some(result) = result else {
        return "Enter a monthly income to run the check.\n".to_string();
    };

    let rows = [
        SummaryRow::new("Yearly income", format_rm(result.yearly_income)),
        SummaryRow::new("EPF deduction", format_rm(result.epf_deduction)),
        SummaryRow::new("Net chargeable income", format_rm(result.net_chargeable_income)),
        SummaryRow::new("Threshold", format_rm(DECLARATION_THRESHOLD)),
        SummaryRow::new("Progress", format_whole_percent(result.progress_percent)),
    ];
    let verdict = if result.must_declare {
        "You must declare your income."
    } else {
        "You are below the declaration threshold."
    };

    format!("{}\n{verdict}\n", table(&rows))
}

#[derive(Tabled)]
struct PeriodRow {
    #[tabled(rename = "")]
    view: &'static str,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Net profit")]
    profit: String,
}

pub fn render_net_profit(summary: &NetProfitSummary) -> String {
    let rows = [("Monthly", &summary.monthly), ("Annual", &summary.annual)].map(
        |(view, figures)| PeriodRow {
            view,
            income: format_rm(figures.income),
            expenses: format_rm(figures.expenses),
            profit: format_rm(figures.profit),
        },
    );
    format!("{}\n", table(&rows))
}

#[derive(Tabled)]
struct BracketRow {
    #[tabled(rename = "From")]
    lower: String,
    #[tabled(rename = "To")]
    upper: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Label")]
    label: String,
}

pub fn render_tables(tables: &[&BracketTable]) -> String {
    let mut out = String::new();
    for bracket_table in tables {
        let rows: Vec<BracketRow> = bracket_table
            .brackets()
            .iter()
            .map(|b| BracketRow {
                lower: format_rm(b.lower_bound),
                upper: b.upper_bound.map_or_else(|| "and above".to_string(), format_rm),
                rate: format_percent(b.rate),
                label: b.label.clone(),
            })
            .collect();
        out.push_str(&format!("{}\n{}\n", bracket_table.name(), table(&rows)));
    }
    out
}
