//! Runs commands end to end against the settings fixture.

use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;
use socukai_cli::{Cli, Settings, run};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn settings() -> Settings {
    Settings::load(Some(&fixture("socukai.toml"))).expect("Failed to load fixture")
}

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("socukai").chain(args.iter().copied()))?;
    run(&cli, &settings())
}

#[test]
fn fixture_settings_load() {
    let settings = settings();

    assert_eq!(settings.logging.level, "debug");
    assert!(settings.tables.brackets.is_some());
}

#[test]
fn fixture_tables_resolve_beside_the_config() {
    let settings = settings();
    let data_dir = fixture("../../../socukai-data/data");

    assert_eq!(
        settings.tables.brackets,
        Some(data_dir.join("brackets_2024.csv"))
    );
    assert!(settings.tax_tables().is_ok());
    assert!(settings.relief_catalog().is_ok());
}

#[test]
fn individual_table_output() {
    let out = run_args(&["individual", "--gross", "85000", "--epf", "4000", "--prs", "1000"])
        .expect("command failed");

    assert!(out.contains("RM 80,000.00"));
    assert!(out.contains("RM 5,600.00"));
}

#[test]
fn individual_json_output() {
    let out = run_args(&["--json", "individual", "--gross", "85000", "--epf", "4000", "--prs", "1000"])
        .expect("command failed");
    let value: serde_json::Value = serde_json::from_str(&out).expect("invalid JSON");

    assert_eq!(value["computation"]["chargeable_income"], "80000");
    assert_eq!(value["entity"], "individual");
}

#[test]
fn finalize_rejects_missing_option() {
    let result = run_args(&[
        "individual",
        "--gross",
        "60000",
        "--relief",
        "parent_medical=3000",
        "--finalize",
    ]);

    let error = result.expect_err("finalize should fail");
    assert!(format!("{error:#}").contains("parent_medical"));
}

#[test]
fn individual_cannot_claim_capital_allowance() {
    let result = run_args(&[
        "individual",
        "--gross",
        "500000",
        "--relief",
        "capital_allowance=500000",
        "--finalize",
    ]);

    let error = format!("{:#}", result.expect_err("finalize should fail"));
    assert!(error.contains("capital_allowance"));
    assert!(error.contains("not available"));
}

#[test]
fn individual_preview_ignores_capital_allowance() {
    let out = run_args(&[
        "--json",
        "individual",
        "--gross",
        "500000",
        "--relief",
        "capital_allowance=500000",
    ])
    .expect("command failed");
    let value: serde_json::Value = serde_json::from_str(&out).expect("invalid JSON");

    assert_eq!(value["computation"]["chargeable_income"], "500000");
    assert_eq!(value["reliefs"]["total"], "0");
}

#[test]
fn company_schedules() {
    let sme = run_args(&["company", "--profit", "750000"]).expect("command failed");
    let non_sme = run_args(&["company", "--profit", "750000", "--non-sme"]).expect("command failed");

    assert!(sme.contains("RM 138,000.00"));
    assert!(non_sme.contains("RM 180,000.00"));
}

#[test]
fn reliefs_worksheet_for_sole_prop() {
    let out = run_args(&[
        "reliefs",
        "--entity",
        "sole-prop",
        "--business-income",
        "120000",
        "--other-income",
        "5000",
        "--claim",
        "individual=9000",
        "--claim",
        "rent=24000",
        "--claim",
        "utilities=6000",
    ])
    .expect("command failed");

    assert!(out.contains("Net business income"));
    assert!(out.contains("RM 90,000.00"));
    // 90000 + 5000 - 9000
    assert!(out.contains("RM 86,000.00"));
}

#[test]
fn reliefs_without_figures_lists_catalogue() {
    let out = run_args(&["reliefs"]).expect("command failed");

    assert!(out.contains("capital_allowance"));
}

#[test]
fn net_profit_rejects_invalid_items() {
    let result = run_args(&["net-profit", "--income", "Salary:=5000"]);

    assert!(format!("{:#}", result.expect_err("should fail")).contains("category is required"));
}

#[test]
fn net_profit_annualises() {
    let out = run_args(&[
        "--json",
        "net-profit",
        "--income",
        "Monthly Salary:Employment Salary=5000",
        "--expense",
        "Transport:Transportation=800",
    ])
    .expect("command failed");
    let value: serde_json::Value = serde_json::from_str(&out).expect("invalid JSON");

    assert_eq!(value["annual"]["profit"], "50400");
}

#[test]
fn tables_lists_every_schedule() {
    let out = run_args(&["tables"]).expect("command failed");

    assert!(out.contains("individual"));
    assert!(out.contains("company-sme"));
    assert!(out.contains("company-non-sme"));
}

#[test]
fn income_check_rejects_amounts_beyond_the_maximum() {
    let result = run_args(&["income-check", "--monthly", "79228162514264337593543950335"]);

    assert!(format!("{:#}", result.expect_err("should fail")).contains("exceeds the maximum"));
}

#[test]
fn income_check_accepts_the_maximum() {
    let out = run_args(&["--json", "income-check", "--monthly", "1,000,000,000,000"])
        .expect("command failed");
    let value: serde_json::Value = serde_json::from_str(&out).expect("invalid JSON");

    assert_eq!(value["yearly_income"], "12000000000000");
    assert_eq!(value["must_declare"], true);
}

#[test]
fn sole_prop_with_large_business_claims_totals_exactly() {
    let out = run_args(&[
        "--json",
        "sole-prop",
        "--gross",
        "100",
        "--other",
        "1000000000000",
        "--relief",
        "rent=1000000000000",
        "--relief",
        "utilities=1000000000000",
    ])
    .expect("command failed");
    let value: serde_json::Value = serde_json::from_str(&out).expect("invalid JSON");

    assert_eq!(value["reliefs"]["total"], "2000000000000");
    assert_eq!(value["computation"]["total_tax"], "0");
}
