use anyhow::{ensure, Context};
use pricewise_core::config::{AppConfig, DiscountEntry, LoadOptions};
use pricewise_core::{
    DiscountStrategy, FirstMatchDispatcher, MoneyOffDiscount, PercentageDiscount, PricingError,
    Product, UnrecognizedDiscount,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = vec![check_strategy_wiring()];

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_discount_rows(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "discount_rows",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_strategy_wiring() -> DoctorCheck {
    match verify_strategy_wiring() {
        Ok(order) => DoctorCheck {
            name: "strategy_wiring",
            status: CheckStatus::Pass,
            details: format!("dispatch order: {order}"),
        },
        Err(error) => DoctorCheck {
            name: "strategy_wiring",
            status: CheckStatus::Fail,
            details: format!("{error:#}"),
        },
    }
}

fn verify_strategy_wiring() -> anyhow::Result<String> {
    let standard = FirstMatchDispatcher::standard();
    let rebuilt = FirstMatchDispatcher::new(vec![
        Box::new(PercentageDiscount),
        Box::new(MoneyOffDiscount),
        Box::new(UnrecognizedDiscount),
    ])
    .context("standard strategy list was rejected by the dispatcher")?;
    ensure!(
        standard.strategy_names() == rebuilt.strategy_names(),
        "standard dispatcher order drifted from the declared strategy list"
    );

    let probe = Product::new(Decimal::ONE, "__doctor_probe__", "__doctor_probe__");
    ensure!(standard.applies_to(&probe), "dispatcher does not cover unknown discount types");
    ensure!(
        matches!(standard.apply(&probe, Decimal::ONE), Err(PricingError::UnknownDiscountType(_))),
        "unknown discount types must surface as unknown_discount_type"
    );

    Ok(standard.strategy_names().join(" -> "))
}

fn check_discount_rows(config: &AppConfig) -> DoctorCheck {
    if config.discounts.is_empty() {
        return DoctorCheck {
            name: "discount_rows",
            status: CheckStatus::Fail,
            details: "no [[discounts]] rows are configured; every lookup will fail".to_string(),
        };
    }

    let dispatcher = FirstMatchDispatcher::standard();
    let problems: Vec<String> =
        config.discounts.iter().filter_map(|entry| probe_entry(&dispatcher, entry)).collect();

    if problems.is_empty() {
        DoctorCheck {
            name: "discount_rows",
            status: CheckStatus::Pass,
            details: format!(
                "{} discount row(s) resolve to a known strategy",
                config.discounts.len()
            ),
        }
    } else {
        DoctorCheck {
            name: "discount_rows",
            status: CheckStatus::Fail,
            details: problems.join("; "),
        }
    }
}

/// Runs a configured row through the real strategies with the smallest price
/// that can carry its magnitude, so only price-independent problems surface.
fn probe_entry(dispatcher: &FirstMatchDispatcher, entry: &DiscountEntry) -> Option<String> {
    let price = entry.magnitude.abs().max(Decimal::ONE);
    let product = Product::new(price, entry.discount_type.clone(), entry.product_category.clone());

    dispatcher.apply(&product, entry.magnitude).err().map(|error| {
        format!(
            "{} / {} = {}: {error}",
            entry.discount_type, entry.product_category, entry.magnitude
        )
    })
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        let status = match check.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "SKIP",
        };
        lines.push(format!("[{status}] {}: {}", check.name, check.details));
    }
    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
