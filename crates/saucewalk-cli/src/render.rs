//! Console rendering of run outcomes.

use crate::OutputFormat;
use console::style;
use saucewalk_core::{Error, ScenarioReport};
use serde_json::json;

/// Render a passing run
pub fn report(report: &ScenarioReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "passed": true,
            "report": report,
        }))
        .unwrap_or_default(),
        OutputFormat::Table => report_table(report),
        OutputFormat::Pretty => report_pretty(report),
    }
}

/// Render an aborted run
pub fn failure(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "passed": false,
            "step": err.step(),
            "state": err.state(),
            "kind": if err.is_assertion() { "assertion" } else { "driver" },
            "error": err.to_string(),
        }))
        .unwrap_or_default(),
        OutputFormat::Table | OutputFormat::Pretty => {
            let mut out = format!("{} {}", style("✗ FAILED").red().bold(), err);
            if let Some(state) = err.state() {
                out.push_str(&format!("\n  Aborted in state: {}", state));
            }
            out
        }
    }
}

fn report_pretty(report: &ScenarioReport) -> String {
    let mut lines = Vec::new();
    for record in &report.steps {
        lines.push(format!(
            "  {} {} ({}ms)",
            style("✓").green(),
            record.step,
            record.elapsed_ms
        ));
    }
    if let Some(item) = &report.item {
        lines.push(format!("  Item: {} at {}", item.name, item.price));
    }
    lines.push(format!(
        "{} {} steps against {} in {}ms",
        style("✅ PASSED").green().bold(),
        report.steps.len(),
        report.base_url,
        report.total_ms()
    ));
    lines.join("\n")
}

fn report_table(report: &ScenarioReport) -> String {
    let width = report
        .steps
        .iter()
        .map(|r| r.step.description().len())
        .max()
        .unwrap_or(0)
        .max("STEP".len());

    let mut lines = vec![format!("{:<width$}  {:<22}  {:>8}", "STEP", "STATE", "MS")];
    for record in &report.steps {
        lines.push(format!(
            "{:<width$}  {:<22}  {:>8}",
            record.step.description(),
            record.state.to_string(),
            record.elapsed_ms
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucewalk_core::{ItemSnapshot, JourneyState, Step};

    fn sample() -> ScenarioReport {
        let mut report = ScenarioReport::new("https://www.saucedemo.com/");
        report.record(Step::OpenLoginPage, JourneyState::Unauthenticated, 300);
        report.record(Step::LogIn, JourneyState::ProductsPage, 120);
        report.item = Some(ItemSnapshot {
            name: "Sauce Labs Bolt T-Shirt".to_string(),
            description: "Get your testing superhero on".to_string(),
            price: "$15.99".to_string(),
        });
        report
    }

    #[test]
    fn test_json_report_is_machine_readable() {
        let out = report(&sample(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["passed"], true);
        assert_eq!(value["report"]["steps"][1]["step"], "log_in");
        assert_eq!(value["report"]["item"]["price"], "$15.99");
    }

    #[test]
    fn test_table_lists_every_step() {
        let out = report(&sample(), OutputFormat::Table);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("STEP"));
        assert!(lines[2].contains("Log in as the standard user"));
        assert!(lines[2].contains("products page"));
        assert!(lines[2].trim_end().ends_with("120"));
    }

    #[test]
    fn test_pretty_report_summarises_run() {
        let out = report(&sample(), OutputFormat::Pretty);

        assert!(out.contains("Open the login page (300ms)"));
        assert!(out.contains("Sauce Labs Bolt T-Shirt"));
        assert!(out.contains("2 steps against https://www.saucedemo.com/ in 420ms"));
    }

    #[test]
    fn test_json_failure_names_step_and_state() {
        let err = Error::Assertion {
            step: Step::AddToCart,
            state: JourneyState::ProductDetail,
            message: "T-Shirt has not been added to the cart".to_string(),
        };

        let value: serde_json::Value =
            serde_json::from_str(&failure(&err, OutputFormat::Json)).unwrap();

        assert_eq!(value["passed"], false);
        assert_eq!(value["step"], "add_to_cart");
        assert_eq!(value["state"], "product_detail");
        assert_eq!(value["kind"], "assertion");
    }

    #[test]
    fn test_pretty_failure_mentions_state() {
        let err = Error::Assertion {
            step: Step::LogOut,
            state: JourneyState::OrderComplete,
            message: "User should be redirected to: https://www.saucedemo.com/".to_string(),
        };

        let out = failure(&err, OutputFormat::Pretty);
        assert!(out.contains("Aborted in state: order complete"));
    }
}
