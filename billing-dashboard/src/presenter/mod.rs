//! Rendering contract between a billing pass and the dashboard toolkit.
//!
//! The session hands a finished [`PassOutcome`] to [`present`], which drives
//! any [`Presenter`]. The HTML implementation lives in [`html`]; tests use a
//! capturing fake.

pub mod html;
#[cfg(test)]
pub(crate) mod capture;

use billing_core::domain::{BilledTable, TOTAL_BILL};
use billing_core::export;

use crate::session::{Mode, PassOutcome};

pub use html::HtmlPresenter;

/// Which cells of `highlight_column` a table should emphasise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightRule {
    Max,
}

pub trait Presenter {
    fn render_chart(&mut self, x: &[String], y: &[f64], color_by: &[f64]);
    fn render_metric(&mut self, label: &str, formatted_value: &str);
    fn render_table(&mut self, table: &BilledTable, highlight_column: &str, highlight_rule: HighlightRule);
    fn render_download(&mut self, label: &str, payload: &[u8], filename: &str);
    fn render_error(&mut self, message: &str);
    fn render_info(&mut self, message: &str);
}

/// `<symbol><#,###.##>`, e.g. `₹5,659.00`.
pub fn format_money(currency_symbol: &str, value: f64) -> String {
    format!("{currency_symbol}{}", format_num::format_num!(",.2", value))
}

/// Renders one mode's region for the outcome of its latest pass.
pub fn present<P: Presenter>(presenter: &mut P, mode: Mode, outcome: &PassOutcome, currency_symbol: &str) {
    let report = match outcome {
        PassOutcome::Idle => {
            presenter.render_info(mode.idle_message());
            return;
        }
        PassOutcome::Invalid(e) => {
            presenter.render_error(&format!("Error: {e}. Please correct the input."));
            return;
        }
        PassOutcome::Computed(report) => report,
    };

    let billed = &report.billed;
    let rooms: Vec<String> = billed.iter().map(|r| r.room_id().to_string()).collect();
    let bills = billed.total_bills();
    presenter.render_chart(&rooms, &bills, &bills);

    presenter.render_metric("Total Revenue", &format_money(currency_symbol, report.total_revenue));
    let average = report
        .average_bill
        .map(|avg| format_money(currency_symbol, avg))
        .unwrap_or_else(|| "—".to_string());
    presenter.render_metric("Avg Bill", &average);

    presenter.render_table(billed, TOTAL_BILL, HighlightRule::Max);

    match export(billed) {
        Ok(payload) => {
            let report_type = mode.report_type();
            presenter.render_download(
                &format!("Export {report_type} JSON"),
                &payload,
                &format!("{report_type}.json"),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, mode = mode.slug(), "failed to serialize report");
            presenter.render_error("Report export failed.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::capture::{Call, CapturingPresenter};
    use super::*;
    use billing_core::domain::{Tariff, UsageRow, UsageTable};
    use billing_core::{compute_bills, summarize, BillingError};

    use crate::pipeline::PipelineError;

    #[test]
    fn money_has_symbol_separators_and_two_decimals() {
        assert_eq!(format_money("₹", 5659.0), "₹5,659.00");
        assert_eq!(format_money("$", 645.3), "$645.30");
    }

    #[test]
    fn idle_mode_shows_placeholder_only() {
        let mut p = CapturingPresenter::default();
        present(&mut p, Mode::Bulk, &PassOutcome::Idle, "₹");
        assert_eq!(p.calls, vec![Call::Info(Mode::Bulk.idle_message().to_string())]);
    }

    #[test]
    fn invalid_input_shows_error_and_nothing_else() {
        let mut p = CapturingPresenter::default();
        let err = PipelineError::Billing(BillingError::NegativeUsage {
            row: 0,
            room_id: "101".to_string(),
            column: "electricity_usage",
            value: -1.0,
        });
        present(&mut p, Mode::Manual, &PassOutcome::Invalid(err), "₹");

        assert_eq!(p.calls.len(), 1);
        assert!(matches!(&p.calls[0], Call::Error(msg) if msg.contains("negative")));
    }

    #[test]
    fn computed_report_renders_chart_metrics_table_and_download() {
        let table = UsageTable::new(vec![UsageRow::new("101", 10.0, 5.0)]);
        let report = summarize(compute_bills(&table, &Tariff::default()));
        let mut p = CapturingPresenter::default();
        present(&mut p, Mode::Manual, &PassOutcome::Computed(report), "₹");

        assert!(matches!(&p.calls[0], Call::Chart { x, .. } if x == &vec!["101".to_string()]));
        assert_eq!(p.calls[1], Call::Metric("Total Revenue".into(), "₹645.30".into()));
        assert_eq!(p.calls[2], Call::Metric("Avg Bill".into(), "₹645.30".into()));
        assert!(matches!(&p.calls[3], Call::Table { highlight_column, .. } if highlight_column == "Total Bill"));
        match &p.calls[4] {
            Call::Download { label, filename, payload } => {
                assert_eq!(label, "Export Manual_Report JSON");
                assert_eq!(filename, "Manual_Report.json");
                assert!(String::from_utf8_lossy(payload).contains("\"Total Bill\""));
            }
            other => panic!("expected download, got {other:?}"),
        }
    }

    #[test]
    fn empty_report_shows_dash_for_average() {
        let report = summarize(compute_bills(&UsageTable::default(), &Tariff::default()));
        let mut p = CapturingPresenter::default();
        present(&mut p, Mode::Bulk, &PassOutcome::Computed(report), "₹");

        assert_eq!(p.calls[1], Call::Metric("Total Revenue".into(), "₹0.00".into()));
        assert_eq!(p.calls[2], Call::Metric("Avg Bill".into(), "—".into()));
    }
}
