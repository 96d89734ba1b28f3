use billing_core::domain::BilledTable;

use super::{HighlightRule, Presenter};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Chart { x: Vec<String>, y: Vec<f64>, color_by: Vec<f64> },
    Metric(String, String),
    Table { table: BilledTable, highlight_column: String, highlight_rule: HighlightRule },
    Download { label: String, payload: Vec<u8>, filename: String },
    Error(String),
    Info(String),
}

/// Records every render call in order.
#[derive(Debug, Default)]
pub(crate) struct CapturingPresenter {
    pub calls: Vec<Call>,
}

impl Presenter for CapturingPresenter {
    fn render_chart(&mut self, x: &[String], y: &[f64], color_by: &[f64]) {
        self.calls.push(Call::Chart {
            x: x.to_vec(),
            y: y.to_vec(),
            color_by: color_by.to_vec(),
        });
    }

    fn render_metric(&mut self, label: &str, formatted_value: &str) {
        self.calls.push(Call::Metric(label.to_string(), formatted_value.to_string()));
    }

    fn render_table(&mut self, table: &BilledTable, highlight_column: &str, highlight_rule: HighlightRule) {
        self.calls.push(Call::Table {
            table: table.clone(),
            highlight_column: highlight_column.to_string(),
            highlight_rule,
        });
    }

    fn render_download(&mut self, label: &str, payload: &[u8], filename: &str) {
        self.calls.push(Call::Download {
            label: label.to_string(),
            payload: payload.to_vec(),
            filename: filename.to_string(),
        });
    }

    fn render_error(&mut self, message: &str) {
        self.calls.push(Call::Error(message.to_string()));
    }

    fn render_info(&mut self, message: &str) {
        self.calls.push(Call::Info(message.to_string()));
    }
}
