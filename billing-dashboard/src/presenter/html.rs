use base64::{engine::general_purpose::STANDARD, Engine};
use billing_core::domain::{BilledRow, BilledTable};
use billing_core::peak_index_by;
use billing_core::domain::{ELECTRICITY_COST, ELECTRICITY_USAGE, ROOM_ID, TOTAL_BILL, WATER_COST, WATER_USAGE};

use super::{HighlightRule, Presenter};

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 320.0;
const CHART_MARGIN_LEFT: f64 = 80.0;
const CHART_MARGIN_BOTTOM: f64 = 40.0;
const CHART_MARGIN_TOP: f64 = 16.0;

/// Low/mid/high stops of the continuous bar color scale.
const COLOR_STOPS: [(f64, f64, f64); 3] = [(13.0, 8.0, 135.0), (204.0, 71.0, 120.0), (240.0, 249.0, 33.0)];

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

pub fn escaped(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_html(s, &mut out);
    out
}

fn bar_color(value: f64, min: f64, max: f64) -> String {
    let t = if max > min { (value - min) / (max - min) } else { 1.0 };
    let (scaled, lo, hi) = if t <= 0.5 {
        (t * 2.0, COLOR_STOPS[0], COLOR_STOPS[1])
    } else {
        ((t - 0.5) * 2.0, COLOR_STOPS[1], COLOR_STOPS[2])
    };
    let mix = |a: f64, b: f64| (a + (b - a) * scaled).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(lo.0, hi.0), mix(lo.1, hi.1), mix(lo.2, hi.2))
}

fn numeric_cell(row: &BilledRow, column: &str) -> Option<f64> {
    match column {
        ELECTRICITY_USAGE => Some(row.usage.electricity_usage),
        WATER_USAGE => Some(row.usage.water_usage),
        ELECTRICITY_COST => Some(row.electricity_cost),
        WATER_COST => Some(row.water_cost),
        TOTAL_BILL => Some(row.total_bill),
        _ => None,
    }
}

/// Row to highlight for `column` under `rule`; the first maximum wins.
fn highlighted_row(table: &BilledTable, column: &str, rule: HighlightRule) -> Option<usize> {
    match rule {
        HighlightRule::Max => peak_index_by(table, |row| numeric_cell(row, column)),
    }
}

/// Writes dashboard widgets as HTML fragments into a buffer.
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    out: String,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_html(self) -> String {
        self.out
    }

    fn cell(&mut self, text: &str, class: Option<&str>) {
        match class {
            Some(class) => self.out.push_str(&format!("<td class=\"{class}\">")),
            None => self.out.push_str("<td>"),
        }
        escape_html(text, &mut self.out);
        self.out.push_str("</td>");
    }
}

impl Presenter for HtmlPresenter {
    fn render_chart(&mut self, x: &[String], y: &[f64], color_by: &[f64]) {
        self.out.push_str("<figure class=\"chart\"><figcaption>Bill Distribution</figcaption>");
        if x.is_empty() {
            self.out.push_str("<p class=\"muted\">No rooms to chart.</p></figure>");
            return;
        }

        let plot_w = CHART_WIDTH - CHART_MARGIN_LEFT;
        let plot_h = CHART_HEIGHT - CHART_MARGIN_BOTTOM - CHART_MARGIN_TOP;
        let y_max = y.iter().cloned().fold(0.0_f64, f64::max);
        let c_min = color_by.iter().cloned().fold(f64::INFINITY, f64::min);
        let c_max = color_by.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let slot = plot_w / x.len() as f64;
        let bar_w = slot * 0.8;

        self.out.push_str(&format!(
            "<svg viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" role=\"img\" aria-label=\"Total Bill by room\">"
        ));
        let axis_y = CHART_HEIGHT - CHART_MARGIN_BOTTOM;
        self.out.push_str(&format!(
            "<line x1=\"{CHART_MARGIN_LEFT}\" y1=\"{axis_y}\" x2=\"{CHART_WIDTH}\" y2=\"{axis_y}\" class=\"axis\"/>"
        ));
        self.out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" class=\"tick\" text-anchor=\"end\">{}</text>",
            CHART_MARGIN_LEFT - 6.0,
            CHART_MARGIN_TOP + 4.0,
            format_num::format_num!(",.2", y_max)
        ));

        for (idx, label) in x.iter().enumerate() {
            let value = y.get(idx).copied().unwrap_or_default();
            let height = if y_max > 0.0 { value / y_max * plot_h } else { 0.0 };
            let left = CHART_MARGIN_LEFT + slot * idx as f64 + (slot - bar_w) / 2.0;
            let top = axis_y - height;
            let color = bar_color(color_by.get(idx).copied().unwrap_or(value), c_min, c_max);

            self.out.push_str(&format!(
                "<rect x=\"{left:.2}\" y=\"{top:.2}\" width=\"{bar_w:.2}\" height=\"{height:.2}\" fill=\"{color}\"><title>"
            ));
            escape_html(label, &mut self.out);
            self.out.push_str(&format!(": {}</title></rect>", format_num::format_num!(",.2", value)));

            self.out.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" class=\"tick\" text-anchor=\"middle\">",
                left + bar_w / 2.0,
                axis_y + 18.0
            ));
            escape_html(label, &mut self.out);
            self.out.push_str("</text>");
        }
        self.out.push_str("</svg></figure>");
    }

    fn render_metric(&mut self, label: &str, formatted_value: &str) {
        self.out.push_str("<div class=\"metric\"><span class=\"metric-label\">");
        escape_html(label, &mut self.out);
        self.out.push_str("</span><span class=\"metric-value\">");
        escape_html(formatted_value, &mut self.out);
        self.out.push_str("</span></div>");
    }

    fn render_table(&mut self, table: &BilledTable, highlight_column: &str, highlight_rule: HighlightRule) {
        let extras: Vec<String> = table.extra_columns().into_iter().map(str::to_string).collect();
        let mut columns: Vec<&str> = vec![ROOM_ID, ELECTRICITY_USAGE, WATER_USAGE];
        columns.extend(extras.iter().map(String::as_str));
        columns.extend([ELECTRICITY_COST, WATER_COST, TOTAL_BILL]);

        let highlight = highlighted_row(table, highlight_column, highlight_rule);

        self.out.push_str("<table class=\"billed\"><thead><tr><th></th>");
        for column in &columns {
            self.out.push_str("<th>");
            escape_html(column, &mut self.out);
            self.out.push_str("</th>");
        }
        self.out.push_str("</tr></thead><tbody>");

        for (idx, row) in table.iter().enumerate() {
            self.out.push_str(&format!("<tr><th>{idx}</th>"));
            for column in &columns {
                let class = (highlight == Some(idx) && *column == highlight_column).then_some("highlight");
                let text = match *column {
                    ROOM_ID => row.usage.room_id.clone(),
                    ELECTRICITY_USAGE | WATER_USAGE => numeric_cell(row, column).unwrap_or_default().to_string(),
                    ELECTRICITY_COST | WATER_COST | TOTAL_BILL => {
                        format_num::format_num!(",.2", numeric_cell(row, column).unwrap_or_default())
                    }
                    extra => row
                        .usage
                        .extras
                        .iter()
                        .find(|(name, _)| name == extra)
                        .map(|(_, value)| value.clone())
                        .unwrap_or_default(),
                };
                self.cell(&text, class);
            }
            self.out.push_str("</tr>");
        }
        self.out.push_str("</tbody></table>");
    }

    fn render_download(&mut self, label: &str, payload: &[u8], filename: &str) {
        self.out.push_str(&format!(
            "<a class=\"button download\" href=\"data:application/json;base64,{}\" download=\"{}\">📥 ",
            STANDARD.encode(payload),
            escaped(filename)
        ));
        escape_html(label, &mut self.out);
        self.out.push_str("</a>");
    }

    fn render_error(&mut self, message: &str) {
        self.out.push_str("<div class=\"alert error\" role=\"alert\">🚨 ");
        escape_html(message, &mut self.out);
        self.out.push_str("</div>");
    }

    fn render_info(&mut self, message: &str) {
        self.out.push_str("<div class=\"alert info\">");
        escape_html(message, &mut self.out);
        self.out.push_str("</div>");
    }
}
