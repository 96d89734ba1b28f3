use billing_core::TariffField;

use crate::{
    presenter::html::{escape_html, escaped},
    session::{Mode, Session},
};

const STYLE: &str = r#"
html, body { font-size: 22px; background: #0e1117; color: #fafafa; font-family: sans-serif; margin: 0; }
h1 { font-size: 55px; margin: 0 0 24px; }
h2 { font-size: 45px; }
h3 { font-size: 35px; }
.layout { display: flex; min-height: 100vh; }
aside { width: 320px; padding: 24px; background: #262730; }
main { flex: 1; padding: 32px; }
label { display: block; margin-top: 16px; }
input { font-size: 22px; width: 100%; box-sizing: border-box; }
button, .button { font-size: 24px; margin-top: 16px; padding: 8px 16px; background: #ff4b4b; color: #fff; border: 0; border-radius: 6px; text-decoration: none; display: inline-block; cursor: pointer; }
nav a { font-size: 26px; margin-right: 24px; color: #fafafa; }
section { border-top: 1px solid #333; padding-top: 16px; margin-top: 24px; }
.chart { flex: 2; min-width: 420px; margin: 0; }
.metric-label { display: block; color: #aaa; }
.metric-value { display: block; font-size: 32px; }
.alert { padding: 16px; border-radius: 6px; margin: 16px 0; }
.alert.error { background: #3e1d1d; color: #ffb4b4; }
.alert.info { background: #1c2a3a; color: #a6d1ff; }
table.billed { border-collapse: collapse; margin-top: 24px; }
table.billed td, table.billed th { border: 1px solid #333; padding: 4px 12px; text-align: right; }
td.highlight { background: #ffff00; color: #000; }
svg .axis { stroke: #888; }
svg .tick { fill: #ccc; font-size: 14px; }
.muted { color: #888; }
"#;

fn tariff_label(field: TariffField) -> &'static str {
    match field {
        TariffField::ElectricityRate => "Electricity Rate (per unit)",
        TariffField::WaterRate => "Water Rate (per unit)",
        TariffField::WifiFee => "Fixed Wi-Fi Fee",
    }
}

fn sidebar(out: &mut String, session: &Session, tariff_errors: &[String]) {
    let tariff = session.read_tariff();
    out.push_str("<aside><h2>Tariff Settings</h2><form method=\"post\" action=\"/tariff\">");
    for field in TariffField::ALL {
        out.push_str(&format!(
            "<label>{}<input type=\"number\" name=\"{field}\" min=\"0\" step=\"any\" value=\"{}\"></label>",
            tariff_label(field),
            tariff.get(field)
        ));
    }
    out.push_str("<button type=\"submit\">Apply</button></form>");
    for err in tariff_errors {
        out.push_str("<div class=\"alert error\" role=\"alert\">");
        escape_html(err, out);
        out.push_str("</div>");
    }
    out.push_str(
        "<form method=\"post\" action=\"/session/reset\"><button type=\"submit\">End session</button></form></aside>",
    );
}

fn bulk_controls(out: &mut String, session: &Session) {
    out.push_str(
        "<form method=\"post\" action=\"/bulk#bulk\" enctype=\"multipart/form-data\">\
         <label>Upload CSV<input type=\"file\" name=\"file\" accept=\".csv,text/csv\"></label>\
         <button type=\"submit\">Upload</button></form>",
    );
    if let Some(upload) = session.bulk_upload() {
        out.push_str(&format!(
            "<p class=\"muted\">Current file: {}</p>\
             <form method=\"post\" action=\"/bulk/clear#bulk\"><button type=\"submit\">Clear</button></form>",
            escaped(&upload.filename)
        ));
    }
}

fn manual_controls(out: &mut String, session: &Session) {
    let (room_id, electricity, water) = session
        .manual_entry()
        .map(|e| (e.room_id.as_str(), e.electricity_usage.as_str(), e.water_usage.as_str()))
        .unwrap_or(("", "0.0", "0.0"));

    out.push_str(&format!(
        "<form method=\"post\" action=\"/manual#manual\">\
         <label>Room ID<input type=\"text\" name=\"room_id\" value=\"{}\"></label>\
         <label>Elec Usage<input type=\"number\" name=\"electricity_usage\" min=\"0\" step=\"any\" value=\"{}\"></label>\
         <label>Water Usage<input type=\"number\" name=\"water_usage\" min=\"0\" step=\"any\" value=\"{}\"></label>\
         <button type=\"submit\">Calculate Bill</button></form>",
        escaped(room_id),
        escaped(electricity),
        escaped(water)
    ));
}

/// Full dashboard page around the per-mode result regions.
pub(super) fn render(session: &Session, tariff_errors: &[String], regions: &[(Mode, String)]) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    out.push_str("<title>Hostel Utility Pro</title><style>");
    out.push_str(STYLE);
    out.push_str("</style></head><body><div class=\"layout\">");

    sidebar(&mut out, session, tariff_errors);

    out.push_str("<main><h1>🏢 Hostel Utility Management &amp; Analytics</h1><nav>");
    out.push_str("<a href=\"#bulk\">📤 Bulk CSV Upload</a><a href=\"#manual\">📝 Manual Entry</a></nav>");

    for (mode, region) in regions {
        out.push_str(&format!(
            "<section id=\"{}\"><h2>{}</h2>",
            mode.slug(),
            mode.title()
        ));
        match mode {
            Mode::Bulk => bulk_controls(&mut out, session),
            Mode::Manual => manual_controls(&mut out, session),
        }
        out.push_str(&format!("<div class=\"region\" id=\"{}-results\">", mode.slug()));
        out.push_str(region);
        out.push_str("</div></section>");
    }

    out.push_str("</main></div></body></html>");
    out
}
