use std::sync::Arc;

use billing_core::domain::{UsageRow, ELECTRICITY_USAGE, ROOM_ID, WATER_USAGE};
use billing_core::BillingError;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// A CSV file handed in through the bulk upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvUpload {
    pub filename: String,
    pub contents: Arc<[u8]>,
}

impl CsvUpload {
    pub fn new(filename: impl Into<String>, contents: impl Into<Arc<[u8]>>) -> Self {
        Self {
            filename: filename.into(),
            contents: contents.into(),
        }
    }
}

/// Usage rows read from an uploaded CSV blob.
///
/// Expected header columns (by name, case-sensitive):
/// - room_id
/// - electricity_usage
/// - water_usage
///
/// Any other column is kept as an extra on every row, in header order.
pub struct BulkCsvSource {
    upload: CsvUpload,
}

impl BulkCsvSource {
    pub fn new(upload: CsvUpload) -> Self {
        Self { upload }
    }
}

/// Where the required columns and the extras live in a header row.
struct Layout {
    room_id: usize,
    electricity_usage: usize,
    water_usage: usize,
    extras: Vec<(usize, String)>,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self, BillingError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = [ROOM_ID, ELECTRICITY_USAGE, WATER_USAGE]
            .into_iter()
            .filter(|name| position(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(BillingError::SchemaMismatch(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let room_id = position(ROOM_ID).unwrap_or_default();
        let electricity_usage = position(ELECTRICITY_USAGE).unwrap_or_default();
        let water_usage = position(WATER_USAGE).unwrap_or_default();

        // Repeated header names get a ".N" suffix so every extra stays addressable.
        let mut seen: Vec<&str> = Vec::new();
        let mut extras = Vec::new();
        for (idx, name) in headers.iter().enumerate() {
            let repeats = seen.iter().filter(|s| **s == name).count();
            seen.push(name);
            if [room_id, electricity_usage, water_usage].contains(&idx) {
                continue;
            }
            let name = if repeats == 0 {
                name.to_string()
            } else {
                format!("{name}.{repeats}")
            };
            extras.push((idx, name));
        }

        Ok(Self {
            room_id,
            electricity_usage,
            water_usage,
            extras,
        })
    }

    fn row(&self, record: &StringRecord, index: usize) -> Result<UsageRow, BillingError> {
        let cell = |idx: usize| record.get(idx).unwrap_or_default();

        Ok(UsageRow {
            room_id: cell(self.room_id).to_string(),
            electricity_usage: parse_usage(cell(self.electricity_usage), ELECTRICITY_USAGE, index)?,
            water_usage: parse_usage(cell(self.water_usage), WATER_USAGE, index)?,
            extras: self
                .extras
                .iter()
                .map(|(idx, name)| (name.clone(), cell(*idx).to_string()))
                .collect(),
        })
    }
}

/// Parses a usage cell. NaN and infinities count as non-numeric.
pub(crate) fn parse_usage(raw: &str, column: &str, row: usize) -> Result<f64, BillingError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(BillingError::SchemaMismatch(format!(
            "row {row}: '{column}' value '{raw}' is not a number"
        ))),
    }
}

fn rejected(e: BillingError) -> PipelineError {
    metrics::counter!("bulk_csv_parse_errors_total").increment(1);
    PipelineError::Billing(e)
}

#[async_trait::async_trait]
impl Source<UsageRow> for BulkCsvSource {
    async fn stream(&self) -> EnvelopeStream<UsageRow> {
        // The blob is already in memory, so the blocking csv reader is fine here.
        let upload = self.upload.clone();
        let s = async_stream::try_stream! {
            let mut rdr = ReaderBuilder::new()
                .has_headers(true)
                .trim(Trim::All)
                .from_reader(&upload.contents[..]);
            let headers = rdr
                .headers()
                .map_err(|e| rejected(BillingError::SchemaMismatch(format!(
                    "failed to read CSV headers of '{}': {e}", upload.filename
                ))))?
                .clone();
            let layout = Layout::from_headers(&headers).map_err(rejected)?;

            for (index, result) in rdr.records().enumerate() {
                let record = result.map_err(|e| rejected(BillingError::SchemaMismatch(format!(
                    "failed to read CSV record {index}: {e}"
                ))))?;
                let usage = layout.row(&record, index).map_err(rejected)?;

                yield Envelope { payload: usage, index };
            }
        };

        Box::pin(s)
    }
}
