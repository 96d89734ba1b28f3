use billing_core::domain::{UsageRow, ELECTRICITY_USAGE, WATER_USAGE};
use futures::stream;
use serde::Deserialize;

use super::bulk_csv::parse_usage;
use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// The manual entry form as submitted. Usage fields stay text until the
/// source parses them, so bad input surfaces as a schema error in the pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManualEntry {
    pub room_id: String,
    pub electricity_usage: String,
    pub water_usage: String,
}

impl ManualEntry {
    pub fn new(room_id: impl Into<String>, electricity_usage: f64, water_usage: f64) -> Self {
        Self {
            room_id: room_id.into(),
            electricity_usage: electricity_usage.to_string(),
            water_usage: water_usage.to_string(),
        }
    }

    fn to_row(&self) -> Result<UsageRow, PipelineError> {
        Ok(UsageRow::new(
            self.room_id.trim(),
            parse_usage(&self.electricity_usage, ELECTRICITY_USAGE, 0)?,
            parse_usage(&self.water_usage, WATER_USAGE, 0)?,
        ))
    }
}

/// Single-row source for the most recent manual submission.
pub struct ManualEntrySource {
    entry: ManualEntry,
}

impl ManualEntrySource {
    pub fn new(entry: ManualEntry) -> Self {
        Self { entry }
    }
}

#[async_trait::async_trait]
impl Source<UsageRow> for ManualEntrySource {
    async fn stream(&self) -> EnvelopeStream<UsageRow> {
        let item = self.entry.to_row().map(|payload| Envelope { payload, index: 0 });
        Box::pin(stream::iter([item]))
    }
}
