use billing_core::domain::{UsageRow, UsageTable, ELECTRICITY_USAGE, WATER_USAGE};
use billing_core::BillingError;

use crate::pipeline::{Envelope, PipelineError, Transform};

/// Pure validation of one `UsageRow` at position `index`.
///
/// Rules:
/// - electricity and water usage must be non-negative.
/// - usage must be a finite number; NaN reads as non-numeric.
pub fn validate_row(index: usize, row: &UsageRow) -> Result<(), BillingError> {
    for (column, value) in [
        (ELECTRICITY_USAGE, row.electricity_usage),
        (WATER_USAGE, row.water_usage),
    ] {
        if !value.is_finite() {
            return Err(BillingError::SchemaMismatch(format!(
                "row {index}: '{column}' is not a number"
            )));
        }
        if value < 0.0 {
            return Err(BillingError::NegativeUsage {
                row: index,
                room_id: row.room_id.clone(),
                column,
                value,
            });
        }
    }
    Ok(())
}

/// Validates a whole table, reporting the first offending row.
pub fn validate(table: &UsageTable) -> Result<(), BillingError> {
    table
        .iter()
        .enumerate()
        .try_for_each(|(index, row)| validate_row(index, row))
}

#[derive(Clone, Default)]
pub struct UsageValidation;

#[async_trait::async_trait]
impl Transform<UsageRow, UsageRow> for UsageValidation {
    async fn apply(&self, input: Envelope<UsageRow>) -> Result<Envelope<UsageRow>, PipelineError> {
        match validate_row(input.index, &input.payload) {
            Ok(()) => Ok(input),
            Err(e) => {
                metrics::counter!("validation_usage_rejected_total").increment(1);
                Err(e.into())
            }
        }
    }
}
