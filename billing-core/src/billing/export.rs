//! JSON report export.
//!
//! A report is an array of flat objects, one per billed room, pretty-printed
//! with four-space indentation. Keys follow the row schema: `room_id`,
//! `electricity_usage`, `water_usage`, any extra input columns in input
//! order, then `Electricity Cost`, `Water Cost` and `Total Bill`.

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};

use crate::domain::{BilledRow, BilledTable, UsageRow};
use crate::domain::{ELECTRICITY_COST, ELECTRICITY_USAGE, ROOM_ID, TOTAL_BILL, WATER_COST, WATER_USAGE};
use crate::error::BillingError;

const INDENT: &[u8] = b"    ";

fn to_record(row: &BilledRow) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert(ROOM_ID.to_string(), Value::from(row.usage.room_id.as_str()));
    record.insert(ELECTRICITY_USAGE.to_string(), Value::from(row.usage.electricity_usage));
    record.insert(WATER_USAGE.to_string(), Value::from(row.usage.water_usage));
    for (name, value) in &row.usage.extras {
        record.insert(name.clone(), Value::from(value.as_str()));
    }
    record.insert(ELECTRICITY_COST.to_string(), Value::from(row.electricity_cost));
    record.insert(WATER_COST.to_string(), Value::from(row.water_cost));
    record.insert(TOTAL_BILL.to_string(), Value::from(row.total_bill));
    record
}

/// Serializes `billed` into the downloadable report body.
pub fn export(billed: &BilledTable) -> Result<Vec<u8>, serde_json::Error> {
    let records: Vec<Map<String, Value>> = billed.iter().map(to_record).collect();

    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;
    Ok(out)
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(record: &Map<String, Value>, idx: usize, key: &str) -> Result<f64, BillingError> {
    record
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| BillingError::SchemaMismatch(format!("record {idx}: '{key}' is missing or not a number")))
}

fn from_record(idx: usize, record: &Map<String, Value>) -> Result<BilledRow, BillingError> {
    let room_id = record
        .get(ROOM_ID)
        .map(text)
        .ok_or_else(|| BillingError::SchemaMismatch(format!("record {idx}: '{ROOM_ID}' is missing")))?;

    let extras = record
        .iter()
        .filter(|(key, _)| {
            ![ROOM_ID, ELECTRICITY_USAGE, WATER_USAGE, ELECTRICITY_COST, WATER_COST, TOTAL_BILL]
                .contains(&key.as_str())
        })
        .map(|(key, value)| (key.clone(), text(value)))
        .collect();

    Ok(BilledRow {
        usage: UsageRow {
            room_id,
            electricity_usage: number(record, idx, ELECTRICITY_USAGE)?,
            water_usage: number(record, idx, WATER_USAGE)?,
            extras,
        },
        electricity_cost: number(record, idx, ELECTRICITY_COST)?,
        water_cost: number(record, idx, WATER_COST)?,
        total_bill: number(record, idx, TOTAL_BILL)?,
    })
}

/// Reads a report produced by [`export`] back into a table.
pub fn parse_export(bytes: &[u8]) -> Result<BilledTable, BillingError> {
    let records: Vec<Map<String, Value>> = serde_json::from_slice(bytes)
        .map_err(|e| BillingError::SchemaMismatch(format!("invalid report JSON: {e}")))?;

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| from_record(idx, record))
        .collect()
}
