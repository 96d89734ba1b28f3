use crate::domain::TariffField;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("negative {column} ({value}) for room '{room_id}' in row {row}")]
    NegativeUsage {
        row: usize,
        room_id: String,
        column: &'static str,
        value: f64,
    },
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("invalid tariff: {field} must be a non-negative number, got {value}")]
    InvalidTariff { field: TariffField, value: f64 },
    #[error("bill for room '{room_id}' in row {row} is out of range ({column} = {value})")]
    NonFiniteBill {
        row: usize,
        room_id: String,
        column: &'static str,
        value: f64,
    },
}
