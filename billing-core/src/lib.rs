pub mod billing;
pub mod domain;
pub mod error;

pub use billing::{compute_bills, export, parse_export, peak_index, peak_index_by, summarize, Report};
pub use domain::{BilledRow, BilledTable, Tariff, TariffField, UsageRow, UsageTable};
pub use error::BillingError;
