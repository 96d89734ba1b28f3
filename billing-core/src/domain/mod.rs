pub mod billed_row;
pub mod tariff;
pub mod usage_row;

pub use billed_row::{BilledRow, BilledTable, ELECTRICITY_COST, TOTAL_BILL, WATER_COST};
pub use tariff::{Tariff, TariffField};
pub use usage_row::{UsageRow, UsageTable, ELECTRICITY_USAGE, ROOM_ID, WATER_USAGE};
