pub mod bulk_csv;
pub mod manual_entry;

pub use bulk_csv::{BulkCsvSource, CsvUpload};
pub use manual_entry::{ManualEntry, ManualEntrySource};
