pub mod engine;
pub mod export;
pub mod summary;

pub use engine::compute_bills;
pub use export::{export, parse_export};
pub use summary::{peak_index, peak_index_by, summarize, Report};
