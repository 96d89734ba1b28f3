pub mod billing;

pub use billing::BillingSink;
