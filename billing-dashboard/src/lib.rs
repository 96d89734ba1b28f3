pub mod config;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod presenter;
pub mod server;
pub mod session;
pub mod sinks;
pub mod sources;
pub mod transform;

pub use pipeline::{Envelope, Pipeline, PipelineError};
pub use session::{Mode, PassOutcome, Session};
