pub mod config;
pub mod ingestor;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod sinks;
pub mod sources;
pub mod transform;
pub mod trigger;

pub use ingestor::{FailurePolicy, ForecastIngestor};
pub use pipeline::{Envelope, IngestError};
