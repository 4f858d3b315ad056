//! Prometheus metrics, structured logging and visualizer output for the quoter.
//!
//! - `init_logging`: tracing subscriber on stderr (JSON in production)
//! - `Metrics`: prometheus counters/gauges, also usable as a `DiagnosticsSink`
//! - `TickLogger`: one compact JSON line per tick for the visualizer
//! - `RunSummary`: per-instrument totals read back from the counters

pub mod error;
pub mod logging;
pub mod metrics;
pub mod summary;
pub mod tick_logger;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
pub use summary::{InstrumentSummary, RunSummary};
pub use tick_logger::{TickLogger, DEFAULT_MAX_LOG_LENGTH};
