//! Observability: split telemetry and sink abstractions.
//!
//! Structured logs go through `tracing`; counters go through a `MetricsSink`
//! installed on the `QuerySplitter`.

pub(crate) mod sink;

// re-exports
pub use sink::{CountingSink, MetricsEvent, MetricsReport, MetricsSink, NoopSink};
