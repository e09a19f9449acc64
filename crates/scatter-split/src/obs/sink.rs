//! Metrics sink boundary.
//!
//! Split logic MUST NOT keep counters itself.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ScatterIssued { limit: usize },
    SampleReceived { samples: usize },
    SplitsEmitted { requested: usize, realized: usize },
    SplitRejected,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// NoopSink
/// Default sink; drops every event.

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _: MetricsEvent) {}
}

///
/// CountingSink
///
/// Process-local counters, safe to share across concurrent split calls.
///

#[derive(Debug, Default)]
pub struct CountingSink {
    scatter_queries: AtomicU64,
    samples: AtomicU64,
    split_calls: AtomicU64,
    splits_requested: AtomicU64,
    splits_realized: AtomicU64,
    unsplit_fallbacks: AtomicU64,
    rejected: AtomicU64,
}

impl CountingSink {
    #[must_use]
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            scatter_queries: self.scatter_queries.load(Ordering::Relaxed),
            samples: self.samples.load(Ordering::Relaxed),
            split_calls: self.split_calls.load(Ordering::Relaxed),
            splits_requested: self.splits_requested.load(Ordering::Relaxed),
            splits_realized: self.splits_realized.load(Ordering::Relaxed),
            unsplit_fallbacks: self.unsplit_fallbacks.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.scatter_queries,
            &self.samples,
            &self.split_calls,
            &self.splits_requested,
            &self.splits_realized,
            &self.unsplit_fallbacks,
            &self.rejected,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl MetricsSink for CountingSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ScatterIssued { .. } => {
                self.scatter_queries.fetch_add(1, Ordering::Relaxed);
            }
            MetricsEvent::SampleReceived { samples } => {
                self.samples.fetch_add(as_u64(samples), Ordering::Relaxed);
            }
            MetricsEvent::SplitsEmitted {
                requested,
                realized,
            } => {
                self.split_calls.fetch_add(1, Ordering::Relaxed);
                self.splits_requested
                    .fetch_add(as_u64(requested), Ordering::Relaxed);
                self.splits_realized
                    .fetch_add(as_u64(realized), Ordering::Relaxed);
                if realized == 1 {
                    self.unsplit_fallbacks.fetch_add(1, Ordering::Relaxed);
                }
            }
            MetricsEvent::SplitRejected => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

fn as_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

///
/// MetricsReport
///
/// Point-in-time snapshot of a `CountingSink`.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MetricsReport {
    pub scatter_queries: u64,
    pub samples: u64,
    pub split_calls: u64,
    pub splits_requested: u64,
    pub splits_realized: u64,
    pub unsplit_fallbacks: u64,
    pub rejected: u64,
}
