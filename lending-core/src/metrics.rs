//! Metrics collection for observability
//!
//! Counters live in a registry owned by [`Metrics`]; nothing is registered
//! globally, so each service instance carries its own.
//!
//! # Metrics
//!
//! - `lending_applications_created_total` - Applications that reached `QuotationsReceived`
//! - `lending_quotes_issued_total{decision}` - Lender quotes by accept/reject
//! - `lending_bids_confirmed_total{outcome}` - Confirmations by target status
//! - `lending_invocations_failed_total{operation,kind}` - Failed invocations

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Applications created
    pub applications_created: IntCounter,

    /// Quotes issued, by decision
    pub quotes_issued: IntCounterVec,

    /// Bids confirmed, by outcome
    pub bids_confirmed: IntCounterVec,

    /// Failed invocations, by operation and error kind
    pub invocations_failed: IntCounterVec,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let applications_created = IntCounter::new(
            "lending_applications_created_total",
            "Applications that received quotations",
        )?;
        registry.register(Box::new(applications_created.clone()))?;

        let quotes_issued = IntCounterVec::new(
            Opts::new("lending_quotes_issued_total", "Lender quotes issued"),
            &["decision"],
        )?;
        registry.register(Box::new(quotes_issued.clone()))?;

        let bids_confirmed = IntCounterVec::new(
            Opts::new("lending_bids_confirmed_total", "Bid confirmations applied"),
            &["outcome"],
        )?;
        registry.register(Box::new(bids_confirmed.clone()))?;

        let invocations_failed = IntCounterVec::new(
            Opts::new("lending_invocations_failed_total", "Invocations that failed"),
            &["operation", "kind"],
        )?;
        registry.register(Box::new(invocations_failed.clone()))?;

        Ok(Self {
            applications_created,
            quotes_issued,
            bids_confirmed,
            invocations_failed,
            registry,
        })
    }

    /// Record a created application and its quotes
    pub fn record_application_created(&self, accepted: usize, rejected: usize) {
        self.applications_created.inc();
        self.quotes_issued
            .with_label_values(&["accepted"])
            .inc_by(accepted as u64);
        self.quotes_issued
            .with_label_values(&["rejected"])
            .inc_by(rejected as u64);
    }

    /// Record an applied confirmation
    pub fn record_bid_confirmed(&self, outcome: &str) {
        self.bids_confirmed.with_label_values(&[outcome]).inc();
    }

    /// Record a failed invocation
    pub fn record_failure(&self, operation: &str, kind: &str) {
        self.invocations_failed
            .with_label_values(&[operation, kind])
            .inc();
    }

    /// Text exposition of all metrics
    pub fn encode_text(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("applications_created", &self.applications_created.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.applications_created.get(), 0);

        // Independent registries: a second instance does not collide
        let other = Metrics::new().unwrap();
        assert_eq!(other.applications_created.get(), 0);
    }

    #[test]
    fn test_record_application_created() {
        let metrics = Metrics::new().unwrap();
        metrics.record_application_created(3, 1);

        assert_eq!(metrics.applications_created.get(), 1);
        assert_eq!(metrics.quotes_issued.with_label_values(&["accepted"]).get(), 3);
        assert_eq!(metrics.quotes_issued.with_label_values(&["rejected"]).get(), 1);
    }

    #[test]
    fn test_encode_text() {
        let metrics = Metrics::new().unwrap();
        metrics.record_failure("confirm_bid", "unknown_bid");

        let text = metrics.encode_text().unwrap();
        assert!(text.contains("lending_invocations_failed_total"));
        assert!(text.contains("unknown_bid"));
    }
}
