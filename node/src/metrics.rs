//! Prometheus metrics for the estate node.
//!
//! Counters follow the notification stream, so a metric moves only when the
//! corresponding operation fully succeeded. The [`NodeMetrics`] struct owns a
//! dedicated [`Registry`] that callers can encode into the Prometheus text
//! exposition format.

use estate_types::EstateEvent;
use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub records_submitted: IntCounter,
    pub submission_votes: IntCounter,
    pub records_verified: IntCounter,
    pub submissions_rejected: IntCounter,
    pub valuations_proposed: IntCounter,
    pub valuation_votes: IntCounter,
    pub valuations_rejected: IntCounter,
    pub valuations_committed: IntCounter,
    /// Confirms that reached the registry commit and were refused there.
    pub confirm_failures: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub record_count: IntGauge,
    pub pending_proposals: IntGauge,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let counter = |name: &str, help: &str| {
            register_int_counter_with_registry!(Opts::new(name, help), registry)
                .expect("metric names are unique within a fresh registry")
        };
        let records_submitted = counter("estate_records_submitted_total", "Records submitted");
        let submission_votes = counter("estate_submission_votes_total", "Submission votes counted");
        let records_verified = counter("estate_records_verified_total", "Records verified");
        let submissions_rejected =
            counter("estate_submissions_rejected_total", "Submissions rejected");
        let valuations_proposed =
            counter("estate_valuations_proposed_total", "Valuation proposals submitted");
        let valuation_votes = counter("estate_valuation_votes_total", "Valuation votes counted");
        let valuations_rejected =
            counter("estate_valuations_rejected_total", "Valuation proposals rejected");
        let valuations_committed =
            counter("estate_valuations_committed_total", "Valuations committed");
        let confirm_failures = counter(
            "estate_confirm_failures_total",
            "Confirms refused by the registry commit",
        );

        let gauge = |name: &str, help: &str| {
            register_int_gauge_with_registry!(Opts::new(name, help), registry)
                .expect("metric names are unique within a fresh registry")
        };
        let record_count = gauge("estate_record_count", "Records in the registry");
        let pending_proposals = gauge("estate_pending_proposals", "Live valuation proposals");

        Self {
            registry,
            records_submitted,
            submission_votes,
            records_verified,
            submissions_rejected,
            valuations_proposed,
            valuation_votes,
            valuations_rejected,
            valuations_committed,
            confirm_failures,
            record_count,
            pending_proposals,
        }
    }

    /// Bump the counter matching a published event.
    pub fn observe(&self, event: &EstateEvent) {
        let counter = match event {
            EstateEvent::RecordSubmitted { .. } => &self.records_submitted,
            EstateEvent::SubmissionVoteCast { .. } => &self.submission_votes,
            EstateEvent::RecordVerified { .. } => &self.records_verified,
            EstateEvent::SubmissionRejected { .. } => &self.submissions_rejected,
            EstateEvent::ValuationProposed { .. } => &self.valuations_proposed,
            EstateEvent::ValuationVoteCast { .. } => &self.valuation_votes,
            EstateEvent::ValuationRejected { .. } => &self.valuations_rejected,
            EstateEvent::ValuationCommitted { .. } => &self.valuations_committed,
            _ => return,
        };
        counter.inc();
    }

    /// Text exposition of every metric.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
