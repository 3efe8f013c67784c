//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ledger_gateway_requests_total` (counter): gateway requests by method, outcome
//! - `ledger_submissions_total` (counter): mutating calls by outcome
//! - `ledger_poll_attempts_total` (counter): status queries by outcome
//! - `ledger_confirmations_total` (counter): finished waits by terminal status
//!
//! Without an installed recorder these calls are no-ops.

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::ledger::types::TxStatus;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_gateway_request(method: &'static str, outcome: &'static str) {
    counter!("ledger_gateway_requests_total", "method" => method, "outcome" => outcome)
        .increment(1);
}

pub fn record_submission(outcome: &'static str) {
    counter!("ledger_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_poll_attempt(outcome: &'static str) {
    counter!("ledger_poll_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_confirmation(status: TxStatus) {
    counter!("ledger_confirmations_total", "status" => status.to_string()).increment(1);
}
