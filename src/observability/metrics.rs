//! Metrics collection and exposition.
//!
//! # Metrics
//! - `log_it_requests_recorded_total` (counter): requests captured by the recorder
//! - `log_it_auth_attempts_total` (counter): authentication attempts by outcome
//! - `log_it_log_writes_failed_total` (counter): background writes that failed
//! - `log_it_records` (gauge): records held in memory
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request_logged() {
    metrics::counter!("log_it_requests_recorded_total").increment(1);
}

pub fn record_auth_attempt(outcome: &'static str) {
    metrics::counter!("log_it_auth_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_write_failure() {
    metrics::counter!("log_it_log_writes_failed_total").increment(1);
}

pub fn record_store_size(records: usize) {
    metrics::gauge!("log_it_records").set(records as f64);
}
