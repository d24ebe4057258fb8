//! Client metrics.
//!
//! # Metrics
//! - `varconf_polls_total` (counter): long polls by `outcome`
//! - `varconf_bind_failures_total` (counter): snapshots rejected by the binder
//! - `varconf_listener_notifications_total` (counter): listener invocations
//! - `varconf_last_index` (gauge): cursor after the last applied snapshot

pub fn record_poll(outcome: &'static str) {
    ::metrics::counter!("varconf_polls_total", "outcome" => outcome).increment(1);
}

pub fn record_bind_failure() {
    ::metrics::counter!("varconf_bind_failures_total").increment(1);
}

pub fn record_notification() {
    ::metrics::counter!("varconf_listener_notifications_total").increment(1);
}

pub fn record_last_index(index: u64) {
    ::metrics::gauge!("varconf_last_index").set(index as f64);
}
