//! Change listener plumbing.
//!
//! Listeners run synchronously inside the binder, once per bound field and in
//! binding order. They have no error channel; a panicking listener unwinds
//! through the binder like any other caller code.

use std::sync::Arc;

use crate::observability::metrics;
use crate::snapshot::ConfigEntry;

/// Callback invoked with `(key, value, timestamp)` for every bound entry.
pub type Listener = Arc<dyn Fn(&str, &str, i64) + Send + Sync>;

/// Wrap a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&str, &str, i64) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn notify(listener: Option<&Listener>, entry: &ConfigEntry) {
    if let Some(listener) = listener {
        listener(&entry.key, &entry.value, entry.timestamp);
        metrics::record_notification();
    }
}
