//! Long-poll watch loop.
//!
//! # Data Flow
//! ```text
//! loop (until StopSignal fires)
//!     → Client::get_app_config(longPull, lastIndex)
//!     → binder (exclusive &mut target, or clone-and-publish into ArcSwap)
//!     → success: lastIndex = recentIndex, poll again immediately
//!     → failure: log, sleep RetryPolicy::delay, poll the same generation again
//! ```
//!
//! # Design Decisions
//! - Stop is cooperative: checked at the top of every iteration and during
//!   retry sleeps, never in the middle of a request
//! - `lastIndex` only advances after a successful bind
//! - No error is fatal to the loop

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::binding::{self, BindError, Bindable};
use crate::client::Client;
use crate::listener::Listener;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::snapshot::Dataset;
use crate::transport::Transport;

pub mod stop;

pub use stop::{StopHandle, StopSignal};

/// Summary of a finished watch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchReport {
    /// Cursor after the last successfully applied snapshot.
    pub last_index: u64,
    pub snapshots_applied: u64,
    /// Failed iterations (transport, request, decode or bind).
    pub failures: u64,
}

/// Where a decoded dataset ends up.
trait SnapshotSink {
    fn apply(&mut self, dataset: Option<&Dataset>, listener: Option<&Listener>) -> Result<usize, BindError>;
}

struct Exclusive<'a, B: ?Sized>(&'a mut B);

impl<B: Bindable + ?Sized> SnapshotSink for Exclusive<'_, B> {
    fn apply(&mut self, dataset: Option<&Dataset>, listener: Option<&Listener>) -> Result<usize, BindError> {
        binding::bind(&mut *self.0, dataset, listener)
    }
}

struct Shared<'a, B>(&'a ArcSwap<B>);

impl<B: Bindable + Clone> SnapshotSink for Shared<'_, B> {
    fn apply(&mut self, dataset: Option<&Dataset>, listener: Option<&Listener>) -> Result<usize, BindError> {
        let mut next = (**self.0.load()).clone();
        let applied = binding::bind(&mut next, dataset, listener)?;
        self.0.store(Arc::new(next));
        Ok(applied)
    }
}

impl<T: Transport> Client<T> {
    /// Keep `target` in sync with the service until `stop` fires.
    ///
    /// The target is borrowed exclusively for the whole run. Use
    /// [`Client::watch_shared`] when other tasks need to read it meanwhile.
    pub async fn watch<B>(&self, target: &mut B, retry: RetryPolicy, stop: StopSignal) -> WatchReport
    where
        B: Bindable + Send + ?Sized,
    {
        self.run_watch(Exclusive(target), retry, stop).await
    }

    /// Like [`Client::watch`], but binds into a clone of the current value
    /// and publishes it only if the whole bind succeeded.
    pub async fn watch_shared<B>(&self, target: &ArcSwap<B>, retry: RetryPolicy, stop: StopSignal) -> WatchReport
    where
        B: Bindable + Clone + Send + Sync,
    {
        self.run_watch(Shared(target), retry, stop).await
    }

    /// Run [`Client::watch_shared`] as a background task.
    pub fn spawn_watch<B>(
        self: Arc<Self>,
        target: Arc<ArcSwap<B>>,
        retry: RetryPolicy,
        stop: StopSignal,
    ) -> JoinHandle<WatchReport>
    where
        T: 'static,
        B: Bindable + Clone + Send + Sync + 'static,
    {
        tokio::spawn(async move { self.watch_shared(&target, retry, stop).await })
    }

    async fn run_watch<S: SnapshotSink + Send>(
        &self,
        mut sink: S,
        retry: RetryPolicy,
        mut stop: StopSignal,
    ) -> WatchReport {
        let span = tracing::info_span!("varconf_watch", session = %Uuid::new_v4());

        async move {
            let mut report = WatchReport::default();
            let mut streak: u32 = 0;

            tracing::info!(url = %self.base_url(), ?retry, "Watch loop starting");

            loop {
                if stop.is_stopped() {
                    break;
                }

                let outcome = match self.get_app_config(true, report.last_index).await {
                    Ok(snapshot) => {
                        metrics::record_poll("ok");
                        sink.apply(snapshot.data.as_ref(), self.listener())
                            .map(|applied| (snapshot.recent_index, applied))
                            .map_err(|e| {
                                metrics::record_bind_failure();
                                tracing::warn!(error = %e, last_index = report.last_index, "Failed to bind snapshot");
                            })
                    }
                    Err(e) => {
                        metrics::record_poll(e.outcome());
                        tracing::warn!(error = %e, last_index = report.last_index, "Long poll failed");
                        Err(())
                    }
                };

                match outcome {
                    Ok((recent_index, applied)) => {
                        streak = 0;
                        report.last_index = recent_index;
                        report.snapshots_applied += 1;
                        metrics::record_last_index(recent_index);
                        tracing::debug!(last_index = recent_index, applied, "Snapshot applied");
                    }
                    Err(()) => {
                        streak = streak.saturating_add(1);
                        report.failures += 1;
                        let delay = retry.delay(streak);
                        tracing::debug!(delay_ms = delay.as_millis() as u64, attempt = streak, "Retrying after delay");
                        if !stop.sleep(delay).await {
                            break;
                        }
                    }
                }
            }

            tracing::info!(
                last_index = report.last_index,
                applied = report.snapshots_applied,
                failures = report.failures,
                "Watch loop stopped"
            );
            report
        }
        .instrument(span)
        .await
    }
}
