//! Cooperative stop coordination for watch loops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Owner side of a stop signal.
///
/// Cloning the handle shares the same signal; any clone may stop every loop
/// subscribed to it. Dropping all handles does not stop anything.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Create a new, not yet stopped, handle.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe a loop to this handle.
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Request a stop. Loops observe it at their next iteration boundary or
    /// immediately if they are sleeping.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Loop side of a stop signal.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Sleep for `delay` unless a stop arrives first.
    ///
    /// Returns `true` if the full delay elapsed and `false` if the loop
    /// should exit.
    pub async fn sleep(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        let stopped = tokio::select! {
            _ = &mut sleep => return true,
            res = self.rx.wait_for(|stopped| *stopped) => res.is_ok(),
        };
        if stopped {
            return false;
        }

        // Every handle is gone, so no stop can arrive any more.
        sleep.await;
        true
    }
}
