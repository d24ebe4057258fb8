//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Failed poll or bind in the watch loop:
//!     → retries.rs (RetryPolicy picks the delay for this failure streak)
//!     → backoff.rs (exponential delay with jitter, when configured)
//!     → StopSignal::sleep (delay, cut short by stop)
//! ```
//!
//! # Design Decisions
//! - Retries are unbounded; the loop only ends on an explicit stop
//! - The failure streak resets after every applied snapshot
//! - The success path never sleeps; the long poll is the backpressure

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
