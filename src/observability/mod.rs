//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Watch loop / binder produce:
//!     → tracing events (structured fields, per-session span)
//!     → metrics.rs (poll outcomes, bind failures, notifications, cursor)
//!
//! Consumers:
//!     → Whatever subscriber / recorder the application installs
//!     → logging.rs offers the default subscriber used by the CLI
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder on its own
//! - Metric updates go through the `metrics` facade and are no-ops until a
//!   recorder exists

pub mod logging;
pub mod metrics;
