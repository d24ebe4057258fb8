//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → Client::from_config / RetryPolicy::from
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; url and token never change for a session
//! - All fields except url and token have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, ConfigError};
pub use schema::{ClientConfig, HttpConfig, ObservabilityConfig, RetryConfig, RetryStrategy};
