//! Client library for the varconf remote configuration service.
//!
//! Fetches configuration snapshots over HTTP long-polling, binds tagged
//! values into caller-owned structs and notifies a listener for every
//! bound entry.
//!
//! ```no_run
//! use varconf_client::{bindable, Client, RetryPolicy, StopHandle};
//!
//! #[derive(Default)]
//! struct AppConfig {
//!     name: String,
//!     port: i32,
//! }
//!
//! bindable!(AppConfig { name => "app.name", port => "app.port" });
//!
//! # async fn demo() -> Result<(), varconf_client::ClientError> {
//! let client = Client::new("http://127.0.0.1:8088", "50:a68a0e61")?
//!     .with_listener(|key, value, ts| println!("{key} = {value} @ {ts}"));
//!
//! let mut config = AppConfig::default();
//! let stop = StopHandle::new();
//! client.watch(&mut config, RetryPolicy::fixed_secs(5), stop.signal()).await;
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod client;
pub mod config;
pub mod error;
pub mod listener;
pub mod observability;
pub mod resilience;
pub mod snapshot;
pub mod transport;
pub mod watch;

pub use binding::{bind, BindError, Bindable, Binding, ConfigField, FieldKind};
pub use client::Client;
pub use config::schema::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use listener::Listener;
pub use resilience::RetryPolicy;
pub use snapshot::{AppSnapshot, ConfigEntry, Dataset, DecodeError, KeySnapshot};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
pub use watch::{StopHandle, StopSignal, WatchReport};
