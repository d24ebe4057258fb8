//! Client session for the configuration service.
//!
//! # Responsibilities
//! - Hold the service URL, access token, listener and transport
//! - Build endpoint URLs (`/api/config`, `/api/config/{key}`)
//! - One-shot queries that surface every error to the caller
//!
//! The long-running watch loop lives in [`crate::watch`].

use url::Url;

use crate::binding::{self, BindError, Bindable};
use crate::config::schema::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::listener::{self, Listener};
use crate::snapshot::{self, AppSnapshot, KeySnapshot};
use crate::transport::{HttpTransport, Transport};

/// A session against one application's configuration.
pub struct Client<T = HttpTransport> {
    base_url: Url,
    token: String,
    transport: T,
    listener: Option<Listener>,
}

impl Client<HttpTransport> {
    /// Create a client using a default reqwest transport.
    ///
    /// ```no_run
    /// # async fn demo() -> Result<(), varconf_client::ClientError> {
    /// let client = varconf_client::Client::new("http://127.0.0.1:8088", "50:a68a0e61")?;
    /// let snapshot = client.get_app_config(false, 0).await?;
    /// println!("index {}", snapshot.recent_index);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(url: &str, token: &str) -> ClientResult<Self> {
        Self::with_transport(url, token, HttpTransport::default())
    }

    /// Create a client from a loaded configuration file.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::from_config(&config.http)?;
        Self::with_transport(&config.url, &config.token, transport)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(url: &str, token: &str, transport: T) -> ClientResult<Self> {
        let base_url = Url::parse(url).map_err(|e| ClientError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: url.to_string(),
                reason: "URL cannot carry API paths".to_string(),
            });
        }

        Ok(Self {
            base_url,
            token: token.to_string(),
            transport,
            listener: None,
        })
    }

    /// Register a listener, replacing any previous one.
    pub fn with_listener<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, i64) + Send + Sync + 'static,
    {
        self.set_listener(f);
        self
    }

    pub fn set_listener<F>(&mut self, f: F)
    where
        F: Fn(&str, &str, i64) + Send + Sync + 'static,
    {
        self.listener = Some(listener::listener(f));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn listener(&self) -> Option<&Listener> {
        self.listener.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of the multi-entry endpoint; `long_poll` carries the last seen index.
    pub fn app_url(&self, long_poll: Option<u64>) -> ClientResult<Url> {
        self.endpoint(None, long_poll)
    }

    /// URL of the single-entry endpoint for `key`.
    pub fn key_url(&self, key: &str, long_poll: Option<u64>) -> ClientResult<Url> {
        self.endpoint(Some(key), long_poll)
    }

    fn endpoint(&self, key: Option<&str>, long_poll: Option<u64>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry API paths".to_string(),
            })?;
            segments.pop_if_empty().push("api").push("config");
            if let Some(key) = key {
                segments.push(key);
            }
        }

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", &self.token);
            if let Some(last_index) = long_poll {
                query
                    .append_pair("longPull", "true")
                    .append_pair("lastIndex", &last_index.to_string());
            }
        }
        Ok(url)
    }

    /// Fetch `url` and return the body of a 200 response.
    async fn fetch_ok(&self, url: &Url) -> ClientResult<Vec<u8>> {
        let response = self.transport.fetch(url).await?;
        if !response.is_ok() {
            return Err(ClientError::Request(response.status));
        }
        Ok(response.body)
    }

    /// Pull every configuration entry of the application.
    ///
    /// With `long_pull` the server holds the request until something changed
    /// after `last_index` (or its own timeout elapses).
    pub async fn get_app_config(&self, long_pull: bool, last_index: u64) -> ClientResult<AppSnapshot> {
        let url = self.app_url(long_pull.then_some(last_index))?;
        let body = self.fetch_ok(&url).await?;
        Ok(snapshot::decode_app(&body)?)
    }

    /// Pull a single configuration entry.
    pub async fn get_key_config(
        &self,
        key: &str,
        long_pull: bool,
        last_index: u64,
    ) -> ClientResult<KeySnapshot> {
        let url = self.key_url(key, long_pull.then_some(last_index))?;
        let body = self.fetch_ok(&url).await?;
        Ok(snapshot::decode_key(&body)?)
    }

    /// Bind an already fetched snapshot into `target`, notifying the listener.
    pub fn bind<B>(&self, target: &mut B, snapshot: &AppSnapshot) -> Result<usize, BindError>
    where
        B: Bindable + ?Sized,
    {
        binding::bind(target, snapshot.data.as_ref(), self.listener())
    }

    /// Fetch the current configuration once and bind it into `target`.
    ///
    /// Returns the snapshot's `recentIndex`, suitable as the starting point
    /// of a later long poll.
    pub async fn load<B>(&self, target: &mut B) -> ClientResult<u64>
    where
        B: Bindable + ?Sized,
    {
        let snapshot = self.get_app_config(false, 0).await?;
        self.bind(target, &snapshot)?;
        Ok(snapshot.recent_index)
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    fn scripted(url: &str, transport: ScriptedTransport) -> Client<ScriptedTransport> {
        Client::with_transport(url, "50:tok en", transport).unwrap()
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            Client::new("not a url", "t"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            Client::new("mailto:ops@example.com", "t"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_urls() {
        let client = scripted("http://127.0.0.1:8088", ScriptedTransport::new());

        assert_eq!(
            client.app_url(None).unwrap().as_str(),
            "http://127.0.0.1:8088/api/config?token=50%3Atok+en"
        );
        assert_eq!(
            client.app_url(Some(7)).unwrap().as_str(),
            "http://127.0.0.1:8088/api/config?token=50%3Atok+en&longPull=true&lastIndex=7"
        );
        assert_eq!(
            client.key_url("db/host", Some(0)).unwrap().as_str(),
            "http://127.0.0.1:8088/api/config/db%2Fhost?token=50%3Atok+en&longPull=true&lastIndex=0"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = scripted("https://conf.example.com/varconf/?stale=1", ScriptedTransport::new());
        assert_eq!(
            client.app_url(None).unwrap().as_str(),
            "https://conf.example.com/varconf/api/config?token=50%3Atok+en"
        );
    }

    #[tokio::test]
    async fn test_get_app_config() {
        let transport = ScriptedTransport::new().respond(
            200,
            r#"{"data": {"a": {"key": "a", "value": "1", "timestamp": 3}}, "recentIndex": 4}"#,
        );
        let client = scripted("http://svc", transport);

        let snapshot = client.get_app_config(true, 2).await.unwrap();
        assert_eq!(snapshot.recent_index, 4);
        assert_eq!(client.transport().last_indexes(), vec![Some("2".to_string())]);
    }

    #[tokio::test]
    async fn test_get_key_config() {
        let transport = ScriptedTransport::new()
            .respond(200, r#"{"data": {"key": "a", "value": "1", "timestamp": 3}, "recentIndex": 4}"#);
        let client = scripted("http://svc", transport);

        let snapshot = client.get_key_config("a", false, 0).await.unwrap();
        assert_eq!(snapshot.data.unwrap().value, "1");

        let requested = &client.transport().requests()[0];
        assert_eq!(requested.path(), "/api/config/a");
        assert_eq!(client.transport().last_indexes(), vec![None]);
    }

    #[tokio::test]
    async fn test_one_shot_errors_surface() {
        let transport = ScriptedTransport::new()
            .respond(403, "forbidden")
            .respond(200, "{ not json")
            .fail("connection refused");
        let client = scripted("http://svc", transport);

        assert!(matches!(
            client.get_app_config(false, 0).await,
            Err(ClientError::Request(403))
        ));
        assert!(matches!(
            client.get_key_config("k", false, 0).await,
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(
            client.get_app_config(false, 0).await,
            Err(ClientError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_load_binds_and_notifies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let transport = ScriptedTransport::new().respond(
            200,
            r#"{"data": {"a": {"key": "a", "value": "1", "timestamp": 3}}, "recentIndex": 9}"#,
        );
        let client = scripted("http://svc", transport)
            .with_listener(move |k, _, _| sink.lock().unwrap().push(k.to_string()));

        let mut target = BTreeMap::from([("a".to_string(), String::new())]);
        assert_eq!(client.load(&mut target).await.unwrap(), 9);
        assert_eq!(target["a"], "1");
        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_load_without_dataset_fails() {
        let transport = ScriptedTransport::new().respond(200, r#"{"data": null, "recentIndex": 1}"#);
        let client = scripted("http://svc", transport);

        let mut target = BTreeMap::<String, String>::new();
        assert!(matches!(
            client.load(&mut target).await,
            Err(ClientError::Bind(BindError::MissingDataset))
        ));
    }
}
