//! reqwest-backed transport.

use std::time::Duration;

use url::Url;

use crate::config::schema::HttpConfig;
use crate::transport::{RawResponse, Transport, TransportError};

/// Production transport wrapping a pooled [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Wrap an existing reqwest client (TLS, proxies and pooling are its concern).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport from configuration.
    ///
    /// Only a connect timeout may be set; a request timeout would cut long
    /// polls short.
    pub fn from_config(config: &HttpConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::trace!(%url, status, bytes = body.len(), "Response received");
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
