//! In-memory transport replaying canned responses, for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use url::Url;

use crate::transport::{RawResponse, Transport, TransportError};
use crate::watch::StopHandle;

pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<Url>>,
    stop_when_exhausted: Option<StopHandle>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            stop_when_exhausted: None,
        }
    }

    /// Stop the watch loop once every scripted response has been served.
    pub(crate) fn stopping(mut self, handle: StopHandle) -> Self {
        self.stop_when_exhausted = Some(handle);
        self
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub(crate) fn fail(self, reason: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Connection(reason.to_string())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    /// `lastIndex` query values of every request issued so far.
    pub(crate) fn last_indexes(&self) -> Vec<Option<String>> {
        self.requests()
            .iter()
            .map(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == "lastIndex")
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &Url) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(url.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => {
                if let Some(handle) = &self.stop_when_exhausted {
                    handle.stop();
                }
                Err(TransportError::Connection("script exhausted".to_string()))
            }
        }
    }
}
