//! `ureq`-backed [`Transport`] implementation.
//!
//! Thin JSON-over-HTTP glue against a single base URL (typically a localhost
//! development server). No client-side timeout is configured beyond the
//! agent's defaults; a hung request leaves the session's pending status
//! visible, which is the documented behavior.

use crate::transport::{Transport, TransportError};
use serde_json::Value;

/// HTTP transport speaking to the proofreading services.
pub struct HttpTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            agent: ureq::Agent::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        match self.agent.post(&self.url(path)).send_json(body.clone()) {
            Ok(response) => response
                .into_json::<Value>()
                .map_err(|err| TransportError::Payload(err.to_string())),
            Err(ureq::Error::Status(status, _)) => Err(TransportError::Http { status }),
            Err(err) => Err(TransportError::Network(err.to_string())),
        }
    }
}

impl Transport for HttpTransport {
    fn check(&mut self, body: &Value) -> Result<Value, TransportError> {
        self.post_json("/check", body)
    }

    fn llm(&mut self, body: &Value) -> Result<Value, TransportError> {
        self.post_json("/llm", body)
    }

    fn transcribe(&mut self, audio: &[u8], mime: &str) -> Result<Value, TransportError> {
        match self
            .agent
            .post(&self.url("/speech-to-text"))
            .set("Content-Type", mime)
            .send_bytes(audio)
        {
            Ok(response) => response
                .into_json::<Value>()
                .map_err(|err| TransportError::Payload(err.to_string())),
            Err(ureq::Error::Status(status, _)) => Err(TransportError::Http { status }),
            Err(err) => Err(TransportError::Network(err.to_string())),
        }
    }
}
