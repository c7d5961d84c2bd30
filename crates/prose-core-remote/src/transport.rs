//! The transport port.
//!
//! The engine never talks to the network directly: it goes through the
//! [`Transport`] trait so the whole pipeline is testable with a scripted
//! implementation. The production implementation is
//! [`HttpTransport`](crate::http::HttpTransport).

use serde_json::Value;
use thiserror::Error;

/// Errors produced at the transport boundary.
///
/// These never propagate past the component that issued the call; the session
/// converts them into status values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Http {
        /// The HTTP status code.
        status: u16,
    },
    /// The request never completed (connect/transfer failure).
    #[error("network error: {0}")]
    Network(String),
    /// The response body could not be decoded as JSON.
    #[error("malformed payload: {0}")]
    Payload(String),
}

/// Blocking transport to the remote proofreading services.
///
/// Implementations run on the remote client's worker thread, so blocking
/// calls are fine; the session itself never blocks on them.
pub trait Transport: Send {
    /// `POST /check` with a JSON body; returns the raw suggestion array.
    fn check(&mut self, body: &Value) -> Result<Value, TransportError>;

    /// `POST /llm` with a JSON body (step 1 or 2); returns the raw payload.
    fn llm(&mut self, body: &Value) -> Result<Value, TransportError>;

    /// `POST /speech-to-text` with an audio body; returns the raw payload.
    fn transcribe(&mut self, audio: &[u8], mime: &str) -> Result<Value, TransportError>;
}
