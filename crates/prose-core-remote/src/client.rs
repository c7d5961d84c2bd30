//! Background remote client.
//!
//! The session runs on the host's event loop and must never block on the
//! network, so requests are shipped to a worker thread over channels and the
//! results are drained non-blockingly with [`RemoteClient::try_recv`].
//! In-flight requests are never cancelled; when a result arrives for a
//! superseded request, the session drops it by id/generation comparison.

use crate::transport::{Transport, TransportError};
use serde_json::Value;
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

/// An operation submitted to the worker thread.
#[derive(Debug)]
pub enum RemoteOp {
    /// `POST /check`.
    Check {
        /// JSON request body.
        body: Value,
    },
    /// `POST /llm`, step 1.
    Evaluate {
        /// JSON request body.
        body: Value,
    },
    /// `POST /llm`, step 2.
    Rewrite {
        /// JSON request body.
        body: Value,
    },
    /// `POST /speech-to-text`.
    Transcribe {
        /// Encoded audio bytes.
        audio: Vec<u8>,
        /// MIME type of the audio payload.
        mime: String,
    },
}

impl RemoteOp {
    fn kind(&self) -> RemoteOpKind {
        match self {
            Self::Check { .. } => RemoteOpKind::Check,
            Self::Evaluate { .. } => RemoteOpKind::Evaluate,
            Self::Rewrite { .. } => RemoteOpKind::Rewrite,
            Self::Transcribe { .. } => RemoteOpKind::Transcribe,
        }
    }
}

/// Which kind of operation a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOpKind {
    /// A check request.
    Check,
    /// A step-1 review request.
    Evaluate,
    /// A step-2 review request.
    Rewrite,
    /// A speech-to-text upload.
    Transcribe,
}

/// A completed operation delivered back to the session.
#[derive(Debug)]
pub struct RemoteInbound {
    /// Request id allocated by [`RemoteClient::submit`].
    pub id: u64,
    /// Which operation kind this result belongs to.
    pub kind: RemoteOpKind,
    /// The raw payload, or the transport failure.
    pub result: Result<Value, TransportError>,
}

/// The worker thread stopped (its transport panicked or the channel closed).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("remote worker thread stopped")]
pub struct RemoteClientError;

struct RemoteRequest {
    id: u64,
    op: RemoteOp,
}

/// Channel-based client running a [`Transport`] on a background thread.
pub struct RemoteClient {
    tx: mpsc::Sender<RemoteRequest>,
    rx: mpsc::Receiver<RemoteInbound>,
    next_id: u64,
}

impl RemoteClient {
    /// Spawn the worker thread around `transport`.
    pub fn spawn(transport: impl Transport + 'static) -> Self {
        let (tx_out, rx_out) = mpsc::channel::<RemoteRequest>();
        let (tx_in, rx_in) = mpsc::channel::<RemoteInbound>();
        thread::spawn(move || remote_worker_loop(transport, rx_out, tx_in));
        Self {
            tx: tx_out,
            rx: rx_in,
            next_id: 1,
        }
    }

    /// Submit an operation; returns the allocated request id.
    pub fn submit(&mut self, op: RemoteOp) -> Result<u64, RemoteClientError> {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.tx
            .send(RemoteRequest { id, op })
            .map_err(|_| RemoteClientError)?;
        Ok(id)
    }

    /// Receive the next completed operation without blocking.
    pub fn try_recv(&self) -> Option<RemoteInbound> {
        self.rx.try_recv().ok()
    }
}

fn remote_worker_loop(
    mut transport: impl Transport,
    rx: mpsc::Receiver<RemoteRequest>,
    tx: mpsc::Sender<RemoteInbound>,
) {
    for request in rx {
        let kind = request.op.kind();
        let result = match request.op {
            RemoteOp::Check { body } => transport.check(&body),
            RemoteOp::Evaluate { body } | RemoteOp::Rewrite { body } => transport.llm(&body),
            RemoteOp::Transcribe { audio, mime } => transport.transcribe(&audio, &mime),
        };
        if let Err(ref err) = result {
            log::warn!("remote {:?} request {} failed: {}", kind, request.id, err);
        }
        if tx
            .send(RemoteInbound {
                id: request.id,
                kind,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, Instant};

    struct EchoTransport;

    impl Transport for EchoTransport {
        fn check(&mut self, body: &Value) -> Result<Value, TransportError> {
            Ok(json!({ "echo": body.clone() }))
        }

        fn llm(&mut self, _body: &Value) -> Result<Value, TransportError> {
            Err(TransportError::Http { status: 500 })
        }

        fn transcribe(&mut self, audio: &[u8], _mime: &str) -> Result<Value, TransportError> {
            Ok(json!({ "bytes": audio.len() }))
        }
    }

    fn recv_blocking(client: &RemoteClient) -> RemoteInbound {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if let Some(inbound) = client.try_recv() {
                return inbound;
            }
            assert!(Instant::now() < deadline, "worker never answered");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_round_trip_and_error_delivery() {
        let mut client = RemoteClient::spawn(EchoTransport);

        let check_id = client.submit(RemoteOp::Check { body: json!({ "text": "hi" }) }).unwrap();
        let inbound = recv_blocking(&client);
        assert_eq!(inbound.id, check_id);
        assert_eq!(inbound.kind, RemoteOpKind::Check);
        assert_eq!(inbound.result.unwrap(), json!({ "echo": { "text": "hi" } }));

        let llm_id = client.submit(RemoteOp::Evaluate { body: json!({}) }).unwrap();
        let inbound = recv_blocking(&client);
        assert_eq!(inbound.id, llm_id);
        assert_eq!(inbound.result, Err(TransportError::Http { status: 500 }));
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut client = RemoteClient::spawn(EchoTransport);
        let a = client
            .submit(RemoteOp::Transcribe { audio: vec![0; 4], mime: "audio/webm".to_string() })
            .unwrap();
        let b = client.submit(RemoteOp::Check { body: json!({}) }).unwrap();
        assert!(b > a);
    }
}
