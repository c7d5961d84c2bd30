#![warn(missing_docs)]
//! Remote-service integration for `prose-core`.
//!
//! This crate layers the network-facing half of the proofreading engine on
//! top of the pure core:
//!
//! - wire-payload parsing for the `/check`, `/llm`, and `/speech-to-text`
//!   service contracts (over `serde_json::Value`, shaped loosely on purpose)
//! - the debounced, generation-guarded check scheduler
//! - the two-phase evaluate→question→rewrite review workflow
//! - a background-thread remote client, polled non-blockingly
//! - [`ProofingSession`], the high-level glue a host UI drives
//!
//! The engine is single-threaded and cooperative from the host's point of
//! view: the host calls [`ProofingSession::tick`] from its event loop with
//! the current instant, and every network suspension point is guarded by a
//! generation id plus text-equality comparison, so responses computed against
//! superseded text are dropped silently.
//!
//! The API intentionally uses `serde_json::Value` for payloads instead of a
//! typed DTO layer: field presence varies between service versions and the
//! parsers degrade gracefully on malformed entries.

pub mod client;
pub mod http;
pub mod protocol;
pub mod review;
pub mod scheduler;
pub mod session;
pub mod transport;

pub use client::{RemoteClient, RemoteClientError, RemoteInbound, RemoteOp, RemoteOpKind};
pub use http::HttpTransport;
pub use protocol::{
    ReviewCriterion, check_request_body, evaluate_request_body, evaluation_from_json,
    rewrite_from_json, rewrite_request_body, suggestions_from_json, transcription_from_json,
};
pub use review::{
    MIN_REVIEW_CHARS, ReviewError, ReviewPhase, ReviewQuestion, ReviewScore, ReviewWorkflow,
};
pub use scheduler::{
    CHECK_DEBOUNCE, CheckRequest, CheckScheduler, ResponseFate, SchedulerAction,
};
pub use session::ProofingSession;
pub use transport::{Transport, TransportError};
