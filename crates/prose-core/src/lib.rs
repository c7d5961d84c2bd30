#![warn(missing_docs)]
//! Prose Core - Headless Proofreading Engine
//!
//! # Overview
//!
//! `prose-core` is the state-coordination core of an interactive text-annotation
//! editor. It owns the hard parts of the suggestion lifecycle — reconciling
//! asynchronous check results against a mutable text buffer, keeping a
//! content-keyed ignore memory stable while offsets drift, and projecting
//! flagged spans into an overlay — without involving any rendering surface or
//! network transport. Remote-service integration (the debounced check pipeline
//! and the evaluate/rewrite review workflow) lives in `prose-core-remote`.
//!
//! # Core Features
//!
//! - **Suggestion Model**: flagged spans with diagnostic messages, replacement
//!   candidates, and offset-independent identity keys
//! - **Registry**: current suggestion list + session-scoped ignore set
//! - **Edit Session**: rope-backed buffer with cursor/scroll bookkeeping and a
//!   monotonic version counter
//! - **Overlay Projection**: pure `(text, suggestions)` → segment sequence,
//!   escaped for safe markup embedding
//! - **Popup Intent Model**: a thin presenter that produces apply/ignore
//!   intents for the host to execute
//!
//! # Offsets
//!
//! All offsets and lengths are Unicode scalar (`char`) offsets. A suggestion's
//! offsets are valid only for the text it was computed against; any mutation
//! invalidates the whole list and a full re-check is expected.
//!
//! # Module Description
//!
//! - [`suggestion`] - suggestion record, identity keys, category buckets
//! - [`registry`] - suggestion list + ignore set bookkeeping
//! - [`session`] - the mutable edit buffer
//! - [`overlay`] - overlay projection and markup escaping
//! - [`popup`] - single-suggestion presenter
//! - [`status`] - status-indicator model shared with the remote layer

pub mod error;
pub mod overlay;
pub mod popup;
pub mod registry;
pub mod session;
pub mod status;
pub mod suggestion;

pub use error::{EditError, ValidationError};
pub use overlay::{OverlayMode, OverlaySegment, escape_markup, project, project_with_mode, to_markup};
pub use popup::{MAX_POPUP_REPLACEMENTS, PopupAction, PopupController, SuggestionPopup};
pub use registry::SuggestionRegistry;
pub use session::EditSession;
pub use status::{EnginePhase, STATUS_LINGER, Status, StatusKind};
pub use suggestion::{CategoryBucket, RuleKind, Suggestion, SuggestionIdentity};
