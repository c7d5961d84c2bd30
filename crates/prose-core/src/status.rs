//! Status-indicator model.
//!
//! A single status line is shared by two asynchronous subsystems (the check
//! pipeline and the review workflow). Pending statuses persist until resolved;
//! result statuses linger briefly and then expire. The session layer is
//! responsible for deprioritizing check-pipeline statuses while a review is
//! busy, so the two subsystems never fight over the indicator.

use std::time::{Duration, Instant};

/// How long a non-pending status stays visible.
pub const STATUS_LINGER: Duration = Duration::from_secs(3);

/// What the status line is currently reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Nothing pending, nothing to report.
    Ready,
    /// An edit happened; a check is pending or in flight.
    Checking,
    /// A check completed with this many suggestions retained.
    Issues(usize),
    /// The last check failed in transport or parsing.
    CheckFailed,
    /// A replacement was just applied.
    Applied,
    /// A review-workflow call is in flight.
    Reviewing,
    /// A review-workflow call failed.
    ReviewFailed,
    /// A speech-to-text upload is in flight.
    Transcribing,
    /// A speech-to-text upload failed.
    TranscriptionFailed,
}

impl StatusKind {
    /// Pending statuses persist until their operation resolves.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Checking | Self::Reviewing | Self::Transcribing)
    }

    /// Human-readable status text.
    pub fn message(&self) -> String {
        match self {
            Self::Ready => "Ready".to_string(),
            Self::Checking => "Checking...".to_string(),
            Self::Issues(0) => "No issues found".to_string(),
            Self::Issues(1) => "1 issue found".to_string(),
            Self::Issues(n) => format!("{} issues found", n),
            Self::CheckFailed => "Error checking text".to_string(),
            Self::Applied => "Suggestion applied".to_string(),
            Self::Reviewing => "Reviewing...".to_string(),
            Self::ReviewFailed => "Review failed".to_string(),
            Self::Transcribing => "Processing audio...".to_string(),
            Self::TranscriptionFailed => "Transcription failed".to_string(),
        }
    }
}

/// A status value with an optional expiry deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// What is being reported.
    pub kind: StatusKind,
    /// When a transient status reverts to [`StatusKind::Ready`]; `None` for
    /// pending statuses (a hung request keeps its "in progress" text visible
    /// indefinitely — accepted limitation, not a silent hang).
    pub expires_at: Option<Instant>,
}

impl Status {
    /// A status that persists until replaced.
    pub fn pending(kind: StatusKind) -> Self {
        Self {
            kind,
            expires_at: None,
        }
    }

    /// A status that expires [`STATUS_LINGER`] after `now`.
    pub fn transient(kind: StatusKind, now: Instant) -> Self {
        Self {
            kind,
            expires_at: Some(now + STATUS_LINGER),
        }
    }

    /// Returns `true` once the expiry deadline has passed.
    pub fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::pending(StatusKind::Ready)
    }
}

/// The engine's coarse phase, derived from component state.
///
/// This replaces the flag-soup a naive implementation accumulates
/// (`overlayHidden` / `awaitingCheck` / `llmInProgress`): the phase is
/// computed from the scheduler, registry, and workflow, so invalid flag
/// combinations cannot be represented at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// No suggestions, nothing pending.
    Idle,
    /// A check is pending or in flight; the overlay is suppressed.
    AwaitingCheck,
    /// A check has been applied and its suggestions are on display.
    ShowingSuggestions,
    /// The review workflow occupies the engine.
    ReviewBusy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_count_messages() {
        assert_eq!(StatusKind::Issues(0).message(), "No issues found");
        assert_eq!(StatusKind::Issues(1).message(), "1 issue found");
        assert_eq!(StatusKind::Issues(4).message(), "4 issues found");
    }

    #[test]
    fn test_pending_statuses_never_expire() {
        let now = Instant::now();
        let status = Status::pending(StatusKind::Checking);
        assert!(!status.is_expired(now + STATUS_LINGER * 10));
    }

    #[test]
    fn test_transient_status_expires() {
        let now = Instant::now();
        let status = Status::transient(StatusKind::Applied, now);
        assert!(!status.is_expired(now));
        assert!(!status.is_expired(now + STATUS_LINGER - Duration::from_millis(1)));
        assert!(status.is_expired(now + STATUS_LINGER));
    }
}
