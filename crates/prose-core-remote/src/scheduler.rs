//! Debounced check scheduling with stale-response detection.
//!
//! Every edit re-arms a single deadline; when the deadline passes the
//! scheduler issues at most one check for the current text. Each issued check
//! carries a generation id and the scheduler remembers the text snapshot it
//! was computed against; a response is fresh only when its generation matches
//! the latest issued one AND the snapshot still equals the current text. The
//! double guard covers both orderings: an edit made after the check was
//! issued, and a recheck that happens to restore earlier text.

use std::time::{Duration, Instant};

/// Quiet period after the last edit before a check is issued.
pub const CHECK_DEBOUNCE: Duration = Duration::from_millis(1000);

/// A check the host must submit to the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Generation id to hand back to [`CheckScheduler::fate`].
    pub generation: u64,
    /// Snapshot of the text to check.
    pub text: String,
}

/// What [`CheckScheduler::poll`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerAction {
    /// Nothing to do yet.
    Wait,
    /// The text is blank; clear suggestions locally, no request needed.
    ClearNow,
    /// Issue this check.
    Issue(CheckRequest),
}

/// Verdict on an arriving check response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFate {
    /// The response matches the current text; apply it.
    Fresh,
    /// The text changed since the check was issued; drop the response.
    Stale,
}

#[derive(Debug)]
struct PendingCheck {
    generation: u64,
    snapshot: String,
}

/// Debounce timer plus generation bookkeeping for the check pipeline.
#[derive(Debug)]
pub struct CheckScheduler {
    debounce: Duration,
    due: Option<Instant>,
    next_generation: u64,
    latest: Option<PendingCheck>,
}

impl CheckScheduler {
    /// Scheduler with the standard [`CHECK_DEBOUNCE`] quiet period.
    pub fn new() -> Self {
        Self::with_debounce(CHECK_DEBOUNCE)
    }

    /// Scheduler with a custom quiet period (tests use zero).
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            debounce,
            due: None,
            next_generation: 1,
            latest: None,
        }
    }

    /// Record an edit at `now`; re-arms the deadline.
    pub fn note_edit(&mut self, now: Instant) {
        self.due = Some(now + self.debounce);
    }

    /// Request an immediate check (explicit recheck, accepted rewrite,
    /// finished transcription). The quiet period is skipped.
    pub fn force(&mut self, now: Instant) {
        self.due = Some(now);
    }

    /// Whether a check is armed or in flight.
    ///
    /// While this is true the host should treat the suggestion list as
    /// provisional (suppressed overlay).
    pub fn is_pending(&self) -> bool {
        self.due.is_some() || self.latest.is_some()
    }

    /// Advance the timer; `text` is the current buffer content.
    pub fn poll(&mut self, now: Instant, text: &str) -> SchedulerAction {
        match self.due {
            Some(due) if now >= due => self.due = None,
            _ => return SchedulerAction::Wait,
        }
        if text.trim().is_empty() {
            // Nothing to check; also forget any in-flight request so a late
            // response for older text cannot resurface.
            self.latest = None;
            return SchedulerAction::ClearNow;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.latest = Some(PendingCheck {
            generation,
            snapshot: text.to_string(),
        });
        SchedulerAction::Issue(CheckRequest {
            generation,
            text: text.to_string(),
        })
    }

    /// Judge a response for check `generation` against `current_text`.
    ///
    /// A matching generation always retires the in-flight record; freshness
    /// additionally requires the snapshot to equal the current text.
    pub fn fate(&mut self, generation: u64, current_text: &str) -> ResponseFate {
        match &self.latest {
            Some(pending) if pending.generation == generation => {
                let fresh = pending.snapshot == current_text;
                self.latest = None;
                if fresh {
                    ResponseFate::Fresh
                } else {
                    ResponseFate::Stale
                }
            }
            _ => ResponseFate::Stale,
        }
    }

    /// Record that check `generation` failed; retires the in-flight record
    /// without scheduling a retry.
    pub fn fail(&mut self, generation: u64) {
        if let Some(pending) = &self.latest
            && pending.generation == generation
        {
            self.latest = None;
        }
    }
}

impl Default for CheckScheduler {
    fn default() -> Self {
        Self::new()
    }
}
