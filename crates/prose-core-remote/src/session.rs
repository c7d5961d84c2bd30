//! The high-level proofreading session.
//!
//! [`ProofingSession`] wires the pure core (buffer, registry, overlay, popup,
//! status) to the remote pieces (scheduler, review workflow, client). The host
//! UI forwards edits and user intents into it and calls
//! [`ProofingSession::tick`] from its event loop; everything else — debounce,
//! request issuing, stale-response discarding, status lifecycle — happens in
//! here.

use crate::client::{RemoteClient, RemoteInbound, RemoteOp, RemoteOpKind};
use crate::protocol;
use crate::review::{ReviewError, ReviewWorkflow};
use crate::scheduler::{CheckScheduler, ResponseFate, SchedulerAction};
use crate::transport::Transport;
use prose_core::{
    EditError, EditSession, EnginePhase, OverlayMode, OverlaySegment, PopupAction,
    PopupController, Status, StatusKind, SuggestionRegistry, project_with_mode, to_markup,
};
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewCall {
    Evaluate,
    Rewrite,
}

/// The full proofreading engine, driven cooperatively by the host.
pub struct ProofingSession {
    edit: EditSession,
    registry: SuggestionRegistry,
    popup: PopupController,
    scheduler: CheckScheduler,
    review: ReviewWorkflow,
    client: RemoteClient,
    status: Status,
    pending_check: Option<(u64, u64)>,
    pending_review: Option<(u64, ReviewCall)>,
    pending_transcription: Option<u64>,
}

impl ProofingSession {
    /// Create a session around `transport`, with an empty buffer.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            edit: EditSession::default(),
            registry: SuggestionRegistry::new(),
            popup: PopupController::new(),
            scheduler: CheckScheduler::new(),
            review: ReviewWorkflow::new(),
            client: RemoteClient::spawn(transport),
            status: Status::default(),
            pending_check: None,
            pending_review: None,
            pending_transcription: None,
        }
    }

    /// The edit buffer.
    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    /// The suggestion registry.
    pub fn registry(&self) -> &SuggestionRegistry {
        &self.registry
    }

    /// The review workflow.
    pub fn review(&self) -> &ReviewWorkflow {
        &self.review
    }

    /// The check scheduler (visible for hosts that render a pending spinner).
    pub fn scheduler(&self) -> &CheckScheduler {
        &self.scheduler
    }

    // ---- edits ---------------------------------------------------------

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str, now: Instant) -> Result<(), EditError> {
        self.edit.insert(offset, text)?;
        self.note_mutation(now);
        Ok(())
    }

    /// Replace `length` chars at `offset` with `replacement`.
    pub fn replace_range(
        &mut self,
        offset: usize,
        length: usize,
        replacement: &str,
        now: Instant,
    ) -> Result<(), EditError> {
        self.edit.replace_range(offset, length, replacement)?;
        self.note_mutation(now);
        Ok(())
    }

    /// Replace the whole buffer (paste, load).
    pub fn set_text(&mut self, text: &str, now: Instant) {
        self.edit.set_text(text);
        self.note_mutation(now);
    }

    /// Any text mutation: the suggestion list is stale, the popup (if open)
    /// presents a stale suggestion, and the debounce timer re-arms.
    fn note_mutation(&mut self, now: Instant) {
        self.registry.invalidate();
        self.popup.close();
        self.scheduler.note_edit(now);
        if !self.edit.is_blank() && !self.review.is_busy() {
            self.status = Status::pending(StatusKind::Checking);
        }
    }

    // ---- event loop ----------------------------------------------------

    /// Advance the engine: drain remote results, fire due checks, expire
    /// transient statuses. Call this from the host's event loop.
    pub fn tick(&mut self, now: Instant) {
        while let Some(inbound) = self.client.try_recv() {
            self.handle_inbound(inbound, now);
        }

        let text = self.edit.text();
        match self.scheduler.poll(now, &text) {
            SchedulerAction::Wait => {}
            SchedulerAction::ClearNow => {
                self.registry.invalidate();
                self.popup.close();
                self.pending_check = None;
                if !self.review.is_busy() {
                    self.status = Status::default();
                }
            }
            SchedulerAction::Issue(request) => {
                let body = protocol::check_request_body(&request.text);
                match self.client.submit(RemoteOp::Check { body }) {
                    Ok(id) => {
                        self.pending_check = Some((id, request.generation));
                        if !self.review.is_busy() {
                            self.status = Status::pending(StatusKind::Checking);
                        }
                    }
                    Err(err) => {
                        log::error!("check submit failed: {err}");
                        self.scheduler.fail(request.generation);
                        if !self.review.is_busy() {
                            self.status = Status::transient(StatusKind::CheckFailed, now);
                        }
                    }
                }
            }
        }

        if self.status.is_expired(now) {
            self.status = Status::default();
        }
    }

    fn handle_inbound(&mut self, inbound: RemoteInbound, now: Instant) {
        match inbound.kind {
            RemoteOpKind::Check => self.handle_check(inbound, now),
            RemoteOpKind::Evaluate | RemoteOpKind::Rewrite => self.handle_review(inbound, now),
            RemoteOpKind::Transcribe => self.handle_transcription(inbound, now),
        }
    }

    fn handle_check(&mut self, inbound: RemoteInbound, now: Instant) {
        let Some((id, generation)) = self.pending_check else {
            return;
        };
        if inbound.id != id {
            return;
        }
        self.pending_check = None;
        let text = self.edit.text();
        match inbound.result {
            Ok(payload) => match self.scheduler.fate(generation, &text) {
                ResponseFate::Fresh => {
                    let raw = protocol::suggestions_from_json(&payload, &text);
                    let retained = self.registry.apply(raw, &text);
                    if !self.review.is_busy() {
                        self.status = Status::transient(StatusKind::Issues(retained), now);
                    }
                }
                ResponseFate::Stale => {
                    log::debug!("dropping stale check response (generation {generation})");
                }
            },
            Err(err) => {
                log::warn!("check failed: {err}");
                self.scheduler.fail(generation);
                // The previous suggestion list stays on display; no retry is
                // scheduled, the next edit or explicit recheck recovers.
                if !self.review.is_busy() {
                    self.status = Status::transient(StatusKind::CheckFailed, now);
                }
            }
        }
    }

    fn handle_review(&mut self, inbound: RemoteInbound, now: Instant) {
        let Some((id, call)) = self.pending_review else {
            return;
        };
        if inbound.id != id {
            return;
        }
        self.pending_review = None;
        let parsed = match (call, inbound.result) {
            (ReviewCall::Evaluate, Ok(payload)) => protocol::evaluation_from_json(&payload)
                .map(|criteria| self.review.on_evaluation(criteria)),
            (ReviewCall::Rewrite, Ok(payload)) => {
                protocol::rewrite_from_json(&payload).map(|rewrite| self.review.on_rewrite(rewrite))
            }
            (_, Err(err)) => {
                log::warn!("review call failed: {err}");
                None
            }
        };
        match parsed {
            Some(Ok(())) => {
                self.status = Status::default();
            }
            // An unusable payload is a failure like any other.
            Some(Err(_)) | None => {
                self.review.fail();
                self.status = Status::transient(StatusKind::ReviewFailed, now);
            }
        }
    }

    fn handle_transcription(&mut self, inbound: RemoteInbound, now: Instant) {
        let Some(id) = self.pending_transcription else {
            return;
        };
        if inbound.id != id {
            return;
        }
        self.pending_transcription = None;
        let transcription = match inbound.result {
            Ok(payload) => protocol::transcription_from_json(&payload),
            Err(err) => {
                log::warn!("transcription failed: {err}");
                None
            }
        };
        match transcription {
            Some(text) => {
                self.edit.set_text(&text);
                self.registry.invalidate();
                self.popup.close();
                self.scheduler.force(now);
                self.status = Status::pending(StatusKind::Checking);
            }
            None => {
                // The buffer is left untouched.
                self.status = Status::transient(StatusKind::TranscriptionFailed, now);
            }
        }
    }

    // ---- suggestion interaction ----------------------------------------

    /// Apply `replacement` to the suggestion at `index`.
    ///
    /// All current suggestions sharing the accepted identity are dropped, the
    /// rest stay on display (provisionally) while the re-check is pending.
    /// Returns `false` when the index is out of range or the span no longer
    /// fits the buffer.
    pub fn apply_replacement(&mut self, index: usize, replacement: &str, now: Instant) -> bool {
        let Some(suggestion) = self.registry.get(index).cloned() else {
            return false;
        };
        let pre_text = self.edit.text();
        let Some(identity) = suggestion.identity(&pre_text) else {
            return false;
        };
        if self
            .edit
            .replace_range(suggestion.offset, suggestion.length, replacement)
            .is_err()
        {
            return false;
        }
        self.registry.drop_identity(&identity, &pre_text);
        self.popup.close();
        self.scheduler.note_edit(now);
        if !self.review.is_busy() {
            self.status = Status::transient(StatusKind::Applied, now);
        }
        true
    }

    /// Ignore the suggestion at `index` for the rest of the session.
    ///
    /// No text mutation happens, so the remaining suggestions stay valid and
    /// the overlay stays live; no re-check is scheduled.
    pub fn ignore_suggestion(&mut self, index: usize) -> bool {
        let text = self.edit.text();
        let ignored = self.registry.ignore(index, &text).is_some();
        if ignored {
            self.popup.close();
        }
        ignored
    }

    /// Open the popup for the suggestion at `index`.
    pub fn open_popup(&mut self, index: usize) -> bool {
        let text = self.edit.text();
        self.popup.open(index, &self.registry, &text)
    }

    /// Close the popup, if open.
    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    /// The popup controller (for rendering).
    pub fn popup(&self) -> &PopupController {
        &self.popup
    }

    /// Execute a popup intent.
    pub fn perform(&mut self, action: PopupAction, now: Instant) -> bool {
        match action {
            PopupAction::Apply {
                suggestion_index,
                replacement,
            } => self.apply_replacement(suggestion_index, &replacement, now),
            PopupAction::Ignore { suggestion_index } => self.ignore_suggestion(suggestion_index),
        }
    }

    // ---- review --------------------------------------------------------

    /// Start a review of the current text (step 1).
    pub fn submit_for_review(&mut self, now: Instant) -> Result<(), ReviewError> {
        let text = self.edit.text();
        let body = self.review.begin(&text)?;
        self.submit_review_call(ReviewCall::Evaluate, body, now)
    }

    /// Submit answers to the review questions (step 2).
    pub fn submit_answers(&mut self, answers: &[String], now: Instant) -> Result<(), ReviewError> {
        let body = self.review.submit_answers(answers)?;
        self.submit_review_call(ReviewCall::Rewrite, body, now)
    }

    fn submit_review_call(
        &mut self,
        call: ReviewCall,
        body: Value,
        now: Instant,
    ) -> Result<(), ReviewError> {
        let op = match call {
            ReviewCall::Evaluate => RemoteOp::Evaluate { body },
            ReviewCall::Rewrite => RemoteOp::Rewrite { body },
        };
        match self.client.submit(op) {
            Ok(id) => {
                self.pending_review = Some((id, call));
                self.status = Status::pending(StatusKind::Reviewing);
                Ok(())
            }
            Err(err) => {
                log::error!("review submit failed: {err}");
                self.review.fail();
                self.status = Status::transient(StatusKind::ReviewFailed, now);
                Err(ReviewError::WrongPhase)
            }
        }
    }

    /// Accept the pending rewrite into the buffer and schedule an immediate
    /// re-check.
    pub fn accept_rewrite(&mut self, now: Instant) -> bool {
        let Some(rewrite) = self.review.accept() else {
            return false;
        };
        self.edit.set_text(&rewrite);
        self.registry.invalidate();
        self.popup.close();
        self.scheduler.force(now);
        self.status = Status::pending(StatusKind::Checking);
        true
    }

    /// Dismiss the pending rewrite (or questions); the buffer is untouched.
    pub fn dismiss_review(&mut self) {
        self.review.dismiss();
    }

    // ---- transcription -------------------------------------------------

    /// Upload recorded audio for transcription; on success the transcription
    /// replaces the buffer and an immediate check is scheduled.
    pub fn begin_transcription(&mut self, audio: Vec<u8>, mime: &str, now: Instant) -> bool {
        match self.client.submit(RemoteOp::Transcribe {
            audio,
            mime: mime.to_string(),
        }) {
            Ok(id) => {
                self.pending_transcription = Some(id);
                self.status = Status::pending(StatusKind::Transcribing);
                true
            }
            Err(err) => {
                log::error!("transcription submit failed: {err}");
                self.status = Status::transient(StatusKind::TranscriptionFailed, now);
                false
            }
        }
    }

    // ---- derived views -------------------------------------------------

    /// Explicitly request an immediate re-check of the current text.
    pub fn recheck(&mut self, now: Instant) {
        self.scheduler.force(now);
    }

    /// The overlay mode the host should render with.
    pub fn overlay_mode(&self) -> OverlayMode {
        if self.scheduler.is_pending() {
            OverlayMode::Suppressed
        } else {
            OverlayMode::Live
        }
    }

    /// Overlay segments for the current buffer and suggestion list.
    pub fn overlay_segments(&self) -> Vec<OverlaySegment> {
        let text = self.edit.text();
        project_with_mode(self.overlay_mode(), &text, self.registry.suggestions())
    }

    /// Overlay rendered as markup.
    pub fn overlay_markup(&self) -> String {
        to_markup(&self.overlay_segments())
    }

    /// The engine's coarse phase, derived from component state.
    pub fn phase(&self) -> EnginePhase {
        if self.review.is_busy() {
            EnginePhase::ReviewBusy
        } else if self.scheduler.is_pending() {
            EnginePhase::AwaitingCheck
        } else if !self.registry.is_empty() {
            EnginePhase::ShowingSuggestions
        } else {
            EnginePhase::Idle
        }
    }

    /// The current status value.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The current status line text.
    pub fn status_message(&self) -> String {
        self.status.kind.message()
    }
}
