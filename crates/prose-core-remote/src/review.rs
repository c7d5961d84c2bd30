//! The two-phase review workflow.
//!
//! Step 1 sends the text for evaluation against fixed writing criteria; each
//! failed criterion comes back with a clarifying question. Step 2 sends the
//! user's answers and receives a rewrite, which the user may accept into the
//! buffer or dismiss. The workflow is a state machine over [`ReviewPhase`];
//! the text captured at [`ReviewWorkflow::begin`] is what both steps are
//! computed against, so buffer edits made while a review is in flight do not
//! leak into it.

use crate::protocol::{self, ReviewCriterion};
use prose_core::ValidationError;
use serde_json::{Map, Value};
use thiserror::Error;

/// Minimum number of non-whitespace characters before a review is accepted.
pub const MIN_REVIEW_CHARS: usize = 20;

/// A clarifying question attached to a failed criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuestion {
    /// Name of the criterion the question belongs to.
    pub criterion: String,
    /// The question itself.
    pub question: String,
}

/// How many criteria passed out of the total evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewScore {
    /// Criteria the text already satisfies.
    pub passed: usize,
    /// Criteria evaluated in total.
    pub total: usize,
}

/// Where the workflow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewPhase {
    /// No review in progress.
    Idle,
    /// Step 1 submitted; waiting for the evaluation.
    Evaluating {
        /// The text under review.
        text: String,
    },
    /// Evaluation arrived; waiting for the user's answers.
    QuestionsReady {
        /// The text under review.
        text: String,
        /// All evaluated criteria, in service order.
        criteria: Vec<ReviewCriterion>,
        /// Questions for the failed criteria, in service order.
        questions: Vec<ReviewQuestion>,
    },
    /// Step 2 submitted; waiting for the rewrite.
    Submitting,
    /// The rewrite arrived; waiting for accept or dismiss.
    RewriteReady {
        /// The rewritten text.
        rewrite: String,
    },
}

/// Why a workflow transition was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// The text does not qualify for review.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A review is already in flight.
    #[error("a review is already in progress")]
    Busy,
    /// The requested transition does not apply to the current phase.
    #[error("operation does not apply to the current review phase")]
    WrongPhase,
}

/// State machine driving the evaluate→question→rewrite cycle.
#[derive(Debug)]
pub struct ReviewWorkflow {
    phase: ReviewPhase,
}

impl ReviewWorkflow {
    /// A workflow in the idle phase.
    pub fn new() -> Self {
        Self {
            phase: ReviewPhase::Idle,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &ReviewPhase {
        &self.phase
    }

    /// Whether a network round trip is outstanding.
    ///
    /// While busy, the host suppresses check-pipeline status updates so they
    /// do not overwrite the review progress indicator.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            ReviewPhase::Evaluating { .. } | ReviewPhase::Submitting
        )
    }

    /// Start a review of `text`; returns the step-1 request body.
    ///
    /// Refused while another review is in flight, or when the text has fewer
    /// than [`MIN_REVIEW_CHARS`] non-whitespace characters.
    pub fn begin(&mut self, text: &str) -> Result<Value, ReviewError> {
        if !matches!(self.phase, ReviewPhase::Idle | ReviewPhase::RewriteReady { .. }) {
            return Err(ReviewError::Busy);
        }
        let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
        if meaningful < MIN_REVIEW_CHARS {
            return Err(ValidationError::TooShort {
                meaningful,
                minimum: MIN_REVIEW_CHARS,
            }
            .into());
        }
        self.phase = ReviewPhase::Evaluating {
            text: text.to_string(),
        };
        Ok(protocol::evaluate_request_body(text))
    }

    /// Record the step-1 evaluation.
    ///
    /// An empty question list is a valid outcome: the text already satisfies
    /// every criterion, and the user can still submit (empty) answers to
    /// request a rewrite.
    pub fn on_evaluation(&mut self, criteria: Vec<ReviewCriterion>) -> Result<(), ReviewError> {
        let ReviewPhase::Evaluating { text } = &self.phase else {
            return Err(ReviewError::WrongPhase);
        };
        let questions = criteria
            .iter()
            .filter(|c| !c.passed)
            .filter_map(|c| {
                c.question.as_ref().map(|q| ReviewQuestion {
                    criterion: c.name.clone(),
                    question: q.clone(),
                })
            })
            .collect();
        self.phase = ReviewPhase::QuestionsReady {
            text: text.clone(),
            criteria,
            questions,
        };
        Ok(())
    }

    /// Submit the user's answers; returns the step-2 request body.
    ///
    /// `answers` is positional against [`Self::questions`]; missing or extra
    /// entries degrade to empty answers rather than an error.
    pub fn submit_answers(&mut self, answers: &[String]) -> Result<Value, ReviewError> {
        let ReviewPhase::QuestionsReady { text, questions, .. } = &self.phase else {
            return Err(ReviewError::WrongPhase);
        };
        let mut map = Map::new();
        for (i, q) in questions.iter().enumerate() {
            let answer = answers.get(i).map(String::as_str).unwrap_or("");
            map.insert(q.criterion.clone(), Value::String(answer.to_string()));
        }
        let body = protocol::rewrite_request_body(text, &map);
        self.phase = ReviewPhase::Submitting;
        Ok(body)
    }

    /// Record the step-2 rewrite.
    pub fn on_rewrite(&mut self, rewrite: String) -> Result<(), ReviewError> {
        if !matches!(self.phase, ReviewPhase::Submitting) {
            return Err(ReviewError::WrongPhase);
        }
        self.phase = ReviewPhase::RewriteReady { rewrite };
        Ok(())
    }

    /// A network step failed; the review is abandoned.
    ///
    /// Any answers the user had entered are gone with it; the next review
    /// starts from scratch.
    pub fn fail(&mut self) {
        if self.is_busy() {
            self.phase = ReviewPhase::Idle;
        }
    }

    /// Accept the rewrite; returns it for the host to install in the buffer.
    pub fn accept(&mut self) -> Option<String> {
        let ReviewPhase::RewriteReady { rewrite } = &self.phase else {
            return None;
        };
        let rewrite = rewrite.clone();
        self.phase = ReviewPhase::Idle;
        Some(rewrite)
    }

    /// Dismiss whatever the workflow is showing and return to idle.
    pub fn dismiss(&mut self) {
        self.phase = ReviewPhase::Idle;
    }

    /// Pass/total score once the evaluation has arrived.
    pub fn score(&self) -> Option<ReviewScore> {
        let ReviewPhase::QuestionsReady { criteria, .. } = &self.phase else {
            return None;
        };
        Some(ReviewScore {
            passed: criteria.iter().filter(|c| c.passed).count(),
            total: criteria.len(),
        })
    }

    /// Questions awaiting answers, if any.
    pub fn questions(&self) -> &[ReviewQuestion] {
        match &self.phase {
            ReviewPhase::QuestionsReady { questions, .. } => questions,
            _ => &[],
        }
    }

    /// All evaluated criteria, if the evaluation has arrived.
    pub fn criteria(&self) -> &[ReviewCriterion] {
        match &self.phase {
            ReviewPhase::QuestionsReady { criteria, .. } => criteria,
            _ => &[],
        }
    }
}

impl Default for ReviewWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
