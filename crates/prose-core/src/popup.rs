//! Single-suggestion presenter.
//!
//! The popup is a thin view over one suggestion: its message, its identity,
//! and the top few replacement candidates. It produces intent values
//! ([`PopupAction`]) for the host/session to execute; it never mutates the
//! registry or the text itself.

use crate::registry::SuggestionRegistry;
use crate::suggestion::SuggestionIdentity;

/// Maximum number of replacement candidates surfaced in the popup.
pub const MAX_POPUP_REPLACEMENTS: usize = 3;

/// Snapshot of the suggestion a popup is presenting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionPopup {
    /// Index into the registry's suggestion list at open time.
    pub suggestion_index: usize,
    /// Diagnostic message.
    pub message: String,
    /// Top replacement candidates (at most [`MAX_POPUP_REPLACEMENTS`]).
    pub replacements: Vec<String>,
    /// Identity captured at open time, used to detect staleness.
    pub identity: SuggestionIdentity,
}

/// An intent produced by popup interaction, executed by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupAction {
    /// Apply `replacement` to the suggestion at `suggestion_index`.
    Apply {
        /// Index of the suggestion being replaced.
        suggestion_index: usize,
        /// The chosen replacement string.
        replacement: String,
    },
    /// Ignore the suggestion at `suggestion_index` for the rest of the session.
    Ignore {
        /// Index of the suggestion being ignored.
        suggestion_index: usize,
    },
}

/// Presents a single suggestion's detail/replacement UI.
#[derive(Debug, Default)]
pub struct PopupController {
    open: Option<SuggestionPopup>,
}

impl PopupController {
    /// Create a controller with no popup open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the popup for the suggestion at `index`.
    ///
    /// Returns `false` (leaving any previous popup untouched) when the index
    /// is out of range or the suggestion is stale against `text`.
    pub fn open(&mut self, index: usize, registry: &SuggestionRegistry, text: &str) -> bool {
        let Some(suggestion) = registry.get(index) else {
            return false;
        };
        let Some(identity) = suggestion.identity(text) else {
            return false;
        };
        self.open = Some(SuggestionPopup {
            suggestion_index: index,
            message: suggestion.message.clone(),
            replacements: suggestion
                .replacements
                .iter()
                .take(MAX_POPUP_REPLACEMENTS)
                .cloned()
                .collect(),
            identity,
        });
        true
    }

    /// Close the popup, if open.
    pub fn close(&mut self) {
        self.open = None;
    }

    /// The currently presented suggestion, if any.
    pub fn current(&self) -> Option<&SuggestionPopup> {
        self.open.as_ref()
    }

    /// Intent: apply the replacement candidate at `choice`.
    pub fn choose(&self, choice: usize) -> Option<PopupAction> {
        let popup = self.open.as_ref()?;
        let replacement = popup.replacements.get(choice)?.clone();
        Some(PopupAction::Apply {
            suggestion_index: popup.suggestion_index,
            replacement,
        })
    }

    /// Intent: ignore the presented suggestion.
    pub fn ignore(&self) -> Option<PopupAction> {
        let popup = self.open.as_ref()?;
        Some(PopupAction::Ignore {
            suggestion_index: popup.suggestion_index,
        })
    }
}
