//! The mutable edit buffer.
//!
//! [`EditSession`] holds the canonical text plus cursor/scroll bookkeeping.
//! It deliberately does *not* attempt incremental re-anchoring of suggestion
//! offsets across edits: partial re-anchoring of stale offsets across
//! arbitrary edits is not soundly computable without a full diff, so every
//! mutation bumps the version and the upper layer invalidates the whole
//! suggestion list and forces a full re-check.

use crate::error::EditError;
use ropey::Rope;

/// The canonical text buffer with cursor and scroll state.
#[derive(Debug, Clone)]
pub struct EditSession {
    buffer: Rope,
    cursor: usize,
    scroll_top: usize,
    version: u64,
}

impl EditSession {
    /// Create a session holding `text`, cursor at the end.
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from_str(text);
        let cursor = buffer.len_chars();
        Self {
            buffer,
            cursor,
            scroll_top: 0,
            version: 0,
        }
    }

    /// The full text.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Text length in `char`s.
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Returns `true` if the text is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.buffer.chars().all(char::is_whitespace)
    }

    /// Number of non-whitespace `char`s (review-gating input).
    pub fn meaningful_len(&self) -> usize {
        self.buffer.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Monotonic version, bumped by every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Cursor position (`char` offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the text length.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.buffer.len_chars());
    }

    /// Current scroll position (host-defined units).
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Record the host's scroll position.
    pub fn set_scroll_top(&mut self, scroll_top: usize) {
        self.scroll_top = scroll_top;
    }

    /// Replace the entire text. Cursor moves to the end; scroll resets.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
        self.cursor = self.buffer.len_chars();
        self.scroll_top = 0;
        self.version += 1;
    }

    /// Replace `length` chars starting at `offset` with `replacement`.
    ///
    /// Afterwards the cursor sits at `offset + replacement.chars().count()`
    /// (cursor intent of "end of what I just inserted") and the scroll
    /// position is preserved.
    pub fn replace_range(
        &mut self,
        offset: usize,
        length: usize,
        replacement: &str,
    ) -> Result<(), EditError> {
        let len = self.buffer.len_chars();
        let end = offset.saturating_add(length);
        if end > len {
            return Err(EditError::RangeOutOfBounds {
                offset,
                length,
                len,
            });
        }
        self.buffer.remove(offset..end);
        self.buffer.insert(offset, replacement);
        self.cursor = offset + replacement.chars().count();
        self.version += 1;
        Ok(())
    }

    /// Insert `text` at `offset`, cursor ends up after the insertion.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.replace_range(offset, 0, text)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_range_moves_cursor_to_replacement_end() {
        let mut session = EditSession::new("I beleive this works");
        session.replace_range(2, 7, "believe").unwrap();
        assert_eq!(session.text(), "I believe this works");
        assert_eq!(session.cursor(), 9);
    }

    #[test]
    fn test_replace_range_bounds() {
        let mut session = EditSession::new("short");
        let err = session.replace_range(3, 10, "x").unwrap_err();
        assert!(matches!(err, EditError::RangeOutOfBounds { len: 5, .. }));
        // Buffer untouched on error.
        assert_eq!(session.text(), "short");
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_replace_range_multibyte() {
        let mut session = EditSession::new("naïve approach");
        session.replace_range(0, 5, "robust").unwrap();
        assert_eq!(session.text(), "robust approach");
        assert_eq!(session.cursor(), 6);
    }

    #[test]
    fn test_version_bumps_on_every_mutation() {
        let mut session = EditSession::new("");
        session.insert(0, "a").unwrap();
        session.insert(1, "b").unwrap();
        session.set_text("reset");
        assert_eq!(session.version(), 3);
    }

    #[test]
    fn test_blank_and_meaningful_len() {
        assert!(EditSession::new("").is_blank());
        assert!(EditSession::new("  \n\t ").is_blank());
        let session = EditSession::new("Fix the pump");
        assert!(!session.is_blank());
        assert_eq!(session.meaningful_len(), 10);
    }

    #[test]
    fn test_scroll_preserved_across_replace() {
        let mut session = EditSession::new("some longer text here");
        session.set_scroll_top(42);
        session.replace_range(5, 6, "short").unwrap();
        assert_eq!(session.scroll_top(), 42);
        session.set_text("new");
        assert_eq!(session.scroll_top(), 0);
    }
}
