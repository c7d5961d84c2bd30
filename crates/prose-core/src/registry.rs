//! Suggestion list + ignore set bookkeeping.
//!
//! The registry stores derived editor state: the suggestion list from the most
//! recent applied check, and the session-scoped set of ignored identities. The
//! list is replaced wholesale by each applied check response and cleared by
//! any text mutation; the ignore set only ever grows (cleared by [`SuggestionRegistry::reset`]).

use crate::suggestion::{Suggestion, SuggestionIdentity};
use std::collections::HashSet;

/// Stores the current suggestion list and the ignored-identity set.
#[derive(Debug, Default)]
pub struct SuggestionRegistry {
    suggestions: Vec<Suggestion>,
    ignored: HashSet<SuggestionIdentity>,
}

impl SuggestionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current suggestion list, in server order.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Get a suggestion by index.
    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.suggestions.get(index)
    }

    /// Number of current suggestions.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// Returns `true` if there are no current suggestions.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Number of ignored identities accumulated this session.
    pub fn ignored_len(&self) -> usize {
        self.ignored.len()
    }

    /// Returns `true` if `identity` has been ignored this session.
    pub fn is_ignored(&self, identity: &SuggestionIdentity) -> bool {
        self.ignored.contains(identity)
    }

    /// Replace the current list with `raw`, filtered against the ignore set.
    ///
    /// `text` must be the text the raw suggestions were computed against.
    /// Server order is preserved (ascending offsets are assumed, not
    /// re-sorted). Returns the number of suggestions retained.
    pub fn apply(&mut self, raw: Vec<Suggestion>, text: &str) -> usize {
        self.suggestions = raw
            .into_iter()
            .filter(|s| match s.identity(text) {
                Some(identity) => !self.ignored.contains(&identity),
                // A span that does not fit the text it was checked against is
                // malformed; drop it rather than render a bogus overlay run.
                None => false,
            })
            .collect();
        self.suggestions.len()
    }

    /// Ignore the suggestion at `index`.
    ///
    /// Adds its identity to the ignore set and removes every current
    /// suggestion sharing that identity. Idempotent: re-ignoring an already
    /// ignored identity changes nothing. Returns the identity, or `None` when
    /// `index` is out of range or the suggestion is stale against `text`.
    pub fn ignore(&mut self, index: usize, text: &str) -> Option<SuggestionIdentity> {
        let identity = self.suggestions.get(index)?.identity(text)?;
        self.ignored.insert(identity.clone());
        self.drop_identity(&identity, text);
        Some(identity)
    }

    /// Remove every current suggestion sharing `identity`.
    ///
    /// Used after a replacement is applied: all occurrences of the accepted
    /// identity are stale and a fresh check is imminent. `text` must be the
    /// text the current suggestions were computed against (i.e. captured
    /// before the replacement mutated the buffer). Returns the removed count.
    pub fn drop_identity(&mut self, identity: &SuggestionIdentity, text: &str) -> usize {
        let before = self.suggestions.len();
        self.suggestions
            .retain(|s| s.identity(text).as_ref() != Some(identity));
        before - self.suggestions.len()
    }

    /// Discard the current suggestion list (any text mutation invalidates it).
    pub fn invalidate(&mut self) {
        self.suggestions.clear();
    }

    /// Clear both the list and the ignore set (full reload only).
    pub fn reset(&mut self) {
        self.suggestions.clear();
        self.ignored.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(offset: usize, length: usize, rule_id: &str, message: &str) -> Suggestion {
        Suggestion {
            offset,
            length,
            message: message.to_string(),
            rule_id: rule_id.to_string(),
            category: String::new(),
            replacements: vec!["fix".to_string()],
        }
    }

    #[test]
    fn test_apply_preserves_server_order() {
        let mut registry = SuggestionRegistry::new();
        let text = "aaa bbb ccc";
        let raw = vec![suggestion(0, 3, "R1", "m1"), suggestion(8, 3, "R2", "m2")];
        assert_eq!(registry.apply(raw, text), 2);
        assert_eq!(registry.suggestions()[0].offset, 0);
        assert_eq!(registry.suggestions()[1].offset, 8);
    }

    #[test]
    fn test_ignore_is_idempotent_and_survives_rechecks() {
        let mut registry = SuggestionRegistry::new();
        let text = "teh word";
        registry.apply(vec![suggestion(0, 3, "SPELL", "typo")], text);

        let identity = registry.ignore(0, text).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.ignored_len(), 1);

        // Ignoring the same identity again yields the same set.
        registry.ignored.insert(identity.clone());
        assert_eq!(registry.ignored_len(), 1);

        // A later check returning the same triple is filtered out.
        assert_eq!(registry.apply(vec![suggestion(0, 3, "SPELL", "typo")], text), 0);
        assert!(registry.is_ignored(&identity));
    }

    #[test]
    fn test_ignore_removes_all_sharing_identity() {
        let mut registry = SuggestionRegistry::new();
        let text = "teh one teh two";
        registry.apply(
            vec![suggestion(0, 3, "SPELL", "typo"), suggestion(8, 3, "SPELL", "typo")],
            text,
        );
        assert_eq!(registry.len(), 2);

        registry.ignore(0, text);
        // Both occurrences share one identity; both are gone.
        assert!(registry.is_empty());
    }

    #[test]
    fn test_drop_identity_after_accept() {
        let mut registry = SuggestionRegistry::new();
        let text = "teh one teh two ok";
        registry.apply(
            vec![
                suggestion(0, 3, "SPELL", "typo"),
                suggestion(8, 3, "SPELL", "typo"),
                suggestion(16, 2, "OTHER", "short"),
            ],
            text,
        );

        let identity = registry.get(0).unwrap().identity(text).unwrap();
        assert_eq!(registry.drop_identity(&identity, text), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().rule_id, "OTHER");
        // Dropping does not ignore: the identity may legitimately reappear.
        assert!(!registry.is_ignored(&identity));
    }

    #[test]
    fn test_apply_drops_malformed_spans() {
        let mut registry = SuggestionRegistry::new();
        assert_eq!(registry.apply(vec![suggestion(10, 20, "R", "m")], "short"), 0);
    }

    #[test]
    fn test_invalidate_keeps_ignore_set() {
        let mut registry = SuggestionRegistry::new();
        let text = "teh word";
        registry.apply(vec![suggestion(0, 3, "SPELL", "typo")], text);
        registry.ignore(0, text);
        registry.apply(vec![suggestion(4, 4, "R2", "m2")], text);

        registry.invalidate();
        assert!(registry.is_empty());
        assert_eq!(registry.ignored_len(), 1);
    }
}
