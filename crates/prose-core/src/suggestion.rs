//! First-class suggestion data model.
//!
//! A [`Suggestion`] is a flagged span of text with a diagnostic message and
//! optional replacement candidates, as returned by a remote checking service.
//! Offsets are `char` offsets into the text *as checked*; they go stale the
//! moment the text is mutated, so ignore/accept bookkeeping uses the
//! content-based [`SuggestionIdentity`] instead.

/// A single flagged span for the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Span start offset, in Unicode scalar values (`char`) from the start of the checked text.
    pub offset: usize,
    /// Span length in `char`s.
    pub length: usize,
    /// Diagnostic message.
    pub message: String,
    /// Rule identifier from the checking service (e.g. `"MORFOLOGIK_RULE_EN_US"`).
    pub rule_id: String,
    /// Raw category string from the checking service (may be empty).
    pub category: String,
    /// Ordered replacement candidates (best first).
    pub replacements: Vec<String>,
}

impl Suggestion {
    /// Exclusive end offset of the span.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Returns `true` if the span still fits inside `text`.
    ///
    /// Note this is a necessary, not sufficient, freshness condition: a span
    /// can fit a mutated text while pointing at different content.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.end() <= text.chars().count()
    }

    /// The flagged slice of `text`, or `None` when the span no longer fits.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        slice_chars(text, self.offset, self.end())
    }

    /// Derive the offset-independent identity key for this suggestion.
    ///
    /// Returns `None` when the span no longer fits `text` (the suggestion is
    /// stale and has no meaningful identity against the current text).
    pub fn identity(&self, text: &str) -> Option<SuggestionIdentity> {
        Some(SuggestionIdentity {
            flagged: self.slice(text)?.to_string(),
            rule_id: self.rule_id.clone(),
            message: self.message.clone(),
        })
    }

    /// Category bucket used for overlay styling, if a category is present.
    pub fn bucket(&self) -> Option<CategoryBucket> {
        CategoryBucket::from_category(&self.category)
    }

    /// Coarse rule classification derived from the rule id.
    pub fn rule_kind(&self) -> RuleKind {
        RuleKind::from_rule_id(&self.rule_id)
    }

    /// Returns `true` if this is a spelling alert on an all-caps acronym.
    ///
    /// Spelling dictionaries flag acronyms ("HMI", "PLC") as typos; those
    /// alerts are noise for technical prose and are filtered out before the
    /// suggestion list is applied.
    pub fn is_acronym_false_positive(&self, text: &str) -> bool {
        if self.rule_kind() != RuleKind::Spelling {
            return false;
        }
        match self.slice(text) {
            Some(token) => {
                token.chars().count() > 1
                    && token.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
                    && token.chars().any(|c| c.is_alphabetic())
            }
            None => false,
        }
    }
}

/// Stable fingerprint of a suggestion, independent of its offset.
///
/// Two distinct occurrences of identical flagged text under the same rule and
/// message collide and are ignored/removed together. That is a deliberate
/// trade of precision for robustness: offsets shift with every edit, while
/// the (flagged text, rule, message) triple survives a re-check of materially
/// unchanged prose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuggestionIdentity {
    flagged: String,
    rule_id: String,
    message: String,
}

impl SuggestionIdentity {
    /// Create an identity from its raw parts.
    pub fn new(
        flagged: impl Into<String>,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            flagged: flagged.into(),
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// The flagged text this identity was derived from.
    pub fn flagged(&self) -> &str {
        &self.flagged
    }
}

/// Overlay styling bucket derived from a suggestion's category string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryBucket {
    /// Spelling-like categories (`typos`, `compounding`).
    Spelling,
    /// Grammar category.
    Grammar,
    /// Any other non-empty category.
    Other,
}

impl CategoryBucket {
    /// Map a raw category string into a bucket (case-insensitive).
    ///
    /// An empty category yields `None`: the span renders unstyled.
    pub fn from_category(category: &str) -> Option<Self> {
        if category.is_empty() {
            return None;
        }
        match category.to_ascii_lowercase().as_str() {
            "typos" | "compounding" => Some(Self::Spelling),
            "grammar" => Some(Self::Grammar),
            _ => Some(Self::Other),
        }
    }

    /// CSS class suffix used by the markup renderer.
    pub fn css_suffix(&self) -> &'static str {
        match self {
            Self::Spelling => "spelling",
            Self::Grammar => "grammar",
            Self::Other => "other",
        }
    }
}

/// Coarse rule classification derived from a rule id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Pure spelling rules (`MORFOLOGIK*`).
    Spelling,
    /// Rules whose id mentions grammar.
    Grammar,
    /// Rules whose id mentions style.
    Style,
    /// Everything else.
    Other,
}

impl RuleKind {
    /// Classify a rule id.
    pub fn from_rule_id(rule_id: &str) -> Self {
        if rule_id.starts_with("MORFOLOGIK") {
            Self::Spelling
        } else {
            let lower = rule_id.to_ascii_lowercase();
            if lower.contains("grammar") {
                Self::Grammar
            } else if lower.contains("style") {
                Self::Style
            } else {
                Self::Other
            }
        }
    }
}

/// Slice `text` by `char` offsets, returning `None` when out of bounds.
pub(crate) fn slice_chars(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let start_byte = byte_for_char(text, start)?;
    let end_byte = byte_for_char(text, end)?;
    Some(&text[start_byte..end_byte])
}

fn byte_for_char(text: &str, char_offset: usize) -> Option<usize> {
    let mut count = 0;
    for (byte, _) in text.char_indices() {
        if count == char_offset {
            return Some(byte);
        }
        count += 1;
    }
    (count == char_offset).then_some(text.len())
}
