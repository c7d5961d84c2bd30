//! Overlay projection.
//!
//! The projector is a pure function of `(text, suggestions)`: it emits a
//! sequence of segments alternating plain and highlighted runs, where each
//! highlighted run corresponds exactly to one suggestion's span. Suggestions
//! are assumed non-overlapping and sorted by offset (server order); spans that
//! no longer fit the text, or that overlap an earlier span, are skipped rather
//! than panicking — the host may race a render against a pending re-check.

use crate::suggestion::{CategoryBucket, Suggestion, slice_chars};

/// Whether the overlay renders highlights or is intentionally blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    /// Render highlights for the current suggestion list.
    Live,
    /// Render nothing. Used while a check is pending after a mutation, so
    /// highlights computed against now-stale text are never shown.
    Suppressed,
}

/// One run of overlay output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlaySegment {
    /// An unhighlighted run of text.
    Plain(String),
    /// A highlighted run corresponding to one suggestion's span.
    Highlight {
        /// The flagged slice of the text.
        text: String,
        /// Styling bucket; `None` renders without a category class.
        bucket: Option<CategoryBucket>,
        /// Index into the suggestion list this run was projected from.
        suggestion_index: usize,
    },
}

impl OverlaySegment {
    /// The raw (unescaped) text of this segment.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Highlight { text, .. } => text,
        }
    }
}

/// Project `suggestions` over `text` into alternating plain/highlight runs.
///
/// Concatenating the returned segments' text in order reconstructs `text`
/// whenever every suggestion span is valid and non-overlapping.
pub fn project(text: &str, suggestions: &[Suggestion]) -> Vec<OverlaySegment> {
    let total = text.chars().count();
    let mut segments = Vec::new();
    let mut cursor = 0;

    for (index, suggestion) in suggestions.iter().enumerate() {
        if suggestion.length == 0
            || suggestion.offset < cursor
            || suggestion.end() > total
        {
            continue;
        }
        if suggestion.offset > cursor {
            if let Some(gap) = slice_chars(text, cursor, suggestion.offset) {
                segments.push(OverlaySegment::Plain(gap.to_string()));
            }
        }
        let Some(flagged) = suggestion.slice(text) else {
            continue;
        };
        segments.push(OverlaySegment::Highlight {
            text: flagged.to_string(),
            bucket: suggestion.bucket(),
            suggestion_index: index,
        });
        cursor = suggestion.end();
    }

    if cursor < total
        && let Some(tail) = slice_chars(text, cursor, total)
    {
        segments.push(OverlaySegment::Plain(tail.to_string()));
    }
    segments
}

/// Mode-aware projection: [`OverlayMode::Suppressed`] yields no segments.
pub fn project_with_mode(
    mode: OverlayMode,
    text: &str,
    suggestions: &[Suggestion],
) -> Vec<OverlaySegment> {
    match mode {
        OverlayMode::Live => project(text, suggestions),
        OverlayMode::Suppressed => Vec::new(),
    }
}

/// Render segments as markup for an HTML-ish overlay surface.
///
/// Plain and highlighted text are escaped identically; no suggestion content
/// is ever emitted unescaped.
pub fn to_markup(segments: &[OverlaySegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            OverlaySegment::Plain(text) => out.push_str(&escape_markup(text)),
            OverlaySegment::Highlight {
                text,
                bucket,
                suggestion_index,
            } => {
                out.push_str("<span class=\"highlight-span");
                if let Some(bucket) = bucket {
                    out.push_str(" highlight-span-");
                    out.push_str(bucket.css_suffix());
                }
                out.push_str(&format!(
                    "\" data-suggestion-index=\"{}\">",
                    suggestion_index
                ));
                out.push_str(&escape_markup(text));
                out.push_str("</span>");
            }
        }
    }
    out
}

/// Escape text for safe embedding in a markup renderer.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(offset: usize, length: usize, category: &str) -> Suggestion {
        Suggestion {
            offset,
            length,
            message: "msg".to_string(),
            rule_id: "RULE".to_string(),
            category: category.to_string(),
            replacements: Vec::new(),
        }
    }

    fn reconstruct(segments: &[OverlaySegment]) -> String {
        segments.iter().map(OverlaySegment::text).collect()
    }

    #[test]
    fn test_empty_list_yields_text_unchanged() {
        let text = "nothing flagged here";
        let segments = project(text, &[]);
        assert_eq!(segments, vec![OverlaySegment::Plain(text.to_string())]);
        assert_eq!(reconstruct(&segments), text);
    }

    #[test]
    fn test_round_trip_reconstruction() {
        let text = "teh quick brown fox jumsp over";
        let suggestions = vec![suggestion(0, 3, "TYPOS"), suggestion(20, 5, "TYPOS")];
        let segments = project(text, &suggestions);
        assert_eq!(reconstruct(&segments), text);
        assert_eq!(segments.len(), 4);
        assert!(matches!(
            segments[1],
            OverlaySegment::Highlight {
                bucket: Some(CategoryBucket::Spelling),
                suggestion_index: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_adjacent_and_leading_highlights() {
        let text = "abcd";
        let suggestions = vec![suggestion(0, 2, "GRAMMAR"), suggestion(2, 2, "")];
        let segments = project(text, &suggestions);
        assert_eq!(segments.len(), 2);
        assert_eq!(reconstruct(&segments), text);
        assert!(matches!(
            segments[1],
            OverlaySegment::Highlight { bucket: None, .. }
        ));
    }

    #[test]
    fn test_out_of_bounds_and_overlapping_spans_skipped() {
        let text = "short";
        let suggestions = vec![
            suggestion(0, 3, ""),
            suggestion(2, 2, ""),  // overlaps the first
            suggestion(4, 10, ""), // out of bounds
        ];
        let segments = project(text, &suggestions);
        assert_eq!(reconstruct(&segments), text);
        let highlights = segments
            .iter()
            .filter(|s| matches!(s, OverlaySegment::Highlight { .. }))
            .count();
        assert_eq!(highlights, 1);
    }

    #[test]
    fn test_suppressed_mode_is_blank() {
        let segments = project_with_mode(OverlayMode::Suppressed, "text", &[suggestion(0, 4, "")]);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_markup_escapes_everything() {
        let text = "a <b> & c";
        let suggestions = vec![suggestion(2, 3, "TYPOS")];
        let markup = to_markup(&project(text, &suggestions));
        assert_eq!(
            markup,
            "a <span class=\"highlight-span highlight-span-spelling\" data-suggestion-index=\"0\">&lt;b&gt;</span> &amp; c"
        );
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup(r#"<&">'"#), "&lt;&amp;&quot;&gt;&#39;");
        assert_eq!(escape_markup("plain"), "plain");
    }
}
