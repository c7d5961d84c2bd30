//! Wire-payload parsing and request-body builders.
//!
//! The remote services return loosely-shaped JSON: the check endpoint an array
//! of raw suggestion records, the LLM endpoint an evaluation mapping that may
//! be nested under `result` and/or `evaluation` envelopes, and a rewrite
//! payload whose field name varies between deployments. Parsers here accept
//! `serde_json::Value`, skip malformed entries, and never panic.

use prose_core::Suggestion;
use serde_json::{Map, Value, json};

/// Build the `/check` request body.
pub fn check_request_body(text: &str) -> Value {
    json!({ "text": text })
}

/// Build the step-1 `/llm` request body (evaluation).
pub fn evaluate_request_body(text: &str) -> Value {
    json!({ "text": text, "step": 1 })
}

/// Build the step-2 `/llm` request body (rewrite from answers).
///
/// `answers` maps criterion name → the user's answer (possibly empty — the
/// server, not this engine, decides acceptability).
pub fn rewrite_request_body(text: &str, answers: &Map<String, Value>) -> Value {
    json!({ "text": text, "step": 2, "answers": answers })
}

/// Parse a `/check` response into suggestions.
///
/// `text` is the text the check was computed against; it is needed to apply
/// the acronym filter. Malformed records are skipped. The service's record
/// order (ascending offsets) is preserved.
pub fn suggestions_from_json(payload: &Value, text: &str) -> Vec<Suggestion> {
    let Some(records) = payload.as_array() else {
        return Vec::new();
    };
    records
        .iter()
        .filter_map(suggestion_from_value)
        .filter(|s| !s.is_acronym_false_positive(text))
        .collect()
}

fn suggestion_from_value(record: &Value) -> Option<Suggestion> {
    let offset = record.get("offset")?.as_u64()? as usize;
    let length = record.get("length")?.as_u64()? as usize;
    let message = record.get("message")?.as_str()?.to_string();
    let rule_id = record.get("ruleId")?.as_str()?.to_string();
    // Older service versions label the category field `errorType`.
    let category = record
        .get("category")
        .or_else(|| record.get("errorType"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let replacements = record
        .get("replacements")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|r| {
                    // Plain strings, or `{ "value": … }` objects.
                    r.as_str()
                        .or_else(|| r.get("value").and_then(Value::as_str))
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Suggestion {
        offset,
        length,
        message,
        rule_id,
        category,
        replacements,
    })
}

/// One criterion from the evaluation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCriterion {
    /// Criterion name (the mapping key).
    pub name: String,
    /// Whether the text already satisfies this criterion.
    pub passed: bool,
    /// Short explanation from the evaluator, if present.
    pub justification: Option<String>,
    /// A question to help the user improve; present only for failed criteria.
    pub question: Option<String>,
}

/// Parse a step-1 `/llm` response into ordered criteria.
///
/// Unwraps optional `result` and `evaluation` envelopes, then reads the
/// criterion mapping in payload order. Returns `None` when no criterion
/// mapping can be found (e.g. the service returned an error string).
pub fn evaluation_from_json(payload: &Value) -> Option<Vec<ReviewCriterion>> {
    let inner = unwrap_envelope(payload);
    let map = inner.as_object()?;
    let criteria = map
        .iter()
        .filter_map(|(name, entry)| {
            let passed = entry.get("passed")?.as_bool()?;
            let justification = entry
                .get("justification")
                .and_then(Value::as_str)
                .map(str::to_string);
            let question = entry
                .get("question")
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(ReviewCriterion {
                name: name.clone(),
                passed,
                justification,
                question,
            })
        })
        .collect::<Vec<_>>();
    if criteria.is_empty() {
        return None;
    }
    Some(criteria)
}

/// Parse a step-2 `/llm` response into the rewritten text.
///
/// The field name varies between deployments; resolution is by first-present
/// field (`rewritten_problem_statement`, then `rewrite`), never both.
pub fn rewrite_from_json(payload: &Value) -> Option<String> {
    let inner = unwrap_envelope(payload);
    for field in ["rewritten_problem_statement", "rewrite"] {
        if let Some(rewrite) = inner.get(field).and_then(Value::as_str) {
            return Some(rewrite.to_string());
        }
    }
    None
}

/// Parse a `/speech-to-text` response into the transcription string.
pub fn transcription_from_json(payload: &Value) -> Option<String> {
    payload
        .get("transcription")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Strip the optional `result` envelope, then an optional `evaluation` key.
fn unwrap_envelope(payload: &Value) -> &Value {
    let inner = payload.get("result").unwrap_or(payload);
    inner.get("evaluation").unwrap_or(inner)
}
