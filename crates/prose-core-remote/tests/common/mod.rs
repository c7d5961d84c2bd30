//! Shared integration-test plumbing: a scripted transport plus a pump loop.
#![allow(dead_code)]

use prose_core_remote::{ProofingSession, Transport, TransportError};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Transport that records every call and answers from a scripted queue.
///
/// The worker thread blocks until a response has been queued, so tests may
/// queue responses before or after triggering the call.
pub struct ScriptedTransport {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    responses: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
}

/// Test-side handle onto a [`ScriptedTransport`].
#[derive(Clone)]
pub struct Script {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    responses: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
}

impl Script {
    /// Queue the next response.
    pub fn respond(&self, response: Result<Value, TransportError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Every call made so far, as `(path, body)` pairs in order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

/// Build a transport plus its test-side handle.
pub fn scripted() -> (ScriptedTransport, Script) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let responses = Arc::new(Mutex::new(VecDeque::new()));
    (
        ScriptedTransport {
            calls: calls.clone(),
            responses: responses.clone(),
        },
        Script { calls, responses },
    )
}

impl ScriptedTransport {
    fn record_and_answer(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push((path.to_string(), body));
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if let Some(response) = self.responses.lock().unwrap().pop_front() {
                return response;
            }
            if Instant::now() >= deadline {
                return Err(TransportError::Network("no scripted response".to_string()));
            }
            thread::sleep(Duration::from_millis(1));
        }
    }
}

impl Transport for ScriptedTransport {
    fn check(&mut self, body: &Value) -> Result<Value, TransportError> {
        self.record_and_answer("check", body.clone())
    }

    fn llm(&mut self, body: &Value) -> Result<Value, TransportError> {
        self.record_and_answer("llm", body.clone())
    }

    fn transcribe(&mut self, audio: &[u8], mime: &str) -> Result<Value, TransportError> {
        self.record_and_answer(
            "speech-to-text",
            json!({ "bytes": audio.len(), "mime": mime }),
        )
    }
}

/// Tick the session at a fixed logical instant until `done` holds.
///
/// Wall-clock bounded so a wedged worker fails the test instead of hanging it.
pub fn pump_until(
    session: &mut ProofingSession,
    now: Instant,
    mut done: impl FnMut(&ProofingSession) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        session.tick(now);
        if done(session) {
            return;
        }
        assert!(Instant::now() < deadline, "pump_until timed out");
        thread::sleep(Duration::from_millis(2));
    }
}

/// Tick the session long enough for any in-flight worker round trip to land.
///
/// Used when the expected outcome is "nothing changed" and there is no state
/// transition to wait for.
pub fn settle(session: &mut ProofingSession, now: Instant) {
    for _ in 0..100 {
        session.tick(now);
        thread::sleep(Duration::from_millis(2));
    }
}

/// A raw check-response record flagging `flagged` at `offset`.
pub fn check_record(offset: usize, flagged: &str, replacement: &str) -> Value {
    json!({
        "offset": offset,
        "length": flagged.chars().count(),
        "message": format!("Possible spelling mistake: {flagged}"),
        "ruleId": "MORFOLOGIK_RULE_EN_US",
        "errorType": "typos",
        "replacements": [replacement],
    })
}
