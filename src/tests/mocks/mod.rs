//! Test doubles for the thesaurus transport.
//!
//! [`GatedTransport`] parks every fetch until the test resolves its [`Gate`],
//! so tests decide the order in which requests complete. Dropping a gate
//! without resolving it fails the fetch with `Cancelled`.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::core::thesaurus::{Result, ThesaurusError, ThesaurusTransport};

// ============================================================================
// Gated Transport
// ============================================================================

/// Handle deciding how one parked fetch completes.
pub struct Gate {
    tx: oneshot::Sender<Result<Value>>,
}

impl Gate {
    /// Complete the fetch. Returns false if the fetch was already dropped.
    pub fn resolve(self, outcome: Result<Value>) -> bool {
        self.tx.send(outcome).is_ok()
    }

    /// Whether the waiting fetch has been dropped (aborted).
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Default)]
pub struct GatedTransport {
    gates: Mutex<HashMap<String, VecDeque<oneshot::Receiver<Result<Value>>>>>,
    calls: Mutex<Vec<String>>,
}

impl GatedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Park the next fetch for `query` until the returned gate is resolved.
    pub fn gate(&self, query: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push_back(rx);
        Gate { tx }
    }

    /// Queries fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Yield until `n` fetches have started, failing after a second.
    pub async fn wait_for_calls(&self, n: usize) {
        let waited = tokio::time::timeout(Duration::from_secs(1), async {
            while self.calls.lock().unwrap().len() < n {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(waited.is_ok(), "expected {n} fetches, saw {:?}", self.calls());
    }
}

#[async_trait]
impl ThesaurusTransport for GatedTransport {
    async fn fetch(&self, query: &str) -> Result<Value> {
        let rx = {
            self.calls.lock().unwrap().push(query.to_string());
            self.gates
                .lock()
                .unwrap()
                .get_mut(query)
                .and_then(VecDeque::pop_front)
        };

        match rx {
            Some(rx) => rx.await.unwrap_or(Err(ThesaurusError::Cancelled)),
            None => Err(ThesaurusError::transport(format!(
                "no response gated for '{query}'"
            ))),
        }
    }
}

/// Yield until `gate`'s fetch has been dropped, failing after a second.
pub async fn wait_until_abandoned(gate: &Gate) {
    let waited = tokio::time::timeout(Duration::from_secs(1), async {
        while !gate.is_abandoned() {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(waited.is_ok(), "superseded fetch was never dropped");
}

// ============================================================================
// Payload fixtures
// ============================================================================

/// One `(definition, synonyms, antonyms)` triple per sense.
pub type SenseSpec<'a> = (&'a str, &'a [&'a str], &'a [&'a str]);

/// A one-record payload whose headword is `word`.
pub fn payload(word: &str, senses: &[SenseSpec<'_>]) -> Value {
    json!([record(word, "verb", senses)])
}

pub fn record(word: &str, fl: &str, senses: &[SenseSpec<'_>]) -> Value {
    json!({
        "meta": {
            "id": word,
            "syns": senses.iter().map(|(_, s, _)| s.to_vec()).collect::<Vec<_>>(),
            "ants": senses.iter().map(|(_, _, a)| a.to_vec()).collect::<Vec<_>>(),
        },
        "fl": fl,
        "shortdef": senses.iter().map(|(d, _, _)| *d).collect::<Vec<_>>(),
    })
}

/// Payload with a single sense whose only synonym is `synonym`.
pub fn simple_payload(word: &str, synonym: &str) -> Value {
    payload(word, &[("a meaning", &[synonym], &[])])
}
