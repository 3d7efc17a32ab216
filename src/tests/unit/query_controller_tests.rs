//! Query Controller behaviour: token supersession, silent cancellation,
//! failure reporting, and the empty-query shortcut.

use std::sync::Arc;

use serde_json::json;

use crate::core::thesaurus::{
    MockThesaurusTransport, QueryController, SearchOutcome, ThesaurusError, SEARCH_FAILURE_TITLE,
};
use crate::tests::mocks::{payload, simple_payload, wait_until_abandoned, GatedTransport};

fn words(controller: &QueryController) -> Vec<&str> {
    controller
        .state()
        .results
        .iter()
        .map(|e| e.word.as_str())
        .collect()
}

fn first_synonym(controller: &QueryController) -> Option<&str> {
    controller
        .state()
        .results
        .first()
        .and_then(|e| e.senses.first())
        .and_then(|s| s.synonyms.first())
        .map(String::as_str)
}

// ============================================================================
// Session start & empty query
// ============================================================================

#[test]
fn test_new_controller_is_loading_with_no_results() {
    let controller = QueryController::new(GatedTransport::new());
    assert!(controller.state().is_loading);
    assert!(controller.state().results.is_empty());
}

#[test]
fn test_start_runs_empty_submit() {
    let transport = GatedTransport::new();
    let controller = QueryController::start(transport.clone());
    assert!(!controller.state().is_loading);
    assert!(controller.state().results.is_empty());
    assert_eq!(controller.active_token().generation(), 1);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_empty_submit_never_fetches() {
    let mut transport = MockThesaurusTransport::new();
    transport.expect_fetch().never();
    let mut controller = QueryController::start(Arc::new(transport));

    controller.submit("");
    controller.submit("");

    assert!(!controller.state().is_loading);
    assert!(controller.state().results.is_empty());
    assert_eq!(controller.settle().await, None);
}

#[tokio::test]
async fn test_empty_submit_clears_previous_results() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let gate = transport.gate("begin");
    controller.submit("begin");
    gate.resolve(Ok(simple_payload("begin", "start")));
    assert_eq!(controller.settle().await, Some(SearchOutcome::Applied { count: 1 }));

    controller.submit("");
    assert!(controller.state().results.is_empty());
    assert!(!controller.state().is_loading);
}

#[tokio::test]
async fn test_empty_submit_supersedes_in_flight_request() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let gate = transport.gate("slow");
    controller.submit("slow");
    transport.wait_for_calls(1).await;

    controller.submit("");
    wait_until_abandoned(&gate).await;
    assert!(!gate.resolve(Ok(simple_payload("slow", "sluggish"))));

    assert!(controller.poll().is_empty());
    assert!(controller.state().results.is_empty());
    assert!(!controller.state().is_loading);
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_submit_keeps_previous_results_while_loading() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let gate = transport.gate("happy");
    controller.submit("happy");
    gate.resolve(Ok(simple_payload("happy", "glad")));
    controller.settle().await;
    assert_eq!(words(&controller), ["happy"]);

    let _pending = transport.gate("sad");
    controller.submit("sad");
    assert!(controller.state().is_loading);
    assert_eq!(words(&controller), ["happy"]);
}

#[tokio::test]
async fn test_mock_transport_called_once_per_submit() {
    let mut transport = MockThesaurusTransport::new();
    transport
        .expect_fetch()
        .times(1)
        .returning(|q| Ok(simple_payload(q, "commence")));
    let mut controller = QueryController::start(Arc::new(transport));

    controller.submit("begin");
    let outcome = controller.settle().await;

    assert_eq!(outcome, Some(SearchOutcome::Applied { count: 1 }));
    assert_eq!(words(&controller), ["begin"]);
    assert_eq!(first_synonym(&controller), Some("commence"));
    assert!(!controller.state().is_loading);
}

#[tokio::test]
async fn test_applied_results_are_normalized() {
    let mut transport = MockThesaurusTransport::new();
    transport.expect_fetch().returning(|q| {
        Ok(payload(
            q,
            &[
                ("to begin", &["commence"], &["end"]),
                ("to start", &["originate"], &["finish"]),
            ],
        ))
    });
    let mut controller = QueryController::start(Arc::new(transport));

    controller.submit("begin");
    controller.settle().await;

    let entry = &controller.state().results[0];
    assert_eq!(entry.senses.len(), 2);
    assert_eq!(entry.senses[1].definition, "to start");
    assert_eq!(entry.senses[1].antonyms, ["finish"]);
}

// ============================================================================
// Supersession
// ============================================================================

#[tokio::test]
async fn test_same_query_twice_only_second_is_observable() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let first = transport.gate("set");
    let second = transport.gate("set");

    controller.submit("set");
    transport.wait_for_calls(1).await;
    let token = controller.submit("set");
    transport.wait_for_calls(2).await;

    // The first fetch was aborted; even if it had resolved, it is stale.
    wait_until_abandoned(&first).await;
    assert!(!first.resolve(Ok(simple_payload("set", "first"))));
    assert!(controller.poll().is_empty());
    assert!(controller.state().is_loading);

    second.resolve(Ok(simple_payload("set", "second")));
    assert_eq!(controller.settle().await, Some(SearchOutcome::Applied { count: 1 }));
    assert!(controller.is_current(token));
    assert_eq!(first_synonym(&controller), Some("second"));
}

#[tokio::test]
async fn test_out_of_order_completion_is_discarded() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let hap = transport.gate("hap");
    controller.submit("hap");
    hap.resolve(Ok(simple_payload("hap", "luck")));

    // Hold the finished completion, then supersede it before applying.
    let stale = controller.next_completion().await.expect("completion");
    let happy = transport.gate("happy");
    let token = controller.submit("happy");

    assert_ne!(stale.token(), token);
    assert_eq!(stale.query(), "hap");
    assert_eq!(controller.apply(stale), SearchOutcome::Stale);
    assert!(controller.state().is_loading);
    assert!(controller.state().results.is_empty());

    happy.resolve(Ok(simple_payload("happy", "glad")));
    assert_eq!(controller.settle().await, Some(SearchOutcome::Applied { count: 1 }));
    assert_eq!(words(&controller), ["happy"]);
}

#[tokio::test]
async fn test_stale_failure_is_not_reported() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let old = transport.gate("old");
    controller.submit("old");
    old.resolve(Err(ThesaurusError::transport("boom")));
    let stale = controller.next_completion().await.expect("completion");

    let new = transport.gate("new");
    controller.submit("new");
    assert_eq!(controller.apply(stale), SearchOutcome::Stale);
    assert!(controller.state().is_loading);

    new.resolve(Ok(simple_payload("new", "fresh")));
    assert_eq!(controller.settle().await, Some(SearchOutcome::Applied { count: 1 }));
}

#[tokio::test]
async fn test_tokens_increase_per_submit() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());
    let _a = transport.gate("a");
    let _b = transport.gate("b");

    let a = controller.submit("a");
    let b = controller.submit("b");
    assert!(b > a);
    assert!(!controller.is_current(a));
    assert!(controller.is_current(b));
}

// ============================================================================
// Failures, cancellation & timeouts
// ============================================================================

#[tokio::test]
async fn test_failure_keeps_results_and_reports_once() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let q1 = transport.gate("q1");
    controller.submit("q1");
    q1.resolve(Ok(simple_payload("q1", "one")));
    controller.settle().await;

    let q2 = transport.gate("q2");
    controller.submit("q2");
    q2.resolve(Err(ThesaurusError::transport("Thesaurus API error 503: down")));

    let mut failures = Vec::new();
    while let Some(outcome) = controller.settle().await {
        if let SearchOutcome::Failed(failure) = outcome {
            failures.push(failure);
        }
    }

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].title, SEARCH_FAILURE_TITLE);
    assert_eq!(failures[0].message, "Thesaurus API error 503: down");
    assert_eq!(words(&controller), ["q1"]);
    assert!(!controller.state().is_loading);
}

#[tokio::test]
async fn test_malformed_payload_is_reported_like_transport_failure() {
    let mut transport = MockThesaurusTransport::new();
    transport
        .expect_fetch()
        .returning(|_| Ok(json!({"error": "not an array"})));
    let mut controller = QueryController::start(Arc::new(transport));

    controller.submit("word");
    match controller.settle().await {
        Some(SearchOutcome::Failed(failure)) => {
            assert!(failure.message.starts_with("Malformed response"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!controller.state().is_loading);
}

#[tokio::test]
async fn test_suggestion_payload_lists_suggestions() {
    let mut transport = MockThesaurusTransport::new();
    transport
        .expect_fetch()
        .returning(|_| Ok(json!(["happy", "hippy", "harpy"])));
    let mut controller = QueryController::start(Arc::new(transport));

    controller.submit("hapy");
    match controller.settle().await {
        Some(SearchOutcome::Failed(failure)) => {
            assert!(failure.message.contains("happy, hippy, harpy"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_active_request_clears_loading_silently() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let ok = transport.gate("fast");
    controller.submit("fast");
    ok.resolve(Ok(simple_payload("fast", "quick")));
    controller.settle().await;

    let gate = transport.gate("word");
    controller.submit("word");
    transport.wait_for_calls(2).await;
    // Dropping the gate fails the fetch with `Cancelled`.
    drop(gate);

    assert_eq!(controller.settle().await, Some(SearchOutcome::Cancelled));
    assert!(!controller.state().is_loading);
    assert_eq!(words(&controller), ["fast"]);
    assert_eq!(controller.settle().await, None);
}

#[tokio::test]
async fn test_timeout_clears_loading_without_report() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let ok = transport.gate("fast");
    controller.submit("fast");
    ok.resolve(Ok(simple_payload("fast", "quick")));
    controller.settle().await;

    let slow = transport.gate("slow");
    controller.submit("slow");
    slow.resolve(Err(ThesaurusError::TimedOut));

    assert_eq!(controller.settle().await, Some(SearchOutcome::TimedOut));
    assert!(!controller.state().is_loading);
    assert_eq!(words(&controller), ["fast"]);
}

#[tokio::test]
async fn test_shutdown_aborts_in_flight_request() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let gate = transport.gate("word");
    controller.submit("word");
    transport.wait_for_calls(1).await;

    controller.shutdown();
    wait_until_abandoned(&gate).await;
    assert_eq!(controller.settle().await, None);
}

#[tokio::test]
async fn test_drop_aborts_in_flight_request() {
    let transport = GatedTransport::new();
    let mut controller = QueryController::start(transport.clone());

    let gate = transport.gate("word");
    controller.submit("word");
    transport.wait_for_calls(1).await;

    drop(controller);
    wait_until_abandoned(&gate).await;
}
