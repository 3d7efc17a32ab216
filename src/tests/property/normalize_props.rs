//! Property-based tests for the Response Normalizer
//!
//! Tests invariants:
//! - Output length equals the length of the leading run of matching ids
//! - A mismatching first record always yields no entries
//! - Every output entry's word equals the query
//! - Senses follow `shortdef` one-to-one

use proptest::prelude::*;
use serde_json::Value;

use crate::core::thesaurus::normalize;
use crate::tests::mocks::record;

// ============================================================================
// Strategies
// ============================================================================

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn arb_words(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 0..max)
}

/// Senses as (definition, synonyms, antonyms).
fn arb_senses() -> impl Strategy<Value = Vec<(String, Vec<String>, Vec<String>)>> {
    prop::collection::vec(("[a-z ]{1,20}", arb_words(4), arb_words(4)), 0..4)
}

fn build_record(id: &str, senses: &[(String, Vec<String>, Vec<String>)]) -> Value {
    let specs: Vec<(&str, Vec<&str>, Vec<&str>)> = senses
        .iter()
        .map(|(d, s, a)| {
            (
                d.as_str(),
                s.iter().map(String::as_str).collect(),
                a.iter().map(String::as_str).collect(),
            )
        })
        .collect();
    let specs: Vec<(&str, &[&str], &[&str])> = specs
        .iter()
        .map(|(d, s, a)| (*d, s.as_slice(), a.as_slice()))
        .collect();
    record(id, "noun", &specs)
}

/// A payload for `query`: each flag says whether that record's id matches.
fn arb_payload() -> impl Strategy<Value = (String, Vec<bool>, Vec<Vec<(String, Vec<String>, Vec<String>)>>)> {
    (arb_word(), prop::collection::vec(any::<bool>(), 0..8)).prop_flat_map(|(query, flags)| {
        let n = flags.len();
        (
            Just(query),
            Just(flags),
            prop::collection::vec(arb_senses(), n),
        )
    })
}

fn payload_for(query: &str, flags: &[bool], senses: &[Vec<(String, Vec<String>, Vec<String>)>]) -> Value {
    let other = format!("{query}x");
    Value::Array(
        flags
            .iter()
            .zip(senses)
            .map(|(&matches, senses)| build_record(if matches { query } else { &other }, senses))
            .collect(),
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_keeps_leading_run_of_matches((query, flags, senses) in arb_payload()) {
        let payload = payload_for(&query, &flags, &senses);
        let entries = normalize(payload, &query).unwrap();

        let expected = flags.iter().take_while(|&&m| m).count();
        prop_assert_eq!(entries.len(), expected);
        for entry in &entries {
            prop_assert_eq!(&entry.word, &query);
        }
    }

    #[test]
    fn prop_first_mismatch_yields_nothing(
        (query, mut flags, senses) in arb_payload().prop_filter("need a record", |(_, f, _)| !f.is_empty())
    ) {
        flags[0] = false;
        let payload = payload_for(&query, &flags, &senses);
        prop_assert!(normalize(payload, &query).unwrap().is_empty());
    }

    #[test]
    fn prop_senses_follow_shortdef(query in arb_word(), senses in arb_senses()) {
        let payload = Value::Array(vec![build_record(&query, &senses)]);
        let entries = normalize(payload, &query).unwrap();

        prop_assert_eq!(entries.len(), 1);
        prop_assert_eq!(entries[0].senses.len(), senses.len());
        for (sense, (definition, synonyms, antonyms)) in entries[0].senses.iter().zip(&senses) {
            prop_assert_eq!(&sense.definition, definition);
            prop_assert_eq!(&sense.synonyms, synonyms);
            prop_assert_eq!(&sense.antonyms, antonyms);
        }
    }

    #[test]
    fn prop_normalize_is_deterministic((query, flags, senses) in arb_payload()) {
        let payload = payload_for(&query, &flags, &senses);
        let first = normalize(payload.clone(), &query).unwrap();
        let second = normalize(payload, &query).unwrap();
        prop_assert_eq!(first, second);
    }
}
