//! Property-based tests for flattened word views
//!
//! Tests invariants:
//! - "both" is the per-sense interleaving of synonyms then antonyms
//! - Lengths add up; nothing is deduplicated
//! - Synonyms and antonyms views are sub-sequences of "both"

use proptest::prelude::*;

use crate::core::thesaurus::{flatten, Entry, Sense, WordKind};

fn arb_sense() -> impl Strategy<Value = Sense> {
    (
        "[a-z ]{1,20}",
        prop::collection::vec("[a-c]{1,2}", 0..5),
        prop::collection::vec("[a-c]{1,2}", 0..5),
    )
        .prop_map(|(definition, synonyms, antonyms)| Sense {
            definition,
            synonyms,
            antonyms,
        })
}

fn arb_entry() -> impl Strategy<Value = Entry> {
    ("[a-z]{1,8}", prop::collection::vec(arb_sense(), 0..5)).prop_map(|(word, senses)| Entry {
        word,
        label: "verb".to_string(),
        senses,
    })
}

proptest! {
    #[test]
    fn prop_both_is_per_sense_concatenation(entry in arb_entry()) {
        let expected: Vec<&str> = entry
            .senses
            .iter()
            .flat_map(|s| s.synonyms.iter().chain(&s.antonyms).map(String::as_str))
            .collect();
        prop_assert_eq!(flatten(&entry, WordKind::Both), expected);
    }

    #[test]
    fn prop_lengths_add_up(entry in arb_entry()) {
        let syns = flatten(&entry, WordKind::Synonyms).len();
        let ants = flatten(&entry, WordKind::Antonyms).len();
        let both = flatten(&entry, WordKind::Both).len();
        prop_assert_eq!(syns + ants, both);

        let total: usize = entry.senses.iter().map(|s| s.synonyms.len()).sum();
        prop_assert_eq!(syns, total);
    }

    #[test]
    fn prop_synonyms_keep_sense_order(entry in arb_entry()) {
        let expected: Vec<&str> = entry
            .senses
            .iter()
            .flat_map(|s| s.synonyms.iter().map(String::as_str))
            .collect();
        prop_assert_eq!(flatten(&entry, WordKind::Synonyms), expected);
    }
}
