//! Thesaurus Models
//!
//! Strict domain types produced by the normalizer, plus the stateless
//! projections (flattened word lists, display modes) the display host reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Entries
// ============================================================================

/// One numbered meaning of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    pub definition: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

/// One headword matching the query, with its senses in upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Never empty.
    pub word: String,
    /// Part-of-speech tag, may be empty.
    pub label: String,
    pub senses: Vec<Sense>,
}

impl Entry {
    /// Flattened word list for this entry. See [`flatten`].
    pub fn words(&self, kind: WordKind) -> Vec<&str> {
        flatten(self, kind)
    }
}

// ============================================================================
// Search State
// ============================================================================

/// What the display host renders. Only the query controller mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchState {
    pub results: Vec<Entry>,
    pub is_loading: bool,
}

impl SearchState {
    /// Session-start state: no results, initial request pending.
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            is_loading: true,
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Flattened Views
// ============================================================================

/// Which words a flattened view collects from each sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordKind {
    Synonyms,
    Antonyms,
    /// Per sense: synonyms, then antonyms.
    Both,
}

/// Flatten an entry's senses into a single word list.
///
/// Sense order and within-sense order are preserved. Words repeated across
/// senses are kept.
pub fn flatten(entry: &Entry, kind: WordKind) -> Vec<&str> {
    entry
        .senses
        .iter()
        .flat_map(|sense| {
            let empty: &[String] = &[];
            let (synonyms, antonyms) = match kind {
                WordKind::Synonyms => (sense.synonyms.as_slice(), empty),
                WordKind::Antonyms => (empty, sense.antonyms.as_slice()),
                WordKind::Both => (sense.synonyms.as_slice(), sense.antonyms.as_slice()),
            };
            synonyms.iter().chain(antonyms.iter()).map(String::as_str)
        })
        .collect()
}

// ============================================================================
// Display Mode
// ============================================================================

/// How results are listed: one row per entry, or one row per flattened word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    #[default]
    #[serde(alias = "e")]
    Entries,
    #[serde(alias = "s")]
    Synonyms,
    #[serde(alias = "a")]
    Antonyms,
    #[serde(alias = "b")]
    Both,
}

impl ListMode {
    pub const ALL: [ListMode; 4] = [
        ListMode::Entries,
        ListMode::Synonyms,
        ListMode::Antonyms,
        ListMode::Both,
    ];

    /// The flattening this mode projects, or `None` for per-entry rows.
    pub fn word_kind(self) -> Option<WordKind> {
        match self {
            ListMode::Entries => None,
            ListMode::Synonyms => Some(WordKind::Synonyms),
            ListMode::Antonyms => Some(WordKind::Antonyms),
            ListMode::Both => Some(WordKind::Both),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListMode::Entries => "Entries",
            ListMode::Synonyms => "Synonyms",
            ListMode::Antonyms => "Antonyms",
            ListMode::Both => "Both",
        }
    }

    /// Search bar placeholder for this mode.
    pub fn placeholder(self) -> &'static str {
        match self {
            ListMode::Synonyms => "Search Synonyms...",
            ListMode::Antonyms => "Search Antonyms...",
            ListMode::Entries | ListMode::Both => "Search Thesaurus...",
        }
    }

    pub fn next(self) -> ListMode {
        let idx = ListMode::ALL.iter().position(|&m| m == self).unwrap_or(0);
        ListMode::ALL[(idx + 1) % ListMode::ALL.len()]
    }

    pub fn prev(self) -> ListMode {
        let idx = ListMode::ALL.iter().position(|&m| m == self).unwrap_or(0);
        ListMode::ALL[(idx + ListMode::ALL.len() - 1) % ListMode::ALL.len()]
    }
}

impl fmt::Display for ListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown list mode '{0}' (expected entries, synonyms, antonyms or both)")]
pub struct ParseModeError(pub String);

impl FromStr for ListMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "entries" => Ok(ListMode::Entries),
            "s" | "synonyms" => Ok(ListMode::Synonyms),
            "a" | "antonyms" => Ok(ListMode::Antonyms),
            "b" | "both" => Ok(ListMode::Both),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
