//! Thesaurus search pipeline: transport, normalizer, and query controller.

pub mod client;
pub mod controller;
pub mod error;
pub mod models;
pub mod normalize;

pub use client::{DictionaryApiClient, ThesaurusTransport, DEFAULT_ENDPOINT};
#[cfg(test)]
pub use client::MockThesaurusTransport;
pub use controller::{
    QueryController, RequestToken, SearchCompletion, SearchFailure, SearchOutcome,
    SEARCH_FAILURE_TITLE,
};
pub use error::{Result, ThesaurusError};
pub use models::{flatten, Entry, ListMode, SearchState, Sense, WordKind};
pub use normalize::{normalize, normalize_body};
