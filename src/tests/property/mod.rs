//! Property-based tests for the thesaurus pipeline
//!
//! - `normalize_props`: the normalizer keeps exactly the leading run of
//!   records whose `meta.id` equals the query, and never panics on
//!   well-formed records
//! - `flatten_props`: flattened views preserve order and lose no words
//!
//! Case count follows `PROPTEST_CASES` (default 256).

mod flatten_props;
mod normalize_props;
