/// Thesaurus TUI - incremental thesaurus search in the terminal
///
/// Core library: the debounced, cancellable search pipeline against a remote
/// thesaurus service, the response normalizer, and the ratatui display host.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
