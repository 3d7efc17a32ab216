pub mod credentials;
pub mod logging;
pub mod thesaurus;
