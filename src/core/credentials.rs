//! Secure Credential Storage
//!
//! Keeps the thesaurus API key in the system keychain (Keyring).

use keyring::Entry;
use thiserror::Error;

const SERVICE_NAME: &str = "thesaurus-tui";

/// Keyring account under which the API key is stored.
pub const API_KEY_ACCOUNT: &str = "dictionaryapi-key";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keyring error: {0}")]
    KeyringError(#[from] keyring::Error),

    #[error("Credential not found: {0}")]
    NotFound(String),

    #[error("Invalid credential format")]
    InvalidFormat,
}

pub type Result<T> = std::result::Result<T, CredentialError>;

// ============================================================================
// Credential Manager
// ============================================================================

pub struct CredentialManager {
    service: String,
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialManager {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Store the API key, replacing any previous one.
    pub fn store_api_key(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if !is_plausible_api_key(api_key) {
            return Err(CredentialError::InvalidFormat);
        }
        let entry = Entry::new(&self.service, API_KEY_ACCOUNT)?;
        entry.set_password(api_key)?;
        log::info!("Stored API key in keyring service '{}'", self.service);
        Ok(())
    }

    /// Retrieve the stored API key.
    pub fn get_api_key(&self) -> Result<String> {
        let entry = Entry::new(&self.service, API_KEY_ACCOUNT)?;
        match entry.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => {
                Err(CredentialError::NotFound(API_KEY_ACCOUNT.to_string()))
            }
            Err(e) => Err(CredentialError::KeyringError(e)),
        }
    }

    /// Delete the stored API key. Deleting a missing key is not an error.
    pub fn delete_api_key(&self) -> Result<()> {
        let entry = Entry::new(&self.service, API_KEY_ACCOUNT)?;
        match entry.delete_password() {
            Ok(()) => {
                log::info!("Deleted API key from keyring service '{}'", self.service);
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CredentialError::KeyringError(e)),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_ok()
    }
}

/// Keys are opaque tokens: non-empty, no whitespace.
pub fn is_plausible_api_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}
