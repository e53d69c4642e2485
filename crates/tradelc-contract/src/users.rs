//! # User Directory
//!
//! Accounts are stored as JSON under their username, sharing the key space
//! with LC records. An account is written once and never updated.

use subtle::ConstantTimeEq;
use tradelc_core::{LedgerError, LedgerResult, StateStore, StoreError, User, LC_KEYS};

/// Account creation and login.
#[derive(Debug, Clone)]
pub struct UserDirectory<S> {
    store: S,
}

impl<S: StateStore> UserDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an account. Fails if any readable user record already exists
    /// under `username`.
    pub fn create_user(&self, username: &str, password: &str, role: &str) -> LedgerResult<User> {
        if username.is_empty() {
            return Err(LedgerError::Validation("username must not be empty".to_string()));
        }
        if username == LC_KEYS {
            return Err(LedgerError::Validation(format!(
                "username {LC_KEYS} is a reserved key"
            )));
        }
        if let Some(bytes) = self.existing(username)? {
            User::from_json(&bytes).map_err(|e| {
                LedgerError::Deserialization(format!("error unmarshalling user {username}: {e}"))
            })?;
            return Err(LedgerError::Duplicate(format!(
                "can't reinitialize existing user {username}"
            )));
        }

        let user = User::new(username, password, role);
        let bytes = serde_json::to_vec(&user)
            .map_err(|e| LedgerError::Write(format!("error marshalling user: {e}")))?;
        self.store.put(username, &bytes)?;
        tracing::info!(username, role, "user created");
        Ok(user)
    }

    /// Check credentials and return the stored record.
    pub fn login(&self, username: &str, password: &str) -> LedgerResult<User> {
        let bytes = self
            .existing(username)?
            .ok_or_else(|| LedgerError::NotFound(format!("user not found: {username}")))?;
        let user = User::from_json(&bytes).map_err(|e| {
            LedgerError::Deserialization(format!("error unmarshalling user {username}: {e}"))
        })?;

        if !bool::from(user.password.as_bytes().ct_eq(password.as_bytes())) {
            tracing::warn!(username, "login rejected");
            return Err(LedgerError::Auth("invalid password".to_string()));
        }
        tracing::debug!(username, "login accepted");
        Ok(user)
    }

    /// Stored bytes, treating an empty value like an absent key.
    fn existing(&self, username: &str) -> LedgerResult<Option<Vec<u8>>> {
        match self.store.get(username) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
