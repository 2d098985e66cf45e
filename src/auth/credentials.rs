//! Fixed credential table loaded from configuration.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// Configured reader account from config file.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ConfiguredUser {
    /// Login name, also the token subject.
    pub username: String,
    /// Password hash (SHA256 hex).
    pub password_hash: String,
}

/// Hash a password the way configured hashes are written.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory credential table keyed by username.
#[derive(Clone)]
pub struct CredentialStore {
    users: HashMap<String, ConfiguredUser>,
}

impl CredentialStore {
    /// Create a new store from configured users.
    pub fn new(users: Vec<ConfiguredUser>) -> Self {
        let users = users
            .into_iter()
            .map(|u| (u.username.clone(), u))
            .collect();
        Self { users }
    }

    /// Number of configured accounts.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Authenticate a user with username and password.
    ///
    /// The password is hashed whether or not the user exists.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&ConfiguredUser> {
        let presented = hash_password(password);
        self.users
            .get(username)
            .filter(|user| user.password_hash.eq_ignore_ascii_case(&presented))
    }
}
