//! Login and token verification for survey readers.

use crate::auth::{CredentialStore, JwtManager};
use crate::error::{SurveyError, SurveyResult};

/// Issues bearer tokens from the credential table and verifies them.
#[derive(Clone)]
pub struct AuthGate {
    jwt_manager: JwtManager,
    credentials: CredentialStore,
}

impl AuthGate {
    pub fn new(jwt_manager: JwtManager, credentials: CredentialStore) -> Self {
        Self {
            jwt_manager,
            credentials,
        }
    }

    pub fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    /// Check a username/password pair, returning the subject on success.
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub fn authenticate(&self, username: &str, password: &str) -> SurveyResult<String> {
        self.credentials
            .authenticate(username, password)
            .map(|user| user.username.clone())
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Failed login attempt");
                SurveyError::Auth("Incorrect username or password".to_string())
            })
    }

    /// Mint a signed access token for `subject`.
    pub fn issue_token(&self, subject: &str) -> SurveyResult<String> {
        self.jwt_manager.generate_token(subject)
    }

    /// Verify a token and return its subject.
    pub fn verify_token(&self, token: &str) -> SurveyResult<String> {
        self.jwt_manager.validate_token(token).map(|claims| claims.sub)
    }
}
