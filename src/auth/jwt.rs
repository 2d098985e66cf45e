//! JWT access tokens for survey readers.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{SurveyError, SurveyResult};

/// JWT claims for authenticated readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_duration: Duration,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_duration: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_duration,
        }
    }

    /// Lifetime of newly issued tokens.
    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    /// Generate a token for `subject` issued now.
    pub fn generate_token(&self, subject: &str) -> SurveyResult<String> {
        self.generate_token_at(subject, Utc::now())
    }

    /// Generate a token for `subject` as if issued at `issued_at`.
    pub fn generate_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> SurveyResult<String> {
        let exp = issued_at + self.token_duration;

        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SurveyError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a JWT token.
    ///
    /// Bad signatures, foreign issuers and expired tokens all fail with the
    /// same error.
    pub fn validate_token(&self, token: &str) -> SurveyResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                SurveyError::Auth("Could not validate credentials".to_string())
            })?;

        Ok(token_data.claims)
    }
}
