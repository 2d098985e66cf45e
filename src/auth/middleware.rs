//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::AuthGate;
use crate::error::SurveyError;

/// Authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct Subject(pub String);

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Extract and validate the bearer token from request.
///
/// Expects `Authorization: Bearer <token>` header.
pub async fn require_bearer(
    State(gate): State<AuthGate>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, SurveyError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            tracing::debug!("Missing bearer token");
            SurveyError::Auth("Not authenticated".to_string())
        })?;

    let subject = gate.verify_token(token)?;

    request.extensions_mut().insert(Subject(subject));

    Ok(next.run(request).await)
}
