//! Route definitions for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::require_bearer;
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::submit_survey,
        handlers::list_responses,
        handlers::issue_token,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::HealthResponse,
        crate::api::types::TokenRequest,
        crate::api::types::TokenResponse,
        crate::domain::SurveySubmission,
        crate::domain::SurveyRecord,
        crate::domain::SurveyReceipt,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "surveys", description = "Survey submission and retrieval"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Survey Intake API",
        version = "0.1.0",
        description = "Field survey intake - stores interviewer submissions behind a bearer-token read API",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    // Routes requiring a bearer token
    let reader_routes = Router::new()
        .route("/api/responses", get(handlers::list_responses))
        .layer(middleware::from_fn_with_state(
            state.auth_gate.clone(),
            require_bearer,
        ));

    // Public routes (no auth required). Audio clips make survey bodies
    // arbitrarily large, so the default body cap is lifted there.
    let public_routes = Router::new()
        .route(
            "/surveys",
            post(handlers::submit_survey).layer(DefaultBodyLimit::disable()),
        )
        .route("/token", post(handlers::issue_token))
        .route("/health", get(handlers::health_check));

    Router::new()
        .merge(reader_routes)
        .merge(public_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
