//! API handlers for the catalog REST endpoints

pub mod auth;
pub mod catalog;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::{header::AUTHORIZATION, request::Parts},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token.
///
/// Requests without a valid bearer token are sent to the login surface.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Err(login_redirect(parts, &state.config.auth.login_url));
        };

        match UserClaims::from_token(token, &state.config.auth.jwt_secret) {
            Ok(claims) => Ok(AuthenticatedUser(claims)),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                Err(login_redirect(parts, &state.config.auth.login_url))
            }
        }
    }
}

fn login_redirect(parts: &Parts, login_url: &str) -> AppError {
    // Nested routers see a stripped URI; the original one carries the full path
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    AppError::LoginRequired {
        location: format!("{}?next={}", login_url, urlencoding::encode(next)),
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records of the requested page
    pub items: Vec<T>,
    /// Total number of records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub per_page: i64,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Home page counts
        .route("/", get(catalog::index))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", get(auth::login_prompt).post(auth::login))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/books", get(catalog::list_books))
        .route("/books/:id", get(catalog::get_book))
        .route("/authors", get(catalog::list_authors))
        .route("/authors/:id", get(catalog::get_author))
        .route("/genres", get(catalog::list_genres))
        // Loans
        .route("/my-borrowed", get(loans::my_borrowed))
        .route("/renew/:id", get(loans::renewal_form).post(loans::renew))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
