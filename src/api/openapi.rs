//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, catalog, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLibrary API",
        version = "1.0.0",
        description = "Library catalog browsing and loan renewal REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login_prompt,
        auth::login,
        auth::me,
        // Catalog
        catalog::index,
        catalog::list_books,
        catalog::get_book,
        catalog::list_authors,
        catalog::get_author,
        catalog::list_genres,
        // Loans
        loans::my_borrowed,
        loans::renewal_form,
        loans::renew,
    ),
    components(
        schemas(
            // Auth
            auth::LoginPrompt,
            auth::LoginResponse,
            auth::MeResponse,
            crate::models::user::LoginRequest,
            crate::models::user::User,
            crate::models::user::Permission,
            // Catalog
            crate::services::catalog::CatalogSummary,
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::genre::Genre,
            // Loans
            crate::models::book_instance::LoanStatus,
            crate::models::book_instance::BookInstanceDetails,
            crate::models::renewal::RenewBookForm,
            crate::models::renewal::RenewalForm,
            crate::models::renewal::FieldError,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Books, authors and genres"),
        (name = "loans", description = "Borrowed books and due date renewal")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
