//! Loan endpoints: due date renewal and the caller's borrowed books

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::BookInstanceDetails,
        renewal::{RenewBookForm, RenewalForm},
        user::Permission,
        PageQuery, PAGE_SIZE,
    },
    services::{loans::RenewalOutcome, today},
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Where a successful renewal sends the librarian
pub const BORROWED_LIST_PATH: &str = "/api/v1/my-borrowed";

/// Malformed identifiers cannot name an instance, so they are reported as missing
fn parse_instance_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Book instance with id {} not found", raw)))
}

/// Books on loan to the current user
#[utoipa::path(
    get,
    path = "/my-borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Instances on loan to the caller, soonest due first", body = PaginatedResponse<BookInstanceDetails>),
        (status = 303, description = "Not authenticated, redirected to login")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceDetails>>> {
    let (items, total) = state
        .services
        .loans
        .borrowed_by(claims.user_id, &page, today())
        .await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page(),
        per_page: PAGE_SIZE,
    }))
}

/// Renewal form pre-filled with the suggested date
#[utoipa::path(
    get,
    path = "/renew/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book instance ID (UUID)")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewalForm),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing renew permission"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<RenewalForm>> {
    claims.require_perm(Permission::CanMarkReturned)?;

    let instance_id = parse_instance_id(&id)?;
    let form = state.services.loans.renewal_form(instance_id, today()).await?;
    Ok(Json(form))
}

/// Submit a new due date for a book instance
#[utoipa::path(
    post,
    path = "/renew/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book instance ID (UUID)")
    ),
    request_body(content = RenewBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Renewed, redirected to the borrowed books list"),
        (status = 200, description = "Date refused, form re-presented with errors", body = RenewalForm),
        (status = 403, description = "Missing renew permission"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Form(form): Form<RenewBookForm>,
) -> AppResult<Response> {
    claims.require_perm(Permission::CanMarkReturned)?;

    let instance_id = parse_instance_id(&id)?;
    let outcome = state
        .services
        .loans
        .renew(instance_id, &form.renewal_date, today())
        .await?;

    Ok(match outcome {
        RenewalOutcome::Renewed { .. } => Redirect::to(BORROWED_LIST_PATH).into_response(),
        RenewalOutcome::Rejected(form) => Json(form).into_response(),
    })
}
