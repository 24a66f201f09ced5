//! Authentication endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, Permission, User},
};

use super::AuthenticatedUser;

/// Where to go once logged in
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginPromptQuery {
    /// Path that required authentication
    pub next: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LoginPrompt {
    pub message: String,
    /// Path to resume after login
    pub next: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

/// Identity and permissions carried by the caller's token
#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
    pub permissions: Vec<Permission>,
    /// Holder of the renew permission
    pub can_renew: bool,
}

/// Login surface unauthenticated requests are redirected to
#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    params(LoginPromptQuery),
    responses(
        (status = 200, description = "Login instructions", body = LoginPrompt)
    )
)]
pub async fn login_prompt(Query(query): Query<LoginPromptQuery>) -> Json<LoginPrompt> {
    Json(LoginPrompt {
        message: "Authentication required. POST username and password to this endpoint.".to_string(),
        next: query.next,
    })
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Malformed credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request.validate()?;

    let (token, user) = state
        .services
        .auth
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// Current user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 303, description = "Not authenticated, redirected to login")
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: claims.user_id,
        username: claims.sub.clone(),
        is_staff: claims.is_staff,
        permissions: claims.perms.iter().copied().collect(),
        can_renew: claims.has_perm(Permission::CanMarkReturned),
    })
}
