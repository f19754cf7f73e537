//! User profile endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use voyage_common::AppResult;
use voyage_core::{RegisterInput, UpdateProfileInput};
use voyage_db::entities::user::{self, Role};

use super::{maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, Identity},
    middleware::AppState,
    response::ApiResponse,
};

/// User profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub home_city: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            phone: user.phone,
            avatar_url: user.avatar_url,
            home_city: user.home_city,
            role: user.role,
            created_at: rfc3339(user.created_at),
            updated_at: maybe_rfc3339(user.updated_at),
        }
    }
}

/// Create the profile for the token's identity.
async fn register(
    Identity(identity): Identity,
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.register(&identity, input).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Get own profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Update own profile.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.update_profile(user, input).await?;
    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/me", get(me).put(update_me))
}
