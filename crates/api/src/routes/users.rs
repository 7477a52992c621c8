//! Current-user profile, password change, and guide listing endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use domain::models::{UserBrief, UserProfile};
use persistence::repositories::{SessionRepository, UserRepository};
use shared::password::{hash_password, verify_password};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::auth::user_profile;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserProfile>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".into()))?;

    Ok(Json(user_profile(user)))
}

/// PUT /api/v1/users/me/password
///
/// Changes the caller's password and clears `must_change_password` (the
/// flag set on admin pre-registered accounts). Every refresh session is
/// revoked; clients log in again with the new password.
pub async fn change_password(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    shared::password::validate_password_strength(&request.new_password)
        .map_err(ApiError::validation)?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".into()))?;

    let current_ok = verify_password(&request.current_password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !current_ok {
        return Err(ApiError::Unauthorized("Current password is incorrect".into()));
    }

    let new_hash =
        hash_password(&request.new_password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let changed = users.update_password(user.id, &new_hash).await?;
    if !changed {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let sessions = SessionRepository::new(state.pool.clone());
    let revoked = sessions.revoke_all_for_user(user.id).await?;
    tracing::info!(user_id = %user.id, revoked_sessions = revoked, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/guides
///
/// Active faculty members, for guide selection when forming teams.
pub async fn list_guides(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<Vec<UserBrief>>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let guides = users.list_guides().await?;

    Ok(Json(
        guides
            .into_iter()
            .map(|u| UserBrief {
                id: u.id,
                name: u.name,
                email: u.email,
            })
            .collect(),
    ))
}
