//! Admin portal endpoints: user management and dashboard statistics.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    AdminCreateUserRequest, AdminStatsResponse, AdminUserListQuery, Role, SetActiveRequest,
    UserProfile,
};
use persistence::entities::RoleDb;
use persistence::repositories::{
    BomRequestRepository, EquipmentRepository, EventRepository, MaterialRepository,
    SessionRepository, TeamRepository, UserRepository,
};
use shared::pagination::PageInfo;
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::auth::user_profile;
use crate::routes::page_from;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserListResponse {
    pub data: Vec<UserProfile>,
    pub pagination: PageInfo,
}

fn parse_role_filter(role: Option<&str>) -> Result<Option<RoleDb>, ApiError> {
    match role {
        None => Ok(None),
        Some(s) => Role::parse(s)
            .map(|r| Some(RoleDb::from(r)))
            .ok_or_else(|| ApiError::validation(format!("Unknown role filter: {}", s))),
    }
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: UserAuth,
    Query(query): Query<AdminUserListQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let role = parse_role_filter(query.role.as_deref())?;
    let page = page_from(query.page, query.per_page);

    let users = UserRepository::new(state.pool.clone());
    let rows = users.list(role, page.limit(), page.offset()).await?;
    let total = users.count(role).await?;

    Ok(Json(UserListResponse {
        data: rows.into_iter().map(user_profile).collect(),
        pagination: PageInfo::new(page, total),
    }))
}

/// POST /api/v1/admin/users
///
/// Pre-registers an account with a temporary password the user must
/// change on first login. This is the only path that creates faculty,
/// lab, and admin accounts.
pub async fn create_user(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<AdminCreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    request.validate()?;

    shared::password::validate_password_strength(&request.password)
        .map_err(ApiError::validation)?;
    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let users = UserRepository::new(state.pool.clone());
    if users.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let user = users
        .create(
            &request.email,
            &request.name,
            &password_hash,
            RoleDb::from(request.role),
            request.division.as_deref(),
            None,
            true,
        )
        .await?;

    tracing::info!(
        user_id = %user.id,
        role = %request.role,
        created_by = %auth.user_id,
        "User pre-registered by admin"
    );

    Ok((StatusCode::CREATED, Json(user_profile(user))))
}

/// PATCH /api/v1/admin/users/:id/active
///
/// Deactivation also revokes every live session so outstanding refresh
/// tokens stop working immediately.
pub async fn set_user_active(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    if id == auth.user_id && !request.is_active {
        return Err(ApiError::Conflict(
            "You cannot deactivate your own account".into(),
        ));
    }

    let users = UserRepository::new(state.pool.clone());
    let changed = users.set_active(id, request.is_active).await?;
    if !changed {
        return Err(ApiError::NotFound("User not found".into()));
    }

    if !request.is_active {
        let sessions = SessionRepository::new(state.pool.clone());
        let revoked = sessions.revoke_all_for_user(id).await?;
        tracing::info!(user_id = %id, revoked_sessions = revoked, "User deactivated");
    } else {
        tracing::info!(user_id = %id, "User reactivated");
    }

    let user = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user_profile(user)))
}

/// GET /api/v1/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<AdminStatsResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let boms = BomRequestRepository::new(state.pool.clone());
    let equipment = EquipmentRepository::new(state.pool.clone());
    let materials = MaterialRepository::new(state.pool.clone());
    let events = EventRepository::new(state.pool.clone());
    let teams = TeamRepository::new(state.pool.clone());

    Ok(Json(AdminStatsResponse {
        users: users.count_by_role().await?,
        bom_requests: boms.count_by_state().await?,
        equipment: equipment.count().await?,
        materials: materials.count().await?,
        events: events.count().await?,
        teams: teams.count().await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_filter() {
        assert!(parse_role_filter(None).unwrap().is_none());
        assert_eq!(
            parse_role_filter(Some("faculty")).unwrap(),
            Some(RoleDb::Faculty)
        );
        assert!(parse_role_filter(Some("superuser")).is_err());
    }
}
