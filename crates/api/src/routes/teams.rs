//! Team endpoints.
//!
//! Teams bind students to a faculty guide; BOM requests inherit the
//! student's team and guide at submission time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::{AddTeamMemberRequest, CreateTeamRequest, TeamResponse, UserBrief};
use persistence::entities::{RoleDb, TeamEntity};
use persistence::repositories::{TeamRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

async fn team_response(state: &AppState, team: TeamEntity) -> Result<TeamResponse, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let guide = users
        .find_by_id(team.guide_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Guide not found".into()))?;

    let teams = TeamRepository::new(state.pool.clone());
    let members = teams
        .members_of(team.id)
        .await?
        .into_iter()
        .map(|u| UserBrief {
            id: u.id,
            name: u.name,
            email: u.email,
        })
        .collect();

    Ok(TeamResponse {
        id: team.id,
        team_name: team.team_name,
        problem_statement: team.problem_statement,
        guide: UserBrief {
            id: guide.id,
            name: guide.name,
            email: guide.email,
        },
        members,
        created_at: team.created_at,
    })
}

/// POST /api/v1/teams
pub async fn create_team(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    let guide = users
        .find_by_id(request.guide_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Guide not found".into()))?;
    if guide.role != RoleDb::Faculty || !guide.is_active {
        return Err(ApiError::validation(
            "Selected guide is not an active faculty member",
        ));
    }

    let teams = TeamRepository::new(state.pool.clone());
    let team = teams
        .create(
            request.team_name.as_deref(),
            &request.problem_statement,
            request.guide_id,
        )
        .await?;

    tracing::info!(team_id = %team.id, created_by = %auth.user_id, "Team created");

    // A student creating a team joins it immediately
    if auth.role == shared::jwt::TokenRole::Student {
        users
            .assign_team(auth.user_id, team.id, team.guide_id)
            .await?;
    }

    let response = team_response(&state, team).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/teams
pub async fn list_teams(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());
    let entities = teams.list().await?;

    let mut responses = Vec::with_capacity(entities.len());
    for team in entities {
        responses.push(team_response(&state, team).await?);
    }
    Ok(Json(responses))
}

/// GET /api/v1/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());
    let team = teams
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".into()))?;

    team_response(&state, team).await.map(Json)
}

/// POST /api/v1/teams/:id/members
///
/// Attaches a student to the team and its guide. Only students can be
/// team members; the update is a no-op for other roles.
pub async fn add_team_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<AddTeamMemberRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());
    let team = teams
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".into()))?;

    let users = UserRepository::new(state.pool.clone());
    let assigned = users
        .assign_team(request.student_id, team.id, team.guide_id)
        .await?;
    if !assigned {
        return Err(ApiError::NotFound("Student not found".into()));
    }

    tracing::info!(
        team_id = %team.id,
        student_id = %request.student_id,
        added_by = %auth.user_id,
        "Student added to team"
    );

    team_response(&state, team).await.map(Json)
}

/// GET /api/v1/faculty/teams
///
/// Teams supervised by the authenticated guide.
pub async fn list_teams_for_guide(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = TeamRepository::new(state.pool.clone());
    let entities = teams.list_for_guide(auth.user_id).await?;

    let mut responses = Vec::with_capacity(entities.len());
    for team in entities {
        responses.push(team_response(&state, team).await?);
    }
    Ok(Json(responses))
}
