//! Authentication endpoints: register, login, refresh, logout.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::{Role, UserProfile};
use persistence::entities::UserEntity;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthService};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(max = 10))]
    pub division: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogoutRequest {
    pub refresh_token: String,
    #[serde(default)]
    pub all_devices: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    /// Set when the account carries an admin-issued temporary password.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub must_change_password: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub(crate) fn user_profile(user: UserEntity) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        role: Role::from(user.role),
        is_active: user.is_active,
        division: user.division,
        team_id: user.team_id,
        guide_id: user.guide_id,
        last_login: user.last_login,
        created_at: user.created_at,
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email already registered".into())
            }
            AuthError::EmailDomainNotAllowed => {
                ApiError::validation("Registration requires an institutional email address")
            }
            AuthError::WeakPassword(msg) => ApiError::validation(msg),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".into())
            }
            AuthError::UserNotFound => ApiError::Unauthorized("Invalid credentials".into()),
            AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".into()),
            AuthError::InvalidRefreshToken | AuthError::SessionNotFound => {
                ApiError::Unauthorized("Invalid or expired refresh token".into())
            }
            AuthError::TokenError(e) => ApiError::Unauthorized(format!("Token error: {}", e)),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::DatabaseError(e) => e.into(),
        }
    }
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        state.pool.clone(),
        state.jwt.clone(),
        &state.config.auth.allowed_email_domain,
    )
}

/// POST /api/v1/auth/register
///
/// Self-service student registration, restricted to the institutional
/// email domain. Faculty, lab, and admin accounts are created by admins.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;

    let service = auth_service(&state);
    let result = service
        .register(
            &request.email,
            &request.password,
            &request.name,
            request.division.as_deref(),
        )
        .await?;

    tracing::info!(user_id = %result.user.id, "User registered");

    let must_change_password = result.user.must_change_password;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user_profile(result.user),
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: "Bearer",
            expires_in: result.access_token_expires_in,
            must_change_password,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let service = auth_service(&state);
    let result = service.login(&request.email, &request.password).await?;

    tracing::info!(user_id = %result.user.id, role = %Role::from(result.user.role), "User logged in");

    let must_change_password = result.user.must_change_password;
    Ok(Json(AuthResponse {
        user: user_profile(result.user),
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer",
        expires_in: result.access_token_expires_in,
        must_change_password,
    }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let service = auth_service(&state);
    let result = service.refresh(&request.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer",
        expires_in: result.expires_in,
    }))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    let service = auth_service(&state);
    service
        .logout(&request.refresh_token, request.all_devices)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "student01@kletech.ac.in".into(),
            password: "Passw0rd123".into(),
            name: "Student One".into(),
            division: Some("B".into()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_short_password() {
        let req = RegisterRequest {
            email: "student01@kletech.ac.in".into(),
            password: "short".into(),
            name: "Student One".into(),
            division: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_password() {
        let req = LoginRequest {
            email: "student01@kletech.ac.in".into(),
            password: "".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_logout_request_default_scope() {
        let req: LogoutRequest =
            serde_json::from_str(r#"{"refresh_token":"abc"}"#).unwrap();
        assert!(!req.all_devices);
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: ApiError = AuthError::EmailAlreadyExists.into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = AuthError::EmailDomainNotAllowed.into();
        assert!(matches!(err, ApiError::Validation { .. }));

        let err: ApiError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
