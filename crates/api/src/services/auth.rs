//! Authentication service for user registration, login, and token management.

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use domain::models::Role;
use persistence::entities::{RoleDb, UserEntity};
use persistence::repositories::{SessionRepository, UserRepository};
use shared::crypto::sha256_hex;
use shared::jwt::{JwtConfig, JwtError, TokenRole};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::validate_email_domain;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Email domain not allowed")]
    EmailDomainNotAllowed,

    #[error("Password does not meet requirements")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: UserEntity,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// Token pair with metadata.
#[derive(Debug, Clone)]
struct TokenPair {
    access_token: String,
    refresh_token: String,
    refresh_token_jti: String,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    sessions: SessionRepository,
    jwt_config: Arc<JwtConfig>,
    access_token_expiry: i64,
    allowed_email_domain: String,
}

impl AuthService {
    /// Creates a new AuthService around the shared JWT key material.
    pub fn new(pool: PgPool, jwt_config: Arc<JwtConfig>, allowed_email_domain: &str) -> Self {
        let access_token_expiry = jwt_config.access_token_expiry_secs;
        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool),
            jwt_config,
            access_token_expiry,
            allowed_email_domain: allowed_email_domain.to_string(),
        }
    }

    /// Register a new student account.
    ///
    /// Self-registration is restricted to students on the institutional
    /// email domain. Other roles are created by an admin.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        division: Option<&str>,
    ) -> Result<AuthResult, AuthError> {
        if !self.allowed_email_domain.is_empty()
            && validate_email_domain(email, &self.allowed_email_domain).is_err()
        {
            return Err(AuthError::EmailDomainNotAllowed);
        }

        shared::password::validate_password_strength(password).map_err(AuthError::WeakPassword)?;

        let password_hash = hash_password(password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let create_result = self
            .users
            .create(
                email,
                name,
                &password_hash,
                RoleDb::Student,
                division,
                None,
                false,
            )
            .await;

        // Unique violation from a concurrent registration
        if let Err(sqlx::Error::Database(db_err)) = &create_result {
            if db_err.code().as_deref() == Some("23505") {
                return Err(AuthError::EmailAlreadyExists);
            }
        }
        let user = create_result?;

        let tokens = self.generate_tokens(&user)?;
        self.create_session(user.id, &tokens).await?;

        Ok(AuthResult {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.users.update_last_login(user.id).await?;

        let tokens = self.generate_tokens(&user)?;
        self.create_session(user.id, &tokens).await?;

        Ok(AuthResult {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Refresh the access token using a valid refresh token.
    ///
    /// Implements token rotation: the old refresh session is revoked and a
    /// new one is issued.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired | JwtError::InvalidToken => AuthError::InvalidRefreshToken,
                _ => AuthError::TokenError(e),
            })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        // Sessions store a digest of the jti, never the token itself
        let jti_hash = sha256_hex(&claims.jti);
        let session = self
            .sessions
            .find_by_hash(&jti_hash)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.user_id != user_id || !session.is_valid(Utc::now()) {
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let tokens = self.generate_tokens(&user)?;

        self.sessions.revoke_by_hash(&jti_hash).await?;
        self.create_session(user_id, &tokens).await?;

        Ok(RefreshResult {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: self.access_token_expiry,
        })
    }

    /// Logout by revoking the session behind the refresh token.
    ///
    /// If `all_devices` is true, revokes every live session for the user.
    pub async fn logout(&self, refresh_token: &str, all_devices: bool) -> Result<(), AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired | JwtError::InvalidToken => AuthError::InvalidRefreshToken,
                _ => AuthError::TokenError(e),
            })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        if all_devices {
            self.sessions.revoke_all_for_user(user_id).await?;
        } else {
            let jti_hash = sha256_hex(&claims.jti);
            let revoked = self.sessions.revoke_by_hash(&jti_hash).await?;
            if !revoked {
                tracing::debug!(user_id = %user_id, "Session not found during logout");
            }
        }

        Ok(())
    }

    /// Generate access and refresh tokens carrying the user's role.
    fn generate_tokens(&self, user: &UserEntity) -> Result<TokenPair, AuthError> {
        let role: TokenRole = Role::from(user.role).into();
        let (access_token, _access_jti) = self.jwt_config.generate_access_token(user.id, role)?;
        let (refresh_token, refresh_jti) =
            self.jwt_config.generate_refresh_token(user.id, role)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_token_jti: refresh_jti,
        })
    }

    /// Record the refresh session for later rotation and revocation.
    async fn create_session(&self, user_id: Uuid, tokens: &TokenPair) -> Result<(), AuthError> {
        let expires_at =
            Utc::now() + chrono::Duration::seconds(self.jwt_config.refresh_token_expiry_secs);
        let refresh_hash = sha256_hex(&tokens.refresh_token_jti);

        self.sessions
            .create(user_id, &refresh_hash, expires_at)
            .await?;

        Ok(())
    }
}

