//! Role-based access control middleware.
//!
//! Each portal area (`/student`, `/faculty`, `/lab`, `/admin`) is guarded by
//! a role check on the JWT role claim. These guards must run after
//! [`require_user_auth`](crate::middleware::user_auth::require_user_auth)
//! since they read the authenticated user from request extensions.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::middleware::user_auth::UserAuth;
use shared::jwt::TokenRole;

/// Middleware guard for student-only routes.
pub async fn require_student(req: Request<Body>, next: Next) -> Response {
    require_role(req, next, TokenRole::Student).await
}

/// Middleware guard for faculty-only routes.
pub async fn require_faculty(req: Request<Body>, next: Next) -> Response {
    require_role(req, next, TokenRole::Faculty).await
}

/// Middleware guard for lab in-charge routes.
pub async fn require_lab(req: Request<Body>, next: Next) -> Response {
    require_role(req, next, TokenRole::Lab).await
}

/// Middleware guard for admin-only routes.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    require_role(req, next, TokenRole::Admin).await
}

async fn require_role(req: Request<Body>, next: Next, required: TokenRole) -> Response {
    let auth = match req.extensions().get::<UserAuth>() {
        Some(auth) => auth,
        None => {
            // Auth middleware did not run; treat as unauthenticated.
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Authentication required"
                })),
            )
                .into_response();
        }
    };

    if auth.role != required {
        tracing::debug!(
            user_id = %auth.user_id,
            role = %auth.role,
            required = %required,
            "Role check failed"
        );
        return forbidden_response(required);
    }

    next.run(req).await
}

fn forbidden_response(required: TokenRole) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": format!("This endpoint requires the {} role", required)
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_response_status() {
        let response = forbidden_response(TokenRole::Admin);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_forbidden_response_per_role() {
        for role in [
            TokenRole::Student,
            TokenRole::Faculty,
            TokenRole::Lab,
            TokenRole::Admin,
        ] {
            let response = forbidden_response(role);
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
