use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_faculty,
    require_lab, require_student, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::middleware::user_auth::{require_user_auth, UserAuth};
use crate::routes::{
    admin, auth, equipment, events, faculty_bom, health, lab_bom, materials, notifications,
    student_bom, teams, users,
};
use crate::services::notifications::NotificationHub;
use shared::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// RS256 key material, parsed once at startup.
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub notifications: NotificationHub,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    // Fail at startup on bad keys rather than on the first request
    let jwt = Arc::new(
        UserAuth::create_jwt_config(&config.jwt).map_err(|e| anyhow::anyhow!(e))?,
    );

    // Rate limiting is enabled when rate_limit_per_minute > 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        rate_limiter,
        notifications: NotificationHub::default(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Student routes (student role required)
    let student_routes = Router::new()
        .route("/api/v1/student/bom", post(student_bom::create_bom_request))
        .route("/api/v1/student/bom", get(student_bom::list_bom_requests))
        .route("/api/v1/student/bom/export", get(student_bom::export_bom_requests))
        .route("/api/v1/student/bom/:id", put(student_bom::update_bom_request))
        .route("/api/v1/student/bom/:id", delete(student_bom::delete_bom_request))
        .route_layer(middleware::from_fn(require_student));

    // Faculty routes (faculty role required)
    let faculty_routes = Router::new()
        .route("/api/v1/faculty/bom", get(faculty_bom::list_bom_requests))
        .route(
            "/api/v1/faculty/bom/pending-count",
            get(faculty_bom::pending_count),
        )
        .route(
            "/api/v1/faculty/bom/:id/approve",
            post(faculty_bom::approve_bom_request),
        )
        .route(
            "/api/v1/faculty/bom/:id/reject",
            post(faculty_bom::reject_bom_request),
        )
        .route("/api/v1/faculty/bom/:id", patch(faculty_bom::update_bom_request))
        .route("/api/v1/faculty/teams", get(teams::list_teams_for_guide))
        .route_layer(middleware::from_fn(require_faculty));

    // Lab in-charge routes (lab role required)
    let lab_routes = Router::new()
        .route("/api/v1/lab/bom", get(lab_bom::list_bom_requests))
        .route("/api/v1/lab/bom/pending-count", get(lab_bom::pending_count))
        .route("/api/v1/lab/bom/:id/approve", post(lab_bom::approve_bom_request))
        .route("/api/v1/lab/bom/:id/reject", post(lab_bom::reject_bom_request))
        .route("/api/v1/lab/equipment", post(equipment::create_equipment))
        .route("/api/v1/lab/equipment/:id", put(equipment::update_equipment))
        .route("/api/v1/lab/equipment/:id", delete(equipment::delete_equipment))
        .route("/api/v1/lab/materials", post(materials::create_material))
        .route("/api/v1/lab/materials/:id", put(materials::update_material))
        .route("/api/v1/lab/materials/:id", delete(materials::delete_material))
        .route_layer(middleware::from_fn(require_lab));

    // Admin routes (admin role required)
    let admin_routes = Router::new()
        .route("/api/v1/admin/users", get(admin::list_users))
        .route("/api/v1/admin/users", post(admin::create_user))
        .route("/api/v1/admin/users/:id/active", patch(admin::set_user_active))
        .route("/api/v1/admin/stats", get(admin::stats))
        .route("/api/v1/admin/events", post(events::create_event))
        .route("/api/v1/admin/events/:id", put(events::update_event))
        .route("/api/v1/admin/events/:id", delete(events::delete_event))
        .route_layer(middleware::from_fn(require_admin));

    // Routes shared by every authenticated role
    let common_routes = Router::new()
        .route("/api/v1/users/me", get(users::me))
        .route("/api/v1/users/me/password", put(users::change_password))
        .route("/api/v1/guides", get(users::list_guides))
        .route("/api/v1/teams", post(teams::create_team))
        .route("/api/v1/teams", get(teams::list_teams))
        .route("/api/v1/teams/:id", get(teams::get_team))
        .route("/api/v1/teams/:id/members", post(teams::add_team_member))
        .route("/api/v1/equipment", get(equipment::list_equipment))
        .route("/api/v1/equipment/:id", get(equipment::get_equipment))
        .route("/api/v1/materials", get(materials::list_materials))
        .route("/api/v1/materials/:id", get(materials::get_material))
        .route("/api/v1/notifications/stream", get(notifications::stream));

    // Everything above requires a valid JWT; rate limiting runs after auth
    // (it is keyed by the authenticated user ID).
    let protected_routes = Router::new()
        .merge(student_routes)
        .merge(faculty_routes)
        .merge(lab_routes)
        .merge(admin_routes)
        .merge(common_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        // Event listings are public so the landing page can render them
        .route("/api/v1/events", get(events::list_events));

    // Merge all routes
    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
