use axum::{routing::get, Router};
use chrono::Duration;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{admin, auth, health, trainer, user, AppState};
use crate::auth::AuthService;
use crate::config::SmtpConfig;
use crate::services::{AccountService, Mailer, PlanService};

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Assemble the full application router
pub fn create_routes(
    db: PgPool,
    jwt_secret: &str,
    token_expire_minutes: i64,
    smtp: SmtpConfig,
) -> Router {
    let state = AppState {
        auth: AuthService::new(
            db.clone(),
            jwt_secret,
            Duration::minutes(token_expire_minutes),
        ),
        accounts: AccountService::new(db.clone()),
        plans: PlanService::new(db.clone()),
        mailer: Mailer::new(smtp),
        db,
    };

    Router::new()
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        .merge(auth::auth_routes(state.clone()))
        .nest("/admin", admin::admin_routes(state.clone()))
        .nest("/trainer", trainer::trainer_routes(state.clone()))
        .nest("/user", user::user_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
