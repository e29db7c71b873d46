use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};

use crate::api::{ApiError, AppState};
use crate::auth::{jwt_auth_middleware, AuthError, Principal};
use crate::models::{AssignedPlans, Role, UpdateUser, UserResponse};

/// Self-scoped routes for end users. Admins and trainers are turned away:
/// these endpoints only make sense for an account in the users table.
pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/profile/", get(get_profile).put(update_profile))
        .route("/plans/", get(get_plans))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

fn require_user_role(principal: &Principal) -> Result<(), ApiError> {
    if principal.role != Role::User {
        return Err(AuthError::Forbidden.into());
    }

    Ok(())
}

#[tracing::instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<UserResponse>, ApiError> {
    require_user_role(&principal)?;

    let user = state.accounts.get_user(principal.id).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(state, data))]
async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<UpdateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    require_user_role(&principal)?;

    let user = state.accounts.update_profile(principal.id, data).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(state))]
async fn get_plans(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AssignedPlans>, ApiError> {
    require_user_role(&principal)?;

    let plans = state.plans.assigned_plans(principal.id).await?;
    Ok(Json(plans))
}
