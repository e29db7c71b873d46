use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::{ApiError, AppState, ListQuery};
use crate::auth::{admin_only_middleware, jwt_auth_middleware, MessageResponse, Principal};
use crate::models::{
    AdminResponse, CreateAdmin, CreateTrainer, NutritionPlanResponse, RoutineResponse,
    TrainerResponse, UpdateAdmin, UpdateTrainer, UpdateUser, UserResponse, WorkoutPlan,
    WorkoutPlanResponse,
};

/// Admin-only routes. The jwt layer is outermost so the role gate always
/// sees a resolved principal.
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/trainers/", post(create_trainer).get(list_trainers))
        .route("/trainers/:trainer_id", put(update_trainer).delete(delete_trainer))
        .route("/users/", get(list_users))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/plans/", get(list_plans))
        .route("/routines/", get(list_routines))
        .route("/workout-plans/", get(list_workout_plans))
        .route("/nutrition-plans/", get(list_nutrition_plans))
        .route("/create-admin/", post(create_admin))
        .route("/admins/:admin_id", put(update_admin).delete(delete_admin))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip(state, data))]
async fn create_trainer(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateTrainer>,
) -> Result<(StatusCode, Json<TrainerResponse>), ApiError> {
    let trainer = state.accounts.create_trainer(principal.id, data).await?;
    Ok((StatusCode::CREATED, Json(trainer)))
}

#[tracing::instrument(skip(state))]
async fn list_trainers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TrainerResponse>>, ApiError> {
    let trainers = state
        .accounts
        .list_trainers(query.skip(), query.limit())
        .await?;
    Ok(Json(trainers))
}

#[tracing::instrument(skip(state, data))]
async fn update_trainer(
    State(state): State<AppState>,
    Path(trainer_id): Path<Uuid>,
    Json(data): Json<UpdateTrainer>,
) -> Result<Json<TrainerResponse>, ApiError> {
    let trainer = state.accounts.update_trainer(trainer_id, data).await?;
    Ok(Json(trainer))
}

#[tracing::instrument(skip(state))]
async fn delete_trainer(
    State(state): State<AppState>,
    Path(trainer_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.accounts.delete_trainer(trainer_id).await?;
    Ok(Json(MessageResponse::new("Trainer deleted")))
}

#[tracing::instrument(skip(state))]
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    // Admin listing is unscoped.
    let users = state
        .accounts
        .list_users(None, query.skip(), query.limit())
        .await?;
    Ok(Json(users))
}

#[tracing::instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.get_user(user_id).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(state, data))]
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(data): Json<UpdateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.accounts.update_user(None, user_id, data).await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.accounts.delete_user(None, user_id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

/// Legacy listing: bare workout-plan rows without children
#[tracing::instrument(skip(state))]
async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkoutPlan>>, ApiError> {
    let plans = state
        .plans
        .list_plan_summaries(None, query.skip(), query.limit())
        .await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(state))]
async fn list_routines(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RoutineResponse>>, ApiError> {
    let routines = state
        .plans
        .list_routines(None, query.skip(), query.limit())
        .await?;
    Ok(Json(routines))
}

#[tracing::instrument(skip(state))]
async fn list_workout_plans(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkoutPlanResponse>>, ApiError> {
    let plans = state
        .plans
        .list_workout_plans(None, query.skip(), query.limit())
        .await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(state))]
async fn list_nutrition_plans(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<NutritionPlanResponse>>, ApiError> {
    let plans = state
        .plans
        .list_nutrition_plans(None, query.skip(), query.limit())
        .await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(state, data))]
async fn create_admin(
    State(state): State<AppState>,
    Json(data): Json<CreateAdmin>,
) -> Result<(StatusCode, Json<AdminResponse>), ApiError> {
    let admin = state.accounts.create_admin(data).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

#[tracing::instrument(skip(state, data))]
async fn update_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<Uuid>,
    Json(data): Json<UpdateAdmin>,
) -> Result<Json<AdminResponse>, ApiError> {
    let admin = state.accounts.update_admin(admin_id, data).await?;
    Ok(Json(admin))
}

#[tracing::instrument(skip(state))]
async fn delete_admin(
    State(state): State<AppState>,
    Path(admin_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.accounts.delete_admin(admin_id).await?;
    Ok(Json(MessageResponse::new("Admin deleted")))
}
