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
use crate::auth::{jwt_auth_middleware, trainer_or_admin_middleware, MessageResponse, Principal};
use crate::models::{
    CreateNutritionPlan, CreateRoutine, CreateUser, CreateWorkoutPlan, NutritionPlanResponse,
    RoutineResponse, UpdateRoutine, UpdateUser, UserResponse, WorkoutPlan, WorkoutPlanResponse,
};

/// Trainer routes, also reachable by admins. Every handler derives its
/// ownership filter from the principal: a trainer only ever touches rows
/// stamped with its own id, an admin is unrestricted.
pub fn trainer_routes(state: AppState) -> Router {
    Router::new()
        .route("/users/", post(create_user).get(list_users))
        .route("/users/:user_id", put(update_user).delete(delete_user))
        .route("/plans/", get(list_plans))
        .route("/routines/", post(create_routine).get(list_routines))
        .route(
            "/routines/:routine_id",
            put(update_routine).delete(delete_routine),
        )
        .route(
            "/workout-plans/",
            post(create_workout_plan).get(list_workout_plans),
        )
        .route(
            "/workout-plans/:plan_id",
            put(update_workout_plan).delete(delete_workout_plan),
        )
        .route(
            "/nutrition-plans/",
            post(create_nutrition_plan).get(list_nutrition_plans),
        )
        .route(
            "/nutrition-plans/:plan_id",
            put(update_nutrition_plan).delete(delete_nutrition_plan),
        )
        .route("/assign-workout/:user_id/:plan_id", post(assign_workout))
        .route("/assign-nutrition/:user_id/:plan_id", post(assign_nutrition))
        .route_layer(middleware::from_fn(trainer_or_admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip(state, data))]
async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    // New users hang off the creating trainer; admin-created ones start
    // unassigned.
    let user = state
        .accounts
        .create_user(principal.owner_filter(), data)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[tracing::instrument(skip(state))]
async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .accounts
        .list_users(principal.owner_filter(), query.skip(), query.limit())
        .await?;
    Ok(Json(users))
}

#[tracing::instrument(skip(state, data))]
async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
    Json(data): Json<UpdateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .accounts
        .update_user(principal.owner_filter(), user_id, data)
        .await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .accounts
        .delete_user(principal.owner_filter(), user_id)
        .await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

#[tracing::instrument(skip(state))]
async fn list_plans(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkoutPlan>>, ApiError> {
    let plans = state
        .plans
        .list_plan_summaries(principal.owner_filter(), query.skip(), query.limit())
        .await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(state, data))]
async fn create_routine(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateRoutine>,
) -> Result<(StatusCode, Json<RoutineResponse>), ApiError> {
    let routine = state
        .plans
        .create_routine(principal.owner_filter(), data)
        .await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

#[tracing::instrument(skip(state))]
async fn list_routines(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RoutineResponse>>, ApiError> {
    let routines = state
        .plans
        .list_routines(principal.owner_filter(), query.skip(), query.limit())
        .await?;
    Ok(Json(routines))
}

#[tracing::instrument(skip(state, data))]
async fn update_routine(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(routine_id): Path<Uuid>,
    Json(data): Json<UpdateRoutine>,
) -> Result<Json<RoutineResponse>, ApiError> {
    let routine = state
        .plans
        .update_routine(principal.owner_filter(), routine_id, data)
        .await?;
    Ok(Json(routine))
}

#[tracing::instrument(skip(state))]
async fn delete_routine(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(routine_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .plans
        .delete_routine(principal.owner_filter(), routine_id)
        .await?;
    Ok(Json(MessageResponse::new("Routine deleted successfully")))
}

#[tracing::instrument(skip(state, data))]
async fn create_workout_plan(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateWorkoutPlan>,
) -> Result<(StatusCode, Json<WorkoutPlanResponse>), ApiError> {
    let plan = state
        .plans
        .create_workout_plan(principal.owner_filter(), data)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[tracing::instrument(skip(state))]
async fn list_workout_plans(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkoutPlanResponse>>, ApiError> {
    let plans = state
        .plans
        .list_workout_plans(principal.owner_filter(), query.skip(), query.limit())
        .await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(state, data))]
async fn update_workout_plan(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(plan_id): Path<Uuid>,
    Json(data): Json<CreateWorkoutPlan>,
) -> Result<Json<WorkoutPlanResponse>, ApiError> {
    let plan = state
        .plans
        .update_workout_plan(principal.owner_filter(), plan_id, data)
        .await?;
    Ok(Json(plan))
}

#[tracing::instrument(skip(state))]
async fn delete_workout_plan(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .plans
        .delete_workout_plan(principal.owner_filter(), plan_id)
        .await?;
    Ok(Json(MessageResponse::new("Workout plan deleted")))
}

#[tracing::instrument(skip(state, data))]
async fn create_nutrition_plan(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateNutritionPlan>,
) -> Result<(StatusCode, Json<NutritionPlanResponse>), ApiError> {
    let plan = state
        .plans
        .create_nutrition_plan(principal.owner_filter(), data)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[tracing::instrument(skip(state))]
async fn list_nutrition_plans(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<NutritionPlanResponse>>, ApiError> {
    let plans = state
        .plans
        .list_nutrition_plans(principal.owner_filter(), query.skip(), query.limit())
        .await?;
    Ok(Json(plans))
}

#[tracing::instrument(skip(state, data))]
async fn update_nutrition_plan(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(plan_id): Path<Uuid>,
    Json(data): Json<CreateNutritionPlan>,
) -> Result<Json<NutritionPlanResponse>, ApiError> {
    let plan = state
        .plans
        .update_nutrition_plan(principal.owner_filter(), plan_id, data)
        .await?;
    Ok(Json(plan))
}

#[tracing::instrument(skip(state))]
async fn delete_nutrition_plan(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .plans
        .delete_nutrition_plan(principal.owner_filter(), plan_id)
        .await?;
    Ok(Json(MessageResponse::new("Nutrition plan deleted")))
}

#[tracing::instrument(skip(state))]
async fn assign_workout(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .plans
        .assign_workout_plan(principal.owner_filter(), user_id, plan_id)
        .await?;
    Ok(Json(MessageResponse::new("Workout plan assigned successfully")))
}

#[tracing::instrument(skip(state))]
async fn assign_nutrition(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .plans
        .assign_nutrition_plan(principal.owner_filter(), user_id, plan_id)
        .await?;
    Ok(Json(MessageResponse::new("Nutrition plan assigned successfully")))
}
