use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NutritionPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,
}

/// Template owned by a trainer; never assigned to users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    pub workout_plan_id: Option<Uuid>,
    pub routine_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub calories: i32,
    pub nutrition_plan_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub sets: i32,
    pub reps: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeal {
    pub name: String,
    pub description: Option<String>,
    pub calories: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutPlan {
    pub name: String,
    pub description: Option<String>,
    pub exercises: Vec<CreateExercise>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNutritionPlan {
    pub name: String,
    pub description: Option<String>,
    pub meals: Vec<CreateMeal>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoutine {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<CreateExercise>,
}

/// Routine update. A present `exercises` list replaces the whole child set;
/// an absent one leaves the existing exercises untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateRoutine {
    pub name: String,
    pub description: Option<String>,
    pub exercises: Option<Vec<CreateExercise>>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutPlanResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Serialize)]
pub struct NutritionPlanResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct RoutineResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,
    pub exercises: Vec<Exercise>,
}

/// Everything a user has been assigned, with children inlined.
#[derive(Debug, Serialize)]
pub struct AssignedPlans {
    pub workout_plans: Vec<WorkoutPlanResponse>,
    pub nutrition_plans: Vec<NutritionPlanResponse>,
}
