use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::models::{
    AssignedPlans, CreateExercise, CreateMeal, CreateNutritionPlan, CreateRoutine,
    CreateWorkoutPlan, Exercise, Meal, NutritionPlan, NutritionPlanResponse, Routine,
    RoutineResponse, UpdateRoutine, WorkoutPlan, WorkoutPlanResponse,
};

/// CRUD over trainer-owned plans and routines, plus plan-to-user assignment.
/// Every scoped query binds the caller's `owner` filter (`None` = admin
/// bypass); composite writes (parent + children) run in one transaction so
/// either everything persists or nothing does.
#[derive(Debug, Clone)]
pub struct PlanService {
    db: PgPool,
}

impl PlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // Workout plans

    pub async fn create_workout_plan(
        &self,
        trainer_id: Option<Uuid>,
        data: CreateWorkoutPlan,
    ) -> Result<WorkoutPlanResponse, ApiError> {
        validate_name(&data.name)?;
        validate_exercises(&data.exercises)?;

        let mut tx = self.db.begin().await?;

        let plan = sqlx::query_as::<_, WorkoutPlan>(
            "INSERT INTO workout_plans (id, name, description, trainer_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, trainer_id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(trainer_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_exercises(&mut tx, Some(plan.id), None, &data.exercises).await?;

        tx.commit().await?;

        let exercises = self.exercises_for_workout_plan(plan.id).await?;
        Ok(workout_response(plan, exercises))
    }

    pub async fn list_workout_plans(
        &self,
        owner: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<WorkoutPlanResponse>, ApiError> {
        let plans = sqlx::query_as::<_, WorkoutPlan>(
            "SELECT id, name, description, trainer_id FROM workout_plans
             WHERE ($1::uuid IS NULL OR trainer_id = $1)
             ORDER BY name OFFSET $2 LIMIT $3",
        )
        .bind(owner)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(plans.len());
        for plan in plans {
            let exercises = self.exercises_for_workout_plan(plan.id).await?;
            responses.push(workout_response(plan, exercises));
        }

        Ok(responses)
    }

    /// Bare plan rows without children, for the legacy `plans` listing.
    pub async fn list_plan_summaries(
        &self,
        owner: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<WorkoutPlan>, ApiError> {
        let plans = sqlx::query_as::<_, WorkoutPlan>(
            "SELECT id, name, description, trainer_id FROM workout_plans
             WHERE ($1::uuid IS NULL OR trainer_id = $1)
             ORDER BY name OFFSET $2 LIMIT $3",
        )
        .bind(owner)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    /// Full replacement: plan fields are overwritten and the exercise set is
    /// deleted and re-inserted from the payload, never merged.
    pub async fn update_workout_plan(
        &self,
        owner: Option<Uuid>,
        plan_id: Uuid,
        data: CreateWorkoutPlan,
    ) -> Result<WorkoutPlanResponse, ApiError> {
        validate_name(&data.name)?;
        validate_exercises(&data.exercises)?;

        let mut tx = self.db.begin().await?;

        let plan = sqlx::query_as::<_, WorkoutPlan>(
            "UPDATE workout_plans SET name = $1, description = $2
             WHERE id = $3 AND ($4::uuid IS NULL OR trainer_id = $4)
             RETURNING id, name, description, trainer_id",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(plan_id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Workout plan"))?;

        sqlx::query("DELETE FROM exercises WHERE workout_plan_id = $1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        insert_exercises(&mut tx, Some(plan_id), None, &data.exercises).await?;

        tx.commit().await?;

        let exercises = self.exercises_for_workout_plan(plan_id).await?;
        Ok(workout_response(plan, exercises))
    }

    /// Exercises go with the plan via FK cascade.
    pub async fn delete_workout_plan(
        &self,
        owner: Option<Uuid>,
        plan_id: Uuid,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            "DELETE FROM workout_plans WHERE id = $1 AND ($2::uuid IS NULL OR trainer_id = $2)",
        )
        .bind(plan_id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Workout plan"));
        }

        Ok(())
    }

    // Nutrition plans

    pub async fn create_nutrition_plan(
        &self,
        trainer_id: Option<Uuid>,
        data: CreateNutritionPlan,
    ) -> Result<NutritionPlanResponse, ApiError> {
        validate_name(&data.name)?;
        validate_meals(&data.meals)?;

        let mut tx = self.db.begin().await?;

        let plan = sqlx::query_as::<_, NutritionPlan>(
            "INSERT INTO nutrition_plans (id, name, description, trainer_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, trainer_id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(trainer_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_meals(&mut tx, plan.id, &data.meals).await?;

        tx.commit().await?;

        let meals = self.meals_for_plan(plan.id).await?;
        Ok(nutrition_response(plan, meals))
    }

    pub async fn list_nutrition_plans(
        &self,
        owner: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<NutritionPlanResponse>, ApiError> {
        let plans = sqlx::query_as::<_, NutritionPlan>(
            "SELECT id, name, description, trainer_id FROM nutrition_plans
             WHERE ($1::uuid IS NULL OR trainer_id = $1)
             ORDER BY name OFFSET $2 LIMIT $3",
        )
        .bind(owner)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(plans.len());
        for plan in plans {
            let meals = self.meals_for_plan(plan.id).await?;
            responses.push(nutrition_response(plan, meals));
        }

        Ok(responses)
    }

    pub async fn update_nutrition_plan(
        &self,
        owner: Option<Uuid>,
        plan_id: Uuid,
        data: CreateNutritionPlan,
    ) -> Result<NutritionPlanResponse, ApiError> {
        validate_name(&data.name)?;
        validate_meals(&data.meals)?;

        let mut tx = self.db.begin().await?;

        let plan = sqlx::query_as::<_, NutritionPlan>(
            "UPDATE nutrition_plans SET name = $1, description = $2
             WHERE id = $3 AND ($4::uuid IS NULL OR trainer_id = $4)
             RETURNING id, name, description, trainer_id",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(plan_id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Nutrition plan"))?;

        sqlx::query("DELETE FROM meals WHERE nutrition_plan_id = $1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        insert_meals(&mut tx, plan_id, &data.meals).await?;

        tx.commit().await?;

        let meals = self.meals_for_plan(plan_id).await?;
        Ok(nutrition_response(plan, meals))
    }

    pub async fn delete_nutrition_plan(
        &self,
        owner: Option<Uuid>,
        plan_id: Uuid,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            "DELETE FROM nutrition_plans WHERE id = $1 AND ($2::uuid IS NULL OR trainer_id = $2)",
        )
        .bind(plan_id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Nutrition plan"));
        }

        Ok(())
    }

    // Routines

    pub async fn create_routine(
        &self,
        trainer_id: Option<Uuid>,
        data: CreateRoutine,
    ) -> Result<RoutineResponse, ApiError> {
        validate_name(&data.name)?;
        validate_exercises(&data.exercises)?;

        let mut tx = self.db.begin().await?;

        let routine = sqlx::query_as::<_, Routine>(
            "INSERT INTO routines (id, name, description, trainer_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, trainer_id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(trainer_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_exercises(&mut tx, None, Some(routine.id), &data.exercises).await?;

        tx.commit().await?;

        let exercises = self.exercises_for_routine(routine.id).await?;
        Ok(routine_response(routine, exercises))
    }

    pub async fn list_routines(
        &self,
        owner: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<RoutineResponse>, ApiError> {
        let routines = sqlx::query_as::<_, Routine>(
            "SELECT id, name, description, trainer_id FROM routines
             WHERE ($1::uuid IS NULL OR trainer_id = $1)
             ORDER BY name OFFSET $2 LIMIT $3",
        )
        .bind(owner)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(routines.len());
        for routine in routines {
            let exercises = self.exercises_for_routine(routine.id).await?;
            responses.push(routine_response(routine, exercises));
        }

        Ok(responses)
    }

    /// Routine fields are always overwritten; the exercise set is replaced
    /// only when the payload carries one.
    pub async fn update_routine(
        &self,
        owner: Option<Uuid>,
        routine_id: Uuid,
        data: UpdateRoutine,
    ) -> Result<RoutineResponse, ApiError> {
        validate_name(&data.name)?;
        if let Some(exercises) = &data.exercises {
            validate_exercises(exercises)?;
        }

        let mut tx = self.db.begin().await?;

        let routine = sqlx::query_as::<_, Routine>(
            "UPDATE routines SET name = $1, description = $2
             WHERE id = $3 AND ($4::uuid IS NULL OR trainer_id = $4)
             RETURNING id, name, description, trainer_id",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(routine_id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Routine"))?;

        if let Some(exercises) = &data.exercises {
            sqlx::query("DELETE FROM exercises WHERE routine_id = $1")
                .bind(routine_id)
                .execute(&mut *tx)
                .await?;

            insert_exercises(&mut tx, None, Some(routine_id), exercises).await?;
        }

        tx.commit().await?;

        let exercises = self.exercises_for_routine(routine_id).await?;
        Ok(routine_response(routine, exercises))
    }

    /// Exercises are removed explicitly before the routine row.
    pub async fn delete_routine(
        &self,
        owner: Option<Uuid>,
        routine_id: Uuid,
    ) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        let found = sqlx::query(
            "SELECT 1 FROM routines WHERE id = $1 AND ($2::uuid IS NULL OR trainer_id = $2)",
        )
        .bind(routine_id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        if found.is_none() {
            return Err(ApiError::NotFound("Routine"));
        }

        sqlx::query("DELETE FROM exercises WHERE routine_id = $1")
            .bind(routine_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM routines WHERE id = $1")
            .bind(routine_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    // Assignments

    /// Assign a workout plan to a user. Both rows must be inside the
    /// caller's scope. Re-assigning the same plan is a no-op.
    pub async fn assign_workout_plan(
        &self,
        owner: Option<Uuid>,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<(), ApiError> {
        self.require_owned_user(owner, user_id).await?;

        let plan = sqlx::query(
            "SELECT 1 FROM workout_plans WHERE id = $1 AND ($2::uuid IS NULL OR trainer_id = $2)",
        )
        .bind(plan_id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        if plan.is_none() {
            return Err(ApiError::NotFound("Workout plan"));
        }

        sqlx::query(
            "INSERT INTO user_workout_plans (user_id, workout_plan_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(plan_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn assign_nutrition_plan(
        &self,
        owner: Option<Uuid>,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<(), ApiError> {
        self.require_owned_user(owner, user_id).await?;

        let plan = sqlx::query(
            "SELECT 1 FROM nutrition_plans WHERE id = $1 AND ($2::uuid IS NULL OR trainer_id = $2)",
        )
        .bind(plan_id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        if plan.is_none() {
            return Err(ApiError::NotFound("Nutrition plan"));
        }

        sqlx::query(
            "INSERT INTO user_nutrition_plans (user_id, nutrition_plan_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(plan_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// All plans assigned to a user, children inlined.
    pub async fn assigned_plans(&self, user_id: Uuid) -> Result<AssignedPlans, ApiError> {
        let workout_plans = sqlx::query_as::<_, WorkoutPlan>(
            "SELECT p.id, p.name, p.description, p.trainer_id
             FROM workout_plans p
             JOIN user_workout_plans a ON a.workout_plan_id = p.id
             WHERE a.user_id = $1
             ORDER BY p.name",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let nutrition_plans = sqlx::query_as::<_, NutritionPlan>(
            "SELECT p.id, p.name, p.description, p.trainer_id
             FROM nutrition_plans p
             JOIN user_nutrition_plans a ON a.nutrition_plan_id = p.id
             WHERE a.user_id = $1
             ORDER BY p.name",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let mut workout_responses = Vec::with_capacity(workout_plans.len());
        for plan in workout_plans {
            let exercises = self.exercises_for_workout_plan(plan.id).await?;
            workout_responses.push(workout_response(plan, exercises));
        }

        let mut nutrition_responses = Vec::with_capacity(nutrition_plans.len());
        for plan in nutrition_plans {
            let meals = self.meals_for_plan(plan.id).await?;
            nutrition_responses.push(nutrition_response(plan, meals));
        }

        Ok(AssignedPlans {
            workout_plans: workout_responses,
            nutrition_plans: nutrition_responses,
        })
    }

    // Helpers

    async fn require_owned_user(&self, owner: Option<Uuid>, user_id: Uuid) -> Result<(), ApiError> {
        let user = sqlx::query(
            "SELECT 1 FROM users WHERE id = $1 AND ($2::uuid IS NULL OR trainer_id = $2)",
        )
        .bind(user_id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        if user.is_none() {
            return Err(ApiError::NotFound("User"));
        }

        Ok(())
    }

    async fn exercises_for_workout_plan(&self, plan_id: Uuid) -> Result<Vec<Exercise>, ApiError> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, sets, reps, workout_plan_id, routine_id
             FROM exercises WHERE workout_plan_id = $1 ORDER BY name",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }

    async fn exercises_for_routine(&self, routine_id: Uuid) -> Result<Vec<Exercise>, ApiError> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, sets, reps, workout_plan_id, routine_id
             FROM exercises WHERE routine_id = $1 ORDER BY name",
        )
        .bind(routine_id)
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }

    async fn meals_for_plan(&self, plan_id: Uuid) -> Result<Vec<Meal>, ApiError> {
        let meals = sqlx::query_as::<_, Meal>(
            "SELECT id, name, description, calories, nutrition_plan_id
             FROM meals WHERE nutrition_plan_id = $1 ORDER BY name",
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        Ok(meals)
    }
}

async fn insert_exercises(
    tx: &mut Transaction<'_, Postgres>,
    workout_plan_id: Option<Uuid>,
    routine_id: Option<Uuid>,
    exercises: &[CreateExercise],
) -> Result<(), ApiError> {
    for exercise in exercises {
        sqlx::query(
            "INSERT INTO exercises (id, name, sets, reps, workout_plan_id, routine_id)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(&exercise.name)
        .bind(exercise.sets)
        .bind(exercise.reps)
        .bind(workout_plan_id)
        .bind(routine_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

async fn insert_meals(
    tx: &mut Transaction<'_, Postgres>,
    plan_id: Uuid,
    meals: &[CreateMeal],
) -> Result<(), ApiError> {
    for meal in meals {
        sqlx::query(
            "INSERT INTO meals (id, name, description, calories, nutrition_plan_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.calories)
        .bind(plan_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }

    Ok(())
}

fn validate_exercises(exercises: &[CreateExercise]) -> Result<(), ApiError> {
    for exercise in exercises {
        validate_name(&exercise.name)?;
        if exercise.sets < 1 || exercise.reps < 1 {
            return Err(ApiError::Validation(
                "Exercise sets and reps must be positive".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_meals(meals: &[CreateMeal]) -> Result<(), ApiError> {
    for meal in meals {
        validate_name(&meal.name)?;
        if meal.calories < 0 {
            return Err(ApiError::Validation(
                "Meal calories must be non-negative".to_string(),
            ));
        }
    }

    Ok(())
}

fn workout_response(plan: WorkoutPlan, exercises: Vec<Exercise>) -> WorkoutPlanResponse {
    WorkoutPlanResponse {
        id: plan.id,
        name: plan.name,
        description: plan.description,
        trainer_id: plan.trainer_id,
        exercises,
    }
}

fn nutrition_response(plan: NutritionPlan, meals: Vec<Meal>) -> NutritionPlanResponse {
    NutritionPlanResponse {
        id: plan.id,
        name: plan.name,
        description: plan.description,
        trainer_id: plan.trainer_id,
        meals,
    }
}

fn routine_response(routine: Routine, exercises: Vec<Exercise>) -> RoutineResponse {
    RoutineResponse {
        id: routine.id,
        name: routine.name,
        description: routine.description,
        trainer_id: routine.trainer_id,
        exercises,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_validation() {
        let ok = vec![CreateExercise {
            name: "Squat".to_string(),
            sets: 3,
            reps: 10,
        }];
        assert!(validate_exercises(&ok).is_ok());

        let zero_sets = vec![CreateExercise {
            name: "Squat".to_string(),
            sets: 0,
            reps: 10,
        }];
        assert!(validate_exercises(&zero_sets).is_err());

        let unnamed = vec![CreateExercise {
            name: " ".to_string(),
            sets: 3,
            reps: 10,
        }];
        assert!(validate_exercises(&unnamed).is_err());
    }

    #[test]
    fn test_meal_validation() {
        let ok = vec![CreateMeal {
            name: "Breakfast".to_string(),
            description: None,
            calories: 0,
        }];
        assert!(validate_meals(&ok).is_ok());

        let negative = vec![CreateMeal {
            name: "Breakfast".to_string(),
            description: None,
            calories: -10,
        }];
        assert!(validate_meals(&negative).is_err());
    }
}
