use sqlx::PgPool;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::password::hash_password;
use crate::models::{
    Admin, AdminResponse, CreateAdmin, CreateTrainer, CreateUser, Trainer, TrainerResponse,
    UpdateAdmin, UpdateTrainer, UpdateUser, User, UserResponse,
};

/// CRUD over the three role tables. Trainer-owned user operations take an
/// `owner` filter derived from the principal (`None` = admin bypass) so that
/// ownership scoping is enforced in the query itself, not per handler.
#[derive(Debug, Clone)]
pub struct AccountService {
    db: PgPool,
}

impl AccountService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // Trainers (admin-managed)

    pub async fn create_trainer(
        &self,
        admin_id: Uuid,
        data: CreateTrainer,
    ) -> Result<TrainerResponse, ApiError> {
        validate_identity(&data.email, &data.full_name)?;
        let password_hash = hash_password(&data.password)
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let trainer = sqlx::query_as::<_, Trainer>(
            "INSERT INTO trainers (id, email, password_hash, full_name, admin_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, password_hash, full_name, admin_id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.email)
        .bind(&password_hash)
        .bind(&data.full_name)
        .bind(admin_id)
        .fetch_one(&self.db)
        .await?;

        Ok(trainer.into())
    }

    pub async fn list_trainers(
        &self,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<TrainerResponse>, ApiError> {
        let trainers = sqlx::query_as::<_, TrainerResponse>(
            "SELECT id, email, full_name, admin_id FROM trainers ORDER BY email OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(trainers)
    }

    pub async fn update_trainer(
        &self,
        trainer_id: Uuid,
        data: UpdateTrainer,
    ) -> Result<TrainerResponse, ApiError> {
        validate_identity(&data.email, &data.full_name)?;
        let password_hash = hash_optional(data.password.as_deref())?;

        let trainer = sqlx::query_as::<_, Trainer>(
            "UPDATE trainers
             SET email = $1, full_name = $2, password_hash = COALESCE($3, password_hash)
             WHERE id = $4
             RETURNING id, email, password_hash, full_name, admin_id",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&password_hash)
        .bind(trainer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Trainer"))?;

        Ok(trainer.into())
    }

    pub async fn delete_trainer(&self, trainer_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM trainers WHERE id = $1")
            .bind(trainer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Trainer"));
        }

        Ok(())
    }

    // Admins

    pub async fn create_admin(&self, data: CreateAdmin) -> Result<AdminResponse, ApiError> {
        validate_identity(&data.email, &data.full_name)?;
        let password_hash = hash_password(&data.password)
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (id, email, password_hash, full_name)
             VALUES ($1, $2, $3, $4)
             RETURNING id, email, password_hash, full_name",
        )
        .bind(Uuid::new_v4())
        .bind(&data.email)
        .bind(&password_hash)
        .bind(&data.full_name)
        .fetch_one(&self.db)
        .await?;

        Ok(admin.into())
    }

    pub async fn update_admin(
        &self,
        admin_id: Uuid,
        data: UpdateAdmin,
    ) -> Result<AdminResponse, ApiError> {
        validate_identity(&data.email, &data.full_name)?;
        let password_hash = hash_optional(data.password.as_deref())?;

        let admin = sqlx::query_as::<_, Admin>(
            "UPDATE admins
             SET email = $1, full_name = $2, password_hash = COALESCE($3, password_hash)
             WHERE id = $4
             RETURNING id, email, password_hash, full_name",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&password_hash)
        .bind(admin_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("Admin"))?;

        Ok(admin.into())
    }

    pub async fn delete_admin(&self, admin_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(admin_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Admin"));
        }

        Ok(())
    }

    // Users

    pub async fn create_user(
        &self,
        trainer_id: Option<Uuid>,
        data: CreateUser,
    ) -> Result<UserResponse, ApiError> {
        validate_identity(&data.email, &data.full_name)?;
        let password_hash = hash_password(&data.password)
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, full_name, trainer_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, password_hash, full_name, trainer_id",
        )
        .bind(Uuid::new_v4())
        .bind(&data.email)
        .bind(&password_hash)
        .bind(&data.full_name)
        .bind(trainer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(user.into())
    }

    pub async fn list_users(
        &self,
        owner: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<UserResponse>, ApiError> {
        let users = sqlx::query_as::<_, UserResponse>(
            "SELECT id, email, full_name, trainer_id FROM users
             WHERE ($1::uuid IS NULL OR trainer_id = $1)
             ORDER BY email OFFSET $2 LIMIT $3",
        )
        .bind(owner)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse, ApiError> {
        let user = sqlx::query_as::<_, UserResponse>(
            "SELECT id, email, full_name, trainer_id FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

        Ok(user)
    }

    /// Update a user. Only an unscoped (admin) caller may reassign
    /// `trainer_id`, and the target trainer must exist.
    pub async fn update_user(
        &self,
        owner: Option<Uuid>,
        user_id: Uuid,
        data: UpdateUser,
    ) -> Result<UserResponse, ApiError> {
        validate_identity(&data.email, &data.full_name)?;
        let password_hash = hash_optional(data.password.as_deref())?;

        let reassign = owner.is_none() && data.trainer_id.is_some();
        if let (true, Some(new_trainer)) = (reassign, data.trainer_id) {
            let exists = sqlx::query("SELECT 1 FROM trainers WHERE id = $1")
                .bind(new_trainer)
                .fetch_optional(&self.db)
                .await?;
            if exists.is_none() {
                return Err(ApiError::NotFound("Trainer"));
            }
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET email = $1,
                 full_name = $2,
                 password_hash = COALESCE($3, password_hash),
                 trainer_id = CASE WHEN $4 THEN $5 ELSE trainer_id END
             WHERE id = $6 AND ($7::uuid IS NULL OR trainer_id = $7)
             RETURNING id, email, password_hash, full_name, trainer_id",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&password_hash)
        .bind(reassign)
        .bind(data.trainer_id)
        .bind(user_id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

        Ok(user.into())
    }

    /// Self-service profile update. Scoped to the user's own row; the
    /// trainer assignment is not touchable from here.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        data: UpdateUser,
    ) -> Result<UserResponse, ApiError> {
        validate_identity(&data.email, &data.full_name)?;
        let password_hash = hash_optional(data.password.as_deref())?;

        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET email = $1, full_name = $2, password_hash = COALESCE($3, password_hash)
             WHERE id = $4
             RETURNING id, email, password_hash, full_name, trainer_id",
        )
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&password_hash)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

        Ok(user.into())
    }

    pub async fn delete_user(&self, owner: Option<Uuid>, user_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = $1 AND ($2::uuid IS NULL OR trainer_id = $2)",
        )
        .bind(user_id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User"));
        }

        Ok(())
    }
}

fn validate_identity(email: &str, full_name: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if full_name.trim().is_empty() {
        return Err(ApiError::Validation("Full name is required".to_string()));
    }

    Ok(())
}

fn hash_optional(password: Option<&str>) -> Result<Option<String>, ApiError> {
    password
        .map(|p| hash_password(p).map_err(|e| ApiError::Validation(e.to_string())))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_validation() {
        assert!(validate_identity("user@example.com", "User").is_ok());
        assert!(validate_identity("", "User").is_err());
        assert!(validate_identity("not-an-email", "User").is_err());
        assert!(validate_identity("user@example.com", "  ").is_err());
    }

    #[test]
    fn test_hash_optional_skips_absent_password() {
        assert!(hash_optional(None).unwrap().is_none());
        assert!(hash_optional(Some("longenough")).unwrap().is_some());
        assert!(hash_optional(Some("short")).is_err());
    }
}
