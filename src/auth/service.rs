use chrono::Duration;
use sqlx::PgPool;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthError, Principal, ResetTokenStore, TokenResponse, TokenService};
use crate::models::{Account, Admin, Role, Trainer, User};

#[derive(Debug, Clone)]
pub struct AuthService {
    tokens: TokenService,
    reset_tokens: ResetTokenStore,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str, token_expires_in: Duration) -> Self {
        Self {
            tokens: TokenService::new(jwt_secret, token_expires_in),
            reset_tokens: ResetTokenStore::default(),
            db,
        }
    }

    /// Log in with email and password, no role hint. The account is resolved
    /// by fixed precedence (admin, then trainer, then user), so an email that
    /// exists in two tables silently logs in as the higher-privilege one.
    /// "No such email" and "wrong password" are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let account = self
            .find_account(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, account.password_hash())? {
            return Err(AuthError::InvalidCredentials);
        }

        let role = account.role();
        let access_token = self.tokens.issue_default(account.email(), role)?;

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            role,
        })
    }

    /// Resolve a bearer token to a principal. The token names a role, so the
    /// lookup goes straight to that role's table; a cryptographically valid
    /// token whose account has since been deleted resolves to nothing.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self
            .tokens
            .validate(token)
            .map_err(|_| AuthError::Unauthenticated)?;

        let account = match claims.role {
            Role::Admin => self.find_admin(&claims.sub).await?.map(Account::Admin),
            Role::Trainer => self.find_trainer(&claims.sub).await?.map(Account::Trainer),
            Role::User => self.find_user(&claims.sub).await?.map(Account::User),
        };

        let account = account.ok_or(AuthError::Unauthenticated)?;

        Ok(Principal {
            id: account.id(),
            email: account.email().to_string(),
            role: claims.role,
        })
    }

    /// Start a password reset. Returns the token to mail if any account
    /// matches the email; the HTTP surface answers identically either way.
    pub async fn begin_password_reset(&self, email: &str) -> Result<Option<String>, AuthError> {
        if self.find_account(email).await?.is_none() {
            return Ok(None);
        }

        Ok(Some(self.reset_tokens.issue(email)))
    }

    /// Redeem a reset token and store the new password hash on the first
    /// account matching the remembered email, using login precedence. The
    /// token is consumed whether or not an account still exists.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let email = self.reset_tokens.redeem(token)?;
        let password_hash = hash_password(new_password)?;

        match self.find_account(&email).await? {
            Some(Account::Admin(admin)) => {
                sqlx::query("UPDATE admins SET password_hash = $1 WHERE id = $2")
                    .bind(&password_hash)
                    .bind(admin.id)
                    .execute(&self.db)
                    .await?;
            }
            Some(Account::Trainer(trainer)) => {
                sqlx::query("UPDATE trainers SET password_hash = $1 WHERE id = $2")
                    .bind(&password_hash)
                    .bind(trainer.id)
                    .execute(&self.db)
                    .await?;
            }
            Some(Account::User(user)) => {
                sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
                    .bind(&password_hash)
                    .bind(user.id)
                    .execute(&self.db)
                    .await?;
            }
            None => {}
        }

        Ok(())
    }

    /// Probe the role tables in precedence order and return the first match.
    pub async fn find_account(&self, email: &str) -> Result<Option<Account>, AuthError> {
        if let Some(admin) = self.find_admin(email).await? {
            return Ok(Some(Account::Admin(admin)));
        }
        if let Some(trainer) = self.find_trainer(email).await? {
            return Ok(Some(Account::Trainer(trainer)));
        }
        if let Some(user) = self.find_user(email).await? {
            return Ok(Some(Account::User(user)));
        }

        Ok(None)
    }

    async fn find_admin(&self, email: &str) -> Result<Option<Admin>, AuthError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, password_hash, full_name FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(admin)
    }

    async fn find_trainer(&self, email: &str) -> Result<Option<Trainer>, AuthError> {
        let trainer = sqlx::query_as::<_, Trainer>(
            "SELECT id, email, password_hash, full_name, admin_id FROM trainers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(trainer)
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, trainer_id FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}
