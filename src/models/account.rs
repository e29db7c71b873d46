use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account roles for role-based access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Trainer,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Trainer => "trainer",
            Role::User => "user",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "trainer" => Some(Role::Trainer),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trainer {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub admin_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub trainer_id: Option<Uuid>,
}

/// An account resolved from one of the three role tables. Login resolution
/// is an ordered match over these variants: admin wins over trainer, trainer
/// wins over user, when the same email exists in more than one table.
#[derive(Debug, Clone)]
pub enum Account {
    Admin(Admin),
    Trainer(Trainer),
    User(User),
}

impl Account {
    pub fn role(&self) -> Role {
        match self {
            Account::Admin(_) => Role::Admin,
            Account::Trainer(_) => Role::Trainer,
            Account::User(_) => Role::User,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Account::Admin(a) => a.id,
            Account::Trainer(t) => t.id,
            Account::User(u) => u.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Account::Admin(a) => &a.email,
            Account::Trainer(t) => &t.email,
            Account::User(u) => &u.email,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Account::Admin(a) => &a.password_hash,
            Account::Trainer(t) => &t.password_hash,
            Account::User(u) => &u.password_hash,
        }
    }
}

// Request/response models. Responses never expose the password hash.

#[derive(Debug, Deserialize)]
pub struct CreateAdmin {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdmin {
    pub email: String,
    pub full_name: String,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTrainer {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTrainer {
    pub email: String,
    pub full_name: String,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub trainer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub email: String,
    pub full_name: String,
    pub password: Option<String>,
    pub trainer_id: Option<Uuid>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct AdminResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TrainerResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub admin_id: Option<Uuid>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub trainer_id: Option<Uuid>,
}

impl From<Admin> for AdminResponse {
    fn from(a: Admin) -> Self {
        Self {
            id: a.id,
            email: a.email,
            full_name: a.full_name,
        }
    }
}

impl From<Trainer> for TrainerResponse {
    fn from(t: Trainer) -> Self {
        Self {
            id: t.id,
            email: t.email,
            full_name: t.full_name,
            admin_id: t.admin_id,
        }
    }
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            trainer_id: u.trainer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Trainer, Role::User] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("coach"), None);
    }

    #[test]
    fn test_account_accessors() {
        let account = Account::Trainer(Trainer {
            id: Uuid::new_v4(),
            email: "trainer@example.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: "Trainer".to_string(),
            admin_id: None,
        });

        assert_eq!(account.role(), Role::Trainer);
        assert_eq!(account.email(), "trainer@example.com");
        assert_eq!(account.password_hash(), "hash");
    }
}
