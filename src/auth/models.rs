use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (account email)
    pub role: Role,  // Resolved role
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued at
}

/// The authenticated identity resolved from a request's bearer token.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Ownership filter for trainer-owned resources: admins see everything,
    /// everyone else only rows stamped with their own id. Queries bind this
    /// as `($n::uuid IS NULL OR trainer_id = $n)` so the isolation rule lives
    /// in one place instead of every handler.
    pub fn owner_filter(&self) -> Option<Uuid> {
        match self.role {
            Role::Admin => None,
            _ => Some(self.id),
        }
    }
}

/// Login form, OAuth2 password-grant shape: `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RequestPasswordReset {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPassword {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_filter_bypasses_for_admin() {
        let id = Uuid::new_v4();

        let admin = Principal {
            id,
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        };
        let trainer = Principal {
            id,
            email: "trainer@example.com".to_string(),
            role: Role::Trainer,
        };

        assert_eq!(admin.owner_filter(), None);
        assert_eq!(trainer.owner_filter(), Some(id));
    }
}
