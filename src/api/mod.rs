// HTTP surface: route trees and handlers

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod routes;
pub mod trainer;
pub mod user;

use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::services::{AccountService, Mailer, PlanService};

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthService,
    pub accounts: AccountService,
    pub plans: PlanService,
    pub mailer: Mailer,
}

/// Offset pagination shared by every collection endpoint
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(0, 100)
    }
}
