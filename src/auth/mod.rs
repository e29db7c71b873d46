// Authentication and authorization: token service, access gate, reset flow

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod reset;
pub mod service;

pub use errors::AuthError;
pub use jwt::{extract_bearer_token, TokenService};
pub use middleware::{admin_only_middleware, jwt_auth_middleware, trainer_or_admin_middleware};
pub use models::{
    Claims, LoginForm, MessageResponse, Principal, RequestPasswordReset, ResetPassword,
    TokenResponse,
};
pub use reset::ResetTokenStore;
pub use service::AuthService;
