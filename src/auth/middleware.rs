use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::auth::{extract_bearer_token, AuthError, AuthService, Principal};
use crate::models::Role;

/// Bearer-token authentication middleware. Resolves the principal and stores
/// it in request extensions for handlers and the role gates below.
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;
    let principal = auth_service.authenticate(token).await?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Admin-only gate, layered after `jwt_auth_middleware`
pub async fn admin_only_middleware(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if principal.role != Role::Admin {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Trainer-or-admin gate, layered after `jwt_auth_middleware`
pub async fn trainer_or_admin_middleware(
    Extension(principal): Extension<Principal>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !matches!(principal.role, Role::Admin | Role::Trainer) {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(request).await)
}
