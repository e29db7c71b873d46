use axum::{
    extract::State,
    response::Json,
    routing::post,
    Form, Router,
};

use crate::api::{ApiError, AppState};
use crate::auth::{LoginForm, MessageResponse, RequestPasswordReset, ResetPassword, TokenResponse};

/// Public routes: login and the password-reset flow
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/token", post(login))
        .route("/admin/request-password-reset/", post(request_password_reset))
        .route("/admin/reset-password/", post(reset_password))
        .with_state(state)
}

/// Exchange email and password for a bearer token. The form field is named
/// `username` to keep the OAuth2 password-grant shape, but carries the email.
#[tracing::instrument(skip(state, form))]
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(response))
}

/// Start a password reset. The response is identical whether or not the
/// email matches an account, and regardless of mail delivery, so the
/// endpoint cannot be used to probe for registered addresses.
#[tracing::instrument(skip(state, request))]
async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<RequestPasswordReset>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(token) = state.auth.begin_password_reset(&request.email).await? {
        if let Err(err) = state.mailer.send_reset_token(&request.email, &token).await {
            tracing::error!("Failed to send password reset email: {err}");
        }
    }

    Ok(Json(MessageResponse::new(
        "If the email exists, you will receive instructions to reset your password",
    )))
}

/// Exchange a reset token for a new password. The token is single-use.
#[tracing::instrument(skip(state, request))]
async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPassword>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .auth
        .reset_password(&request.token, &request.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
