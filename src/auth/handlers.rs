use axum::{
    extract::{FromRef, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::cookie;
use super::dto::{
    validate_registration, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, ResetPasswordRequest,
};
use super::extractors::AuthSession;
use super::jwt::{JwtKeys, TokenError};
use super::password::{hash_password, verify_password};
use super::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgotPassword", post(forgot_password))
        .route("/resetPassword/:id/:token", post(reset_password))
        .route("/profile", get(profile))
        .route("/logout", post(logout))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let errors = validate_registration(&payload);
    if !errors.is_empty() {
        warn!(email = %payload.email, "registration rejected by validation");
        return Err(ApiError::Validation(errors));
    }

    let existing = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::RegisterFailed)?;
    if existing.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&payload.password, &state.config.hash).map_err(ApiError::RegisterFailed)?;
    let user = User::create(&state.db, &payload.name, &payload.email, &hash)
        .await
        .map_err(ApiError::RegisterFailed)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(MessageResponse::new("User saved successfully")))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = match User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::internal)?
    {
        Some(user) => user,
        None => {
            // Same response as a wrong password; only the log differs.
            warn!(email = %payload.email, "login with unknown email");
            return Err(ApiError::IncorrectCredentials);
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::internal)?;
    if !ok {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::IncorrectCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_session(&user).map_err(ApiError::internal)?;
    let session_cookie = cookie::create_cookie(token, state.config.jwt.session_ttl_days);

    info!(user_id = %user.id, "user logged in");
    Ok((
        [(header::SET_COOKIE, session_cookie.to_string())],
        Json(LoginResponse {
            id: user.id,
            name: user.name,
        }),
    ))
}

/// Claims straight out of the verified cookie; nothing is read from the
/// database here.
async fn profile(AuthSession(claims): AuthSession) -> impl IntoResponse {
    Json(claims)
}

async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, cookie::clear_cookie().to_string())],
        Json(MessageResponse::new("User logout successfully")),
    )
}

#[instrument(skip(state, payload))]
async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::UnknownResetEmail)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_reset(&user).map_err(ApiError::internal)?;
    let link = format!("{}/{}/{}", state.config.reset_link_base, user.id, token);

    state
        .mailer
        .send_reset_link(&user.email, &link)
        .await
        .map_err(|e| {
            warn!(user_id = %user.id, error = %e, "reset email failed");
            ApiError::EmailNotSent(e.to_string())
        })?;

    info!(user_id = %user.id, "reset link issued");
    Ok(Json(MessageResponse::new("Email sent successfully")))
}

#[instrument(skip(state, payload, token))]
async fn reset_password(
    State(state): State<AppState>,
    Path((id, token)): Path<(Uuid, String)>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    // The token proves control of the reset request; the path id selects
    // the account being updated.
    keys.verify_reset(&token).map_err(|e| match e {
        TokenError::Expired => ApiError::TokenExpired,
        TokenError::Invalid => ApiError::internal(anyhow::anyhow!("reset token rejected")),
    })?;

    let hash = hash_password(&payload.password, &state.config.hash).map_err(ApiError::internal)?;
    let updated = User::set_password(&state.db, id, &hash)
        .await
        .map_err(ApiError::internal)?;
    if !updated {
        return Err(ApiError::internal(anyhow::anyhow!(
            "password not updated for {id}"
        )));
    }

    info!(user_id = %id, "password reset");
    Ok(Json(MessageResponse::new("Password successfully updated")))
}
