// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration, login, and session routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthSession, AUTH_HEADER};
use crate::models::user::ACCESS_AUTH;
use crate::models::{SessionToken, User, UserResponse};
use crate::services::{password, token};
use crate::AppState;
use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Public user routes (no auth).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
}

/// User routes behind the auth middleware (applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/me", get(me))
        .route("/users/me/token", delete(logout))
}

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        email(message = "must be a valid email address"),
        length(min = 5, message = "must be at least 5 characters")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

/// Login payload. Not validated beyond presence; anything that does not
/// match a stored credential fails the same way.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issue a fresh "auth" token and append it to the user's session list.
/// The caller persists the user afterwards.
fn append_auth_token(state: &AppState, user: &mut User) -> Result<String> {
    let session_token = token::issue(&user.id, ACCESS_AUTH, &state.config.jwt_signing_key)?;
    user.tokens.push(SessionToken {
        access: ACCESS_AUTH.to_string(),
        token: session_token.clone(),
    });
    Ok(session_token)
}

/// POST /users — register a new user.
///
/// Returns the sanitized user and the session token in the `x-auth` header.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.email = payload.email.trim().to_string();
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if state.db.get_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = password::hash_password(&payload.password)?;
    let mut user = User::new(payload.email, password_hash);
    let session_token = append_auth_token(&state, &mut user)?;

    // Single document write; no partial record on any earlier failure.
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        AppendHeaders([(AUTH_HEADER, session_token)]),
        Json(UserResponse::from(&user)),
    ))
}

/// POST /users/login — authenticate and open a new session.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let email = payload.email.trim();

    let mut user = state
        .db
        .get_user_by_email(email)
        .await?
        .ok_or(AppError::BadCredentials)?;

    // Unknown email and wrong password fail identically.
    if !password::verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::BadCredentials);
    }

    let session_token = append_auth_token(&state, &mut user)?;
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        AppendHeaders([(AUTH_HEADER, session_token)]),
        Json(UserResponse::from(&user)),
    ))
}

/// GET /users/me — the authenticated user, sanitized.
async fn me(Extension(session): Extension<AuthSession>) -> Json<UserResponse> {
    Json(UserResponse::from(&session.user))
}

/// DELETE /users/me/token — revoke the session token used by this request.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<()> {
    let mut user = session.user;
    user.remove_token(&session.token);
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Session token revoked");

    Ok(())
}
