// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token authentication middleware.

use crate::error::AppError;
use crate::models::{user::ACCESS_AUTH, User};
use crate::services::token;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Request header carrying the session token.
pub const AUTH_HEADER: &str = "x-auth";

/// Authenticated session attached to the request after `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    /// The exact token string the request authenticated with
    pub token: String,
}

/// Middleware that requires a valid, unrevoked session token.
///
/// Every request re-runs the full check; verified tokens are never cached
/// across requests. Any failure along the way — missing header, bad
/// signature, unknown user, revoked token, even a store error — reads as a
/// plain 401 to the client.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .ok_or(AppError::Unauthenticated)?;

    // Signature check proves who issued the token, not that the session
    // is still live.
    let claims = token::verify(&token, &state.config.jwt_signing_key)
        .map_err(|_| AppError::Unauthenticated)?;

    if claims.access != ACCESS_AUTH {
        return Err(AppError::Unauthenticated);
    }

    let user = state
        .db
        .get_user(&claims.sub)
        .await
        .map_err(|_| AppError::Unauthenticated)?
        .ok_or(AppError::Unauthenticated)?;

    // Cross-check against the stored token list. Removing the entry there
    // revokes the token even though its signature still verifies.
    if !user.has_auth_token(&token) {
        return Err(AppError::Unauthenticated);
    }

    request.extensions_mut().insert(AuthSession { user, token });

    Ok(next.run(request).await)
}
