use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{PasswordHasher, RequireUser, TokenGenerator};
use crate::server::AppState;
use crate::server::dto::{LoginRequest, LoginResponse, MessageResponse};
use crate::server::response::ApiError;
use crate::types::SessionToken;

const SESSION_TTL_HOURS: i64 = 24;

/// POST /auth/login - credential exchange. Failures are uniform so the
/// response does not reveal whether the email exists.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let invalid = || ApiError::unauthorized("invalid email or password");

    let user = state
        .store
        .get_user_by_email(&req.email.trim().to_lowercase())?
        .filter(|u| u.status == 1)
        .ok_or_else(invalid)?;

    if !PasswordHasher::new().verify(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let (raw_token, lookup, hash) = TokenGenerator::new().generate()?;
    let now = Utc::now();
    let token = SessionToken {
        id: Uuid::new_v4().to_string(),
        token_hash: hash,
        token_lookup: lookup,
        user_id: user.id.clone(),
        created_at: now,
        expires_at: Some(now + Duration::hours(SESSION_TTL_HOURS)),
        last_used_at: None,
    };
    state.store.create_token(&token)?;

    tracing::info!("user {} signed in", user.id);

    Ok(Json(LoginResponse {
        status: "success",
        user,
        access_token: raw_token,
    }))
}

/// POST /auth/logout - revokes the session token used on the request.
pub async fn logout(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_token(&auth.token.id)?;

    Ok(Json(MessageResponse {
        success: true,
        pesan: "signed out".to_string(),
    }))
}
