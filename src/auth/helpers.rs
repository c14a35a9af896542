use std::sync::Arc;

use chrono::Utc;

use super::{TokenGenerator, parse_token};
use crate::server::AppState;
use crate::types::{SessionToken, User};

#[derive(Debug)]
pub enum TokenValidationError {
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    InactiveUser,
    InternalError,
}

pub struct ValidatedSession {
    pub token: SessionToken,
    pub user: User,
}

/// Validates a raw token string against the store and resolves its user.
/// Inactive users are rejected even when the token itself is valid.
pub fn validate_token(
    state: &Arc<AppState>,
    raw_token: &str,
) -> Result<ValidatedSession, TokenValidationError> {
    let (lookup, _secret) =
        parse_token(raw_token).map_err(|_| TokenValidationError::InvalidToken)?;

    let token = state
        .store
        .get_token_by_lookup(&lookup)
        .map_err(|_| TokenValidationError::InternalError)?
        .ok_or(TokenValidationError::InvalidToken)?;

    let generator = TokenGenerator::new();
    if !generator
        .verify(raw_token, &token.token_hash)
        .map_err(|_| TokenValidationError::InternalError)?
    {
        return Err(TokenValidationError::InvalidToken);
    }

    if let Some(expires_at) = &token.expires_at {
        if expires_at < &Utc::now() {
            return Err(TokenValidationError::TokenExpired);
        }
    }

    let user = state
        .store
        .get_user(&token.user_id)
        .map_err(|_| TokenValidationError::InternalError)?
        .ok_or(TokenValidationError::InvalidToken)?;

    if user.status != 1 {
        return Err(TokenValidationError::InactiveUser);
    }

    if let Err(e) = state.store.update_token_last_used(&token.id) {
        tracing::warn!("Failed to update token last_used_at: {e}");
    }

    Ok(ValidatedSession { token, user })
}

/// Extracts the token from a Bearer Authorization header.
/// Returns None if no auth header is present.
pub fn extract_token_from_header(
    auth_header: Option<&str>,
) -> Result<Option<String>, TokenValidationError> {
    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            Ok(Some(header.strip_prefix("Bearer ").unwrap().to_string()))
        }
        Some(_) => Err(TokenValidationError::InvalidScheme),
        None => Ok(None),
    }
}
