use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::helpers::{TokenValidationError, extract_token_from_header, validate_token};
use crate::server::AppState;
use crate::types::{SessionToken, User};

/// Extractor that requires a valid session token bound to an active user.
pub struct RequireUser {
    pub token: SessionToken,
    pub user: User,
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    InactiveUser,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "authentication required"),
            AuthError::InvalidScheme => (StatusCode::UNAUTHORIZED, "invalid authorization scheme"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "token expired"),
            AuthError::InactiveUser => (StatusCode::FORBIDDEN, "user is inactive"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        let body = json!({ "success": false, "pesan": message });

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                "WWW-Authenticate",
                "Bearer realm=\"stockman\"".parse().unwrap(),
            );
        }

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let raw_token = extract_token_from_header(auth_header)
            .map_err(|e| match e {
                TokenValidationError::InvalidScheme => AuthError::InvalidScheme,
                _ => AuthError::InternalError,
            })?
            .ok_or(AuthError::MissingAuth)?;

        let session = validate_token(state, &raw_token).map_err(|e| match e {
            TokenValidationError::InvalidScheme => AuthError::InvalidScheme,
            TokenValidationError::InvalidToken => AuthError::InvalidToken,
            TokenValidationError::TokenExpired => AuthError::TokenExpired,
            TokenValidationError::InactiveUser => AuthError::InactiveUser,
            TokenValidationError::InternalError => AuthError::InternalError,
        })?;

        Ok(RequireUser {
            token: session.token,
            user: session.user,
        })
    }
}
