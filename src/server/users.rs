use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{PasswordHasher, RequireUser};
use crate::server::AppState;
use crate::server::dto::{CreateUserRequest, SignupRequest};
use crate::server::response::ApiError;
use crate::types::User;

/// POST /api/signup - self-registration, no session required.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = register_user(&state, &req.name, &req.email, &req.password, "").await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/users - user creation from the admin screen.
pub async fn create_user(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let avatar = req.avatar.unwrap_or_default();
    let user = register_user(&state, &req.name, &req.email, &req.password, &avatar).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.store.list_users()?;
    Ok(Json(users))
}

async fn register_user(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    avatar: &str,
) -> Result<User, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::bad_request("email is required"));
    }
    if password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }

    if state.store.get_user_by_email(&email)?.is_some() {
        return Err(ApiError::conflict("email already registered"));
    }

    let password_hash = PasswordHasher::new().hash(password)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email,
        password_hash,
        avatar: avatar.to_string(),
        role_id: 1,
        status: 1,
        created_at: Utc::now(),
    };
    state.store.create_user(&user)?;

    Ok(user)
}
