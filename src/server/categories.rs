use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{CreateCategoryRequest, DataResponse};
use crate::server::response::ApiError;
use crate::types::Category;

pub async fn create_category(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.nama.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("category name is required"));
    }

    if state.store.find_category_by_name(name)?.is_some() {
        return Err(ApiError::conflict("category already exists"));
    }

    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
    };
    state.store.create_category(&category)?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

pub async fn list_categories(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.store.list_categories()?;
    Ok(Json(DataResponse::new(categories)))
}
