use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{CreateCompanyRequest, DataResponse};
use crate::server::response::ApiError;
use crate::store::code::DEFAULT_PREFIX;
use crate::types::Company;

pub async fn create_company(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.company_name.trim().is_empty() {
        return Err(ApiError::bad_request("company name is required"));
    }

    let id = req
        .companyid
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if state.store.get_company(&id)?.is_some() {
        return Err(ApiError::conflict("company already exists"));
    }

    let company = Company {
        id,
        name: req.company_name.trim().to_string(),
        code_prefix: req
            .product_code
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        created_at: Utc::now(),
    };
    state.store.create_company(&company)?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(company))))
}

pub async fn list_companies(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = state.store.list_companies()?;
    Ok(Json(DataResponse::new(companies)))
}
