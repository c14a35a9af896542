use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{
    CreateProductResponse, MessageResponse, ProductEntry, ProductForm, ProductListResponse,
    UploadedFile,
};
use crate::server::response::ApiError;
use crate::server::validation::validate_product_form;
use crate::store::Store;
use crate::types::{ProductDraft, ProductKind};

const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

pub async fn list_products(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.store.list_products()?;

    Ok(Json(ProductListResponse {
        success: true,
        data: rows.into_iter().map(ProductEntry::from).collect(),
    }))
}

pub async fn create_product(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = parse_product_form(&mut multipart).await?;

    validate_product_form(&form, state.require_margin)?;

    let category_id = resolve_category(state.store.as_ref(), &form.category)?;

    let photo_path = match &form.image {
        Some(image) if !image.data.is_empty() => {
            state.uploads.save(&image.file_name, &image.data).await?
        }
        _ => String::new(),
    };

    let draft = ProductDraft {
        company_id: form.company_id,
        name: form.name,
        kind: ProductKind::from_form(&form.kind),
        description: form.description,
        category_id,
        buy_price: form.buy_price,
        sell_price: form.sell_price,
        photo_path,
    };

    let created = state.store.create_product(&draft)?;

    tracing::info!(
        "created product {} ({}) for company {}",
        created.code,
        created.product_id,
        draft.company_id
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            success: true,
            pesan: "product, variant, and price saved".to_string(),
            kode: created.code,
        }),
    ))
}

pub async fn delete_product(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.store.soft_delete_product(&id)? {
        return Err(ApiError::not_found("product not found"));
    }

    Ok(Json(MessageResponse {
        success: true,
        pesan: "product deleted".to_string(),
    }))
}

/// Maps the form's category reference to a category id: UUID-shaped input
/// is accepted verbatim, anything else is a case-insensitive name lookup.
fn resolve_category(store: &dyn Store, input: &str) -> Result<String, Error> {
    if Uuid::parse_str(input).is_ok() {
        return Ok(input.to_string());
    }

    store
        .find_category_by_name(input)?
        .map(|category| category.id)
        .ok_or_else(|| Error::CategoryNotFound(input.to_string()))
}

async fn parse_product_form(multipart: &mut Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("failed to read multipart: {e}")))?
    {
        match field.name() {
            Some("companyid") => form.company_id = read_text(field, "companyid").await?,
            Some("nama") => form.name = read_text(field, "nama").await?,
            Some("jenis") => form.kind = read_text(field, "jenis").await?,
            Some("deskripsi") => form.description = read_text(field, "deskripsi").await?,
            Some("kategoriid") => form.category = read_text(field, "kategoriid").await?,
            Some("harga_beli") => {
                form.buy_price = read_text(field, "harga_beli").await?.parse().unwrap_or(0.0);
            }
            Some("harga_jual") => {
                form.sell_price = read_text(field, "harga_jual").await?.parse().unwrap_or(0.0);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read image: {e}")))?;
                if data.len() > MAX_IMAGE_SIZE {
                    return Err(ApiError::payload_too_large(format!(
                        "image size ({} bytes) exceeds maximum allowed size ({MAX_IMAGE_SIZE} bytes)",
                        data.len()
                    )));
                }
                form.image = Some(UploadedFile {
                    file_name,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("failed to read {name}: {e}")))
}
