use serde::{Deserialize, Serialize};

use crate::types::{ProductKind, ProductListing, User};

/// One entry of `GET /product`, shaped for the dashboard table.
#[derive(Debug, Serialize)]
pub struct ProductEntry {
    pub id: String,
    pub kode: String,
    pub nama: String,
    pub kategori: String,
    pub jenis: &'static str,
    #[serde(rename = "hargaBeli")]
    pub harga_beli: f64,
    #[serde(rename = "hargaJual")]
    pub harga_jual: f64,
    pub status: bool,
    pub foto: String,
}

impl From<ProductListing> for ProductEntry {
    fn from(row: ProductListing) -> Self {
        Self {
            id: row.id,
            kode: row.code,
            nama: row.name,
            kategori: row.category,
            jenis: ProductKind::from_i64(row.kind).label(),
            harga_beli: row.buy_price,
            harga_jual: row.sell_price,
            status: row.active,
            foto: row.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<ProductEntry>,
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub success: bool,
    pub pesan: String,
    pub kode: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub pesan: String,
}

/// Parsed multipart form for `POST /product`. Field names follow the
/// dashboard's form contract.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub company_id: String,
    pub name: String,
    pub kind: String,
    pub description: String,
    pub category: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub image: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub nama: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub companyid: Option<String>,
    pub company_name: String,
    #[serde(default)]
    pub product_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub user: User,
    pub access_token: String,
}
