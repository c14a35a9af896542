use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant record. `code_prefix` is the constant part of generated
/// product codes for this company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "companyid")]
    pub id: String,
    #[serde(rename = "company_name")]
    pub name: String,
    #[serde(rename = "product_code")]
    pub code_prefix: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "kategoriid")]
    pub id: String,
    #[serde(rename = "kategorinama")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Product type flag. Persisted as 1 (physical) or 2 (digital).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Physical,
    Digital,
}

impl ProductKind {
    /// Maps the form value: "fisik" means physical, anything else digital.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        if value == "fisik" {
            Self::Physical
        } else {
            Self::Digital
        }
    }

    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        if value == 1 { Self::Physical } else { Self::Digital }
    }

    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Physical => 1,
            Self::Digital => 2,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Physical => "Fisik",
            Self::Digital => "Digital",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "produkid")]
    pub id: String,
    #[serde(rename = "produkkode")]
    pub code: String,
    #[serde(rename = "companyid")]
    pub company_id: String,
    #[serde(rename = "namaproduk")]
    pub name: String,
    #[serde(rename = "kategoriid", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "jenis")]
    pub kind: i64,
    #[serde(rename = "deskripsi_produk")]
    pub description: String,
    /// 1 = active; anything else is treated as soft-deleted.
    pub status: i64,
    pub created_at: DateTime<Utc>,
}

/// Input to the composite create-product transaction. The product code,
/// row ids, and the default variant/price rows are derived by the store.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub company_id: String,
    pub name: String,
    pub kind: ProductKind,
    pub description: String,
    pub category_id: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub photo_path: String,
}

/// Identifiers produced by the create-product transaction.
#[derive(Debug, Clone)]
pub struct CreatedProduct {
    pub product_id: String,
    pub variant_id: String,
    pub code: String,
}

/// One row of the denormalized product listing: product joined with its
/// category, first variant, and that variant's price.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: String,
    pub kind: i64,
    pub buy_price: f64,
    pub sell_price: f64,
    pub active: bool,
    pub photo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userid")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub avatar: String,
    pub role_id: i64,
    pub status: i64,
    pub created_at: DateTime<Utc>,
}

/// Opaque session credential issued at login. Only the argon2 hash and a
/// short lookup key are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}
