pub mod code;
mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Company operations
    fn create_company(&self, company: &Company) -> Result<()>;
    fn get_company(&self, id: &str) -> Result<Option<Company>>;
    fn list_companies(&self) -> Result<Vec<Company>>;

    // Category operations
    fn create_category(&self, category: &Category) -> Result<()>;
    fn get_category(&self, id: &str) -> Result<Option<Category>>;
    /// Case-insensitive exact match on the category name.
    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;
    fn list_categories(&self) -> Result<Vec<Category>>;

    // Product operations
    /// Read-only preview of the next code in the company's sequence. The
    /// authoritative value is recomputed inside `create_product`.
    fn next_product_code(&self, company_id: &str) -> Result<String>;
    /// Creates the product, its default variant, and the variant price as
    /// one transaction; rolls all three back on any failure.
    fn create_product(&self, draft: &ProductDraft) -> Result<CreatedProduct>;
    fn get_product(&self, id: &str) -> Result<Option<Product>>;
    /// Denormalized listing: product joined with category, first variant,
    /// and that variant's price.
    fn list_products(&self) -> Result<Vec<ProductListing>>;
    /// Marks the product inactive. Returns false if no row matched.
    fn soft_delete_product(&self, id: &str) -> Result<bool>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;

    // Session token operations
    fn create_token(&self, token: &SessionToken) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<SessionToken>>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;
    fn delete_token(&self, id: &str) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
