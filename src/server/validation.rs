use super::dto::ProductForm;
use crate::error::{Error, Result};

/// Validates the product form in submission order, failing on the first
/// problem. The margin rule is opt-in via server configuration.
pub fn validate_product_form(form: &ProductForm, require_margin: bool) -> Result<()> {
    if form.company_id.is_empty() {
        return Err(Error::Validation("companyid is required".to_string()));
    }
    if form.name.is_empty() {
        return Err(Error::Validation("product name is required".to_string()));
    }
    if form.category.is_empty() {
        return Err(Error::Validation("category is required".to_string()));
    }
    if form.buy_price <= 0.0 || form.sell_price <= 0.0 {
        return Err(Error::Validation(
            "buy and sell price must be greater than zero".to_string(),
        ));
    }
    if require_margin && form.sell_price < form.buy_price {
        return Err(Error::Validation(
            "sell price must not be below buy price".to_string(),
        ));
    }
    Ok(())
}
