//! Validated inputs for product and supplier writes, and the raw form bodies
//! they are parsed from.

use crate::errors::ServiceError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use validator::Validate;

/// Product fields as posted by the product forms. Everything arrives as text.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub qty: Option<String>,
    pub category: Option<String>,
}

/// Supplier fields as posted by the supplier forms.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SupplierForm {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    pub name: String,
    pub price: Decimal,
    pub qty: i32,
    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SupplierInput {
    #[validate(length(min = 1, max = 255, message = "Supplier name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, max = 255, message = "Email is required"))]
    pub email: String,
}

impl TryFrom<ProductForm> for ProductInput {
    type Error = ServiceError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        let input = ProductInput {
            name: trimmed(form.name),
            price: parse_field("price", form.price)?,
            qty: parse_field("qty", form.qty)?,
            category: trimmed(form.category),
        };
        input.validate()?;
        Ok(input)
    }
}

impl TryFrom<SupplierForm> for SupplierInput {
    type Error = ServiceError;

    fn try_from(form: SupplierForm) -> Result<Self, Self::Error> {
        let input = SupplierInput {
            name: trimmed(form.name),
            address: trimmed(form.address),
            email: trimmed(form.email),
        };
        input.validate()?;
        Ok(input)
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_field<T: FromStr>(field: &str, value: Option<String>) -> Result<T, ServiceError> {
    let raw = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if raw.is_empty() {
        return Err(ServiceError::ValidationError(format!("{} is required", field)));
    }
    raw.parse()
        .map_err(|_| ServiceError::ValidationError(format!("{} must be a number, got '{}'", field, raw)))
}
