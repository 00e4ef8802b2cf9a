//! Server-rendered pages.
//!
//! Templates are compiled into the binary and registered once; every page is
//! rendered inside the `layout` partial, which titles the page with
//! `current_page`.

use crate::{
    entities::{product, supplier},
    errors::ServiceError,
    models::Category,
};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::{handlebars_helper, Handlebars};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NOT_FOUND_PAGE: &str = "404 Not Found";

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.hbs")),
    ("products/index", include_str!("../templates/products/index.hbs")),
    ("products/view", include_str!("../templates/products/view.hbs")),
    ("products/edit", include_str!("../templates/products/edit.hbs")),
    ("products/new", include_str!("../templates/products/new.hbs")),
    ("products/notfound", include_str!("../templates/products/notfound.hbs")),
    ("suppliers/index", include_str!("../templates/suppliers/index.hbs")),
    ("suppliers/view", include_str!("../templates/suppliers/view.hbs")),
    ("suppliers/new", include_str!("../templates/suppliers/new.hbs")),
    ("suppliers/edit", include_str!("../templates/suppliers/edit.hbs")),
];

/// Shared template registry.
#[derive(Clone)]
pub struct Views {
    registry: Arc<Handlebars<'static>>,
}

impl Views {
    pub fn new() -> Result<Self, ServiceError> {
        let mut handlebars = Handlebars::new();

        handlebars_helper!(stringeq: |s1: String, s2: String| s1.eq(&s2));
        handlebars.register_helper("stringeq", Box::new(stringeq));

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| {
                    ServiceError::InternalError(format!("template {} failed to compile: {}", name, e))
                })?;
        }

        Ok(Self {
            registry: Arc::new(handlebars),
        })
    }

    pub fn render(&self, name: &str, context: &Value) -> Result<Html<String>, ServiceError> {
        Ok(Html(self.registry.render(name, context)?))
    }

    /// The not-found page, served with 404.
    pub fn not_found(&self) -> Result<Response, ServiceError> {
        let page = self.render(
            "products/notfound",
            &json!({ "current_page": NOT_FOUND_PAGE }),
        )?;
        Ok((StatusCode::NOT_FOUND, page).into_response())
    }
}

/// Category names offered by the product forms and the list filter.
pub fn categories() -> Vec<&'static str> {
    Category::names()
}

/// Template view of a product. Image bytes stay out; pages link to the image route.
pub fn product_context(product: &product::Model) -> Value {
    json!({
        "id": product.id,
        "name": product.name,
        "price": format!("{:.2}", product.price),
        "qty": product.qty,
        "category": product.category,
        "has_image": product.has_image(),
        "supplier_id": product.supplier_id,
    })
}

pub fn supplier_context(supplier: &supplier::Model) -> Value {
    json!({
        "id": supplier.id,
        "name": supplier.name,
        "address": supplier.address,
        "email": supplier.email,
    })
}
