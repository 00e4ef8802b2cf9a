pub mod common;
pub mod health;
pub mod products;
pub mod suppliers;

use crate::AppState;
use axum::{response::Redirect, routing::get, Router};

/// Every page and form route, without middleware.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .merge(products::product_routes(max_upload_bytes))
        .merge(suppliers::supplier_routes(max_upload_bytes))
        .merge(health::health_routes())
}
