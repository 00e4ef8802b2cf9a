use super::common::{parse_id, read_product_submission, require_id};
use crate::{
    errors::ServiceError,
    models::{Category, ProductForm, ProductInput, ALL_PRODUCTS_FILTER},
    views::{categories, product_context, supplier_context},
    AppState,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

/// List products, optionally narrowed to one category
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    let selected_filter = query
        .filter
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| ALL_PRODUCTS_FILTER.to_string());

    let products = state
        .services
        .products
        .list_products(Some(&selected_filter))
        .await?;

    let page = state.views.render(
        "products/index",
        &json!({
            "current_page": "Products",
            "products": products.iter().map(product_context).collect::<Vec<_>>(),
            "categories": categories(),
            "selected_filter": selected_filter,
        }),
    )?;
    Ok(page.into_response())
}

async fn show_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let Some(id) = parse_id(&id) else {
        return state.views.not_found();
    };
    let Some((product, supplier)) = state.services.products.get_product_with_supplier(&id).await?
    else {
        return state.views.not_found();
    };

    let page = state.views.render(
        "products/view",
        &json!({
            "current_page": &product.name,
            "product": product_context(&product),
            "supplier": supplier.as_ref().map(supplier_context),
        }),
    )?;
    Ok(page.into_response())
}

async fn edit_product_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let Some(id) = parse_id(&id) else {
        return state.views.not_found();
    };
    let Some(product) = state.services.products.get_product(&id).await? else {
        return state.views.not_found();
    };

    let unlisted_category =
        (!Category::is_known(&product.category)).then_some(product.category.as_str());

    let page = state.views.render(
        "products/edit",
        &json!({
            "current_page": "Edit Product",
            "product": product_context(&product),
            "categories": categories(),
            "unlisted_category": unlisted_category,
        }),
    )?;
    Ok(page.into_response())
}

/// Create a standalone product from a multipart form
async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, ServiceError> {
    let submission = read_product_submission(multipart).await?;
    let input = ProductInput::try_from(submission.form)?;
    let image = state.uploads.accept(submission.image).await?;

    let product = state.services.products.create_product(input, image).await?;

    Ok(Redirect::to(&format!("/products/{}", product.id)))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect, ServiceError> {
    let id = require_id("Product", &id)?;
    let input = ProductInput::try_from(form)?;

    let product = state.services.products.update_product(&id, input).await?;

    Ok(Redirect::to(&format!("/products/{}", product.id)))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ServiceError> {
    let id = require_id("Product", &id)?;
    let removed = state.services.products.delete_product(&id).await?;
    if removed == 0 {
        info!(product_id = %id, "Delete requested for product that does not exist");
    }

    Ok(Redirect::to("/products"))
}

/// Raw image bytes for `<img>` tags
async fn product_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let id = require_id("Product", &id)?;
    let image = state
        .services
        .products
        .image(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Image for product", id))?;

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data).into_response())
}

/// Product routes; `max_upload_bytes` caps the multipart create route.
pub fn product_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(list_products).post(create_product)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/products/:id",
            get(show_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/edit", get(edit_product_form))
        .route("/products/:id/image", get(product_image))
}
