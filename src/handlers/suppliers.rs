use super::common::{parse_id, read_product_submission, require_id};
use crate::{
    errors::ServiceError,
    models::{ProductInput, SupplierForm, SupplierInput},
    views::{categories, product_context, supplier_context},
    AppState,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde_json::json;
use tracing::info;

/// List all suppliers
async fn list_suppliers(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let suppliers = state.services.suppliers.list_suppliers().await?;

    let page = state.views.render(
        "suppliers/index",
        &json!({
            "current_page": "Suppliers",
            "suppliers": suppliers.iter().map(supplier_context).collect::<Vec<_>>(),
        }),
    )?;
    Ok(page.into_response())
}

async fn new_supplier_form(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let page = state
        .views
        .render("suppliers/new", &json!({ "current_page": "New Supplier" }))?;
    Ok(page.into_response())
}

/// Create a new supplier
async fn create_supplier(
    State(state): State<AppState>,
    Form(form): Form<SupplierForm>,
) -> Result<Redirect, ServiceError> {
    let input = SupplierInput::try_from(form)?;
    let supplier = state.services.suppliers.create_supplier(input).await?;

    Ok(Redirect::to(&format!("/suppliers/{}", supplier.id)))
}

/// Supplier detail with its products in sequence order
async fn show_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let Some(id) = parse_id(&id) else {
        return state.views.not_found();
    };
    let Some(found) = state.services.suppliers.get_supplier_with_products(&id).await? else {
        return state.views.not_found();
    };

    let page = state.views.render(
        "suppliers/view",
        &json!({
            "current_page": &found.supplier.name,
            "supplier": supplier_context(&found.supplier),
            "products": found.products.iter().map(product_context).collect::<Vec<_>>(),
        }),
    )?;
    Ok(page.into_response())
}

async fn edit_supplier_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let Some(id) = parse_id(&id) else {
        return state.views.not_found();
    };
    let Some(supplier) = state.services.suppliers.get_supplier(&id).await? else {
        return state.views.not_found();
    };

    let page = state.views.render(
        "suppliers/edit",
        &json!({
            "current_page": "Edit Supplier",
            "supplier": supplier_context(&supplier),
        }),
    )?;
    Ok(page.into_response())
}

async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SupplierForm>,
) -> Result<Redirect, ServiceError> {
    let id = require_id("Supplier", &id)?;
    let input = SupplierInput::try_from(form)?;
    let supplier = state.services.suppliers.update_supplier(&id, input).await?;

    Ok(Redirect::to(&format!("/suppliers/{}", supplier.id)))
}

/// Delete a supplier together with every product it lists
async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, ServiceError> {
    let id = require_id("Supplier", &id)?;
    match state.services.suppliers.delete_supplier_cascade(&id).await? {
        Some(removed) => info!(supplier_id = %id, products_removed = removed, "Supplier removed"),
        None => return Err(ServiceError::not_found("Supplier", id)),
    }

    Ok(Redirect::to("/suppliers"))
}

async fn new_supplier_product_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    let Some(id) = parse_id(&id) else {
        return state.views.not_found();
    };
    let Some(supplier) = state.services.suppliers.get_supplier(&id).await? else {
        return state.views.not_found();
    };

    let page = state.views.render(
        "products/new",
        &json!({
            "current_page": "New Product",
            "supplier": supplier_context(&supplier),
            "categories": categories(),
        }),
    )?;
    Ok(page.into_response())
}

/// Create a product owned by the supplier
async fn create_supplier_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, ServiceError> {
    let id = require_id("Supplier", &id)?;
    let submission = read_product_submission(multipart).await?;
    let input = ProductInput::try_from(submission.form)?;
    let image = state.uploads.accept(submission.image).await?;

    state
        .services
        .suppliers
        .add_product(&id, input, image)
        .await?;

    Ok(Redirect::to(&format!("/suppliers/{}", id)))
}

/// Supplier routes; `max_upload_bytes` caps the multipart product route.
pub fn supplier_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/suppliers/new", get(new_supplier_form))
        .route(
            "/suppliers/:id",
            get(show_supplier)
                .put(update_supplier)
                .delete(delete_supplier),
        )
        .route("/suppliers/:id/edit", get(edit_supplier_form))
        .route(
            "/suppliers/:id/products",
            post(create_supplier_product)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/suppliers/:id/products/new", get(new_supplier_product_form))
}
