//! Stockroom: a small inventory catalogue of products and suppliers served as
//! HTML pages.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod seed;
pub mod services;
pub mod tracing;
pub mod uploads;
pub mod views;

use axum::{body::Body, http::Request, middleware, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower::{util::MapRequestLayer, Layer};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use crate::{
    config::AppConfig, errors::ServiceError, services::AppServices, uploads::ImageIntake,
    views::Views,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub views: Views,
    pub uploads: ImageIntake,
    pub services: AppServices,
}

impl AppState {
    /// Wires services, templates and image intake around an open connection.
    pub fn new(db: Arc<DatabaseConnection>, config: AppConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            services: AppServices::new(db.clone()),
            views: Views::new()?,
            uploads: ImageIntake::new(config.upload_dir.clone()),
            db,
            config,
        })
    }
}

/// The router with its middleware stack, before method override.
pub fn build_router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    handlers::routes(state.config.max_upload_bytes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(CatchPanicLayer::new())
        .layer(crate::tracing::configure_http_tracing())
        .layer(middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

type OverrideFn = fn(Request<Body>) -> Request<Body>;

/// The complete application service.
pub type App = tower::util::MapRequest<Router, OverrideFn>;

/// Builds the application. Method override wraps the router so that a rewritten
/// method takes part in route matching.
pub fn app(state: AppState) -> App {
    MapRequestLayer::new(middleware_helpers::method_override as OverrideFn)
        .layer(build_router(state))
}
