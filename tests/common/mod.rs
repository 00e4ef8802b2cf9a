#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use rust_decimal::Decimal;
use stockroom::{
    config::AppConfig,
    db,
    entities::{product, supplier},
    models::{ProductInput, SupplierInput},
    App, AppState,
};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "stockroom-test-boundary";

/// One part of a multipart form body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

/// Helper harness: the full application backed by a throw-away SQLite file,
/// with uploads going to a temporary directory.
pub struct TestApp {
    app: App,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`], with a chance to adjust the configuration first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");

        let mut cfg = AppConfig::new(format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("stockroom.db").display()
        ));
        cfg.upload_dir = dir.path().join("uploads");
        cfg.public_dir = dir.path().join("public");
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg).expect("build app state");
        let app = stockroom::app(state.clone());

        Self {
            app,
            state,
            _dir: dir,
        }
    }

    pub fn upload_dir(&self) -> &std::path::Path {
        &self.state.config.upload_dir
    }

    pub fn public_dir(&self) -> &std::path::Path {
        &self.state.config.public_dir
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
    }

    /// Sends an urlencoded form, the way the browser forms do.
    pub async fn form(&self, method: Method, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn multipart(&self, uri: &str, parts: &[Part<'_>]) -> Response {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn seed_supplier(&self, name: &str) -> supplier::Model {
        self.state
            .services
            .suppliers
            .create_supplier(SupplierInput {
                name: name.to_string(),
                address: "1 Test Road".to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            })
            .await
            .expect("seed supplier for tests")
    }

    pub async fn seed_product(&self, name: &str, category: &str) -> product::Model {
        self.state
            .services
            .products
            .create_product(product_input(name, category), None)
            .await
            .expect("seed product for tests")
    }

    pub async fn seed_supplier_product(
        &self,
        supplier: &supplier::Model,
        name: &str,
    ) -> product::Model {
        self.state
            .services
            .suppliers
            .add_product(&supplier.id, product_input(name, "fruit"), None)
            .await
            .expect("seed supplier product for tests")
    }
}

pub fn product_input(name: &str, category: &str) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        price: Decimal::new(250, 2),
        qty: 10,
        category: category.to_string(),
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn location(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .expect("ascii location")
        .to_string()
}

/// Minimal form encoding for test values.
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}
