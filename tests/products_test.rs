mod common;

use axum::http::{Method, StatusCode};
use common::{body_text, location, Part, TestApp};
use rstest::rstest;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[rstest]
#[case("household")]
#[case("Fruit")]
#[case("fruit ")]
#[tokio::test]
async fn unknown_category_filter_lists_nothing(#[case] filter: &str) {
    let app = TestApp::new().await;
    app.seed_product("Gala Apple", "fruit").await;
    app.seed_product("Rye Bread", "bakery").await;

    let products = app
        .state
        .services
        .products
        .list_products(Some(filter))
        .await
        .expect("filtering never errors");
    assert!(products.is_empty());

    let response = app
        .get(&format!("/products?filter={}", filter.replace(' ', "+")))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No products in this category."));
    assert!(!html.contains("Gala Apple"));
}

#[tokio::test]
async fn product_list_filters_by_exact_category() {
    let app = TestApp::new().await;
    app.seed_product("Gala Apple", "fruit").await;
    app.seed_product("Rye Bread", "bakery").await;

    let html = body_text(app.get("/products?filter=fruit").await).await;
    assert!(html.contains("Gala Apple"));
    assert!(!html.contains("Rye Bread"));
    assert!(html.contains("Showing: fruit"));

    let html = body_text(app.get("/products").await).await;
    assert!(html.contains("Gala Apple"));
    assert!(html.contains("Rye Bread"));
    assert!(html.contains("Showing: All Products"));

    let html = body_text(app.get("/products?filter=All+Products").await).await;
    assert!(html.contains("Rye Bread"));
}

#[tokio::test]
async fn product_without_image_has_no_payload() {
    let app = TestApp::new().await;

    let response = app
        .multipart(
            "/products",
            &[
                Part::Text("name", "Carrot"),
                Part::Text("price", "4.25"),
                Part::Text("qty", "7"),
                Part::Text("category", "vegetable"),
                Part::File {
                    name: "image",
                    file_name: "",
                    bytes: b"",
                },
            ],
        )
        .await;

    let target = location(&response);
    let id: Uuid = target
        .strip_prefix("/products/")
        .expect("redirect to detail view")
        .parse()
        .expect("uuid in location");

    let stored = app
        .state
        .services
        .products
        .get_product(&id)
        .await
        .unwrap()
        .expect("product stored");
    assert_eq!(stored.name, "Carrot");
    assert_eq!(stored.price, dec!(4.25));
    assert_eq!(stored.qty, 7);
    assert!(stored.image_data.is_none());
    assert!(stored.image_content_type.is_none());

    let image = app.get(&format!("/products/{}/image", id)).await;
    assert_eq!(image.status(), StatusCode::NOT_FOUND);

    let entries = std::fs::read_dir(app.upload_dir()).map(|d| d.count()).unwrap_or(0);
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn uploaded_image_round_trips_exactly() {
    let app = TestApp::new().await;
    let bytes: Vec<u8> = (0..2048u32).map(|i| (i * 31 % 251) as u8).collect();

    let response = app
        .multipart(
            "/products",
            &[
                Part::Text("name", "Sourdough"),
                Part::Text("price", "6.50"),
                Part::Text("qty", "3"),
                Part::Text("category", "bakery"),
                Part::File {
                    name: "image",
                    file_name: "loaf.jpg",
                    bytes: &bytes,
                },
            ],
        )
        .await;
    let target = location(&response);
    let id: Uuid = target.trim_start_matches("/products/").parse().unwrap();

    let stored = app
        .state
        .services
        .products
        .get_product(&id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.image_data.as_deref(), Some(bytes.as_slice()));
    assert_eq!(stored.image_content_type.as_deref(), Some("image/jpeg"));

    let response = app.get(&format!("/products/{}/image", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    let served = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(served.as_ref(), bytes.as_slice());

    // the on-disk copy is kept
    let files: Vec<_> = std::fs::read_dir(app.upload_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with(".jpg"));
}

#[rstest]
#[case("/products/not-an-id")]
#[case("/products/not-an-id/edit")]
#[case("/products/64b7f0c2e1d3a9b8c7d6e5f4")]
#[tokio::test]
async fn malformed_product_ids_render_not_found_view(#[case] uri: &str) {
    let app = TestApp::new().await;

    let response = app.get(uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("404 Not Found"));
}

#[tokio::test]
async fn missing_product_renders_not_found_view() {
    let app = TestApp::new().await;
    let id = Uuid::new_v4();

    for uri in [format!("/products/{}", id), format!("/products/{}/edit", id)] {
        let response = app.get(&uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("404 Not Found"));
    }
}

#[tokio::test]
async fn product_detail_shows_supplier() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Hillside Orchard").await;
    let product = app.seed_supplier_product(&supplier, "Bartlett Pear").await;

    let response = app.get(&format!("/products/{}", product.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<title>Bartlett Pear | Stockroom</title>"));
    assert!(html.contains(&format!("/suppliers/{}", supplier.id)));
    assert!(html.contains("Hillside Orchard"));
    assert!(html.contains("$2.50"));
}

#[tokio::test]
async fn edit_form_preselects_category() {
    let app = TestApp::new().await;
    let product = app.seed_product("Rye Bread", "bakery").await;

    let html = body_text(app.get(&format!("/products/{}/edit", product.id)).await).await;
    assert!(html.contains("Edit Product"));
    assert!(html.contains(r#"<option value="bakery" selected>"#));
    assert!(html.contains(r#"value="Rye Bread""#));
}

#[tokio::test]
async fn update_replaces_fields_and_redirects() {
    let app = TestApp::new().await;
    let product = app.seed_product("Rye Bread", "bakery").await;

    let response = app
        .form(
            Method::POST,
            &format!("/products/{}?_method=PUT", product.id),
            &[
                ("name", "Dark Rye"),
                ("price", "3.75"),
                ("qty", "2"),
                ("category", "bakery"),
            ],
        )
        .await;
    assert_eq!(location(&response), format!("/products/{}", product.id));

    let stored = app
        .state
        .services
        .products
        .get_product(&product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Dark Rye");
    assert_eq!(stored.price, dec!(3.75));
    assert_eq!(stored.qty, 2);
    assert_eq!(stored.created_at, product.created_at);
}

#[tokio::test]
async fn failed_update_leaves_record_untouched() {
    let app = TestApp::new().await;
    let product = app.seed_product("Rye Bread", "bakery").await;

    let response = app
        .form(
            Method::PUT,
            &format!("/products/{}", product.id),
            &[("name", ""), ("price", "9.00"), ("qty", "99"), ("category", "grocery")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["content-type"], "text/plain; charset=utf-8");

    let stored = app
        .state
        .services
        .products
        .get_product(&product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, product);
}

#[tokio::test]
async fn updating_unknown_product_goes_through_error_funnel() {
    let app = TestApp::new().await;

    let fields = [("name", "Ghost"), ("price", "1.00"), ("qty", "1"), ("category", "fruit")];
    let response = app
        .form(Method::PUT, &format!("/products/{}", Uuid::new_v4()), &fields)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("not found"));

    let response = app.form(Method::PUT, "/products/garbage", &fields).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_unconditional() {
    let app = TestApp::new().await;
    let product = app.seed_product("Rye Bread", "bakery").await;

    let response = app
        .form(Method::POST, &format!("/products/{}?_method=DELETE", product.id), &[])
        .await;
    assert_eq!(location(&response), "/products");
    assert!(app
        .state
        .services
        .products
        .get_product(&product.id)
        .await
        .unwrap()
        .is_none());

    // deleting again still redirects
    let response = app
        .form(Method::DELETE, &format!("/products/{}", product.id), &[])
        .await;
    assert_eq!(location(&response), "/products");
}

#[tokio::test]
async fn create_rejects_unparsable_price() {
    let app = TestApp::new().await;

    let response = app
        .multipart(
            "/products",
            &[
                Part::Text("name", "Carrot"),
                Part::Text("price", "cheap"),
                Part::Text("qty", "7"),
                Part::Text("category", "vegetable"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("price"));
    assert!(app
        .state
        .services
        .products
        .list_products(None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected_and_nothing_stored() {
    let app = TestApp::with_config(|cfg| cfg.max_upload_bytes = 4096).await;
    let supplier = app.seed_supplier("Hillside Orchard").await;
    let bytes = vec![0xAB_u8; 8192];
    let parts = [
        Part::Text("name", "Huge Melon"),
        Part::Text("price", "3.00"),
        Part::Text("qty", "1"),
        Part::Text("category", "fruit"),
        Part::File {
            name: "image",
            file_name: "melon.jpg",
            bytes: &bytes,
        },
    ];

    for uri in ["/products".to_string(), format!("/suppliers/{}/products", supplier.id)] {
        let response = app.multipart(&uri, &parts).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE, "{}", uri);
    }

    let services = &app.state.services;
    assert!(services.products.list_products(None).await.unwrap().is_empty());
    assert!(services.suppliers.product_refs(&supplier.id).await.unwrap().is_empty());
    let entries = std::fs::read_dir(app.upload_dir()).map(|d| d.count()).unwrap_or(0);
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn upload_within_limit_is_accepted() {
    let app = TestApp::with_config(|cfg| cfg.max_upload_bytes = 4096).await;
    let bytes = vec![0xCD_u8; 1024];

    let response = app
        .multipart(
            "/products",
            &[
                Part::Text("name", "Small Plum"),
                Part::Text("price", "0.50"),
                Part::Text("qty", "12"),
                Part::Text("category", "fruit"),
                Part::File {
                    name: "image",
                    file_name: "plum.png",
                    bytes: &bytes,
                },
            ],
        )
        .await;
    assert!(location(&response).starts_with("/products/"));
}

#[tokio::test]
async fn prices_keep_their_cents() {
    let app = TestApp::new().await;

    for price in [dec!(19.99), dec!(0.1), dec!(123456789.1234)] {
        let mut input = common::product_input("Priced", "grocery");
        input.price = price;
        let created = app
            .state
            .services
            .products
            .create_product(input, None)
            .await
            .unwrap();
        let stored = app
            .state
            .services
            .products
            .get_product(&created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.price, price);
    }
}

#[tokio::test]
async fn edit_form_keeps_unlisted_category() {
    let app = TestApp::new().await;
    let product = app.seed_product("Dish Soap", "household").await;

    let html = body_text(app.get(&format!("/products/{}/edit", product.id)).await).await;
    assert!(html.contains(r#"<option value="household" selected>"#));
    assert!(!html.contains(r#"<option value="fruit" selected>"#));
}
