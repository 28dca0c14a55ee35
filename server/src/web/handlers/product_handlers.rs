// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{error, info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  info!("Fetching products from database...");

  let products = app_state.catalog.list_products().await.map_err(|e| {
    error!("Error fetching products: {}", e);
    AppError::Catalog(e)
  })?;

  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[cfg(test)]
mod tests {
  use actix_web::{http::StatusCode, test, web, App};
  use serde_json::json;
  use uplyft::NewProduct;

  use crate::web::configure_app_routes;
  use crate::web::test_support::{app_state, StubChatModel, StubVerifier, TestCatalog};

  #[actix_web::test]
  async fn lists_every_product_with_all_columns() {
    let catalog = TestCatalog::with_products(&[
      NewProduct::named("Blue Mug", 2.5),
      NewProduct {
        description: Some("Ceramic, 350 ml".to_string()),
        category: Some("Kitchen".to_string()),
        image_url: Some("https://cdn.example.com/mug.png".to_string()),
        ..NewProduct::named("Large Mug", 4.0)
      },
    ])
    .await;
    let state = app_state(&catalog, StubChatModel::replying("hi"), StubVerifier::rejecting("no"));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;

    assert_eq!(
      body,
      json!([
        {"id": 1, "product_name": "Blue Mug", "description": null, "price": 2.5, "category": null, "image_url": null},
        {
          "id": 2,
          "product_name": "Large Mug",
          "description": "Ceramic, 350 ml",
          "price": 4.0,
          "category": "Kitchen",
          "image_url": "https://cdn.example.com/mug.png"
        }
      ])
    );
  }

  #[actix_web::test]
  async fn empty_catalog_is_an_empty_array() {
    let catalog = TestCatalog::empty().await;
    let state = app_state(&catalog, StubChatModel::replying("hi"), StubVerifier::rejecting("no"));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

    let body: serde_json::Value =
      test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/products").to_request()).await;
    assert_eq!(body, json!([]));
  }

  #[actix_web::test]
  async fn store_failure_is_a_500_with_error_message() {
    let catalog = TestCatalog::without_schema().await;
    let state = app_state(&catalog, StubChatModel::replying("hi"), StubVerifier::rejecting("no"));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/api/products").to_request()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("no such table"));
  }
}
