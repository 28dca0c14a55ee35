// server/src/web/routes.rs

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::{auth_handlers, chat_handlers, product_handlers};

async fn index_handler() -> HttpResponse {
  HttpResponse::Ok()
    .content_type("text/plain; charset=utf-8")
    .body("UpLyft Backend is running! 🚀")
}

async fn test_route_handler() -> HttpResponse {
  HttpResponse::Ok()
    .content_type("text/plain; charset=utf-8")
    .body("✅ Test route working!")
}

// Checks the catalog database is reachable.
async fn health_check_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  app_state.catalog.ping().await?;
  Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

// Body extraction failures answer in the same JSON shape as the handler's own validation.
fn chat_json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
    warn!(error = %err, "Rejected chat request body.");
    AppError::Validation("No message provided".to_string()).into()
  })
}

fn otpless_json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
    warn!(error = %err, "Rejected verification request body.");
    AppError::MissingToken.into()
  })
}

// This function will be called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.route("/", web::get().to(index_handler)).service(
    web::scope("/api")
      .route("/test", web::get().to(test_route_handler))
      .route("/health", web::get().to(health_check_handler))
      .route("/products", web::get().to(product_handlers::list_products_handler))
      .service(
        web::resource("/chat")
          .app_data(chat_json_config())
          .route(web::post().to(chat_handlers::chat_handler)),
      )
      .service(
        web::scope("/auth").service(
          web::resource("/otpless-verify")
            .app_data(otpless_json_config())
            .route(web::post().to(auth_handlers::otpless_verify_handler)),
        ),
      ),
  );
}

#[cfg(test)]
mod tests {
  use actix_web::{http::StatusCode, test, web, App};

  use super::configure_app_routes;
  use crate::web::test_support::{app_state, StubChatModel, StubVerifier, TestCatalog};

  #[actix_web::test]
  async fn plain_text_routes_respond() {
    let catalog = TestCatalog::empty().await;
    let state = app_state(&catalog, StubChatModel::replying("hi"), StubVerifier::rejecting("no"));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(body, "UpLyft Backend is running! 🚀");

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/api/test").to_request()).await;
    assert_eq!(body, "✅ Test route working!");
  }

  #[actix_web::test]
  async fn health_reports_ok_when_store_is_reachable() {
    let catalog = TestCatalog::empty().await;
    let state = app_state(&catalog, StubChatModel::replying("hi"), StubVerifier::rejecting("no"));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "ok");
  }
}
