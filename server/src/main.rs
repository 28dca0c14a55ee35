// server/src/main.rs

// Declare modules for the application
mod config;
mod errors;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::services::{GeminiChatModel, OtplessVerifier};
use crate::state::AppState;

use actix_cors::Cors;
use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
use uplyft::CatalogStore;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
  tracing::error!(error = %error, "{}", context);
  std::io::Error::other(format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Configuration is loaded before tracing so LOG_FORMAT can pick the output format.
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      init_tracing(LogFormat::Pretty);
      return Err(startup_error("Failed to load application configuration", e));
    }
  };
  init_tracing(app_config.log_format);

  tracing::info!(config = ?app_config, "Starting UpLyft backend...");

  let catalog = CatalogStore::connect(&app_config.database_url)
    .await
    .map_err(|e| startup_error("Failed to connect to the catalog database", e))?;
  catalog
    .ensure_schema()
    .await
    .map_err(|e| startup_error("Failed to prepare the products table", e))?;
  tracing::info!("Successfully connected to the catalog database.");

  let chat_model = GeminiChatModel::new(
    app_config.gemini_api_key.clone(),
    app_config.gemini_model.clone(),
    app_config.http_timeout,
  )
  .map_err(|e| startup_error("Failed to build the Gemini client", e))?;
  let token_verifier = OtplessVerifier::new(
    app_config.otpless_secret_key.clone(),
    app_config.otpless_verify_url.clone(),
    app_config.http_timeout,
  )
  .map_err(|e| startup_error("Failed to build the Otpless client", e))?;

  let app_state = AppState {
    catalog,
    chat_model: Arc::new(chat_model),
    token_verifier: Arc::new(token_verifier),
    config: app_config.clone(),
  };

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(Cors::permissive())
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
