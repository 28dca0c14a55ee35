// server/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::services::chat_service::ChatError;
use crate::services::verification_service::VerificationError;
use uplyft::CatalogError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Missing otplessToken")]
  MissingToken,

  #[error("Otpless token verification failed")]
  TokenRejected { details: String },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Catalog Error: {0}")]
  Catalog(#[from] CatalogError),

  #[error("Chat Error: {0}")]
  Chat(#[from] ChatError),

  #[error("No valid response from Gemini.")]
  EmptyChatReply,

  #[error("Verification Error: {0}")]
  Verification(#[from] VerificationError),
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::MissingToken => StatusCode::BAD_REQUEST,
      AppError::TokenRejected { .. } => StatusCode::UNAUTHORIZED,
      AppError::Config(_)
      | AppError::Catalog(_)
      | AppError::Chat(_)
      | AppError::EmptyChatReply
      | AppError::Verification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    let status = self.status_code();
    match self {
      AppError::Validation(m) => HttpResponse::build(status).json(json!({"error": m})),
      // The token endpoint speaks `message`, the catalog and chat endpoints speak `error`.
      AppError::MissingToken => HttpResponse::build(status).json(json!({"message": self.to_string()})),
      AppError::TokenRejected { details } => HttpResponse::build(status).json(json!({
          "message": self.to_string(),
          "details": details,
      })),
      AppError::Verification(_) => HttpResponse::build(status).json(json!({"message": "Internal server error"})),
      AppError::EmptyChatReply => HttpResponse::build(status).json(json!({"error": self.to_string()})),
      AppError::Config(m) => HttpResponse::build(status).json(json!({"error": m})),
      AppError::Catalog(e) => HttpResponse::build(status).json(json!({"error": e.to_string()})),
      AppError::Chat(e) => HttpResponse::build(status).json(json!({"error": e.to_string()})),
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
