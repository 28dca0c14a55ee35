// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize; // For request payloads
use serde_json::json; // For JSON responses
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::services::Verification;
use crate::state::AppState;

/// Handed to the frontend after a successful verification. Session design lives elsewhere.
pub const PLACEHOLDER_SESSION_TOKEN: &str = "dummy-auth-token-for-demo";

// --- Request DTOs ---
#[derive(Deserialize, Debug, Default)]
pub struct OtplessVerifyPayload {
  #[serde(default, rename = "otplessToken")]
  pub otpless_token: Option<String>,
}

#[instrument(name = "handler::otpless_verify", skip(app_state, req_payload))]
pub async fn otpless_verify_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<OtplessVerifyPayload>,
) -> Result<HttpResponse, AppError> {
  let token = match req_payload.into_inner().otpless_token {
    Some(token) if !token.is_empty() => token,
    _ => {
      warn!("Verification request without an otplessToken.");
      return Err(AppError::MissingToken);
    }
  };

  match app_state.token_verifier.verify(&token).await? {
    Verification::Verified(user) => {
      info!("Otpless verification succeeded.");
      Ok(HttpResponse::Ok().json(json!({
          "token": PLACEHOLDER_SESSION_TOKEN,
          "user": user,
      })))
    }
    Verification::Rejected { details } => {
      warn!("Otpless verification rejected the token.");
      Err(AppError::TokenRejected { details })
    }
  }
}
