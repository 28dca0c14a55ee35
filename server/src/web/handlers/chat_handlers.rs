// server/src/web/handlers/chat_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::errors::AppError;
use crate::services::prompt::{build_catalog_context, build_chat_prompt};
use crate::state::AppState;

// --- Request DTOs ---
#[derive(Deserialize, Debug, Default)]
pub struct ChatRequestPayload {
  #[serde(default)]
  pub message: Option<String>,
}

#[instrument(name = "handler::chat", skip(app_state, req_payload))]
pub async fn chat_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ChatRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let user_message = match req_payload.into_inner().message {
    Some(message) if !message.is_empty() => message,
    _ => {
      warn!("Chat request without a message.");
      return Err(AppError::Validation("No message provided".to_string()));
    }
  };

  // 1. Load the catalog as prompt context
  let pairs = app_state.catalog.list_name_description_pairs().await?;
  let catalog = build_catalog_context(&pairs);
  debug!(products = pairs.len(), "Built catalog context for chat prompt.");

  // 2. Ask the model
  debug!(model = %app_state.config.gemini_model, "Sending chat prompt.");
  let prompt = build_chat_prompt(&catalog, &user_message);
  let reply = app_state
    .chat_model
    .generate(&prompt)
    .await?
    .ok_or(AppError::EmptyChatReply)?;

  info!(reply_len = reply.len(), "Chat reply generated.");
  Ok(HttpResponse::Ok().json(json!({ "reply": reply })))
}
