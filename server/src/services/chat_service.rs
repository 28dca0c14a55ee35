// server/src/services/chat_service.rs

//! Text generation through Google's Gemini `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ChatError {
  #[error("Gemini request failed: {0}")]
  Network(String),

  #[error("Gemini API error {status}: {body}")]
  Api { status: u16, body: String },

  #[error("Failed to parse Gemini response: {0}")]
  InvalidResponse(String),
}

/// A model that turns a complete prompt into a reply.
///
/// `Ok(None)` means the call succeeded but the model produced no text.
#[async_trait]
pub trait ChatModel: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<Option<String>, ChatError>;
}

pub struct GeminiChatModel {
  api_key: String,
  model: String,
  client: Client,
}

impl GeminiChatModel {
  pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| ChatError::Network(format!("Failed to create HTTP client: {}", e)))?;
    Ok(Self {
      api_key: api_key.into(),
      model: model.into(),
      client,
    })
  }

  fn api_url(&self) -> String {
    format!(
      "{}/models/{}:generateContent?key={}",
      GEMINI_API_BASE, self.model, self.api_key
    )
  }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
  #[instrument(name = "GeminiChatModel::generate", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate(&self, prompt: &str) -> Result<Option<String>, ChatError> {
    let request = GenerateContentRequest {
      contents: vec![Content {
        role: Some("user".to_string()),
        parts: vec![Part {
          text: Some(prompt.to_string()),
        }],
      }],
    };

    debug!("Sending request to Gemini API");
    let response = self
      .client
      .post(self.api_url())
      .json(&request)
      .send()
      .await
      .map_err(|e| ChatError::Network(e.to_string()))?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(ChatError::Api { status, body });
    }

    let api_response: GenerateContentResponse = response
      .json()
      .await
      .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

    Ok(api_response.first_text())
  }
}

// --- Gemini wire types ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
  #[serde(skip_serializing_if = "Option::is_none")]
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Content,
}

impl GenerateContentResponse {
  fn first_text(self) -> Option<String> {
    self
      .candidates
      .into_iter()
      .next()
      .and_then(|candidate| candidate.content.parts.into_iter().find_map(|part| part.text))
  }
}
