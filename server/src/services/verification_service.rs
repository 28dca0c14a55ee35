// server/src/services/verification_service.rs

//! Otpless token verification: forward the token, reshape the user profile.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const DEFAULT_USER_NAME: &str = "UpLyft User";

#[derive(Debug, Error)]
pub enum VerificationError {
  #[error("Verification request failed: {0}")]
  Network(String),

  #[error("Unreadable verification response: {0}")]
  InvalidResponse(String),
}

/// The reduced profile handed back to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedUser {
  pub name: String,
  pub email: String,
  pub mobile: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
  Verified(VerifiedUser),
  /// The service answered with a non-200 status; `details` is its response body.
  Rejected { details: String },
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
  async fn verify(&self, token: &str) -> Result<Verification, VerificationError>;
}

pub struct OtplessVerifier {
  secret_key: String,
  verify_url: String,
  client: Client,
}

impl OtplessVerifier {
  pub fn new(
    secret_key: impl Into<String>,
    verify_url: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self, VerificationError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| VerificationError::Network(format!("Failed to create HTTP client: {}", e)))?;
    Ok(Self {
      secret_key: secret_key.into(),
      verify_url: verify_url.into(),
      client,
    })
  }
}

#[async_trait]
impl TokenVerifier for OtplessVerifier {
  #[instrument(name = "OtplessVerifier::verify", skip_all, fields(verify_url = %self.verify_url))]
  async fn verify(&self, token: &str) -> Result<Verification, VerificationError> {
    let response = self
      .client
      .post(&self.verify_url)
      .bearer_auth(&self.secret_key)
      .json(&serde_json::json!({ "token": token }))
      .send()
      .await
      .map_err(|e| VerificationError::Network(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| VerificationError::Network(e.to_string()))?;

    if status != StatusCode::OK {
      warn!(status = status.as_u16(), "Otpless rejected the token.");
      return Ok(Verification::Rejected { details: body });
    }

    let user = reshape_profile(&body)?;
    info!("Otpless token verified.");
    Ok(Verification::Verified(user))
  }
}

#[derive(Debug, Default, Deserialize)]
struct VerifyResponse {
  #[serde(default)]
  user: Option<ProfileFields>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileFields {
  name: Option<String>,
  email: Option<String>,
  mobile: Option<String>,
}

/// Pulls `user.{name,email,mobile}` out of a verification response, defaulting what is absent.
pub fn reshape_profile(body: &str) -> Result<VerifiedUser, VerificationError> {
  let response: VerifyResponse =
    serde_json::from_str(body).map_err(|e| VerificationError::InvalidResponse(e.to_string()))?;
  let profile = response.user.unwrap_or_default();
  Ok(VerifiedUser {
    name: profile.name.unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
    email: profile.email.unwrap_or_default(),
    mobile: profile.mobile.unwrap_or_default(),
  })
}
