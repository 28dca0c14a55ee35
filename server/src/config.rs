// server/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OTPLESS_VERIFY_URL: &str = "https://api.otpless.com/v1/token/verify";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Generative-language chat backend
  pub gemini_api_key: String,
  pub gemini_model: String,

  // Token verification backend
  pub otpless_secret_key: String,
  pub otpless_verify_url: String,

  pub http_timeout: Duration,
  pub log_format: LogFormat,
}

// Keeps the API keys out of logs.
impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &self.database_url)
      .field("gemini_api_key", &"[REDACTED]")
      .field("gemini_model", &self.gemini_model)
      .field("otpless_secret_key", &"[REDACTED]")
      .field("otpless_verify_url", &self.otpless_verify_url)
      .field("http_timeout", &self.http_timeout)
      .field("log_format", &self.log_format)
      .finish()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} is missing from the environment or .env file.", var_name)))
    };

    // Required secrets are checked first so a misconfigured deployment fails before anything else.
    let gemini_api_key = get_env("GEMINI_API_KEY")?;
    let otpless_secret_key = get_env("OTPLESS_SECRET_KEY")?;

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "5000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").unwrap_or_else(|_| uplyft::DEFAULT_DATABASE_URL.to_string());

    let gemini_model = get_env("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
    let otpless_verify_url = get_env("OTPLESS_VERIFY_URL").unwrap_or_else(|_| DEFAULT_OTPLESS_VERIFY_URL.to_string());

    let http_timeout_secs = get_env("HTTP_TIMEOUT_SECS")
      .unwrap_or_else(|_| "60".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid HTTP_TIMEOUT_SECS: {}", e)))?;

    let log_format = match get_env("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()).as_str() {
      "pretty" => LogFormat::Pretty,
      "json" => LogFormat::Json,
      other => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
          other
        )))
      }
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      gemini_api_key,
      gemini_model,
      otpless_secret_key,
      otpless_verify_url,
      http_timeout: Duration::from_secs(http_timeout_secs),
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
