// server/src/web/test_support.rs

//! Stubs and fixtures shared by the handler tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use uplyft::{CatalogStore, NewProduct};

use crate::config::{AppConfig, LogFormat};
use crate::services::{ChatError, ChatModel, TokenVerifier, Verification, VerificationError, VerifiedUser};
use crate::state::AppState;

/// A throwaway SQLite catalog. The directory lives as long as this value.
pub struct TestCatalog {
  _dir: TempDir,
  pub store: CatalogStore,
}

impl TestCatalog {
  /// A database file with no `products` table at all.
  pub async fn without_schema() -> Self {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", dir.path().join("products.db").display());
    let store = CatalogStore::connect(&url).await.expect("open catalog database");
    Self { _dir: dir, store }
  }

  pub async fn empty() -> Self {
    let catalog = Self::without_schema().await;
    catalog.store.ensure_schema().await.expect("ensure schema");
    catalog
  }

  pub async fn with_products(products: &[NewProduct]) -> Self {
    let catalog = Self::empty().await;
    let mut batch = catalog.store.begin_import().await.expect("begin batch");
    for product in products {
      batch.insert(product).await.expect("insert product");
    }
    batch.commit().await.expect("commit batch");
    catalog
  }
}

pub struct StubChatModel {
  reply: Result<Option<String>, String>,
  prompts: Mutex<Vec<String>>,
}

impl StubChatModel {
  fn with_reply(reply: Result<Option<String>, String>) -> Arc<Self> {
    Arc::new(Self {
      reply,
      prompts: Mutex::new(Vec::new()),
    })
  }

  pub fn replying(text: &str) -> Arc<Self> {
    Self::with_reply(Ok(Some(text.to_string())))
  }

  pub fn silent() -> Arc<Self> {
    Self::with_reply(Ok(None))
  }

  pub fn failing(message: &str) -> Arc<Self> {
    Self::with_reply(Err(message.to_string()))
  }

  pub fn prompts(&self) -> Vec<String> {
    self.prompts.lock().unwrap().clone()
  }
}

#[async_trait]
impl ChatModel for StubChatModel {
  async fn generate(&self, prompt: &str) -> Result<Option<String>, ChatError> {
    self.prompts.lock().unwrap().push(prompt.to_string());
    self.reply.clone().map_err(|body| ChatError::Api { status: 503, body })
  }
}

pub struct StubVerifier {
  outcome: Result<Verification, String>,
  tokens: Mutex<Vec<String>>,
}

impl StubVerifier {
  fn with_outcome(outcome: Result<Verification, String>) -> Arc<Self> {
    Arc::new(Self {
      outcome,
      tokens: Mutex::new(Vec::new()),
    })
  }

  pub fn verifying(user: VerifiedUser) -> Arc<Self> {
    Self::with_outcome(Ok(Verification::Verified(user)))
  }

  pub fn rejecting(details: &str) -> Arc<Self> {
    Self::with_outcome(Ok(Verification::Rejected {
      details: details.to_string(),
    }))
  }

  pub fn failing(message: &str) -> Arc<Self> {
    Self::with_outcome(Err(message.to_string()))
  }

  pub fn tokens(&self) -> Vec<String> {
    self.tokens.lock().unwrap().clone()
  }
}

#[async_trait]
impl TokenVerifier for StubVerifier {
  async fn verify(&self, token: &str) -> Result<Verification, VerificationError> {
    self.tokens.lock().unwrap().push(token.to_string());
    self.outcome.clone().map_err(VerificationError::Network)
  }
}

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "sqlite::memory:".to_string(),
    gemini_api_key: "test-gemini-key".to_string(),
    gemini_model: "gemini-test".to_string(),
    otpless_secret_key: "test-otpless-secret".to_string(),
    otpless_verify_url: "http://127.0.0.1:9/verify".to_string(),
    http_timeout: Duration::from_secs(1),
    log_format: LogFormat::Pretty,
  }
}

pub fn app_state(catalog: &TestCatalog, chat: Arc<StubChatModel>, verifier: Arc<StubVerifier>) -> AppState {
  AppState {
    catalog: catalog.store.clone(),
    chat_model: chat,
    token_verifier: verifier,
    config: Arc::new(test_config()),
  }
}
