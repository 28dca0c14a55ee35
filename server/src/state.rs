// server/src/state.rs
use crate::config::AppConfig;
use crate::services::{ChatModel, TokenVerifier};
use std::sync::Arc;
use uplyft::CatalogStore;

#[derive(Clone)]
pub struct AppState {
  pub catalog: CatalogStore,
  pub chat_model: Arc<dyn ChatModel>,
  pub token_verifier: Arc<dyn TokenVerifier>,
  pub config: Arc<AppConfig>, // Share loaded config
}
