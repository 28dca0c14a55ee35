// uplyft/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Invalid database URL '{url}': {source}")]
  InvalidDatabaseUrl {
    url: String,
    #[source]
    source: sqlx::Error,
  },

  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),
}

pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;
