// uplyft/src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

use crate::error::{CatalogError, CatalogResult};
use crate::import::{ImportMode, ImportOptions};
use crate::DEFAULT_DATABASE_URL;

/// Configuration for one `import_products` run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
  pub database_url: String,
  pub source_path: PathBuf,
  pub options: ImportOptions,
}

impl ImportConfig {
  pub fn from_env() -> CatalogResult<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|value| !value.is_empty());

    let database_url = get_env("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    let source_path = PathBuf::from(get_env("PRODUCTS_CSV").unwrap_or_else(|| "data.csv".to_string()));

    let mode = match get_env("IMPORT_MODE") {
      Some(raw) => raw
        .parse::<ImportMode>()
        .map_err(|e| CatalogError::Config(format!("Invalid IMPORT_MODE: {}", e)))?,
      None => ImportMode::default(),
    };

    let delimiter = match get_env("CSV_DELIMITER") {
      Some(raw) => parse_delimiter(&raw)?,
      None => b',',
    };

    let reject_negative_prices = get_env("REJECT_NEGATIVE_PRICES")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| CatalogError::Config(format!("Invalid REJECT_NEGATIVE_PRICES value: {}", e)))?;

    tracing::info!("Import configuration loaded successfully.");

    Ok(Self {
      database_url,
      source_path,
      options: ImportOptions {
        mode,
        delimiter,
        reject_negative_prices,
      },
    })
  }

  /// Overrides the source file, e.g. from a command-line argument.
  pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.source_path = path.into();
    self
  }
}

fn parse_delimiter(raw: &str) -> CatalogResult<u8> {
  let delimiter = match raw {
    "\\t" | "tab" => "\t",
    other => other,
  };
  match delimiter.as_bytes() {
    [byte] => Ok(*byte),
    _ => Err(CatalogError::Config(format!(
      "Invalid CSV_DELIMITER '{}': expected a single-byte character",
      raw
    ))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn delimiter_accepts_single_bytes_and_tab_aliases() {
    assert_eq!(parse_delimiter(";").unwrap(), b';');
    assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
    assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
    assert!(parse_delimiter(";;").is_err());
    assert!(parse_delimiter("é").is_err());
  }
}
