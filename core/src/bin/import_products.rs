// uplyft/src/bin/import_products.rs

//! One-shot import of a product CSV export into the catalog database.
//!
//! Usage: `import_products [path/to/data.csv]` (defaults to `PRODUCTS_CSV`, then `data.csv`).
//! Ctrl-C cancels the run and rolls back everything it wrote.

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use uplyft::import::read_source;
use uplyft::{CatalogStore, ImportConfig, ImportError, Importer};

const PROGRESS_EVERY: usize = 1000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))) // Allow RUST_LOG override
    .init();

  let mut config = ImportConfig::from_env().context("Failed to load import configuration")?;
  if let Some(path) = std::env::args_os().nth(1) {
    config = config.with_source_path(path);
  }
  tracing::info!(
    source = %config.source_path.display(),
    database_url = %config.database_url,
    mode = %config.options.mode,
    "Starting product import."
  );

  // The source is read before the database is opened so a bad source leaves nothing behind.
  let table = match read_source(&config.source_path, config.options.delimiter) {
    Ok(table) => table,
    Err(err) => return Err(report_failure(err)),
  };
  tracing::info!("Successfully read {} rows from {}", table.rows.len(), config.source_path.display());

  let store = CatalogStore::connect(&config.database_url)
    .await
    .context("Failed to open the catalog database")?;

  let cancel = CancellationToken::new();
  let ctrl_c_token = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::warn!("Interrupt received; cancelling import.");
      ctrl_c_token.cancel();
    }
  });

  let importer = Importer::new(store, config.options).with_progress(|handled| {
    if handled % PROGRESS_EVERY == 0 {
      tracing::info!(handled, "Import progress.");
    }
  });
  match importer.import_table(&table, &cancel).await {
    Ok(summary) => {
      tracing::info!(
        imported = summary.imported,
        updated = summary.updated,
        skipped = summary.skipped(),
        "Successfully imported {} products into {}.",
        summary.imported + summary.updated,
        config.database_url
      );
      Ok(())
    }
    Err(err) => Err(report_failure(err)),
  }
}

fn report_failure(err: ImportError) -> anyhow::Error {
  match &err {
    ImportError::SourceMissing { .. } => {
      tracing::error!("Please ensure the source file exists or point PRODUCTS_CSV at it.");
    }
    ImportError::SourceRead { .. } | ImportError::RowFailure { .. } => {
      tracing::error!("Please review your CSV file for unexpected data formats or column issues.");
    }
    _ => {}
  }
  err.into()
}
