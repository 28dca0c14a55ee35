// uplyft/src/import/mod.rs

//! The product importer.
//!
//! A run reads the whole source, validates every row, and writes the accepted ones in a
//! single transaction:
//!  1. `source::read_source` decodes the file (fails the run on a missing or empty source).
//!  2. `validate::validate_row` tags each row as accepted or skipped (with a reason).
//!  3. Accepted rows are written through an `ImportBatch` according to the `ImportMode`.
//!  4. The batch commits once at the end. Any store failure or cancellation rolls the
//!     whole run back.

pub mod source;
pub mod validate;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::CatalogError;
use crate::store::{CatalogStore, ImportBatch, UpsertOutcome};

pub use source::{read_source, SourceRow, SourceTable};
pub use validate::{validate_row, RowOutcome, SkipReason, NAME_COLUMN, PRICE_COLUMN};

#[derive(Debug, Error)]
pub enum ImportError {
  #[error("Source file '{}' was not found", path.display())]
  SourceMissing { path: PathBuf },

  #[error("Source file '{}' is empty", path.display())]
  EmptySource { path: PathBuf },

  #[error("Failed to open source file '{}': {source}", path.display())]
  SourceIo {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse source file '{}': {source}", path.display())]
  SourceRead {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("Import cancelled after {processed} rows; the run was rolled back")]
  Cancelled { processed: usize },

  #[error("Unexpected failure at row {row}; the run was rolled back: {source}")]
  RowFailure {
    row: usize,
    #[source]
    source: CatalogError,
  },

  #[error("Catalog error: {0}")]
  Catalog(#[from] CatalogError),
}

/// How a run treats products already in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
  /// Insert every accepted row. Running twice duplicates the catalog.
  #[default]
  Append,
  /// Update the price of products with the same name, insert the rest.
  UpsertByName,
  /// Delete the current catalog inside the run's transaction, then insert.
  Replace,
}

impl FromStr for ImportMode {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "append" => Ok(ImportMode::Append),
      "upsert" | "upsert_by_name" => Ok(ImportMode::UpsertByName),
      "replace" => Ok(ImportMode::Replace),
      other => Err(format!(
        "unknown import mode '{}' (expected append, upsert or replace)",
        other
      )),
    }
  }
}

impl fmt::Display for ImportMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ImportMode::Append => "append",
      ImportMode::UpsertByName => "upsert",
      ImportMode::Replace => "replace",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
  pub mode: ImportMode,
  pub delimiter: u8,
  pub reject_negative_prices: bool,
}

impl Default for ImportOptions {
  fn default() -> Self {
    Self {
      mode: ImportMode::Append,
      delimiter: b',',
      reject_negative_prices: false,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
  /// 0-based index among the data rows (the header is not counted).
  pub index: usize,
  pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
  pub mode: ImportMode,
  pub rows_read: usize,
  pub imported: usize,
  pub updated: usize,
  /// Products deleted up front by a `Replace` run.
  pub removed: u64,
  pub skipped_rows: Vec<SkippedRow>,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
}

impl ImportSummary {
  pub fn skipped(&self) -> usize {
    self.skipped_rows.len()
  }
}

impl fmt::Display for ImportSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "read {} rows, imported {}, updated {}, skipped {} ({} mode, {} ms)",
      self.rows_read,
      self.imported,
      self.updated,
      self.skipped(),
      self.mode,
      (self.finished_at - self.started_at).num_milliseconds()
    )
  }
}

#[derive(Debug, Default)]
struct RunTally {
  imported: usize,
  updated: usize,
  removed: u64,
  skipped_rows: Vec<SkippedRow>,
}

/// Called after each source row is handled with the number of rows handled so far.
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Imports a source file into a `CatalogStore`.
#[derive(Clone)]
pub struct Importer {
  store: CatalogStore,
  options: ImportOptions,
  progress: Option<ProgressFn>,
}

impl Importer {
  pub fn new(store: CatalogStore, options: ImportOptions) -> Self {
    Self {
      store,
      options,
      progress: None,
    }
  }

  pub fn with_progress(mut self, progress: impl Fn(usize) + Send + Sync + 'static) -> Self {
    self.progress = Some(Arc::new(progress));
    self
  }

  /// Runs an import that cannot be cancelled from outside.
  pub async fn run(&self, path: &Path) -> Result<ImportSummary, ImportError> {
    self.run_with_cancellation(path, &CancellationToken::new()).await
  }

  /// Reads `path`, then imports it. The store is not touched when the source cannot be read.
  #[instrument(
    name = "Importer::run",
    skip(self, cancel),
    fields(path = %path.display(), mode = %self.options.mode)
  )]
  pub async fn run_with_cancellation(
    &self,
    path: &Path,
    cancel: &CancellationToken,
  ) -> Result<ImportSummary, ImportError> {
    let table = source::read_source(path, self.options.delimiter).map_err(|err| {
      error!(error = %err, "Import aborted before touching the store.");
      err
    })?;
    info!("Successfully read {} rows from {}", table.rows.len(), path.display());
    self.import_table(&table, cancel).await
  }

  /// Writes an already decoded source, checking `cancel` before each row.
  #[instrument(
    name = "Importer::import_table",
    skip_all,
    fields(rows = table.rows.len(), mode = %self.options.mode)
  )]
  pub async fn import_table(
    &self,
    table: &SourceTable,
    cancel: &CancellationToken,
  ) -> Result<ImportSummary, ImportError> {
    let started_at = Utc::now();

    info!(columns = ?table.headers, "Columns detected in source.");
    for column in [NAME_COLUMN, PRICE_COLUMN] {
      if !table.has_column(column) {
        warn!(column, "Required column is absent from the header; every row will be skipped.");
      }
    }

    self.store.ensure_schema().await?;
    let mut batch = self.store.begin_import().await?;

    let tally = match self.write_rows(&mut batch, table, cancel).await {
      Ok(tally) => tally,
      Err(err) => {
        error!(error = %err, "Import failed; rolling back this run.");
        match batch.rollback().await {
          Ok(()) => warn!("Database transaction rolled back due to error."),
          Err(rollback_err) => error!(error = %rollback_err, "Rollback failed."),
        }
        return Err(err);
      }
    };
    batch.commit().await?;

    let summary = ImportSummary {
      mode: self.options.mode,
      rows_read: table.rows.len(),
      imported: tally.imported,
      updated: tally.updated,
      removed: tally.removed,
      skipped_rows: tally.skipped_rows,
      started_at,
      finished_at: Utc::now(),
    };

    info!("Import process completed: {}", summary);
    if summary.skipped() > 0 {
      info!(
        "Skipped {} rows due to missing/invalid data for NOT NULL columns.",
        summary.skipped()
      );
    }
    Ok(summary)
  }

  async fn write_rows(
    &self,
    batch: &mut ImportBatch,
    table: &SourceTable,
    cancel: &CancellationToken,
  ) -> Result<RunTally, ImportError> {
    let mut tally = RunTally::default();

    if self.options.mode == ImportMode::Replace {
      tally.removed = batch.clear().await?;
      info!(removed = tally.removed, "Cleared existing products for replace run.");
    }

    for (index, row) in table.rows.iter().enumerate() {
      if cancel.is_cancelled() {
        return Err(ImportError::Cancelled { processed: index });
      }

      let product = match validate_row(row, self.options.reject_negative_prices) {
        RowOutcome::Accepted(product) => product,
        RowOutcome::Skipped(reason) => {
          warn!(row = index, "Skipping row {}: {}.", index, reason);
          tally.skipped_rows.push(SkippedRow { index, reason });
          self.report_progress(index + 1);
          continue;
        }
      };

      let written = match self.options.mode {
        ImportMode::UpsertByName => batch.upsert_by_name(&product).await,
        ImportMode::Append | ImportMode::Replace => {
          batch.insert(&product).await.map(|id| UpsertOutcome::Inserted { id })
        }
      };

      match written.map_err(|source| ImportError::RowFailure { row: index, source })? {
        UpsertOutcome::Inserted { .. } => tally.imported += 1,
        UpsertOutcome::Updated { .. } => tally.updated += 1,
      }
      self.report_progress(index + 1);
    }

    Ok(tally)
  }

  fn report_progress(&self, handled: usize) {
    if let Some(progress) = &self.progress {
      progress(handled);
    }
  }
}
