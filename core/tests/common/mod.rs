// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tempfile::TempDir;
use tracing::Level;
use uplyft::CatalogStore;

/// Header of the retail export the importer is usually fed.
pub const RETAIL_HEADER: &str = "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country";

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A scratch directory holding a fresh SQLite catalog. Keep it alive for the whole test.
pub struct Fixture {
  pub dir: TempDir,
  pub store: CatalogStore,
}

impl Fixture {
  pub async fn new() -> Self {
    setup_tracing();
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", dir.path().join("products.db").display());
    let store = CatalogStore::connect(&url).await.expect("open catalog database");
    Self { dir, store }
  }

  pub fn write_source(&self, name: &str, contents: &[u8]) -> PathBuf {
    write_file(self.dir.path(), name, contents)
  }

  /// Writes a retail-export CSV whose rows carry the given `Description` and `UnitPrice` cells.
  pub fn write_retail_csv(&self, name: &str, rows: &[(&str, &str)]) -> PathBuf {
    self.write_source(name, retail_csv(rows).as_bytes())
  }

  pub async fn products_table_exists(&self) -> bool {
    let count: i64 =
      sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'products'")
        .fetch_one(self.store.pool())
        .await
        .expect("query sqlite_master");
    count == 1
  }
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
  let path = dir.join(name);
  std::fs::write(&path, contents).expect("write source file");
  path
}

pub fn retail_csv(rows: &[(&str, &str)]) -> String {
  let mut csv = String::from(RETAIL_HEADER);
  csv.push('\n');
  for (index, (description, unit_price)) in rows.iter().enumerate() {
    csv.push_str(&format!(
      "5363{:02},85123A,{},6,12/1/2010 8:26,{},17850,United Kingdom\n",
      index, description, unit_price
    ));
  }
  csv
}
