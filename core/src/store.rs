// uplyft/src/store.rs

//! `CatalogStore`: the SQLite-backed product catalog.
//!
//! The read path (`list_products`, `list_name_description_pairs`) is shared by the
//! HTTP endpoints. Writes only happen through an `ImportBatch`, which wraps a single
//! transaction and holds the store's write lock until it is committed or rolled back.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewProduct, ProductRecord};

const CREATE_PRODUCTS_TABLE: &str = r#"
  CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_name TEXT NOT NULL,
    description TEXT,
    price REAL NOT NULL,
    category TEXT,
    image_url TEXT
  )
"#;

const SELECT_PRODUCTS: &str =
  "SELECT id, product_name, description, price, category, image_url FROM products ORDER BY id ASC";

const INSERT_PRODUCT: &str =
  "INSERT INTO products (product_name, description, price, category, image_url) VALUES (?, ?, ?, ?, ?)";

#[derive(Debug, Clone)]
pub struct CatalogStore {
  pool: SqlitePool,
  // One import batch at a time per store handle (and its clones).
  write_lock: Arc<Mutex<()>>,
}

impl CatalogStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self {
      pool,
      write_lock: Arc::new(Mutex::new(())),
    }
  }

  /// Opens the database at `database_url`, creating the file if it does not exist yet.
  #[instrument(name = "CatalogStore::connect", skip_all, fields(database_url = %database_url))]
  pub async fn connect(database_url: &str) -> CatalogResult<Self> {
    let options = SqliteConnectOptions::from_str(database_url)
      .map_err(|source| CatalogError::InvalidDatabaseUrl {
        url: database_url.to_string(),
        source,
      })?
      .create_if_missing(true);

    let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
    info!("Connected to catalog database.");
    Ok(Self::new(pool))
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }

  /// Creates the `products` table if it is missing. Safe to call repeatedly.
  #[instrument(name = "CatalogStore::ensure_schema", skip(self))]
  pub async fn ensure_schema(&self) -> CatalogResult<()> {
    sqlx::query(CREATE_PRODUCTS_TABLE).execute(&self.pool).await?;
    debug!("Table 'products' ensured.");
    Ok(())
  }

  pub async fn ping(&self) -> CatalogResult<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  /// All products, in insertion (`id`) order.
  #[instrument(name = "CatalogStore::list_products", skip(self))]
  pub async fn list_products(&self) -> CatalogResult<Vec<ProductRecord>> {
    let products: Vec<ProductRecord> = sqlx::query_as(SELECT_PRODUCTS).fetch_all(&self.pool).await?;
    debug!(count = products.len(), "Fetched products.");
    Ok(products)
  }

  /// `(product_name, description)` for every product, in `id` order.
  #[instrument(name = "CatalogStore::list_name_description_pairs", skip(self))]
  pub async fn list_name_description_pairs(&self) -> CatalogResult<Vec<(String, Option<String>)>> {
    let pairs: Vec<(String, Option<String>)> =
      sqlx::query_as("SELECT product_name, description FROM products ORDER BY id ASC")
        .fetch_all(&self.pool)
        .await?;
    Ok(pairs)
  }

  pub async fn count_products(&self) -> CatalogResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
      .fetch_one(&self.pool)
      .await?;
    Ok(count)
  }

  /// Starts a write batch. Waits for any batch already open on this store to finish.
  #[instrument(name = "CatalogStore::begin_import", skip(self))]
  pub async fn begin_import(&self) -> CatalogResult<ImportBatch> {
    let guard = self.write_lock.clone().lock_owned().await;
    let tx = self.pool.begin().await?;
    debug!("Import transaction opened.");
    Ok(ImportBatch { tx, _guard: guard })
  }
}

/// What `ImportBatch::upsert_by_name` did with a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
  Inserted { id: i64 },
  Updated { rows: u64 },
}

/// An open import transaction. Dropping it without `commit` rolls every write back.
pub struct ImportBatch {
  tx: Transaction<'static, Sqlite>,
  _guard: OwnedMutexGuard<()>,
}

impl ImportBatch {
  /// Inserts `product` and returns its assigned id.
  pub async fn insert(&mut self, product: &NewProduct) -> CatalogResult<i64> {
    let result = sqlx::query(INSERT_PRODUCT)
      .bind(product.product_name.as_str())
      .bind(product.description.as_deref())
      .bind(product.price)
      .bind(product.category.as_deref())
      .bind(product.image_url.as_deref())
      .execute(&mut *self.tx)
      .await?;
    Ok(result.last_insert_rowid())
  }

  /// Updates the price of every product already named `product.product_name`,
  /// inserting it when there is none.
  pub async fn upsert_by_name(&mut self, product: &NewProduct) -> CatalogResult<UpsertOutcome> {
    let rows = sqlx::query("UPDATE products SET price = ? WHERE product_name = ?")
      .bind(product.price)
      .bind(product.product_name.as_str())
      .execute(&mut *self.tx)
      .await?
      .rows_affected();

    if rows > 0 {
      return Ok(UpsertOutcome::Updated { rows });
    }
    let id = self.insert(product).await?;
    Ok(UpsertOutcome::Inserted { id })
  }

  /// Deletes every product. Only visible to others once the batch commits.
  pub async fn clear(&mut self) -> CatalogResult<u64> {
    let deleted = sqlx::query("DELETE FROM products")
      .execute(&mut *self.tx)
      .await?
      .rows_affected();
    Ok(deleted)
  }

  pub async fn commit(self) -> CatalogResult<()> {
    self.tx.commit().await?;
    debug!("Import transaction committed.");
    Ok(())
  }

  pub async fn rollback(self) -> CatalogResult<()> {
    self.tx.rollback().await?;
    debug!("Import transaction rolled back.");
    Ok(())
  }
}
