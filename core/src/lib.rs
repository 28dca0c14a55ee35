// src/lib.rs

//! UpLyft catalog: the product store behind the shop backend and the batch
//! importer that fills it from a CSV export.
//!
//! The crate is split into:
//!  - `models`: the persisted `ProductRecord` and the validated `NewProduct`.
//!  - `store`: `CatalogStore`, a thin SQLite accessor (read path + transactional import batch).
//!  - `import`: source decoding, per-row validation and the `Importer` run itself.
//!  - `config`: environment-driven configuration for the `import_products` binary.

pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::config::ImportConfig;
pub use crate::error::{CatalogError, CatalogResult};
pub use crate::import::{ImportError, ImportMode, ImportOptions, ImportSummary, Importer, SkipReason};
pub use crate::models::{NewProduct, ProductRecord};
pub use crate::store::{CatalogStore, ImportBatch, UpsertOutcome};

/// Default database location, shared by the importer and the HTTP server.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://products.db";
