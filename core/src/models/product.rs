// uplyft/src/models/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A product as persisted in the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductRecord {
  pub id: i64,
  pub product_name: String,
  pub description: Option<String>,
  pub price: f64,
  pub category: Option<String>,
  pub image_url: Option<String>,
}

/// A validated product that has not been written yet.
///
/// Only the importer builds these; `product_name` is non-empty and trimmed and
/// `price` is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub product_name: String,
  pub description: Option<String>,
  pub price: f64,
  pub category: Option<String>,
  pub image_url: Option<String>,
}

impl NewProduct {
  /// A product carrying only the two fields available at import time.
  pub fn named(product_name: impl Into<String>, price: f64) -> Self {
    Self {
      product_name: product_name.into(),
      description: None,
      price,
      category: None,
      image_url: None,
    }
  }
}
