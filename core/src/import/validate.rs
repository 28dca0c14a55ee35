// uplyft/src/import/validate.rs

use std::fmt;

use super::source::SourceRow;
use crate::models::NewProduct;

/// Source column holding the product name.
pub const NAME_COLUMN: &str = "Description";
/// Source column holding the unit price.
pub const PRICE_COLUMN: &str = "UnitPrice";

/// Why a row was left out of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
  MissingName,
  MissingPrice,
  InvalidPrice { raw: String },
  NonFinitePrice { raw: String },
  NegativePrice { price: f64 },
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SkipReason::MissingName => write!(f, "'{}' (product_name) is missing or empty", NAME_COLUMN),
      SkipReason::MissingPrice => write!(f, "'{}' (price) is missing", PRICE_COLUMN),
      SkipReason::InvalidPrice { raw } => write!(f, "'{}' ('{}') is not a valid number", PRICE_COLUMN, raw),
      SkipReason::NonFinitePrice { raw } => {
        write!(f, "'{}' ('{}') cannot be stored as a finite number", PRICE_COLUMN, raw)
      }
      SkipReason::NegativePrice { price } => write!(f, "'{}' ({}) is negative", PRICE_COLUMN, price),
    }
  }
}

/// Result of validating one source row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
  Accepted(NewProduct),
  Skipped(SkipReason),
}

/// Checks a row against the `products` constraints and builds the product to write.
pub fn validate_row(row: &SourceRow, reject_negative_prices: bool) -> RowOutcome {
  let product_name = match row.get(NAME_COLUMN).map(str::trim) {
    Some(name) if !name.is_empty() => name,
    _ => return RowOutcome::Skipped(SkipReason::MissingName),
  };

  let raw_price = match row.get(PRICE_COLUMN).map(str::trim) {
    Some(raw) if !raw.is_empty() => raw,
    _ => return RowOutcome::Skipped(SkipReason::MissingPrice),
  };

  let price = match parse_price(raw_price) {
    Ok(price) => price,
    Err(reason) => return RowOutcome::Skipped(reason),
  };

  if reject_negative_prices && price < 0.0 {
    return RowOutcome::Skipped(SkipReason::NegativePrice { price });
  }

  RowOutcome::Accepted(NewProduct::named(product_name, price))
}

fn parse_price(raw: &str) -> Result<f64, SkipReason> {
  let price: f64 = raw.parse().map_err(|_| SkipReason::InvalidPrice { raw: raw.to_string() })?;
  if !price.is_finite() {
    return Err(SkipReason::NonFinitePrice { raw: raw.to_string() });
  }
  Ok(price)
}
