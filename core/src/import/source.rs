// uplyft/src/import/source.rs

//! Reading the tabular source: a delimited, Latin-1 encoded file with a header row.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use super::ImportError;

/// Decodes ISO-8859-1 text. Every byte is the code point of the same value, so this never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
  bytes.iter().map(|&b| char::from(b)).collect()
}

/// NA spellings common in dataframe and spreadsheet exports. A cell spelled exactly like one reads as missing.
pub const MISSING_MARKERS: [&str; 19] = [
  "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA",
  "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

fn is_missing(cell: &[u8]) -> bool {
  MISSING_MARKERS.iter().any(|marker| marker.as_bytes() == cell)
}

/// One raw row: column name -> cell text, `None` for an empty cell or a missing marker.
///
/// Lookups of columns the source never had also yield `None`; callers always
/// deal with absence explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
  cells: HashMap<String, Option<String>>,
}

impl SourceRow {
  pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, Option<V>)>) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    let mut cells = HashMap::new();
    for (column, value) in pairs {
      // First occurrence wins when a header name repeats.
      cells.entry(column.into()).or_insert(value.map(Into::into));
    }
    Self { cells }
  }

  /// The cell under `column`, or `None` when the column is absent or the cell is empty.
  pub fn get(&self, column: &str) -> Option<&str> {
    self.cells.get(column).and_then(|value| value.as_deref())
  }

}

/// The whole source, decoded up front before any store work starts.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
  pub headers: Vec<String>,
  pub rows: Vec<SourceRow>,
}

impl SourceTable {
  pub fn has_column(&self, column: &str) -> bool {
    self.headers.iter().any(|header| header == column)
  }
}

/// Reads and decodes `path`.
///
/// Fails with `SourceMissing` when the file does not exist and with `EmptySource`
/// when it has no header or no data rows. Rows shorter than the header get `None`
/// for the missing trailing cells; extra cells are dropped. Cells spelled exactly as
/// one of `MISSING_MARKERS` also read as `None`.
pub fn read_source(path: &Path, delimiter: u8) -> Result<SourceTable, ImportError> {
  let mut file = File::open(path).map_err(|err| match err.kind() {
    io::ErrorKind::NotFound => ImportError::SourceMissing {
      path: path.to_path_buf(),
    },
    _ => ImportError::SourceIo {
      path: path.to_path_buf(),
      source: err,
    },
  })?;

  let mut raw = Vec::new();
  file.read_to_end(&mut raw).map_err(|source| ImportError::SourceIo {
    path: path.to_path_buf(),
    source,
  })?;

  parse_source(&raw, delimiter).map_err(|err| match err {
    ParseFailure::Empty => ImportError::EmptySource {
      path: path.to_path_buf(),
    },
    ParseFailure::Csv(source) => ImportError::SourceRead {
      path: path.to_path_buf(),
      source,
    },
  })
}

#[derive(Debug)]
enum ParseFailure {
  Empty,
  Csv(csv::Error),
}

fn parse_source(raw: &[u8], delimiter: u8) -> Result<SourceTable, ParseFailure> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(delimiter)
    .has_headers(true)
    .flexible(true)
    .from_reader(raw);

  let headers: Vec<String> = reader
    .byte_headers()
    .map_err(ParseFailure::Csv)?
    .iter()
    .map(|field| decode_latin1(field).trim().to_string())
    .collect();

  if headers.iter().all(|header| header.is_empty()) {
    return Err(ParseFailure::Empty);
  }

  let mut rows = Vec::new();
  for record in reader.byte_records() {
    let record = record.map_err(ParseFailure::Csv)?;
    let cells = headers.iter().enumerate().map(|(position, header)| {
      let value = record
        .get(position)
        .filter(|field| !is_missing(field))
        .map(decode_latin1);
      (header.clone(), value)
    });
    rows.push(SourceRow::from_pairs(cells));
  }

  if rows.is_empty() {
    return Err(ParseFailure::Empty);
  }

  debug!(columns = headers.len(), rows = rows.len(), "Decoded source table.");
  Ok(SourceTable { headers, rows })
}
