//! CSV decoding into [`InventoryRow`]s.

use std::io::Read;

use serde::Deserialize;
use vista_core::inventory::InventoryRow;

use crate::{Error, Result};

/// Required columns: English header and the Portuguese one it may appear as.
const COLUMNS: [(&str, &str); 4] = [
  ("Product", "Produto"),
  ("Category", "Categoria"),
  ("Quantity", "Quantidade"),
  ("Value", "Valor"),
];

#[derive(Deserialize)]
struct RawRow {
  #[serde(rename = "Product", alias = "Produto")]
  product:  String,
  #[serde(rename = "Category", alias = "Categoria")]
  category: String,
  #[serde(rename = "Quantity", alias = "Quantidade")]
  quantity: i64,
  #[serde(rename = "Value", alias = "Valor")]
  value:    f64,
}

impl From<RawRow> for InventoryRow {
  fn from(raw: RawRow) -> Self {
    Self {
      product:  raw.product,
      category: raw.category,
      quantity: raw.quantity,
      value:    raw.value,
    }
  }
}

pub fn read_rows(input: impl Read) -> Result<Vec<InventoryRow>> {
  let mut reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_reader(input);

  let headers = reader.headers()?.clone();
  for (english, portuguese) in COLUMNS {
    if !headers.iter().any(|h| h == english || h == portuguese) {
      return Err(Error::MissingColumn(english));
    }
  }

  reader
    .deserialize::<RawRow>()
    .map(|row| row.map(InventoryRow::from).map_err(Error::from))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_english_headers() {
    let csv = "Product,Category,Quantity,Value\n\
               Arroz,Grãos,40,220.00\n\
               Leite,Laticínios,25,112.5\n";
    let rows = read_rows(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product, "Arroz");
    assert_eq!(rows[1].category, "Laticínios");
    assert_eq!(rows[1].quantity, 25);
    assert_eq!(rows[1].value, 112.5);
  }

  #[test]
  fn reads_portuguese_headers_with_extra_columns() {
    let csv = "Produto, Categoria ,Quantidade,Valor,Fornecedor\n\
               Feijão,Grãos,30,249.90,Cooperativa\n";
    let rows = read_rows(csv.as_bytes()).unwrap();
    assert_eq!(rows, [InventoryRow {
      product:  "Feijão".into(),
      category: "Grãos".into(),
      quantity: 30,
      value:    249.9,
    }]);
  }

  #[test]
  fn missing_column_is_reported() {
    let csv = "Produto,Categoria,Quantidade\nArroz,Grãos,40\n";
    let err = read_rows(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn("Value")));
  }

  #[test]
  fn malformed_quantity_is_a_csv_error() {
    let csv = "Product,Category,Quantity,Value\nArroz,Grãos,muitos,1.0\n";
    let err = read_rows(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Csv(_)));
    assert!(matches!(vista_core::Error::from(err), vista_core::Error::Query(_)));
  }

  #[test]
  fn header_only_file_is_empty() {
    let rows = read_rows("Product,Category,Quantity,Value\n".as_bytes()).unwrap();
    assert!(rows.is_empty());
  }
}
