//! Inventory rows and the category filter over them.

use serde::{Deserialize, Serialize};

/// One product line from the stock file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
  pub product:  String,
  pub category: String,
  pub quantity: i64,
  /// Stock value in reais.
  pub value:    f64,
}

impl InventoryRow {
  /// `value` formatted for display, e.g. `R$ 12.50`.
  pub fn formatted_value(&self) -> String { format_currency(self.value) }
}

/// Format a currency amount with two decimals.
pub fn format_currency(value: f64) -> String { format!("R$ {value:.2}") }

// ─── Category choice ─────────────────────────────────────────────────────────

/// The table's category select: one concrete category or every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum CategoryChoice {
  All,
  Only(String),
}

impl CategoryChoice {
  pub fn matches(&self, row: &InventoryRow) -> bool {
    match self {
      Self::All => true,
      Self::Only(category) => row.category == *category,
    }
  }

  /// Label shown in the select box; "Todas" stands for every category.
  pub fn label(&self) -> &str {
    match self {
      Self::All => "Todas",
      Self::Only(category) => category,
    }
  }
}

/// Distinct categories in first-appearance order.
pub fn categories(rows: &[InventoryRow]) -> Vec<String> {
  let mut seen: Vec<String> = Vec::new();
  for row in rows {
    if !seen.iter().any(|c| *c == row.category) {
      seen.push(row.category.clone());
    }
  }
  seen
}

/// Options for the table select: every category followed by [`CategoryChoice::All`].
pub fn table_choices(rows: &[InventoryRow]) -> Vec<CategoryChoice> {
  let mut choices: Vec<CategoryChoice> =
    categories(rows).into_iter().map(CategoryChoice::Only).collect();
  choices.push(CategoryChoice::All);
  choices
}

/// Rows matching `choice`, in file order.
pub fn filter_rows<'a>(
  rows: &'a [InventoryRow],
  choice: &CategoryChoice,
) -> Vec<&'a InventoryRow> {
  rows.iter().filter(|row| choice.matches(row)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(product: &str, category: &str, quantity: i64) -> InventoryRow {
    InventoryRow {
      product: product.into(),
      category: category.into(),
      quantity,
      value: quantity as f64 * 1.5,
    }
  }

  #[test]
  fn categories_keep_first_appearance_order() {
    let rows = vec![
      row("Arroz", "Grãos", 10),
      row("Leite", "Laticínios", 4),
      row("Feijão", "Grãos", 7),
      row("Sabão", "Limpeza", 2),
    ];
    assert_eq!(categories(&rows), ["Grãos", "Laticínios", "Limpeza"]);
  }

  #[test]
  fn table_choices_end_with_all() {
    let rows = vec![row("Arroz", "Grãos", 10), row("Leite", "Laticínios", 4)];
    let choices = table_choices(&rows);
    assert_eq!(choices.len(), 3);
    assert_eq!(choices.last(), Some(&CategoryChoice::All));
    assert_eq!(choices[2].label(), "Todas");
  }

  #[test]
  fn filter_rows_by_category() {
    let rows = vec![
      row("Arroz", "Grãos", 10),
      row("Leite", "Laticínios", 4),
      row("Feijão", "Grãos", 7),
    ];
    let grains = filter_rows(&rows, &CategoryChoice::Only("Grãos".into()));
    assert_eq!(grains.len(), 2);
    assert!(grains.iter().all(|r| r.category == "Grãos"));

    assert_eq!(filter_rows(&rows, &CategoryChoice::All).len(), 3);
    assert!(filter_rows(&rows, &CategoryChoice::Only("Bebidas".into())).is_empty());
  }

  #[test]
  fn currency_has_two_decimals() {
    assert_eq!(format_currency(12.5), "R$ 12.50");
    assert_eq!(format_currency(0.0), "R$ 0.00");
    assert_eq!(row("Arroz", "Grãos", 3).formatted_value(), "R$ 4.50");
  }
}
