//! Decoding helpers between SQLite column values and `vista-core` types.
//!
//! Dates are stored as ISO 8601 text, optionally followed by a time part.
//! Ages are usually integers but older rows carry them as text or reals.

use chrono::{Datelike as _, NaiveDate};
use rusqlite::types::ValueRef;
use vista_core::incident::{Incident, Victim};

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse the leading `YYYY-MM-DD` of `s`.
pub fn decode_date(id: i64, s: &str) -> Result<NaiveDate> {
  let trimmed = s.trim();
  trimmed
    .get(..10)
    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    .ok_or_else(|| Error::DateParse { id, value: s.to_owned() })
}

// ─── Ages ────────────────────────────────────────────────────────────────────

/// Coerce an `idade` cell to a non-negative age; anything else is missing.
pub fn decode_age(value: ValueRef<'_>) -> Option<u32> {
  match value {
    ValueRef::Integer(n) => u32::try_from(n).ok(),
    ValueRef::Real(f) if f.is_finite() && f >= 0.0 => Some(f.round() as u32),
    ValueRef::Text(t) => std::str::from_utf8(t).ok()?.trim().parse().ok(),
    _ => None,
  }
}

// ─── Raw cells ───────────────────────────────────────────────────────────────

/// Render any cell as display text; NULL becomes an empty string.
pub fn cell_text(value: ValueRef<'_>) -> String {
  match value {
    ValueRef::Null => String::new(),
    ValueRef::Integer(n) => n.to_string(),
    ValueRef::Real(f) => f.to_string(),
    ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
    ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// An `Incidentes` row with its joined labels, before date decoding.
pub struct RawIncident {
  pub id:           i64,
  pub date:         String,
  pub description:  Option<String>,
  pub municipality: Option<String>,
  pub state:        Option<String>,
  pub territory:    Option<String>,
  pub source:       Option<String>,
}

impl RawIncident {
  pub fn into_incident(self) -> Result<Incident> {
    let date = decode_date(self.id, &self.date)?;
    Ok(Incident {
      id: self.id,
      date,
      year: date.year(),
      description: self.description,
      municipality: self.municipality,
      state: self.state,
      territory: self.territory,
      source: self.source,
    })
  }
}

pub fn victim_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Victim> {
  Ok(Victim {
    id:          row.get(0)?,
    incident_id: row.get(1)?,
    name:        row.get(2)?,
    alias:       row.get(3)?,
    age:         decode_age(row.get_ref(4)?),
    village:     row.get(5)?,
    people:      row.get(6)?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_with_time_suffix() {
    let d = decode_date(1, "2019-07-23 14:00:00").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2019, 7, 23).unwrap());
  }

  #[test]
  fn malformed_date_names_the_incident() {
    let err = decode_date(42, "23/07/2019").unwrap_err();
    assert!(matches!(err, Error::DateParse { id: 42, .. }));
    assert!(decode_date(1, "2019").is_err());
  }

  #[test]
  fn ages_are_coerced() {
    assert_eq!(decode_age(ValueRef::Integer(34)), Some(34));
    assert_eq!(decode_age(ValueRef::Integer(-1)), None);
    assert_eq!(decode_age(ValueRef::Real(16.6)), Some(17));
    assert_eq!(decode_age(ValueRef::Text(b" 52 ")), Some(52));
    assert_eq!(decode_age(ValueRef::Text(b"adulto")), None);
    assert_eq!(decode_age(ValueRef::Null), None);
  }

  #[test]
  fn cells_render_as_text() {
    assert_eq!(cell_text(ValueRef::Null), "");
    assert_eq!(cell_text(ValueRef::Integer(7)), "7");
    assert_eq!(cell_text(ValueRef::Text("Yanomami".as_bytes())), "Yanomami");
    assert_eq!(cell_text(ValueRef::Blob(&[1, 2, 3])), "<3 bytes>");
  }
}
