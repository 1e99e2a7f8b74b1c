//! Parse-or-default helpers for raw query string values.
//!
//! Optional search parameters are never rejected. A value that is missing,
//! blank or malformed parses to `None`, which callers treat as "no constraint".

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Builds a params struct from raw query pairs. A repeated key keeps its first value.
pub fn first_values<T: DeserializeOwned>(pairs: Vec<(String, String)>) -> serde_json::Result<T> {
    let mut values = Map::new();
    for (key, value) in pairs {
        values.entry(key).or_insert(Value::String(value));
    }
    serde_json::from_value(Value::Object(values))
}

/// Returns the trimmed value, or `None` when it is missing or blank.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parses a finite number. `NaN`, infinities and garbage yield `None`.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    non_blank(raw)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parses a `"min-max"` range. Both bounds must be finite numbers, otherwise
/// there is no range at all.
pub fn parse_range(raw: Option<&str>) -> Option<(f64, f64)> {
    let (min, max) = non_blank(raw)?.split_once('-')?;
    Some((parse_number(Some(min))?, parse_number(Some(max))?))
}

/// Parses a 1-based page number, falling back to the first page.
pub fn parse_page(raw: Option<&str>) -> u32 {
    non_blank(raw)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
