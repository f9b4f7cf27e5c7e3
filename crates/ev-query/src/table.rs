//! Row-oriented result sets.

use core::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// One cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A record with named fields in backend column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    fn require(&self, column: &str) -> QueryResult<&Value> {
        self.0.get(column).ok_or_else(|| QueryError::MissingColumn {
            column: column.to_string(),
        })
    }

    fn mismatch(column: &str, expected: &'static str, found: &Value) -> QueryError {
        QueryError::Decode {
            column: column.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn get_str(&self, column: &str) -> QueryResult<&str> {
        match self.require(column)? {
            Value::Text(s) => Ok(s),
            other => Err(Self::mismatch(column, "text", other)),
        }
    }

    pub fn get_i64(&self, column: &str) -> QueryResult<i64> {
        match self.require(column)? {
            Value::Int(i) => Ok(*i),
            Value::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
            other => Err(Self::mismatch(column, "integer", other)),
        }
    }

    pub fn get_i32(&self, column: &str) -> QueryResult<i32> {
        let value = self.get_i64(column)?;
        i32::try_from(value).map_err(|_| QueryError::Decode {
            column: column.to_string(),
            expected: "32-bit integer",
            found: "integer",
        })
    }

    /// Numeric cell as `f64`; integers are widened.
    pub fn get_f64(&self, column: &str) -> QueryResult<f64> {
        match self.require(column)? {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            other => Err(Self::mismatch(column, "number", other)),
        }
    }

    /// Like [`Row::get_f64`] but maps `Null` (and a missing column) to `None`.
    pub fn get_opt_f64(&self, column: &str) -> QueryResult<Option<f64>> {
        match self.0.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_f64(column).map(Some),
        }
    }

    pub fn get_opt_i32(&self, column: &str) -> QueryResult<Option<i32>> {
        match self.0.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_i32(column).map(Some),
        }
    }

    /// First present text column among `columns`.
    pub fn first_str(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|c| match self.0.get(*c) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Column names in first-seen order across all rows.
pub fn column_names(rows: &[Row]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !names.iter().any(|n| n == column) {
                names.push(column.to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new()
            .with("year", 2030)
            .with("asset", "wind_1")
            .with("y_axis", 12.5)
            .with("investment", Value::Null)
    }

    #[test]
    fn typed_getters() {
        let r = row();
        assert_eq!(r.get_i32("year").unwrap(), 2030);
        assert_eq!(r.get_f64("year").unwrap(), 2030.0);
        assert_eq!(r.get_str("asset").unwrap(), "wind_1");
        assert_eq!(r.get_opt_f64("investment").unwrap(), None);
        assert_eq!(r.get_opt_f64("y_axis").unwrap(), Some(12.5));
    }

    #[test]
    fn decode_errors_name_the_column() {
        let r = row();
        let err = r.get_f64("asset").unwrap_err();
        assert_eq!(err.to_string(), "Column 'asset' holds text, expected number");
        assert!(matches!(
            r.get_str("missing"),
            Err(QueryError::MissingColumn { .. })
        ));
    }

    #[test]
    fn column_order_is_preserved() {
        let r = row();
        let cols: Vec<&str> = r.columns().collect();
        assert_eq!(cols, ["year", "asset", "y_axis", "investment"]);
    }

    #[test]
    fn deserializes_backend_json() {
        let json = r#"[{"milestone_year": 2030, "y_axis": 1.5, "carrier": "power", "ok": true, "n": null}]"#;
        let rows: Vec<Row> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].get("milestone_year"), Some(&Value::Int(2030)));
        assert_eq!(rows[0].get("y_axis"), Some(&Value::Float(1.5)));
        assert_eq!(rows[0].get("ok"), Some(&Value::Bool(true)));
        assert_eq!(rows[0].get("n"), Some(&Value::Null));
        assert_eq!(column_names(&rows).len(), 5);
    }
}
