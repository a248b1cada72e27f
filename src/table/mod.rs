// src/table/mod.rs

pub mod extract;
pub mod normalize;

pub use extract::extract;
pub use normalize::normalize;

use crate::error::{Result, ScrapeError};
use serde::Serialize;
use std::{collections::HashMap, fmt};

/// A single cell. Nulls never make it past extraction, so there is no
/// variant for them.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Float(f) if f.is_nan())
    }

    /// Same variant and same content, with NaN matching NaN. Unlike `==`
    /// this is for comparing whole tables, not for filtering.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

/// Numbers compare across Int/Float; text never equals a number. NaN equals
/// nothing, itself included.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Text(_), _) | (_, Value::Text(_)) => false,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_nan() => f.write_str("nan"),
            // keep a trailing ".0" so floats never read as counts
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One table row, keyed by the column's stable identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(HashMap<String, Value>);

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub(crate) fn set(&mut self, column: &str, value: Value) {
        self.0.insert(column.to_string(), value);
    }

    pub fn same_as(&self, other: &Row) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| v.same_as(o)))
    }
}

/// An extracted statistics table. Every row carries exactly `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    id: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(id: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            id: id.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from positional records; handy for fixtures.
    /// Panics if a record's width differs from the column count.
    pub fn from_records<V: Into<Value>>(
        id: impl Into<String>,
        columns: &[&str],
        records: Vec<Vec<V>>,
    ) -> Self {
        let mut table = Table::new(id, columns.iter().map(|c| c.to_string()).collect());
        for record in records {
            assert_eq!(record.len(), columns.len(), "record width mismatch");
            let row = columns
                .iter()
                .zip(record)
                .map(|(c, v)| (c.to_string(), v.into()))
                .collect();
            table.rows.push(Row(row));
        }
        table
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Structural equality, NaN cells included.
    pub fn same_as(&self, other: &Table) -> bool {
        self.id == other.id
            && self.columns == other.columns
            && self.rows.len() == other.rows.len()
            && self.rows.iter().zip(&other.rows).all(|(a, b)| a.same_as(b))
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub(crate) fn push_row(&mut self, row: Row) {
        debug_assert!(self.columns.iter().all(|c| row.get(c).is_some()));
        self.rows.push(row);
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Errors with `MissingColumn` unless the column exists.
    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(ScrapeError::MissingColumn {
                table_id: self.id.clone(),
                column: column.to_string(),
            })
        }
    }

    /// All values of a column, in row order.
    pub fn column(&self, column: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        self.require_column(column)?;
        let column = column.to_string();
        Ok(self.rows.iter().filter_map(move |r| r.get(&column)))
    }

    /// Largest non-NaN numeric value of a column, `None` when there is none.
    pub fn max_of(&self, column: &str) -> Result<Option<f64>> {
        let mut max: Option<f64> = None;
        for v in self.column(column)? {
            let x = v.as_f64().ok_or_else(|| ScrapeError::NonNumericColumn {
                table_id: self.id.clone(),
                column: column.to_string(),
            })?;
            if x.is_nan() {
                continue;
            }
            max = Some(max.map_or(x, |m| m.max(x)));
        }
        Ok(max)
    }
}
