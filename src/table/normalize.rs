// src/table/normalize.rs

use crate::table::{Table, Value};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Int,
    Float,
}

/// Decide what a whole column can become. `None` means it stays as it is.
fn classify<'a>(values: impl Iterator<Item = &'a Value>) -> Option<Numeric> {
    let mut kind = Numeric::Int;
    let mut saw_number = false;

    for v in values {
        match v {
            Value::Int(_) => saw_number = true,
            Value::Float(_) => {
                kind = Numeric::Float;
                saw_number = true;
            }
            // blank cells read as a missing number, which needs a float column
            Value::Text(s) if s.is_empty() => kind = Numeric::Float,
            Value::Text(s) => {
                if s.parse::<i64>().is_ok() {
                    saw_number = true;
                } else if s.parse::<f64>().is_ok() {
                    kind = Numeric::Float;
                    saw_number = true;
                } else {
                    return None;
                }
            }
        }
    }

    saw_number.then_some(kind)
}

fn convert(value: &Value, kind: Numeric) -> Value {
    match (kind, value) {
        (Numeric::Int, Value::Text(s)) => s.parse().map(Value::Int).unwrap_or_else(|_| value.clone()),
        (Numeric::Float, Value::Text(s)) if s.is_empty() => Value::Float(f64::NAN),
        (Numeric::Float, Value::Text(s)) => {
            s.parse().map(Value::Float).unwrap_or_else(|_| value.clone())
        }
        (Numeric::Float, Value::Int(i)) => Value::Float(*i as f64),
        _ => value.clone(),
    }
}

/// Coerce each column to numbers when every one of its values is numeric.
///
/// A single non-numeric value keeps the entire column as text; that is not an
/// error. Running this twice gives the same table as running it once.
pub fn normalize(mut table: Table) -> Table {
    let columns = table.columns().to_vec();

    for column in &columns {
        let Some(kind) = classify(table.rows().iter().filter_map(|r| r.get(column))) else {
            trace!(table_id = table.id(), column = %column, "left as text");
            continue;
        };
        for row in table.rows_mut() {
            if let Some(v) = row.get(column) {
                let converted = convert(v, kind);
                row.set(column, converted);
            }
        }
        trace!(table_id = table.id(), column = %column, ?kind, "coerced");
    }

    debug!(table_id = table.id(), rows = table.len(), "normalized table");
    table
}
