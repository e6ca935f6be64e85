use toml::Value;
use toml::value::Table;

use crate::error::{Error, Result};

/// Merges `b` into a copy of `a`.
///
/// A string on the left is promoted to a one-element array before `b` is
/// appended; `b` is itself promoted when it is not already an array. A key
/// whose left value is a boolean, number or datetime cannot be merged and is
/// reported with its dotted path instead of being dropped.
pub fn concat(a: &Value, b: &Value) -> Result<Value> {
    concat_at("", a, b)
}

pub fn concat_tables(a: &Table, b: &Table) -> Result<Table> {
    concat_tables_at("", a, b)
}

fn concat_tables_at(path: &str, a: &Table, b: &Table) -> Result<Table> {
    let mut out = Table::new();
    for (k, v) in a {
        if !b.contains_key(k) {
            out.insert(k.clone(), v.clone());
        }
    }
    for (k, v) in b {
        let merged = match a.get(k) {
            None => v.clone(),
            Some(existing) => concat_at(&child_path(path, k), existing, v)?,
        };
        out.insert(k.clone(), merged);
    }
    Ok(out)
}

fn concat_at(path: &str, a: &Value, b: &Value) -> Result<Value> {
    match a {
        Value::String(s) => {
            let mut items = vec![Value::String(s.clone())];
            items.extend(as_items(b));
            Ok(Value::Array(items))
        }
        Value::Array(left) => {
            let mut items = left.clone();
            items.extend(as_items(b));
            Ok(Value::Array(items))
        }
        Value::Table(left) => match b {
            Value::Table(right) => Ok(Value::Table(concat_tables_at(path, left, right)?)),
            other => Err(Error::msg(format!(
                "cannot merge {} into table at '{}'",
                other.type_str(),
                display_path(path)
            ))),
        },
        other => Err(Error::msg(format!(
            "cannot merge at '{}': {} is not a string, array or table",
            display_path(path),
            other.type_str()
        ))),
    }
}

fn as_items(v: &Value) -> Vec<Value> {
    match v {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}
