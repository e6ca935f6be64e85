use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use toml::Value;

use crate::error::{Error, Result};

const EXTENDS_KEY: &str = "extends";

/// Overrides `base` with `child`: tables merge key-wise, anything else is
/// replaced. Unlike [`crate::tree::concat`] nothing is ever accumulated.
pub fn overlay(base: &mut Value, child: Value) {
    match (base, child) {
        (Value::Table(base_tbl), Value::Table(child_tbl)) => {
            for (k, v) in child_tbl {
                match base_tbl.get_mut(&k) {
                    Some(existing) => overlay(existing, v),
                    None => {
                        base_tbl.insert(k, v);
                    }
                }
            }
        }
        (slot, child_val) => {
            *slot = child_val;
        }
    }
}

fn resolve_ref_path(from_file: &Path, reference: &str) -> PathBuf {
    let p = PathBuf::from(reference);
    if p.is_absolute() {
        p
    } else {
        from_file.parent().unwrap_or_else(|| Path::new(".")).join(p)
    }
}

fn load_value_inner(path: &Path, stack: &mut HashSet<PathBuf>) -> Result<Value> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !stack.insert(canonical.clone()) {
        return Err(Error::msg(format!(
            "extends cycle detected at {}",
            canonical.display()
        )));
    }

    let data = fs::read_to_string(path)
        .map_err(|e| Error::msg(format!("failed to read {}: {e}", path.display())))?;
    let mut value: Value = toml::from_str(&data)
        .map_err(|e| Error::msg(format!("TOML parse error in {}: {e}", path.display())))?;

    let parent = match value.as_table_mut().and_then(|t| t.remove(EXTENDS_KEY)) {
        None => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            return Err(Error::msg(format!(
                "'{EXTENDS_KEY}' in {} must be a string, got {}",
                path.display(),
                other.type_str()
            )));
        }
    };

    let mut out = Value::Table(Default::default());
    if let Some(parent) = parent {
        tracing::debug!(file = %path.display(), parent = %parent, "following extends");
        out = load_value_inner(&resolve_ref_path(path, &parent), stack)?;
    }
    overlay(&mut out, value);

    stack.remove(&canonical);
    Ok(out)
}

pub fn load(path: &Path) -> Result<Value> {
    let mut stack = HashSet::<PathBuf>::new();
    load_value_inner(path, &mut stack)
}

pub fn load_as<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let value = load(path)?;
    value
        .try_into()
        .map_err(|e| Error::msg(format!("invalid document {}: {e}", path.display())))
}
