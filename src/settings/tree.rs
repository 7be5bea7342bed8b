//! Pure operations on dotted-key configuration trees.
//!
//! A tree is a [`toml::Table`]; a dotted key such as `pack.redundancy_percent`
//! addresses a value through nested tables.

use std::path::Path;

use toml::{Table, Value};

use crate::config::{DEFAULT_FORMAT, DEFAULT_OUTPUT_SUBDIR, DEFAULT_PAR2_VOLUMES, DEFAULT_REDUNDANCY_PERCENT};

/// Builds the compiled-in defaults for a user whose home directory is `home`.
pub fn defaults(home: &Path) -> Table {
    let output_dir = DEFAULT_OUTPUT_SUBDIR.iter().fold(home.to_path_buf(), |dir, part| dir.join(part));

    let mut pack = Table::new();
    pack.insert("redundancy_percent".into(), Value::Integer(DEFAULT_REDUNDANCY_PERCENT));
    pack.insert("par2_volumes".into(), Value::Integer(DEFAULT_PAR2_VOLUMES));
    pack.insert("output_dir".into(), Value::String(output_dir.to_string_lossy().into_owned()));
    pack.insert("default_format".into(), Value::String(DEFAULT_FORMAT.into()));

    let mut root = Table::new();
    root.insert("pack".into(), Value::Table(pack));
    root
}

/// Splits a dotted key into its segments, rejecting empty segments.
pub fn segments(key: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}

/// Looks up `key`; a path running through a non-table value yields `None`.
pub fn lookup<'a>(tree: &'a Table, key: &str) -> Option<&'a Value> {
    let parts = segments(key)?;
    let (last, parents) = parts.split_last()?;

    let mut node = tree;
    for part in parents {
        node = node.get(*part)?.as_table()?;
    }
    node.get(*last)
}

/// Writes `value` at `key`, creating intermediate tables and replacing any
/// non-table node found along the way.
///
/// Returns `false` without touching the tree when the key is malformed.
pub fn insert(tree: &mut Table, key: &str, value: Value) -> bool {
    let Some(parts) = segments(key) else {
        return false;
    };
    let Some((last, parents)) = parts.split_last() else {
        return false;
    };

    let mut node = tree;
    for part in parents {
        let entry = node.entry(*part).or_insert(Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        let Some(table) = entry.as_table_mut() else {
            return false;
        };
        node = table;
    }
    node.insert((*last).to_owned(), value);
    true
}

/// Recursively merges `overrides` onto a copy of `base`.
///
/// Tables present on both sides merge key by key; any other override value
/// replaces the base value outright.
pub fn merge(base: &Table, overrides: &Table) -> Table {
    let mut merged = base.clone();
    merge_into(&mut merged, overrides);
    merged
}

fn merge_into(base: &mut Table, overrides: &Table) {
    for (key, value) in overrides {
        if let Value::Table(incoming) = value
            && let Some(Value::Table(existing)) = base.get_mut(key)
        {
            merge_into(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

/// Flattens a tree into `(dotted key, leaf value)` pairs in key order.
pub fn flatten(tree: &Table) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(tree, "", &mut out);
    out
}

fn flatten_into(tree: &Table, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in tree {
        let full_key = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match value {
            Value::Table(table) => flatten_into(table, &full_key, out),
            leaf => out.push((full_key, leaf.clone())),
        }
    }
}
