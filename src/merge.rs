//! Nested `toml::Table` helpers: deep merge and dotted-path access.

use toml::{Table, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a Table for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Table(base_tbl)), Value::Table(overlay_tbl)) => {
                base.insert(key, Value::Table(deep_merge(base_tbl, overlay_tbl)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Set `value` at a dotted path, creating intermediate tables.
///
/// A scalar sitting where an intermediate table is needed is replaced.
pub fn insert_dotted(table: &mut Table, dotted_key: &str, value: Value) {
    let mut segments = dotted_key.split('.').peekable();
    let mut current = table;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let entry = current
            .entry(segment)
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        let Value::Table(next) = entry else {
            return;
        };
        current = next;
    }
}

/// Look up a dotted path. Returns `None` if any segment is missing or an
/// intermediate value is not a table.
pub fn get_dotted<'a>(table: &'a Table, dotted_key: &str) -> Option<&'a Value> {
    let mut segments = dotted_key.split('.');
    let first = segments.next()?;
    segments.try_fold(table.get(first)?, |value, segment| {
        value.as_table()?.get(segment)
    })
}

/// Lower-case every key, recursively. When two keys fold to the same name,
/// the one sorted last wins.
pub fn lowercase_keys(table: Table) -> Table {
    let mut out = Table::new();
    for (key, value) in table {
        let value = match value {
            Value::Table(sub) => Value::Table(lowercase_keys(sub)),
            other => other,
        };
        out.insert(key.to_lowercase(), value);
    }
    out
}
