use std::collections::HashMap;

use crate::namespace;
use crate::types::{Value, ValueKind, parse_bool};

/// Keep the environment variables that belong to `app_name` (`{APP}_*`).
///
/// Empty values count as unset. Takes an iterator so tests can pass synthetic
/// data instead of `std::env::vars()`.
pub fn env_snapshot(
    app_name: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    let prefix = namespace::env_prefix(app_name);
    vars.into_iter()
        .filter(|(key, value)| key.starts_with(&prefix) && !value.is_empty())
        .collect()
}

/// Parse an env var value toward the kind of the key's default.
///
/// A value that does not parse as that kind is kept as a string; the typed
/// getters then decide what to make of it.
pub fn parse_env_value(raw: &str, kind: ValueKind) -> Value {
    let parsed = match kind {
        ValueKind::String => None,
        ValueKind::Int => raw.trim().parse().ok().map(Value::Int),
        ValueKind::Bool => parse_bool(raw).map(Value::Bool),
        ValueKind::Float => raw.trim().parse().ok().map(Value::Float),
    };
    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}
