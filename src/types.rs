use std::fmt;

/// A configuration value. Exactly four kinds are supported; anything else is
/// rejected when a key is declared (see [`CmdfigError::UnsupportedType`]).
///
/// [`CmdfigError::UnsupportedType`]: crate::CmdfigError::UnsupportedType
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    Float(f64),
}

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Bool,
    Float,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Float => "float64",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Float(_) => ValueKind::Float,
        }
    }

    /// Convert a TOML scalar. Tables, arrays and datetimes have no counterpart.
    pub fn from_toml(value: &toml::Value) -> Option<Value> {
        match value {
            toml::Value::String(s) => Some(Value::String(s.clone())),
            toml::Value::Integer(i) => Some(Value::Int(*i)),
            toml::Value::Boolean(b) => Some(Value::Bool(*b)),
            toml::Value::Float(f) => Some(Value::Float(*f)),
            toml::Value::Datetime(_) | toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }

    pub fn to_toml(&self) -> toml::Value {
        match self {
            Value::String(s) => toml::Value::String(s.clone()),
            Value::Int(i) => toml::Value::Integer(*i),
            Value::Bool(b) => toml::Value::Boolean(*b),
            Value::Float(f) => toml::Value::Float(*f),
        }
    }

    /// Permissive string view: every kind has a textual form.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Float(f) => f.to_string(),
        }
    }

    /// Permissive integer view. Floats truncate toward zero, bools map to 0/1,
    /// strings must hold a decimal integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::String(s) => s.trim().parse().ok(),
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Value::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::String(s) => s.trim().parse().ok(),
            Value::Int(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Float(f) => Some(*f),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::String(s) => parse_bool(s),
            Value::Int(i) => Some(*i != 0),
            Value::Bool(b) => Some(*b),
            Value::Float(f) => Some(*f != 0.0),
        }
    }
}

/// Accepts `1`/`0`, `t`/`f` and `true`/`false` in any case.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s == "1" || s.eq_ignore_ascii_case("t") || s.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if s == "0" || s.eq_ignore_ascii_case("f") || s.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    None
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            other => f.write_str(&other.as_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i8> for Value {
    fn from(i: i8) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u8> for Value {
    fn from(i: u8) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// A validated key declaration: name, typed default and help text.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySpec {
    pub name: String,
    pub default: Value,
    pub description: String,
}

/// Which part of the application a key or [`Conf`](crate::Conf) belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// Keys shared by every command, or owned by a root-only application.
    Root,
    /// Keys of one named subcommand.
    Command(String),
}

impl Scope {
    pub fn command(name: &str) -> Self {
        Scope::Command(name.to_string())
    }

    pub fn command_name(&self) -> Option<&str> {
        match self {
            Scope::Root => None,
            Scope::Command(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Root => f.write_str("<root>"),
            Scope::Command(name) => f.write_str(name),
        }
    }
}

/// What [`Conf::all_values()`](crate::Conf::all_values) returns for the root scope.
///
/// Command subtables live under the same `app` table as root keys, so the
/// root view has to decide whether to show them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootValues {
    /// The whole `app` table, command subtables included.
    #[default]
    Nested,
    /// The `app` table without subtables named after declared commands.
    KeysOnly,
}
