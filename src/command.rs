use std::any::type_name;
use std::fmt;

use serde::Serialize;

use crate::args::Args;
use crate::conf::Conf;
use crate::error::RunError;
use crate::scalar;
use crate::types::Value;

/// What a command does once its configuration is resolved.
pub type Runnable = Box<dyn Fn(&Conf<'_>, &[String]) -> Result<(), RunError>>;

/// A key as declared, before its default has been type-checked.
#[derive(Debug, Clone)]
pub struct DeclaredKey {
    pub name: String,
    /// The default captured as a scalar, or why it could not be.
    pub default: Result<Value, String>,
    /// Rust type of the default, for error messages.
    pub type_name: &'static str,
    pub description: String,
}

impl DeclaredKey {
    pub fn new<V: Serialize>(name: &str, default: V, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: scalar::to_value(&default).map_err(|e| e.to_string()),
            type_name: type_name::<V>(),
            description: description.to_string(),
        }
    }
}

/// A subcommand with its own keys.
///
/// Keys declared here are visible only to this command and shadow root keys
/// of the same name.
pub struct Command {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) description: String,
    pub(crate) keys: Vec<DeclaredKey>,
    pub(crate) args: Option<Args>,
    pub(crate) runnable: Runnable,
}

impl Command {
    /// `usage` starts with the command name, e.g. `"webapp <your-name>"`.
    pub fn new<F>(usage: &str, description: &str, runnable: F) -> Self
    where
        F: Fn(&Conf<'_>, &[String]) -> Result<(), RunError> + 'static,
    {
        Self {
            name: first_word(usage),
            usage: usage.to_string(),
            description: description.to_string(),
            keys: Vec::new(),
            args: None,
            runnable: Box::new(runnable),
        }
    }

    /// Declare a key. The default must be a string, bool, float or an integer
    /// that fits in `i64`; anything else, enums and `Option`s included, fails
    /// validation.
    pub fn key<V: Serialize>(mut self, name: &str, default: V, description: &str) -> Self {
        self.keys.push(DeclaredKey::new(name, default, description));
        self
    }

    pub fn args(mut self, rule: Args) -> Self {
        self.args = Some(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("keys", &self.keys)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

pub(crate) fn first_word(usage: &str) -> String {
    usage.split_whitespace().next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Conf<'_>, _: &[String]) -> Result<(), RunError> {
        Ok(())
    }

    #[test]
    fn name_is_first_word_of_usage() {
        let cmd = Command::new("webapp <your-name>", "Starts webapp", noop);
        assert_eq!(cmd.name(), "webapp");
        assert_eq!(first_word("  grpc  "), "grpc");
        assert_eq!(first_word(""), "");
    }

    #[test]
    fn supported_defaults_are_captured_as_values() {
        let key = DeclaredKey::new("port", 8080, "Listen port");
        assert_eq!(key.default.unwrap(), Value::Int(8080));
        let key = DeclaredKey::new("ratio", 2.0f64, "");
        assert_eq!(key.default.unwrap(), Value::Float(2.0));
    }

    #[test]
    fn unsupported_defaults_keep_their_type_name() {
        let key = DeclaredKey::new("ports", vec![1, 2], "");
        assert!(key.type_name.contains("Vec<i32>"));
        assert!(key.default.is_err());

        let key = DeclaredKey::new("nothing", (), "");
        assert!(key.default.is_err());
        assert_eq!(key.type_name, "()");
    }

    #[test]
    fn keys_keep_declaration_order() {
        let cmd = Command::new("grpc", "", noop)
            .key("port", 8080, "")
            .key("dbUri", "boltdb:db/my.db", "");
        let names: Vec<_> = cmd.keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["port", "dbUri"]);
    }
}
