//! The resolved-value store shared by every [`Conf`](crate::Conf).
//!
//! Values are addressed by lookup key (`app.key` or `app.cmd.key`) and
//! resolved through the layers below, highest precedence first:
//!
//! ```text
//! set()            explicit override, mostly for tests
//! flags            values given on the command line for this invocation
//! environment      the bound APP_[CMD_]KEY variable
//! config file      the value at the lookup key's path
//! default          the key's declared default
//! ```
//!
//! Every layer is sparse; a missing entry falls through to the next one.
//! Environment and defaults only apply to bound keys. The file and override
//! layers answer for any key.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use toml::Table;

use crate::env::parse_env_value;
use crate::error::CmdfigError;
use crate::merge::{deep_merge, get_dotted, insert_dotted, lowercase_keys};
use crate::types::Value;

/// Env var name and default bound to one lookup key.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub env_var: String,
    pub default: Value,
}

#[derive(Debug, Default)]
pub struct Store {
    bindings: BTreeMap<String, Binding>,
    flags: BTreeMap<String, Value>,
    env: HashMap<String, String>,
    file: Table,
    overrides: RwLock<BTreeMap<String, Value>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a lookup key to its env var and default. Rebinding replaces.
    pub fn bind(&mut self, lookup_key: &str, env_var: &str, default: Value) {
        self.bindings.insert(
            lookup_key.to_lowercase(),
            Binding {
                env_var: env_var.to_string(),
                default,
            },
        );
    }

    pub fn binding(&self, lookup_key: &str) -> Option<&Binding> {
        self.bindings.get(&lookup_key.to_lowercase())
    }

    pub fn set_flag(&mut self, lookup_key: &str, value: Value) {
        self.flags.insert(lookup_key.to_lowercase(), value);
    }

    /// Forget the flags of the previous invocation.
    pub fn clear_flags(&mut self) {
        self.flags.clear();
    }

    /// Replace the environment layer.
    pub fn set_env(&mut self, env: HashMap<String, String>) {
        self.env = env;
    }

    /// Replace the file layer. Keys are lower-cased.
    pub fn set_file(&mut self, table: Table) {
        self.file = lowercase_keys(table);
    }

    /// Override a value above every other layer.
    ///
    /// Meant for tests and setup code. Callers must not race `set` against
    /// reads they expect to be consistent. A key that is a parent or a child
    /// path of a bound key is refused, since its value would replace that
    /// key's table (or the key itself) in [`all_settings`](Self::all_settings).
    pub fn set(&self, lookup_key: &str, value: Value) -> Result<(), CmdfigError> {
        let key = lookup_key.to_lowercase();
        if let Some(bound) = self.overlapping_binding(&key) {
            return Err(CmdfigError::OverrideConflict {
                key,
                bound: bound.to_string(),
            });
        }
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
        Ok(())
    }

    fn overlapping_binding(&self, key: &str) -> Option<&str> {
        self.bindings
            .keys()
            .map(String::as_str)
            .find(|bound| is_parent_path(key, bound) || is_parent_path(bound, key))
    }

    /// Resolve a value through all layers.
    pub fn get(&self, lookup_key: &str) -> Option<Value> {
        let key = lookup_key.to_lowercase();

        let overridden = self
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if overridden.is_some() {
            return overridden;
        }
        if let Some(value) = self.flags.get(&key) {
            return Some(value.clone());
        }

        let binding = self.bindings.get(&key);
        if let Some(binding) = binding
            && let Some(raw) = self.env.get(&binding.env_var)
        {
            return Some(parse_env_value(raw, binding.default.kind()));
        }
        if let Some(value) = get_dotted(&self.file, &key).and_then(Value::from_toml) {
            return Some(value);
        }
        binding.map(|b| b.default.clone())
    }

    /// The whole store as one nested table: the file contents with every
    /// bound or overridden key replaced by its resolved value.
    pub fn all_settings(&self) -> Table {
        let mut resolved = Table::new();
        let overridden: Vec<String> = self
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        let keys = self.bindings.keys().chain(self.flags.keys()).chain(&overridden);
        for key in keys {
            if let Some(value) = self.get(key) {
                insert_dotted(&mut resolved, key, value.to_toml());
            }
        }
        deep_merge(self.file.clone(), resolved)
    }
}

fn is_parent_path(parent: &str, child: &str) -> bool {
    child
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('.'))
}
