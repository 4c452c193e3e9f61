use toml::Table;

use crate::error::CmdfigError;
use crate::merge::get_dotted;
use crate::namespace;
use crate::store::Store;
use crate::types::{RootValues, Scope, Value};

/// Configuration of one command (or of the root), resolved on every read.
///
/// A `Conf` holds no values itself; it is a view that turns short key names
/// into scoped lookup keys and asks the [`Store`]. Create as many as you like.
///
/// Getters never fail: a key that is absent or cannot be read as the
/// requested type yields that type's zero value.
#[derive(Debug, Clone)]
pub struct Conf<'a> {
    app_name: &'a str,
    scope: Scope,
    store: &'a Store,
    root_values: RootValues,
    commands: &'a [String],
}

impl<'a> Conf<'a> {
    /// Low-level constructor, handy in tests.
    pub fn new(app_name: &'a str, scope: Scope, store: &'a Store) -> Self {
        Self {
            app_name,
            scope,
            store,
            root_values: RootValues::default(),
            commands: &[],
        }
    }

    /// Choose what the root view's [`all_values`](Self::all_values) shows.
    /// `commands` are the declared command names.
    pub(crate) fn with_root_values(mut self, mode: RootValues, commands: &'a [String]) -> Self {
        self.root_values = mode;
        self.commands = commands;
        self
    }

    pub fn app_name(&self) -> &str {
        self.app_name
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    fn full_key(&self, key: &str) -> String {
        namespace::lookup_key(self.app_name, &self.scope, key)
    }

    /// The resolved value as stored, without coercion.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(&self.full_key(key))
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(|v| v.as_string()).unwrap_or_default()
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(|v| v.as_int()).unwrap_or_default()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or_default()
    }

    pub fn get_float64(&self, key: &str) -> f64 {
        self.get(key).and_then(|v| v.as_float()).unwrap_or_default()
    }

    /// Override a value for this scope above every other source.
    ///
    /// Fails if the key's path overlaps a bound key, e.g. setting `grpc` on
    /// the root view of an app with a `grpc` command.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), CmdfigError> {
        self.store.set(&self.full_key(key), value.into())
    }

    /// Everything stored under this scope's path, as a nested table.
    ///
    /// For a command that is the `app.cmd` table. For the root it is the
    /// `app` table; with [`RootValues::KeysOnly`] subtables named after
    /// declared commands are left out.
    pub fn all_values(&self) -> Table {
        let all = self.store.all_settings();
        let path = match &self.scope {
            Scope::Root => self.app_name.to_lowercase(),
            Scope::Command(cmd) => format!("{}.{}", self.app_name, cmd).to_lowercase(),
        };
        let mut values = get_dotted(&all, &path)
            .and_then(toml::Value::as_table)
            .cloned()
            .unwrap_or_default();

        if self.scope == Scope::Root && self.root_values == RootValues::KeysOnly {
            for cmd in self.commands {
                let cmd = cmd.to_lowercase();
                if values.get(&cmd).is_some_and(toml::Value::is_table) {
                    values.remove(&cmd);
                }
            }
        }
        values
    }
}
