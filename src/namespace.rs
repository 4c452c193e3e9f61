//! Naming of keys in the config file and the environment.
//!
//! Every key is addressed by the triple `(app, scope, key)`:
//!
//! | Scope | Lookup key | Env var |
//! |-------|------------|---------|
//! | root | `app.key` | `APP_KEY` |
//! | command `cmd` | `app.cmd.key` | `APP_CMD_KEY` |
//!
//! Lookup keys are lower-cased and dot-joined; they double as the path into
//! the loaded config file. Env vars are upper-cased and underscore-joined.
//! Distinctness of the resulting names is enforced when the application is
//! validated, not here.

use crate::types::Scope;

/// Name of the variable that selects the config file, e.g. `MYAPP_CONFIG`.
pub fn config_env_var(app_name: &str) -> String {
    format!("{app_name}_config").to_uppercase()
}

pub fn lookup_key(app_name: &str, scope: &Scope, key: &str) -> String {
    match scope {
        Scope::Root => format!("{app_name}.{key}"),
        Scope::Command(cmd) => format!("{app_name}.{cmd}.{key}"),
    }
    .to_lowercase()
}

pub fn env_var(app_name: &str, scope: &Scope, key: &str) -> String {
    match scope {
        Scope::Root => format!("{app_name}_{key}"),
        Scope::Command(cmd) => format!("{app_name}_{cmd}_{key}"),
    }
    .to_uppercase()
}

/// Prefix shared by every variable belonging to `app_name`.
pub fn env_prefix(app_name: &str) -> String {
    format!("{}_", app_name.to_uppercase())
}
