//! Wire keys to the command line and the store.
//!
//! For every key in a scope this registers a typed `--key` flag on the
//! scope's clap command and binds the key's lookup key, env var and default
//! in the [`Store`]. After parsing, [`apply_flags`] copies the values the
//! user actually typed into the store's flag layer. Clap defaults are only
//! there for `--help` and never reach the store, so they cannot shadow the
//! environment or the config file.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, value_parser};
use tracing::debug;

use crate::error::CmdfigError;
use crate::namespace;
use crate::registry::KeySet;
use crate::store::Store;
use crate::types::{KeySpec, Scope, Value};

/// Global flag selecting the config file.
pub const CONFIG_FLAG: &str = "config";

/// Id of the trailing positional arguments.
pub const ARGS_ID: &str = "args";

/// Flag names a key may not take.
const RESERVED: [&str; 3] = [CONFIG_FLAG, "help", ARGS_ID];

pub fn config_arg(default_file: &str) -> Arg {
    Arg::new(CONFIG_FLAG)
        .long(CONFIG_FLAG)
        .value_name("PATH")
        .value_parser(value_parser!(std::path::PathBuf))
        .help(format!("config file (default is {default_file})"))
        .global(true)
}

pub fn positional_arg() -> Arg {
    Arg::new(ARGS_ID)
        .value_name("ARGS")
        .num_args(1..)
        .action(ArgAction::Append)
        .value_parser(value_parser!(String))
}

/// A typed flag for one key, showing its default in `--help`.
pub fn flag_arg(spec: &KeySpec) -> Arg {
    let arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .help(spec.description.clone())
        .default_value(spec.default.as_string());
    match spec.default {
        Value::String(_) => arg.value_parser(value_parser!(String)),
        Value::Int(_) => arg
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true),
        Value::Float(_) => arg
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true),
        // Bare `--flag` means true; `--flag=false` is also accepted.
        Value::Bool(_) => arg
            .value_parser(value_parser!(bool))
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
    }
}

/// Bind every key of `scope` in the store and, when `register_flags` is set,
/// add its flag to `cli`.
pub fn bind_keys(
    mut cli: clap::Command,
    app_name: &str,
    scope: &Scope,
    keys: &KeySet,
    store: &mut Store,
    register_flags: bool,
) -> Result<clap::Command, CmdfigError> {
    for spec in keys.values() {
        if register_flags {
            let taken = RESERVED
                .iter()
                .any(|r| r.eq_ignore_ascii_case(&spec.name))
                || cli.get_arguments().any(|a| a.get_id() == spec.name.as_str());
            if taken {
                return Err(CmdfigError::DuplicateFlag {
                    command: cli.get_name().to_string(),
                    flag: spec.name.clone(),
                });
            }
            cli = cli.arg(flag_arg(spec));
        }

        let lookup = namespace::lookup_key(app_name, scope, &spec.name);
        let env_var = namespace::env_var(app_name, scope, &spec.name);
        store.bind(&lookup, &env_var, spec.default.clone());
        debug!(
            event = "bind.key_bound",
            scope = %scope,
            key = %spec.name,
            lookup_key = %lookup,
            env_var = %env_var,
            flag = register_flags
        );
    }
    Ok(cli)
}

/// Copy flags given on the command line into the store's flag layer.
///
/// `matches` must come from the command `keys` were registered on.
pub fn apply_flags(
    matches: &ArgMatches,
    app_name: &str,
    scope: &Scope,
    keys: &KeySet,
    store: &mut Store,
) {
    for spec in keys.values() {
        if matches.value_source(&spec.name) != Some(ValueSource::CommandLine) {
            continue;
        }
        let Some(value) = typed_value(matches, spec) else {
            continue;
        };
        debug!(
            event = "bind.flag_applied",
            scope = %scope,
            key = %spec.name,
            value = %value
        );
        store.set_flag(&namespace::lookup_key(app_name, scope, &spec.name), value);
    }
}

fn typed_value(matches: &ArgMatches, spec: &KeySpec) -> Option<Value> {
    let id = spec.name.as_str();
    match spec.default {
        Value::String(_) => matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(|s| Value::String(s.clone())),
        Value::Int(_) => matches.try_get_one::<i64>(id).ok().flatten().map(|i| Value::Int(*i)),
        Value::Float(_) => matches
            .try_get_one::<f64>(id)
            .ok()
            .flatten()
            .map(|f| Value::Float(*f)),
        Value::Bool(_) => matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .map(|b| Value::Bool(*b)),
    }
}
