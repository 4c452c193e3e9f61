//! Declaration checks that run before anything is bound.
//!
//! - **Structure**: a root runnable next to subcommands needs a positional
//!   argument rule, otherwise `app foo` could mean either.
//! - **Types**: every default must be a string, integer, bool or float.
//! - **Names**: no two keys may end up with the same lookup key or env var,
//!   and no lookup key may be the parent path of another.
//!
//! Each check fails on the first problem. Nothing is registered until all of
//! them pass.

use std::collections::{BTreeMap, HashSet};

use crate::command::{Command, DeclaredKey};
use crate::error::CmdfigError;
use crate::namespace;
use crate::registry::{KeySet, Registry};
use crate::types::{KeySpec, Scope};

pub fn validate_structure(
    app_name: &str,
    has_runnable: bool,
    has_args: bool,
    commands: &[Command],
) -> Result<(), CmdfigError> {
    check_name(app_name)?;

    let mut seen = HashSet::new();
    for cmd in commands {
        check_name(&cmd.name)?;
        if !seen.insert(cmd.name.to_lowercase()) {
            return Err(CmdfigError::DuplicateCommand(cmd.name.clone()));
        }
    }

    if has_runnable && !commands.is_empty() && !has_args {
        return Err(CmdfigError::AmbiguousRouting {
            command: app_name.to_string(),
        });
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), CmdfigError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('.') {
        "name contains '.'"
    } else {
        return Ok(());
    };
    Err(CmdfigError::InvalidCommandName {
        name: name.to_string(),
        reason: reason.into(),
    })
}

/// Type-check one declaration.
pub fn validate_key(declared: &DeclaredKey) -> Result<KeySpec, CmdfigError> {
    let invalid = |reason: &str| CmdfigError::InvalidKeyName {
        key: declared.name.clone(),
        reason: reason.into(),
    };
    if declared.name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if declared.name.contains('.') {
        return Err(invalid("name contains '.'"));
    }
    if declared.name.chars().any(char::is_whitespace) {
        return Err(invalid("name contains whitespace"));
    }

    let default = declared
        .default
        .as_ref()
        .ok()
        .cloned()
        .ok_or_else(|| CmdfigError::UnsupportedType {
            key: declared.name.clone(),
            kind: declared.type_name.to_string(),
        })?;

    Ok(KeySpec {
        name: declared.name.clone(),
        default,
        description: declared.description.clone(),
    })
}

/// Type-check a list of declarations. A later declaration of the same name
/// replaces an earlier one.
pub fn validate_keys(declared: &[DeclaredKey]) -> Result<KeySet, CmdfigError> {
    let mut keys = KeySet::new();
    for d in declared {
        let spec = validate_key(d)?;
        keys.insert(spec.name.clone(), spec);
    }
    Ok(keys)
}

/// Check that every `(app, scope, key)` triple gets its own names.
pub fn validate_namespace(app_name: &str, registry: &Registry) -> Result<(), CmdfigError> {
    let config_var = namespace::config_env_var(app_name);
    let mut env_owners: BTreeMap<String, String> = BTreeMap::new();
    env_owners.insert(config_var, "--config".to_string());
    let mut lookup_owners: BTreeMap<String, String> = BTreeMap::new();

    for (scope, keys) in registry.scopes() {
        for name in keys.keys() {
            let label = match &scope {
                Scope::Root => name.clone(),
                Scope::Command(cmd) => format!("{cmd}.{name}"),
            };
            claim(
                &mut env_owners,
                namespace::env_var(app_name, &scope, name),
                &label,
            )?;
            claim(
                &mut lookup_owners,
                namespace::lookup_key(app_name, &scope, name),
                &label,
            )?;
        }
    }

    // `app.grpc` holding a value would shadow the `app.grpc` table.
    for (lookup, owner) in &lookup_owners {
        let mut parent = lookup.as_str();
        while let Some((prefix, _)) = parent.rsplit_once('.') {
            if let Some(other) = lookup_owners.get(prefix) {
                return Err(CmdfigError::KeyCollision {
                    first: other.clone(),
                    second: owner.clone(),
                    target: prefix.to_string(),
                });
            }
            parent = prefix;
        }
    }
    Ok(())
}

fn claim(
    owners: &mut BTreeMap<String, String>,
    target: String,
    label: &str,
) -> Result<(), CmdfigError> {
    if let Some(first) = owners.get(&target) {
        return Err(CmdfigError::KeyCollision {
            first: first.clone(),
            second: label.to_string(),
            target,
        });
    }
    owners.insert(target, label.to_string());
    Ok(())
}
