//! Key sets per scope.
//!
//! Root keys are shared; each command sees the root keys merged with its own,
//! its own winning on a name clash. The merge happens once, when the
//! registry is built.

use std::collections::BTreeMap;

use crate::types::{KeySpec, Scope};

/// Keys of one scope, by name.
pub type KeySet = BTreeMap<String, KeySpec>;

/// Overlay `command` keys on `root` keys.
pub fn merge_keys(root: &KeySet, command: &KeySet) -> KeySet {
    let mut out = root.clone();
    out.extend(command.iter().map(|(k, v)| (k.clone(), v.clone())));
    out
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    root: KeySet,
    commands: BTreeMap<String, KeySet>,
}

impl Registry {
    /// `commands` holds each command's own keys; they are merged over `root` here.
    pub fn new(root: KeySet, commands: BTreeMap<String, KeySet>) -> Self {
        let commands = commands
            .into_iter()
            .map(|(name, own)| {
                let effective = merge_keys(&root, &own);
                (name, effective)
            })
            .collect();
        Self { root, commands }
    }

    pub fn root(&self) -> &KeySet {
        &self.root
    }

    /// Effective keys of a scope, or `None` for an undeclared command.
    pub fn keys(&self, scope: &Scope) -> Option<&KeySet> {
        match scope {
            Scope::Root => Some(&self.root),
            Scope::Command(name) => self.commands.get(name),
        }
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Every scope with its effective keys, root first.
    pub fn scopes(&self) -> impl Iterator<Item = (Scope, &KeySet)> {
        std::iter::once((Scope::Root, &self.root)).chain(
            self.commands
                .iter()
                .map(|(name, keys)| (Scope::Command(name.clone()), keys)),
        )
    }
}
