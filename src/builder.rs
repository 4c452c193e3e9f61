use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::app::{Cmdfig, Entry};
use crate::args::Args;
use crate::binder;
use crate::command::{Command, DeclaredKey, Runnable, first_word};
use crate::conf::Conf;
use crate::env;
use crate::error::{CmdfigError, RunError};
use crate::registry::Registry;
use crate::store::Store;
use crate::types::{RootValues, Scope};
use crate::validate;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Declares keys and commands, then validates and binds them.
///
/// Nothing is checked while declaring. [`validate()`](Self::validate) runs
/// every check; [`build()`](Self::build) validates, registers flags and binds
/// keys, and either returns a ready [`Cmdfig`] or fails without leaving
/// anything half-registered.
pub struct CmdfigBuilder {
    usage: String,
    description: String,
    default_config_file: PathBuf,
    keys: Vec<DeclaredKey>,
    commands: Vec<Command>,
    runnable: Option<Runnable>,
    args: Option<Args>,
    root_values: RootValues,
}

impl CmdfigBuilder {
    pub(crate) fn new(usage: &str, description: &str) -> Self {
        Self {
            usage: usage.to_string(),
            description: description.to_string(),
            default_config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            keys: Vec::new(),
            commands: Vec::new(),
            runnable: None,
            args: None,
            root_values: RootValues::default(),
        }
    }

    /// Declare a root key. Root keys are visible to every command; a command
    /// key with the same name shadows it within that command.
    pub fn key<V: Serialize>(mut self, name: &str, default: V, description: &str) -> Self {
        self.keys.push(DeclaredKey::new(name, default, description));
        self
    }

    /// Add a subcommand.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Make the root command runnable. Combined with subcommands this also
    /// requires [`args()`](Self::args).
    pub fn run<F>(mut self, runnable: F) -> Self
    where
        F: Fn(&Conf<'_>, &[String]) -> Result<(), RunError> + 'static,
    {
        self.runnable = Some(Box::new(runnable));
        self
    }

    /// Rule for the root command's positional arguments.
    pub fn args(mut self, rule: Args) -> Self {
        self.args = Some(rule);
        self
    }

    /// Config file used when neither `--config` nor `{APP}_CONFIG` is given
    /// (default: `config.toml`). It may be missing.
    pub fn default_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_config_file = path.into();
        self
    }

    /// What the root [`Conf::all_values()`] includes (default: [`RootValues::Nested`]).
    pub fn root_values(mut self, mode: RootValues) -> Self {
        self.root_values = mode;
        self
    }

    fn app_name(&self) -> String {
        first_word(&self.usage)
    }

    /// Run every declaration check and return the merged key registry.
    pub fn validate(&self) -> Result<Registry, CmdfigError> {
        let app_name = self.app_name();
        validate::validate_structure(
            &app_name,
            self.runnable.is_some(),
            self.args.is_some(),
            &self.commands,
        )?;

        let root = validate::validate_keys(&self.keys)?;
        let mut commands = BTreeMap::new();
        for cmd in &self.commands {
            commands.insert(cmd.name.clone(), validate::validate_keys(&cmd.keys)?);
        }
        let registry = Registry::new(root, commands);

        validate::validate_namespace(&app_name, &registry)?;
        Ok(registry)
    }

    /// Validate, register flags and bind keys, reading the process environment.
    pub fn build(self) -> Result<Cmdfig, CmdfigError> {
        self.build_with_env(std::env::vars())
    }

    /// Like [`build()`](Self::build) with explicit environment variables.
    pub fn build_with_env(
        self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Cmdfig, CmdfigError> {
        let registry = self.validate()?;
        let app_name = self.app_name();
        let mut store = Store::new();

        let default_file = self.default_config_file.display().to_string();
        let mut cli = clap::Command::new(app_name.clone())
            .about(self.description.clone())
            .arg(binder::config_arg(&default_file));
        if self.usage.trim() != app_name {
            cli = cli.override_usage(self.usage.clone());
        }

        let root_runnable = self.runnable.is_some();
        if root_runnable {
            cli = cli.arg(binder::positional_arg());
        } else if !self.commands.is_empty() {
            cli = cli.subcommand_required(true).arg_required_else_help(true);
        }
        // Root keys are always bound; they only become flags on a runnable root.
        cli = binder::bind_keys(
            cli,
            &app_name,
            &Scope::Root,
            registry.root(),
            &mut store,
            root_runnable,
        )?;

        let mut commands = BTreeMap::new();
        for cmd in self.commands {
            let scope = Scope::Command(cmd.name.clone());
            let keys = registry.keys(&scope).cloned().unwrap_or_default();

            let mut sub = clap::Command::new(cmd.name.clone())
                .about(cmd.description.clone())
                .arg(binder::positional_arg());
            if cmd.usage.trim() != cmd.name {
                sub = sub.override_usage(cmd.usage.clone());
            }
            sub = binder::bind_keys(sub, &app_name, &scope, &keys, &mut store, true)?;
            cli = cli.subcommand(sub);

            commands.insert(
                cmd.name,
                Entry {
                    runnable: Some(cmd.runnable),
                    args: cmd.args,
                },
            );
        }

        store.set_env(env::env_snapshot(&app_name, vars));
        info!(
            event = "cmdfig.initialized",
            app = %app_name,
            commands = commands.len(),
            root_keys = registry.root().len()
        );

        Ok(Cmdfig::new(
            app_name,
            cli,
            store,
            registry,
            Entry {
                runnable: self.runnable,
                args: self.args,
            },
            commands,
            self.default_config_file,
            self.root_values,
        ))
    }
}
