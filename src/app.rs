use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::args::Args;
use crate::binder::{self, ARGS_ID, CONFIG_FLAG};
use crate::builder::CmdfigBuilder;
use crate::command::Runnable;
use crate::conf::Conf;
use crate::env;
use crate::error::CmdfigError;
use crate::file;
use crate::namespace;
use crate::registry::Registry;
use crate::store::Store;
use crate::types::{RootValues, Scope};

/// What runs when a command is selected.
#[derive(Default)]
pub(crate) struct Entry {
    pub(crate) runnable: Option<Runnable>,
    pub(crate) args: Option<Args>,
}

/// A built application: the command tree, its bound keys and the layered store.
///
/// Configuration sources are read when [`execute()`](Self::execute) runs, so
/// values seen through [`root_config()`](Self::root_config) before that come
/// from the environment captured at build time and from defaults.
pub struct Cmdfig {
    app_name: String,
    cli: clap::Command,
    store: Store,
    registry: Registry,
    root: Entry,
    commands: BTreeMap<String, Entry>,
    command_names: Vec<String>,
    default_config_file: PathBuf,
    config_file_used: Option<PathBuf>,
    root_values: RootValues,
}

impl Cmdfig {
    /// Start declaring an application. The first word of `usage` is its name.
    pub fn builder(usage: &str, description: &str) -> CmdfigBuilder {
        CmdfigBuilder::new(usage, description)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        app_name: String,
        cli: clap::Command,
        store: Store,
        registry: Registry,
        root: Entry,
        commands: BTreeMap<String, Entry>,
        default_config_file: PathBuf,
        root_values: RootValues,
    ) -> Self {
        let command_names = commands.keys().cloned().collect();
        Self {
            app_name,
            cli,
            store,
            registry,
            root,
            commands,
            command_names,
            default_config_file,
            config_file_used: None,
            root_values,
        }
    }

    /// Read-only access to a config file, with no keys, commands or flags.
    ///
    /// Values are reached through `config(cmd)` / `root_config()` exactly as
    /// they are nested in the file. Fails if the file is missing or malformed.
    pub fn from_file(app_name: &str, path: impl AsRef<Path>) -> Result<Self, CmdfigError> {
        let path = path.as_ref();
        let table = file::load_file(path)?;
        let mut store = Store::new();
        store.set_file(table);

        let mut app = Self::new(
            app_name.to_string(),
            clap::Command::new(app_name.to_string()),
            store,
            Registry::default(),
            Entry::default(),
            BTreeMap::new(),
            path.to_path_buf(),
            RootValues::default(),
        );
        app.config_file_used = Some(path.to_path_buf());
        Ok(app)
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The clap command tree, e.g. for rendering help or completions.
    pub fn cli(&self) -> &clap::Command {
        &self.cli
    }

    /// View of the root command's configuration.
    pub fn root_config(&self) -> Conf<'_> {
        Conf::new(&self.app_name, Scope::Root, &self.store)
            .with_root_values(self.root_values, &self.command_names)
    }

    /// View of one command's configuration. Unknown names give a view with
    /// nothing but overrides set through it.
    pub fn config(&self, command: &str) -> Conf<'_> {
        Conf::new(&self.app_name, Scope::command(command), &self.store)
    }

    /// The config file selected by the last execution, whether or not it existed.
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file_used.as_deref()
    }

    /// Parse `args` (without the program name), load configuration and run
    /// the selected command, reading the process environment.
    pub fn execute<I, T>(&mut self, args: I) -> Result<(), CmdfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.execute_with_env(args, std::env::vars())
    }

    /// Like [`execute()`](Self::execute) with explicit environment variables.
    pub fn execute_with_env<I, T>(
        &mut self,
        args: I,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), CmdfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        // Flags belong to one invocation, even one that fails.
        self.store.clear_flags();

        let argv = std::iter::once(OsString::from(&self.app_name))
            .chain(args.into_iter().map(Into::into));
        let matches = self.cli.clone().try_get_matches_from(argv)?;

        let (scope, leaf) = match matches.subcommand() {
            Some((name, sub)) => (Scope::command(name), sub),
            None => (Scope::Root, &matches),
        };

        let config_flag = leaf
            .try_get_one::<PathBuf>(CONFIG_FLAG)
            .ok()
            .flatten()
            .cloned();
        self.load_sources(config_flag.as_deref(), vars)?;

        let flags_registered = match &scope {
            Scope::Root => self.root.runnable.is_some(),
            Scope::Command(_) => true,
        };
        if flags_registered && let Some(keys) = self.registry.keys(&scope) {
            binder::apply_flags(leaf, &self.app_name, &scope, keys, &mut self.store);
        }

        let positional: Vec<String> = leaf
            .try_get_many::<String>(ARGS_ID)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let entry = match &scope {
            Scope::Root => Some(&self.root),
            Scope::Command(name) => self.commands.get(name),
        };
        let Some(entry) = entry else {
            return Ok(());
        };

        if let Some(rule) = &entry.args {
            rule.check(&positional)
                .map_err(|reason| CmdfigError::InvalidArgs {
                    command: scope.command_name().unwrap_or(self.app_name.as_str()).to_string(),
                    reason,
                })?;
        }

        let Some(runnable) = &entry.runnable else {
            info!(event = "cmdfig.nothing_to_run", command = %scope);
            return Ok(());
        };

        info!(
            event = "cmdfig.execute_started",
            command = %scope,
            args = positional.len()
        );
        let conf = match &scope {
            Scope::Root => self.root_config(),
            Scope::Command(name) => self.config(name),
        };
        runnable(&conf, &positional).map_err(CmdfigError::Run)?;
        info!(event = "cmdfig.execute_completed", command = %scope);
        Ok(())
    }

    /// Re-read the environment and the selected config file.
    ///
    /// The file is chosen from `config_flag`, then `{APP}_CONFIG`, then the
    /// default file. A missing default file is not an error.
    pub fn load_sources(
        &mut self,
        config_flag: Option<&Path>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), CmdfigError> {
        let snapshot = env::env_snapshot(&self.app_name, vars);
        let config_env = snapshot
            .get(&namespace::config_env_var(&self.app_name))
            .cloned();

        let source = file::select_source(
            config_flag,
            config_env.as_deref(),
            &self.default_config_file,
        );
        debug!(event = "config.source_selected", source = ?source);
        let table = file::load_source(&source)?;

        self.config_file_used = Some(source.path().to_path_buf());
        self.store.set_file(table.unwrap_or_default());
        self.store.set_env(snapshot);
        Ok(())
    }
}

impl fmt::Debug for Cmdfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmdfig")
            .field("app_name", &self.app_name)
            .field("commands", &self.command_names)
            .field("default_config_file", &self.default_config_file)
            .field("config_file_used", &self.config_file_used)
            .finish_non_exhaustive()
    }
}
