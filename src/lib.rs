//! Per-command configuration for command-line applications. Declare keys,
//! declare commands, and each command reads its own settings from flags,
//! environment variables and a TOML file.
//!
//! ```ignore
//! let mut app = Cmdfig::builder("musicstore", "Starts music store web application.")
//!     .key("cpuprofile", false, "Starts CPU profiler if set to true.")
//!     .command(
//!         Command::new("grpc", "Starts gRPC service.", |conf, _args| {
//!             serve(conf.get_int("port"), &conf.get_string("dbUri"))
//!         })
//!         .key("port", 8080, "Service listen port.")
//!         .key("dbUri", "boltdb:db/my.db", "Db Uri"),
//!     )
//!     .build()?;
//! app.execute(std::env::args_os().skip(1))?;
//! ```
//!
//! `musicstore grpc --port=1234` runs the `grpc` command with port 1234. So
//! does `MUSICSTORE_GRPC_PORT=1234 musicstore grpc`, and so does a
//! `config.toml` containing:
//!
//! ```toml
//! [musicstore.grpc]
//! port = 1234
//! ```
//!
//! # Namespaces
//!
//! Every key lives in the namespace of the command that declares it. The key
//! `port` of command `grpc` in app `musicstore` has:
//!
//! - the flag `--port` on `musicstore grpc`,
//! - the environment variable `MUSICSTORE_GRPC_PORT`,
//! - the file path `musicstore.grpc.port`.
//!
//! Root keys (declared on the builder) drop the command segment:
//! `MUSICSTORE_CPUPROFILE` and `musicstore.cpuprofile`. Every command also
//! sees the root keys in its own namespace, so `MUSICSTORE_GRPC_CPUPROFILE`
//! turns on profiling for `grpc` only. A command key with the same name as a
//! root key shadows it.
//!
//! Environment variable names are upper-cased and file keys are matched
//! without regard to case. [`CmdfigBuilder::validate()`] rejects declarations
//! whose names would land on the same variable or path.
//!
//! # Layer precedence
//!
//! ```text
//! Declared defaults     .key("port", 8080, ...)
//!        ↑ overridden by
//! Config file           [app.cmd] port = ...
//!        ↑ overridden by
//! Environment vars      APP_CMD_PORT
//!        ↑ overridden by
//! Flags                 --port
//!        ↑ overridden by
//! Overrides             conf.set("port", ...)
//! ```
//!
//! Only flags actually typed on the command line count. A flag's default is
//! shown in `--help` and nowhere else.
//!
//! # Config file
//!
//! The file comes from `--config <path>`, then `{APP}_CONFIG`, then the
//! builder's [`default_config_file()`](CmdfigBuilder::default_config_file)
//! (`config.toml`). The default file may be missing; an explicitly requested
//! one may not. A default file that fails to parse is skipped with a
//! warning; an explicit one that fails to parse is an error.
//!
//! # Reading values
//!
//! A [`Conf`] is a view of one command's settings. Its getters
//! (`get_string`, `get_int`, `get_bool`, `get_float64`) never fail: missing
//! or unreadable values come back as the type's zero value. Views resolve on
//! every read, so they always reflect the current flags and overrides.
//!
//! # Logging
//!
//! Loading and execution emit [`tracing`] events with an `event` field
//! (`config.file_loaded`, `cmdfig.execute_started`, ...). Install any
//! subscriber to see them.

pub mod error;
pub mod types;

mod app;
mod args;
mod binder;
mod builder;
mod command;
mod conf;
mod env;
mod file;
pub(crate) mod merge;
mod namespace;
mod registry;
mod scalar;
mod store;
mod validate;

#[cfg(test)]
mod fixtures;

pub use app::Cmdfig;
pub use args::Args;
pub use builder::CmdfigBuilder;
pub use command::{Command, Runnable};
pub use conf::Conf;
pub use error::{CmdfigError, RunError};
pub use file::ConfigSource;
pub use registry::{KeySet, Registry};
pub use store::{Binding, Store};
pub use types::{KeySpec, RootValues, Scope, Value, ValueKind};
