use std::path::PathBuf;

use thiserror::Error;

/// Error returned by a command's runnable.
pub type RunError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CmdfigError {
    #[error(
        "Command '{command}' has a runnable and subcommands but no positional argument rule; call .args() on the builder"
    )]
    AmbiguousRouting { command: String },

    #[error("Command '{0}' is declared more than once")]
    DuplicateCommand(String),

    #[error("Invalid command name '{name}': {reason}")]
    InvalidCommandName { name: String, reason: String },

    #[error("Unsupported value type for key '{key}': {kind} (expected string, int, bool or float64)")]
    UnsupportedType { key: String, kind: String },

    #[error("Invalid key name '{key}': {reason}")]
    InvalidKeyName { key: String, reason: String },

    #[error("Keys '{first}' and '{second}' both map to '{target}'")]
    KeyCollision {
        first: String,
        second: String,
        target: String,
    },

    #[error("Cannot set '{key}': it overlaps the path of bound key '{bound}'")]
    OverrideConflict { key: String, bound: String },

    #[error("Flag '--{flag}' is already registered on command '{command}'")]
    DuplicateFlag { command: String, flag: String },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("Invalid arguments for '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    #[error("Command failed: {0}")]
    Run(RunError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_names_key_and_type() {
        let err = CmdfigError::UnsupportedType {
            key: "port".into(),
            kind: "alloc::vec::Vec<i32>".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("port"));
        assert!(msg.contains("Vec<i32>"));
    }

    #[test]
    fn ambiguous_routing_points_at_args() {
        let err = CmdfigError::AmbiguousRouting {
            command: "musicstore".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("musicstore"));
        assert!(msg.contains(".args()"));
    }

    #[test]
    fn io_error_includes_path() {
        let err = CmdfigError::IoError {
            path: "missing.toml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("missing.toml"));
    }
}
