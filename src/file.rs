//! Config file selection and loading.
//!
//! One file is used per invocation, picked in this order:
//!
//! 1. the `--config <path>` flag,
//! 2. the `{APP}_CONFIG` environment variable,
//! 3. the default file name declared on the builder.
//!
//! A default file that is missing or broken yields no file layer; broken ones
//! are logged as warnings. A file that was asked for explicitly (flag or env)
//! must exist and parse, or loading fails.
//! Keys are lower-cased after parsing so lookups are case-insensitive.

use std::path::{Path, PathBuf};

use toml::Table;
use tracing::{error, info, warn};

use crate::error::CmdfigError;
use crate::merge::lowercase_keys;

/// Where the config file path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Flag(PathBuf),
    Env(PathBuf),
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Flag(p) | ConfigSource::Env(p) | ConfigSource::Default(p) => p,
        }
    }

    /// Whether the user asked for this file, as opposed to the compiled default.
    pub fn is_explicit(&self) -> bool {
        !matches!(self, ConfigSource::Default(_))
    }
}

/// Pick the config file. Empty flag or env values count as absent.
pub fn select_source(flag: Option<&Path>, env: Option<&str>, default: &Path) -> ConfigSource {
    if let Some(path) = flag.filter(|p| !p.as_os_str().is_empty()) {
        return ConfigSource::Flag(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return ConfigSource::Env(PathBuf::from(path));
    }
    ConfigSource::Default(default.to_path_buf())
}

/// Load the selected file.
///
/// `Ok(None)` means there is no usable default file: it is missing, unreadable
/// or malformed. Only an explicitly requested file fails loading.
pub fn load_source(source: &ConfigSource) -> Result<Option<Table>, CmdfigError> {
    let path = source.path();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !source.is_explicit() => {
            info!(
                event = "config.default_file_missing",
                path = %path.display()
            );
            return Ok(None);
        }
        Err(e) => {
            return skip_or_fail(
                source,
                CmdfigError::IoError {
                    path: path.to_path_buf(),
                    source: e,
                },
            );
        }
    };

    match parse_config(&content, path) {
        Ok(table) => {
            info!(event = "config.file_loaded", path = %path.display());
            Ok(Some(table))
        }
        Err(e) => skip_or_fail(source, e),
    }
}

fn skip_or_fail(source: &ConfigSource, err: CmdfigError) -> Result<Option<Table>, CmdfigError> {
    let path = source.path();
    if source.is_explicit() {
        error!(
            event = "config.file_load_failed",
            path = %path.display(),
            error = %err
        );
        return Err(err);
    }
    warn!(
        event = "config.default_file_ignored",
        path = %path.display(),
        error = %err
    );
    Ok(None)
}

/// Load a file that must exist, e.g. for [`Cmdfig::from_file`](crate::Cmdfig::from_file).
pub fn load_file(path: &Path) -> Result<Table, CmdfigError> {
    let source = ConfigSource::Flag(path.to_path_buf());
    // Explicit sources never come back empty.
    Ok(load_source(&source)?.unwrap_or_default())
}

fn parse_config(content: &str, path: &Path) -> Result<Table, CmdfigError> {
    let table: Table = toml::from_str(content).map_err(|e| CmdfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(lowercase_keys(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn default_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    #[test]
    fn flag_wins_over_env_and_default() {
        let source = select_source(
            Some(Path::new("flag.toml")),
            Some("env.toml"),
            &default_path(),
        );
        assert_eq!(source, ConfigSource::Flag("flag.toml".into()));
    }

    #[test]
    fn env_wins_over_default() {
        let source = select_source(None, Some("env.toml"), &default_path());
        assert_eq!(source, ConfigSource::Env("env.toml".into()));
    }

    #[test]
    fn empty_values_fall_through_to_default() {
        let source = select_source(Some(Path::new("")), Some(""), &default_path());
        assert_eq!(source, ConfigSource::Default(default_path()));
        assert!(!source.is_explicit());
    }

    #[test]
    fn missing_default_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let source = ConfigSource::Default(dir.path().join("config.toml"));
        assert!(load_source(&source).unwrap().is_none());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let source = ConfigSource::Flag(dir.path().join("missing.toml"));
        let err = load_source(&source).unwrap_err();
        assert!(matches!(err, CmdfigError::IoError { .. }));

        let source = ConfigSource::Env(dir.path().join("missing.toml"));
        assert!(load_source(&source).is_err());
    }

    #[test]
    fn loads_and_lowercases_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[testapp]\ndbUri = \"inmemory\"\nport = 4444\n").unwrap();

        let table = load_source(&ConfigSource::Default(path)).unwrap().unwrap();
        assert_eq!(table["testapp"]["dburi"].as_str().unwrap(), "inmemory");
        assert_eq!(table["testapp"]["port"].as_integer().unwrap(), 4444);
    }

    #[test]
    fn malformed_default_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[testapp\nport = ").unwrap();

        assert!(load_source(&ConfigSource::Default(path)).unwrap().is_none());
    }

    #[test]
    fn malformed_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.toml");
        fs::write(&path, "[testapp\nport = ").unwrap();

        let err = load_source(&ConfigSource::Flag(path.clone())).unwrap_err();
        assert!(matches!(err, CmdfigError::ParseError { .. }));
        let err = load_source(&ConfigSource::Env(path)).unwrap_err();
        assert!(matches!(err, CmdfigError::ParseError { .. }));
    }

    #[test]
    fn unreadable_default_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let source = ConfigSource::Default(dir.path().to_path_buf());
        assert!(load_source(&source).unwrap().is_none());
    }

    #[test]
    fn load_file_requires_existence() {
        let dir = TempDir::new().unwrap();
        assert!(load_file(&dir.path().join("nope.toml")).is_err());
    }
}
