//! Locating and reading the project config.
//!
//! A project is configured by `folio.toml` in its root, or by a `folio` table
//! in its `package.json`. An explicit path may also name a plain `.json` file.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::FolioConfig;
use crate::error::{ConfigError, Result};

const CONFIG_FILE: &str = "folio.toml";
const PACKAGE_FILE: &str = "package.json";
const PACKAGE_FIELD: &str = "folio";

/// Finds and loads the config of a project rooted at a directory.
///
/// Library users can build a [`FolioConfig`] with `FolioConfig::from_value()`
/// instead.
///
/// ```no_run
/// use folio_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

/// How a config file is read, decided by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Toml,
    Json,
    /// The `folio` field of a `package.json`
    Package,
}

impl Source {
    fn of(path: &Path) -> Self {
        if path.file_name().is_some_and(|name| name == PACKAGE_FILE) {
            Source::Package
        } else if path.extension().is_some_and(|ext| ext == "json") {
            Source::Json
        } else {
            Source::Toml
        }
    }
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `folio.toml` if present, else a `package.json` with a non-null `folio` field.
    pub fn find(&self) -> Option<PathBuf> {
        let toml = self.root.join(CONFIG_FILE);
        if toml.is_file() {
            return Some(toml);
        }

        let package = self.root.join(PACKAGE_FILE);
        let has_field = fs::read_to_string(&package)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .is_some_and(|value| value.get(PACKAGE_FIELD).is_some_and(|field| !field.is_null()));
        has_field.then_some(package)
    }

    /// Load the discovered config.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` when neither file is present.
    pub fn load(&self) -> Result<FolioConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load a specific file. `package.json` is read through its `folio` field,
    /// other `.json` files as a whole, anything else as TOML.
    pub fn load_from(&self, path: &Path) -> Result<FolioConfig> {
        let source = Source::of(path);
        tracing::debug!(path = %path.display(), ?source, "loading config");

        let content = fs::read_to_string(path)?;
        let value = match source {
            Source::Toml => toml::from_str::<Value>(&content).map_err(|err| {
                ConfigError::invalid_value("toml", format!("Invalid TOML syntax: {err}"))
            })?,
            Source::Json => parse_json(&content, "json")?,
            Source::Package => package_field(parse_json(&content, PACKAGE_FILE)?)?,
        };

        FolioConfig::from_value(value)
    }
}

fn parse_json(content: &str, field: &str) -> Result<Value> {
    serde_json::from_str(content)
        .map_err(|err| ConfigError::invalid_value(field, format!("Invalid JSON syntax: {err}")))
}

fn package_field(mut package: Value) -> Result<Value> {
    match package.get_mut(PACKAGE_FIELD).map(Value::take) {
        Some(config) if !config.is_null() => Ok(config),
        _ => Err(ConfigError::invalid_value(
            PACKAGE_FIELD,
            "Add a 'folio' table to package.json",
        )),
    }
}
