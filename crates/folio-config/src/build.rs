//! Global build options shared by every page.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ConfigError;
use crate::page::EntryMap;

// Helper defaults
fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_public_path() -> String {
    "/".to_string()
}

fn default_runtime_chunk() -> String {
    "runtime".to_string()
}

fn default_vendor_chunk() -> String {
    "vendor".to_string()
}

fn default_common_chunk() -> Option<String> {
    Some("common".to_string())
}

fn default_vendor_marker() -> String {
    "node_modules".to_string()
}

fn default_min_shared_pages() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Main build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Build root; every page's output path is relative to it
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Entries inherited by pages that declare none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryMap>,

    /// Template inherited by pages that declare none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// URL prefix for chunk references in generated documents
    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// Name of the runtime/manifest chunk
    #[serde(default = "default_runtime_chunk")]
    pub runtime_chunk: String,

    /// Name of the shared chunk holding third-party modules
    #[serde(default = "default_vendor_chunk")]
    pub vendor_chunk: String,

    /// Name of the shared chunk holding first-party modules used by several pages.
    /// `None` keeps such modules inside each page's entry chunk.
    #[serde(default = "default_common_chunk")]
    pub common_chunk: Option<String>,

    /// Path fragment that identifies third-party modules
    #[serde(default = "default_vendor_marker")]
    pub vendor_marker: String,

    /// Minimum number of pages that must use a module before it is shared
    #[serde(default = "default_min_shared_pages")]
    pub min_shared_pages: usize,

    /// Enable minification
    #[serde(default)]
    pub minify: bool,

    /// Emit source maps
    #[serde(default)]
    pub source_maps: bool,

    /// Add content hashes to chunk file names
    #[serde(default)]
    pub hash_filenames: bool,

    /// Plan isolated pages in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Bundler plugins, applied in order
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Modules left to the runtime environment
    #[serde(default)]
    pub external: Vec<String>,

    /// Compile-time replacements
    #[serde(default)]
    pub define: IndexMap<String, String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            entry: None,
            template: None,
            public_path: default_public_path(),
            runtime_chunk: default_runtime_chunk(),
            vendor_chunk: default_vendor_chunk(),
            common_chunk: default_common_chunk(),
            vendor_marker: default_vendor_marker(),
            min_shared_pages: default_min_shared_pages(),
            minify: false,
            source_maps: false,
            hash_filenames: false,
            parallel: true,
            plugins: Vec::new(),
            external: Vec::new(),
            define: IndexMap::new(),
        }
    }
}

impl BuildOptions {
    /// Create from serde_json::Value
    ///
    /// ```
    /// use folio_config::BuildOptions;
    /// use serde_json::json;
    ///
    /// let options = BuildOptions::from_value(json!({ "minify": true })).unwrap();
    /// assert!(options.minify);
    /// assert_eq!(options.runtime_chunk, "runtime");
    /// ```
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::invalid_value("build", e.to_string()))
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(self).map_err(|e| ConfigError::invalid_value("build", e.to_string()))
    }
}

/// How pages are turned into build plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// One self-contained plan per page, no code sharing
    #[default]
    Isolated,
    /// One plan for all pages with shared chunks
    Shared,
}

impl FromStr for BuildMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "isolated" => Ok(BuildMode::Isolated),
            "shared" => Ok(BuildMode::Shared),
            other => Err(ConfigError::invalid_value(
                "mode",
                format!("expected 'isolated' or 'shared', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Isolated => f.write_str("isolated"),
            BuildMode::Shared => f.write_str("shared"),
        }
    }
}

/// Target environment; selects built-in defaults and the matching profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Profile name looked up under `[profiles]`
    pub fn profile_name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Built-in build option overlay for this environment
    pub fn defaults(&self) -> Value {
        match self {
            Environment::Development => json!({ "source_maps": true }),
            Environment::Production => json!({ "minify": true, "hash_filenames": true }),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::invalid_value(
                "environment",
                format!("expected 'development' or 'production', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_name())
    }
}
