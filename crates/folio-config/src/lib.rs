//! # folio-config
//!
//! Configuration surface for the Folio multi-page orchestrator.
//!
//! A project describes its global build options, the pages it wants to emit,
//! the planning mode and per-environment overlays. This crate turns that raw
//! record into validated [`PageDescriptor`]s and an [`EnvConfig`] that the
//! planner merges on top of the global [`BuildOptions`].
//!
//! ```
//! use folio_config::{FolioConfig, Environment};
//! use serde_json::json;
//!
//! let config = FolioConfig::from_value(json!({
//!     "pages": [
//!         { "title": "Demo", "entry": { "app": "main.js" } },
//!         { "title": "Another", "path": "another", "entry": { "another": "another.js" } }
//!     ]
//! }))
//! .unwrap();
//!
//! let pages = config.page_descriptors().unwrap();
//! assert_eq!(pages[1].document_path(), "another/index.html");
//!
//! let env = config.env_config(Environment::Production).unwrap();
//! assert_eq!(env.overlay["minify"], json!(true));
//! ```

pub mod build;
pub mod config;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod page;
pub mod settings;
pub mod validation;

pub use build::{BuildMode, BuildOptions, Environment};
pub use config::{EnvConfig, FolioConfig, ProfileConfig};
pub use discovery::ConfigDiscovery;
pub use error::{ConfigError, Result};
pub use merge::{merge_layers, merge_values};
pub use page::{
    ChunkName, ChunkSelection, EntryMap, EntrySource, PageDefaults, PageDescriptor, PageKey,
    PageOptions, PageRef, TemplateRef,
};
pub use settings::GlobalSettings;
pub use validation::{
    ConfigValidator, FsValidator, SchemaValidator, validate_output_paths, validate_shared_entries,
};
