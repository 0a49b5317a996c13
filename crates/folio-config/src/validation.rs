//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).
//! The page-set checks (`validate_output_paths`, `validate_shared_entries`) are also run
//! by the planner before any plan is assembled.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::FolioConfig;
use crate::error::{ConfigError, Result};
use crate::page::{PageDescriptor, PageRef, TemplateRef};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &FolioConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use folio_config::{ConfigValidator, FolioConfig, SchemaValidator};
/// use serde_json::json;
///
/// let config = FolioConfig::from_value(json!({
///     "pages": [{ "title": "Home", "entry": { "home": "home.js" } }]
/// }))
/// .unwrap();
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &FolioConfig) -> Result<()> {
        let pages = config.page_descriptors()?;
        validate_output_paths(&pages)?;

        let build = &config.build;
        if build.min_shared_pages < 2 {
            return Err(ConfigError::invalid_value(
                "build.min_shared_pages",
                "a module must be used by at least 2 pages to be shared",
            ));
        }

        let mut reserved = vec![
            ("build.runtime_chunk", build.runtime_chunk.as_str()),
            ("build.vendor_chunk", build.vendor_chunk.as_str()),
        ];
        if let Some(common) = &build.common_chunk {
            reserved.push(("build.common_chunk", common.as_str()));
        }
        for (field, name) in &reserved {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid_value(*field, "chunk names cannot be empty"));
            }
        }
        for (i, (field, name)) in reserved.iter().enumerate() {
            if reserved[..i].iter().any(|(_, other)| other == name) {
                return Err(ConfigError::invalid_value(
                    *field,
                    format!("chunk name '{name}' is already used by another built-in chunk"),
                ));
            }
        }

        for page in &pages {
            if let Some(chunk) = page
                .entry_chunk_names()
                .find(|chunk| reserved.iter().any(|(_, name)| name == chunk))
            {
                return Err(ConfigError::invalid_value(
                    "entry",
                    format!(
                        "{}: entry chunk '{chunk}' clashes with a built-in chunk name",
                        page.page_ref()
                    ),
                ));
            }
        }

        for external in &build.external {
            if external.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "build.external",
                    "Remove empty strings from the 'external' array",
                ));
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that entry modules and template files exist
/// under the project root.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &FolioConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for page in config.page_descriptors()? {
            for module in page.entry_modules() {
                let path = self.root.join(module);
                if !path.exists() {
                    return Err(ConfigError::EntryNotFound { path });
                }
            }

            if let TemplateRef::Path(template) = &page.template {
                let path = self.root.join(template);
                if !path.exists() {
                    return Err(ConfigError::TemplateNotFound { path });
                }
            }
        }

        Ok(())
    }
}

/// Output paths must be unique across pages.
pub fn validate_output_paths(pages: &[PageDescriptor]) -> Result<()> {
    let mut seen: HashMap<&str, PageRef> = HashMap::with_capacity(pages.len());
    for page in pages {
        if let Some(first) = seen.insert(page.output_path.as_str(), page.page_ref()) {
            return Err(ConfigError::DuplicateOutputPath {
                path: page.output_path.to_string(),
                first,
                second: page.page_ref(),
            });
        }
    }
    Ok(())
}

/// Entry chunk names must be unique across pages once they share one plan.
pub fn validate_shared_entries(pages: &[PageDescriptor]) -> Result<()> {
    let mut owners: HashMap<&str, PageRef> = HashMap::new();
    for page in pages {
        for chunk in page.entry_chunk_names() {
            if let Some(first) = owners.insert(chunk, page.page_ref()) {
                return Err(ConfigError::EntryCollision {
                    chunk: chunk.to_string(),
                    first,
                    second: page.page_ref(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageDefaults, PageOptions};
    use serde_json::json;

    fn pages(options: &[PageOptions]) -> Vec<PageDescriptor> {
        options
            .iter()
            .enumerate()
            .map(|(i, o)| PageDescriptor::from_options(i, o, PageDefaults::default()).unwrap())
            .collect()
    }

    #[test]
    fn distinct_output_paths_pass() {
        let pages = pages(&[
            PageOptions::new("Demo").entry("app", "main.js"),
            PageOptions::new("Another").path("another").entry("another", "another.js"),
        ]);
        assert!(validate_output_paths(&pages).is_ok());
    }

    #[test]
    fn duplicate_output_path_names_both_pages() {
        let pages = pages(&[
            PageOptions::new("Demo").path("docs").entry("app", "main.js"),
            PageOptions::new("Again").path("./docs/").entry("again", "again.js"),
        ]);
        let err = validate_output_paths(&pages).unwrap_err();
        assert_eq!(
            err.to_string(),
            "output path 'docs' is used by both page 0 (\"Demo\") and page 1 (\"Again\")"
        );
    }

    #[test]
    fn shared_entry_collision_is_detected() {
        let pages = pages(&[
            PageOptions::new("Demo").entry("app", "main.js"),
            PageOptions::new("Another").path("another").entry("app", "another.js"),
        ]);
        let err = validate_shared_entries(&pages).unwrap_err();
        assert!(matches!(err, ConfigError::EntryCollision { ref chunk, .. } if chunk == "app"));
    }

    #[test]
    fn schema_rejects_single_page_sharing_threshold() {
        let config = FolioConfig::from_value(json!({
            "build": { "min_shared_pages": 1 },
            "pages": [{ "title": "Demo", "entry": { "app": "main.js" } }]
        }))
        .unwrap();
        assert!(matches!(
            SchemaValidator.validate(&config).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn schema_rejects_entry_named_like_runtime() {
        let config = FolioConfig::from_value(json!({
            "pages": [{ "title": "Demo", "entry": { "runtime": "main.js" } }]
        }))
        .unwrap();
        assert!(SchemaValidator.validate(&config).is_err());
    }
}
