//! Page records and the validated page descriptor.
//!
//! [`PageOptions`] is what users author (one `[[pages]]` table per page).
//! [`PageDescriptor`] is the validated value object the planner consumes: it has
//! a title, a normalised output path, a resolved template and a non-empty entry map.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Name of an emitted chunk (`app`, `vendor`, `runtime`, ...).
pub type ChunkName = String;

/// Named entry points of a page, in declaration order.
pub type EntryMap = IndexMap<ChunkName, EntrySource>;

const DEFAULT_DOCUMENT_FILENAME: &str = "index.html";

/// Module(s) an entry chunk starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySource {
    Single(String),
    Many(Vec<String>),
}

impl EntrySource {
    pub fn modules(&self) -> Vec<&str> {
        match self {
            EntrySource::Single(module) => vec![module.as_str()],
            EntrySource::Many(modules) => modules.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EntrySource::Single(module) => module.trim().is_empty(),
            EntrySource::Many(modules) => modules.iter().all(|m| m.trim().is_empty()),
        }
    }
}

impl From<&str> for EntrySource {
    fn from(value: &str) -> Self {
        EntrySource::Single(value.to_string())
    }
}

impl From<String> for EntrySource {
    fn from(value: String) -> Self {
        EntrySource::Single(value)
    }
}

impl From<Vec<String>> for EntrySource {
    fn from(value: Vec<String>) -> Self {
        EntrySource::Many(value)
    }
}

/// Template used to stamp a page's document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateRef {
    #[default]
    BuiltIn,
    Path(PathBuf),
}

/// Which chunks a page's document references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkSelection {
    /// Every chunk the page's plan produces.
    #[default]
    All,
    /// Explicit allow-list, in document order.
    Only(Vec<ChunkName>),
}

/// Human readable reference to a page, used in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    pub index: usize,
    pub title: Option<String>,
}

impl PageRef {
    pub fn new(index: usize, title: Option<&str>) -> Self {
        Self {
            index,
            title: title.map(str::to_string),
        }
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "page {} (\"{}\")", self.index, title),
            None => write!(f, "page {}", self.index),
        }
    }
}

/// Identity of a page within a build: its normalised output path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Join a file name under this page's directory.
    pub fn join(&self, file: &str) -> String {
        if self.0.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", self.0, file)
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// A page as authored in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageOptions {
    /// Output directory relative to the build root (empty means the root itself)
    #[serde(default)]
    pub path: String,

    /// Template file; falls back to `build.template`, then the built-in template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Document title (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Named entry modules; inherited from `build.entry` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryMap>,

    /// Chunk allow-list for the document; unset means all chunks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<ChunkName>>,

    /// Document file name inside `path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// `lang` attribute of the generated document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Extra `<meta name=.. content=..>` tags
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub meta: IndexMap<String, String>,

    /// Page-level build option overrides (isolated mode only)
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PageOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn entry(mut self, chunk: impl Into<String>, source: impl Into<EntrySource>) -> Self {
        self.entry
            .get_or_insert_with(IndexMap::new)
            .insert(chunk.into(), source.into());
        self
    }

    pub fn chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks = Some(chunks.into_iter().map(Into::into).collect());
        self
    }
}

/// Values a page inherits from the global build options.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageDefaults<'a> {
    pub entry: Option<&'a EntryMap>,
    pub template: Option<&'a Path>,
}

/// Validated description of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub index: usize,
    pub title: String,
    pub output_path: PageKey,
    pub template: TemplateRef,
    pub entry: EntryMap,
    pub chunks: ChunkSelection,
    pub filename: String,
    pub lang: Option<String>,
    pub meta: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PageDescriptor {
    /// Validate a page record.
    ///
    /// Fails with [`ConfigError::MissingTitle`] when the title is absent or blank.
    pub fn from_options(
        index: usize,
        options: &PageOptions,
        defaults: PageDefaults<'_>,
    ) -> Result<Self> {
        let title = options
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingTitle {
                page: PageRef::new(index, None),
            })?
            .to_string();
        let page = PageRef::new(index, Some(&title));

        let output_path = normalize_output_path(&page, &options.path)?;

        let entry = match (&options.entry, defaults.entry) {
            (Some(entry), _) if !entry.is_empty() => entry.clone(),
            (_, Some(inherited)) if !inherited.is_empty() => inherited.clone(),
            _ => return Err(ConfigError::MissingEntry { page }),
        };
        if let Some((chunk, _)) = entry.iter().find(|(_, source)| source.is_empty()) {
            return Err(ConfigError::EmptyEntry {
                page,
                chunk: chunk.clone(),
            });
        }

        let template = options
            .template
            .as_deref()
            .or(defaults.template)
            .map(|p| TemplateRef::Path(p.to_path_buf()))
            .unwrap_or_default();

        let chunks = match &options.chunks {
            Some(list) => ChunkSelection::Only(list.clone()),
            None => ChunkSelection::All,
        };

        let filename = options
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_DOCUMENT_FILENAME.to_string());
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(ConfigError::invalid_value(
                "filename",
                format!("{page}: expected a plain file name, got '{filename}'"),
            ));
        }

        Ok(Self {
            index,
            title,
            output_path,
            template,
            entry,
            chunks,
            filename,
            lang: options.lang.clone(),
            meta: options.meta.clone(),
            options: options.options.clone(),
        })
    }

    pub fn page_ref(&self) -> PageRef {
        PageRef::new(self.index, Some(&self.title))
    }

    pub fn key(&self) -> &PageKey {
        &self.output_path
    }

    /// Path of the generated document relative to the build root.
    pub fn document_path(&self) -> String {
        self.output_path.join(&self.filename)
    }

    pub fn entry_chunk_names(&self) -> impl Iterator<Item = &str> {
        self.entry.keys().map(String::as_str)
    }

    /// Every module named by any of the page's entries, in declaration order.
    pub fn entry_modules(&self) -> impl Iterator<Item = &str> {
        self.entry.values().flat_map(|source| source.modules())
    }
}

fn normalize_output_path(page: &PageRef, raw: &str) -> Result<PageKey> {
    let invalid = |reason: &str| ConfigError::InvalidOutputPath {
        page: page.clone(),
        path: raw.to_string(),
        reason: reason.to_string(),
    };

    let unified = raw.trim().replace('\\', "/");
    if unified.starts_with('/') || Path::new(&unified).is_absolute() {
        return Err(invalid("must be relative to the build root"));
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(invalid("must not leave the build root")),
            other => segments.push(other),
        }
    }

    Ok(PageKey(segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(options: PageOptions) -> Result<PageDescriptor> {
        PageDescriptor::from_options(0, &options, PageDefaults::default())
    }

    #[test]
    fn missing_title_is_rejected() {
        let options = PageOptions::default().entry("app", "main.js");
        let err = descriptor(options).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTitle { .. }));
    }

    #[test]
    fn blank_title_is_rejected() {
        let options = PageOptions::new("   ").entry("app", "main.js");
        assert!(matches!(
            descriptor(options).unwrap_err(),
            ConfigError::MissingTitle { .. }
        ));
    }

    #[test]
    fn defaults_are_applied() {
        let page = descriptor(PageOptions::new("Demo").entry("app", "main.js")).unwrap();
        assert!(page.output_path.is_root());
        assert_eq!(page.template, TemplateRef::BuiltIn);
        assert_eq!(page.chunks, ChunkSelection::All);
        assert_eq!(page.document_path(), "index.html");
    }

    #[test]
    fn output_path_is_normalized() {
        let page = descriptor(
            PageOptions::new("Another")
                .path("./another//nested/")
                .entry("another", "another.js"),
        )
        .unwrap();
        assert_eq!(page.output_path.as_str(), "another/nested");
        assert_eq!(page.document_path(), "another/nested/index.html");
    }

    #[test]
    fn output_path_cannot_escape_root() {
        let err = descriptor(PageOptions::new("Bad").path("../up").entry("a", "a.js")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOutputPath { .. }));

        let err = descriptor(PageOptions::new("Bad").path("/abs").entry("a", "a.js")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOutputPath { .. }));
    }

    #[test]
    fn entry_is_inherited_from_defaults() {
        let mut inherited = EntryMap::new();
        inherited.insert("main".into(), "src/main.js".into());
        let page = PageDescriptor::from_options(
            0,
            &PageOptions::new("Inherit"),
            PageDefaults {
                entry: Some(&inherited),
                template: Some(Path::new("templates/page.html")),
            },
        )
        .unwrap();
        assert_eq!(page.entry, inherited);
        assert_eq!(
            page.template,
            TemplateRef::Path(PathBuf::from("templates/page.html"))
        );
    }

    #[test]
    fn missing_entry_names_the_page() {
        let err = descriptor(PageOptions::new("Orphan")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "page 0 (\"Orphan\"): no entry declared and no global 'build.entry' to inherit"
        );
    }

    #[test]
    fn empty_entry_list_is_rejected() {
        let options = PageOptions::new("Empty").entry("app", Vec::<String>::new());
        assert!(matches!(
            descriptor(options).unwrap_err(),
            ConfigError::EmptyEntry { .. }
        ));
    }

    #[test]
    fn explicit_chunks_become_allow_list() {
        let page = descriptor(
            PageOptions::new("Demo")
                .entry("app", "main.js")
                .chunks(["vendor", "app"]),
        )
        .unwrap();
        assert_eq!(
            page.chunks,
            ChunkSelection::Only(vec!["vendor".into(), "app".into()])
        );
    }

    #[test]
    fn entry_source_deserializes_single_and_many() {
        let single: EntrySource = serde_json::from_str(r#""main.js""#).unwrap();
        assert_eq!(single.modules(), vec!["main.js"]);
        let many: EntrySource = serde_json::from_str(r#"["a.js", "b.js"]"#).unwrap();
        assert_eq!(many.modules(), vec!["a.js", "b.js"]);
    }

    #[test]
    fn equality_is_structural() {
        let a = descriptor(PageOptions::new("Demo").entry("app", "main.js")).unwrap();
        let b = descriptor(PageOptions::new("Demo").entry("app", "main.js")).unwrap();
        assert_eq!(a, b);
    }
}
