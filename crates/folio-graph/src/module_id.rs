use std::borrow::Borrow;
use std::fmt;
use std::path::Path;

use path_clean::PathClean;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const VIRTUAL_PREFIX: &str = "virtual:";

/// Identifier for a module in a page's dependency graph.
///
/// Identifiers are lexically cleaned (`./src/../src/a.js` becomes `src/a.js`) and use
/// `/` separators on every platform, so the same module reached through different
/// spellings compares equal. Nothing is resolved against the filesystem: the ids come
/// from an external bundler and may not exist on disk. Virtual modules
/// (`virtual:...`) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleIdError {
    #[error("module id cannot be empty")]
    EmptyPath,
}

impl ModuleId {
    pub fn new(path: impl AsRef<str>) -> Result<Self, ModuleIdError> {
        let raw = path.as_ref().trim();

        if raw.is_empty() {
            return Err(ModuleIdError::EmptyPath);
        }

        if raw.starts_with(VIRTUAL_PREFIX) {
            return Ok(Self(raw.to_string()));
        }

        let unified = raw.replace('\\', "/");
        let cleaned = Path::new(&unified).clean();
        let text = cleaned.to_string_lossy().replace('\\', "/");

        if text.is_empty() || text == "." {
            return Err(ModuleIdError::EmptyPath);
        }

        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if one of the path segments equals `segment`
    /// (`node_modules/react/index.js` has segment `node_modules`).
    pub fn has_segment(&self, segment: &str) -> bool {
        !segment.is_empty() && self.0.split('/').any(|part| part == segment)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ModuleId {
    type Error = ModuleIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ModuleId::new(value)
    }
}

impl Serialize for ModuleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        ModuleId::new(value).map_err(serde::de::Error::custom)
    }
}
