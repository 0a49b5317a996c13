//! Chunks: the named output bundles of a plan.

use std::collections::BTreeSet;
use std::fmt;

use folio_config::{ChunkName, PageKey};
use folio_graph::ModuleId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Module loader and bootstrap code. Loaded first by every document.
    Runtime,
    /// Code reachable from two or more pages.
    Shared,
    /// Code owned by one page's entry point.
    Entry,
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChunkKind::Runtime => "runtime",
            ChunkKind::Shared => "shared",
            ChunkKind::Entry => "entry",
        })
    }
}

/// A named output bundle and the modules it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    pub name: ChunkName,
    pub kind: ChunkKind,
    /// Output file stem relative to the build root (`app`, `another/app`).
    /// The bundler appends the extension (`.js`, `.css`).
    pub path: String,
    pub modules: BTreeSet<ModuleId>,
}

impl ChunkDescriptor {
    pub fn new(name: impl Into<ChunkName>, kind: ChunkKind) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            kind,
            modules: BTreeSet::new(),
        }
    }

    pub fn runtime(name: impl Into<ChunkName>) -> Self {
        Self::new(name, ChunkKind::Runtime)
    }

    pub fn with_modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = ModuleId>,
    {
        self.modules.extend(modules);
        self
    }

    /// Place the chunk file under a page's output directory.
    ///
    /// Isolated plans scope every chunk this way, so two pages with an `app`
    /// entry (or their runtimes) never write to the same file.
    pub fn scoped_to(mut self, scope: &PageKey) -> Self {
        self.path = scope.join(&self.name);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn to_ref(&self) -> ChunkRef {
        ChunkRef {
            name: self.name.clone(),
            kind: self.kind,
            path: self.path.clone(),
        }
    }
}

/// A chunk as referenced from a page document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkRef {
    pub name: ChunkName,
    pub kind: ChunkKind,
    /// Output file stem relative to the build root
    pub path: String,
}
