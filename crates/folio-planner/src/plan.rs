//! Build plans handed to the external bundler.
//!
//! Isolated mode produces one [`IsolatedPlan`] per page. Shared mode produces a
//! single [`UnifiedPlan`] covering every page. Either way the plans are wrapped
//! in a [`PlanSet`].

use std::collections::BTreeMap;

use folio_config::{
    BuildMode, BuildOptions, ChunkName, ChunkSelection, Environment, PageDescriptor, PageKey,
};
use folio_graph::ModuleId;
use indexmap::IndexMap;
use serde::Serialize;

use crate::chunk::{ChunkDescriptor, ChunkKind};

const MANIFEST_FILE: &str = "manifest.json";

/// Where a plan's chunk manifest is written, relative to the build root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestScope {
    /// Directory the manifest belongs to
    pub scope: PageKey,
    pub path: String,
}

impl ManifestScope {
    pub fn for_key(scope: &PageKey) -> Self {
        Self {
            scope: scope.clone(),
            path: scope.join(MANIFEST_FILE),
        }
    }

    /// The single manifest of a shared build.
    pub fn root() -> Self {
        Self {
            scope: PageKey::default(),
            path: MANIFEST_FILE.to_string(),
        }
    }
}

/// Self-contained plan for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsolatedPlan {
    pub page: PageDescriptor,
    /// Global, environment and page options merged
    pub options: BuildOptions,
    pub entries: IndexMap<ChunkName, Vec<ModuleId>>,
    /// Runtime chunk first, then the entry chunks in declaration order
    pub chunks: Vec<ChunkDescriptor>,
    pub selection: ChunkSelection,
    pub manifest: ManifestScope,
}

/// A page document within a unified plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDocument {
    pub page: PageDescriptor,
    /// Chunk allow-list, in document order
    pub chunks: Vec<ChunkName>,
}

/// One plan for every page, with shared chunks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedPlan {
    pub options: BuildOptions,
    /// Entry chunks of every page, page order then declaration order
    pub entries: IndexMap<ChunkName, Vec<ModuleId>>,
    /// One runtime chunk, then shared chunks in rule order, then entry chunks
    pub chunks: Vec<ChunkDescriptor>,
    pub documents: Vec<PageDocument>,
    pub manifest: ManifestScope,
}

impl UnifiedPlan {
    pub fn chunk(&self, name: &str) -> Option<&ChunkDescriptor> {
        self.chunks.iter().find(|chunk| chunk.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BuildPlan {
    Isolated(IsolatedPlan),
    Unified(UnifiedPlan),
}

impl BuildPlan {
    pub fn chunks(&self) -> &[ChunkDescriptor] {
        match self {
            BuildPlan::Isolated(plan) => &plan.chunks,
            BuildPlan::Unified(plan) => &plan.chunks,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        match self {
            BuildPlan::Isolated(plan) => &plan.options,
            BuildPlan::Unified(plan) => &plan.options,
        }
    }
}

/// Every plan of one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSet {
    pub mode: BuildMode,
    pub environment: Environment,
    pub plans: Vec<BuildPlan>,
}

impl PlanSet {
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildPlan> {
        self.plans.iter()
    }

    /// Manifest path of every page, keyed by the page's output path.
    ///
    /// Isolated pages each get their own manifest; in shared mode every page
    /// maps to the single root manifest.
    pub fn manifests(&self) -> BTreeMap<PageKey, ManifestScope> {
        let mut manifests = BTreeMap::new();
        for plan in &self.plans {
            match plan {
                BuildPlan::Isolated(plan) => {
                    manifests.insert(plan.page.output_path.clone(), plan.manifest.clone());
                }
                BuildPlan::Unified(plan) => {
                    for document in &plan.documents {
                        manifests.insert(document.page.output_path.clone(), plan.manifest.clone());
                    }
                }
            }
        }
        manifests
    }

    /// Number of runtime chunks across all plans.
    pub fn runtime_chunk_count(&self) -> usize {
        self.plans
            .iter()
            .flat_map(BuildPlan::chunks)
            .filter(|chunk| chunk.kind == ChunkKind::Runtime)
            .count()
    }
}

impl<'a> IntoIterator for &'a PlanSet {
    type Item = &'a BuildPlan;
    type IntoIter = std::slice::Iter<'a, BuildPlan>;

    fn into_iter(self) -> Self::IntoIter {
        self.plans.iter()
    }
}
