//! In-memory ModuleGraph implementation.
//!
//! HashMap-based adjacency storage with forward and reverse edges.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{GraphError, Result};
use crate::graph::DependencyGraph;
use crate::module_id::ModuleId;

#[derive(Debug, Default)]
struct GraphInner {
    modules: FxHashSet<ModuleId>,
    dependencies: FxHashMap<ModuleId, FxHashSet<ModuleId>>,
    dependents: FxHashMap<ModuleId, FxHashSet<ModuleId>>,
}

/// Thread-safe in-memory dependency graph.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    inner: Arc<RwLock<GraphInner>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module without edges. Adding an existing module is a no-op.
    pub fn add_module(&self, id: ModuleId) {
        self.inner.write().modules.insert(id);
    }

    /// Add a dependency edge, creating forward and reverse mappings.
    ///
    /// Both endpoints are added as modules.
    pub fn add_dependency(&self, from: ModuleId, to: ModuleId) {
        let mut inner = self.inner.write();

        inner.modules.insert(from.clone());
        inner.modules.insert(to.clone());

        // HashSet prevents duplicate edges
        inner
            .dependencies
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        inner.dependents.entry(to).or_default().insert(from);
    }

    /// Add multiple dependencies from a single module.
    pub fn add_dependencies<I>(&self, from: ModuleId, targets: I)
    where
        I: IntoIterator<Item = ModuleId>,
    {
        self.add_module(from.clone());
        for target in targets {
            self.add_dependency(from.clone(), target);
        }
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.inner.read().modules.contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().modules.is_empty()
    }

    /// All modules, sorted.
    pub fn modules(&self) -> Vec<ModuleId> {
        let mut modules: Vec<_> = self.inner.read().modules.iter().cloned().collect();
        modules.sort();
        modules
    }

    /// Direct dependencies of `id`, sorted.
    pub fn dependencies(&self, id: &ModuleId) -> Vec<ModuleId> {
        sorted(self.inner.read().dependencies.get(id))
    }

    /// Direct importers of `id`, sorted.
    pub fn dependents(&self, id: &ModuleId) -> Vec<ModuleId> {
        sorted(self.inner.read().dependents.get(id))
    }
}

impl DependencyGraph for ModuleGraph {
    fn reachable_modules(&self, entry: &ModuleId) -> Result<FxHashSet<ModuleId>> {
        let inner = self.inner.read();

        if !inner.modules.contains(entry) {
            return Err(GraphError::UnknownEntry { id: entry.clone() });
        }

        let mut visited = FxHashSet::default();
        let mut stack = vec![entry];
        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(deps) = inner.dependencies.get(current) {
                stack.extend(deps.iter().filter(|dep| !visited.contains(*dep)));
            }
        }

        tracing::trace!(entry = %entry, reachable = visited.len(), "walked dependency graph");
        Ok(visited)
    }
}

fn sorted(set: Option<&FxHashSet<ModuleId>>) -> Vec<ModuleId> {
    let mut items: Vec<_> = set.into_iter().flatten().cloned().collect();
    items.sort();
    items
}
