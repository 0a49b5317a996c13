//! The dependency graph provider interface.

use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::module_id::ModuleId;

/// Source of module reachability, usually backed by an external bundler's graph.
///
/// Implementations must be safe to share across threads: isolated pages are
/// planned in parallel against the same provider.
pub trait DependencyGraph: Send + Sync {
    /// Every module reachable from `entry`, including `entry` itself.
    fn reachable_modules(&self, entry: &ModuleId) -> Result<FxHashSet<ModuleId>>;
}
