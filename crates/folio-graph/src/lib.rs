//! # folio-graph
//!
//! Module identifiers and the dependency graph provider used by the planner.
//!
//! The planner never parses modules itself. It asks a [`DependencyGraph`] which
//! modules are reachable from each page's entry points. [`ModuleGraph`] is an
//! in-memory implementation that can be filled programmatically or loaded from
//! a JSON [`GraphManifest`] produced by an external bundler.
//!
//! ```rust
//! use folio_graph::{DependencyGraph, ModuleGraph, ModuleId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ModuleGraph::new();
//! let main = ModuleId::new("src/main.js")?;
//! let shared = ModuleId::new("src/shared.js")?;
//! graph.add_dependency(main.clone(), shared.clone());
//!
//! let reachable = graph.reachable_modules(&main)?;
//! assert!(reachable.contains(&shared));
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! `ModuleGraph` keeps its adjacency maps behind an `Arc<RwLock<..>>`, so clones are
//! cheap handles onto the same graph and concurrent readers never block each other.

mod error;
mod graph;
mod manifest;
mod memory;
mod module_id;


pub use error::{GraphError, Result};
pub use graph::DependencyGraph;
pub use manifest::GraphManifest;
pub use memory::ModuleGraph;
pub use module_id::{ModuleId, ModuleIdError};
