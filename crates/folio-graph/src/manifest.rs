//! JSON graph manifests.
//!
//! An external bundler describes its module graph as a map from module id to the
//! ids it imports:
//!
//! ```json
//! { "modules": { "main.js": ["shared.js", "node_modules/react/index.js"] } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::memory::ModuleGraph;
use crate::module_id::ModuleId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphManifest {
    #[serde(default)]
    pub modules: BTreeMap<String, Vec<String>>,
}

impl GraphManifest {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| GraphError::Manifest {
            path: None,
            message: err.to_string(),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|err| GraphError::Manifest {
            path: Some(path.to_path_buf()),
            message: err.to_string(),
        })
    }

    /// Build an in-memory graph. Imported modules without their own entry become leaves.
    pub fn into_graph(self) -> Result<ModuleGraph> {
        let graph = ModuleGraph::new();
        for (module, imports) in self.modules {
            let from = ModuleId::new(&module)?;
            let targets = imports
                .iter()
                .map(ModuleId::new)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            graph.add_dependencies(from, targets);
        }
        tracing::debug!(modules = graph.len(), "loaded graph manifest");
        Ok(graph)
    }
}
