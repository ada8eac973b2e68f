use super::node::NormalizedNode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-file aggregate statistics emitted alongside the normalized tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FileStats {
    pub total_nodes: usize,
    pub max_depth: u32,
    /// Node counts keyed by kind label.
    pub nodes_by_kind: BTreeMap<String, usize>,
    /// Node counts keyed by significance label.
    pub nodes_by_level: BTreeMap<String, usize>,
    pub duration_ms: u64,
}

/// The pipeline's per-file output: the normalized tree plus its aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessedFile {
    pub root: NormalizedNode,
    pub stats: FileStats,
}
