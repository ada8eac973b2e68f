use canopy_api::models::{FileStats, NormalizedNode};
use std::time::Duration;

/// Aggregate per-file statistics from a normalized tree.
pub fn collect(root: &NormalizedNode, duration: Duration) -> FileStats {
    let mut stats = FileStats {
        max_depth: root.tree_depth(),
        duration_ms: duration.as_millis() as u64,
        ..FileStats::default()
    };
    root.walk(&mut |node| {
        stats.total_nodes += 1;
        *stats
            .nodes_by_kind
            .entry(node.kind.as_str().to_string())
            .or_default() += 1;
        *stats
            .nodes_by_level
            .entry(node.metadata.significance.label().to_string())
            .or_default() += 1;
    });
    stats
}
