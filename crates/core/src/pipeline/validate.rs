//! Output-tree validation.
//!
//! Fail-closed: every violation across the whole tree is collected and the
//! file is rejected as a unit, with enough position detail to locate each
//! offending construct without re-running under verbose tracing.

use canopy_api::SCHEMA_VERSION;
use canopy_api::models::NormalizedNode;

/// Walk the tree and collect every invariant violation.
pub fn validate_tree(root: &NormalizedNode) -> Vec<String> {
    let mut violations = Vec::new();
    validate_node(root, None, &mut violations);
    violations
}

fn describe(node: &NormalizedNode) -> String {
    format!(
        "{} '{}' at {}:{}",
        node.normalized_type,
        node.name.as_deref().unwrap_or("<unnamed>"),
        node.span.start.line,
        node.span.start.column
    )
}

fn validate_node(
    node: &NormalizedNode,
    parent: Option<&NormalizedNode>,
    violations: &mut Vec<String>,
) {
    let at = describe(node);

    if node.id.len() != 64 || !node.id.chars().all(|c| c.is_ascii_hexdigit()) {
        violations.push(format!("{at}: malformed id '{}'", node.id));
    }
    if node.normalized_type.is_empty() {
        violations.push(format!("{at}: empty normalized type"));
    }
    if node.file_path.trim().is_empty() {
        violations.push(format!("{at}: empty file path"));
    }
    if !node.span.start.is_valid() || !node.span.end.is_valid() {
        violations.push(format!("{at}: line numbers must be >= 1"));
    }
    if !node.span.is_well_ordered() {
        violations.push(format!("{at}: span start comes after end"));
    }
    if node.metadata.scope_id.is_empty() {
        violations.push(format!("{at}: missing scope id"));
    }
    if node.schema_version != SCHEMA_VERSION {
        violations.push(format!(
            "{at}: schema version {} does not match {}",
            node.schema_version, SCHEMA_VERSION
        ));
    }
    if let Some(parent) = parent {
        if node.file_path != parent.file_path {
            violations.push(format!("{at}: child file path differs from parent"));
        }
        if node.language != parent.language {
            violations.push(format!("{at}: child language differs from parent"));
        }
    }

    for child in &node.children {
        validate_node(child, Some(node), violations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_api::models::{
        Complexity, Language, NodeKind, NodeMetadata, Range, SemanticCategory, SignificanceLevel,
    };
    use smol_str::SmolStr;
    use std::collections::BTreeMap;

    fn valid_node() -> NormalizedNode {
        NormalizedNode {
            id: "a".repeat(64),
            kind: NodeKind::Function,
            normalized_type: SmolStr::new("function_declaration"),
            raw_type: None,
            name: Some(SmolStr::new("f")),
            language: Language::TYPESCRIPT,
            file_path: "/src/a.ts".to_string(),
            span: Range::of(1, 0, 3, 1),
            metadata: NodeMetadata {
                category: SemanticCategory::Declaration,
                scope_depth: 0,
                scope_id: "b".repeat(64),
                creates_scope: true,
                significance: SignificanceLevel::High,
                complexity: Complexity::default(),
                attributes: BTreeMap::new(),
            },
            children: Vec::new(),
            content_hash: None,
            schema_version: SCHEMA_VERSION,
        }
    }

    #[test]
    fn valid_tree_passes() {
        assert!(validate_tree(&valid_node()).is_empty());
    }

    #[test]
    fn collects_all_violations_not_just_first() {
        let mut node = valid_node();
        node.id = "short".to_string();
        node.file_path = " ".to_string();
        node.span = Range::of(5, 0, 2, 0);
        let violations = validate_tree(&node);
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn flags_child_file_mismatch() {
        let mut child = valid_node();
        child.file_path = "/src/other.ts".to_string();
        let mut root = valid_node();
        root.children.push(child);
        let violations = validate_tree(&root);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("differs from parent"));
    }

    #[test]
    fn flags_schema_version_drift() {
        let mut node = valid_node();
        node.schema_version = SCHEMA_VERSION + 1;
        assert_eq!(validate_tree(&node).len(), 1);
    }
}
