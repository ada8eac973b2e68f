//! Derived classification context.
//!
//! Context rules never see mutable traversal state; they get an explicit
//! snapshot of the node, its bounded ancestor chain, a synthesized scope
//! descriptor, and a handful of semantic flags.

use canopy_api::models::RawNode;
use smol_str::SmolStr;

/// Caller-supplied surroundings of the node being classified. Built fresh
/// per traversal; the raw tree stores no parent links.
#[derive(Debug, Default)]
pub struct NodeContext<'a> {
    /// Ancestor chain, outermost first. Empty when the caller has none,
    /// which also means no semantic context is available.
    pub ancestors: Vec<&'a RawNode>,
    pub sibling_count: usize,
}

impl<'a> NodeContext<'a> {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(ancestors: Vec<&'a RawNode>, sibling_count: usize) -> Self {
        Self {
            ancestors,
            sibling_count,
        }
    }

    pub fn parent(&self) -> Option<&'a RawNode> {
        self.ancestors.last().copied()
    }

    pub fn parent_type(&self) -> &str {
        self.parent().map(|p| p.raw_type.as_str()).unwrap_or("none")
    }

    pub fn has_semantic_context(&self) -> bool {
        !self.ancestors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Class,
    Function,
    Block,
}

/// Synthesized lexical scope descriptor for the node under classification.
#[derive(Debug, Clone)]
pub struct ScopeInfo {
    pub kind: ScopeKind,
    pub name: Option<SmolStr>,
    pub depth: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticFlags {
    pub inside_class: bool,
    pub inside_function: bool,
    pub inside_control: bool,
    pub is_declaration: bool,
}

/// Everything a context predicate may inspect.
pub struct RuleContext<'a> {
    pub node: &'a RawNode,
    pub parent: Option<&'a RawNode>,
    /// Bounded ancestor chain, outermost first.
    pub ancestors: &'a [&'a RawNode],
    pub scope: ScopeInfo,
    pub flags: SemanticFlags,
    pub sibling_count: usize,
}

impl<'a> RuleContext<'a> {
    /// Derive the rule context from the caller-supplied surroundings,
    /// keeping at most `max_depth` innermost ancestors.
    pub fn derive(node: &'a RawNode, ctx: &'a NodeContext<'a>, max_depth: usize) -> Self {
        let skip = ctx.ancestors.len().saturating_sub(max_depth);
        let ancestors = &ctx.ancestors[skip..];
        Self {
            node,
            parent: ancestors.last().copied(),
            ancestors,
            scope: derive_scope(ancestors),
            flags: derive_flags(node, ancestors),
            sibling_count: ctx.sibling_count,
        }
    }

    pub fn parent_is(&self, raw_type: &str) -> bool {
        self.parent.is_some_and(|p| p.raw_type == raw_type)
    }

    pub fn any_ancestor(&self, predicate: impl Fn(&RawNode) -> bool) -> bool {
        self.ancestors.iter().any(|a| predicate(a))
    }
}

/// Control-flow-bearing raw types, checked on the leading `_`-separated
/// segment so `identifier` never matches `if`.
pub fn is_control_flow_type(raw_type: &str) -> bool {
    let head = raw_type.split('_').next().unwrap_or(raw_type);
    matches!(
        head,
        "if" | "while" | "for" | "switch" | "conditional" | "try" | "catch"
    )
}

fn is_class_like(raw_type: &str) -> bool {
    raw_type.contains("class")
        || raw_type.contains("struct")
        || raw_type.contains("interface")
        || raw_type.contains("impl")
        || raw_type.contains("trait")
}

fn is_function_like(raw_type: &str) -> bool {
    raw_type.contains("function")
        || raw_type.contains("method")
        || raw_type.contains("lambda")
        || raw_type.contains("closure")
        || raw_type == "arrow_function"
        || raw_type == "func_literal"
}

fn is_module_like(raw_type: &str) -> bool {
    matches!(
        raw_type,
        "program" | "source_file" | "module" | "mod_item" | "internal_module" | "namespace_declaration"
    )
}

fn is_block_like(raw_type: &str) -> bool {
    matches!(raw_type, "block" | "statement_block" | "compound_statement" | "body")
}

fn derive_scope(ancestors: &[&RawNode]) -> ScopeInfo {
    let depth = ancestors
        .iter()
        .filter(|a| {
            is_class_like(&a.raw_type)
                || is_function_like(&a.raw_type)
                || is_module_like(&a.raw_type)
                || is_block_like(&a.raw_type)
        })
        .count() as u32;

    // Innermost enclosing scope wins.
    for ancestor in ancestors.iter().rev() {
        let raw_type = ancestor.raw_type.as_str();
        let kind = if is_function_like(raw_type) {
            ScopeKind::Function
        } else if is_class_like(raw_type) {
            ScopeKind::Class
        } else if is_module_like(raw_type) {
            ScopeKind::Module
        } else if is_block_like(raw_type) {
            ScopeKind::Block
        } else {
            continue;
        };
        return ScopeInfo {
            kind,
            name: ancestor.name.clone(),
            depth,
        };
    }

    ScopeInfo {
        kind: ScopeKind::Global,
        name: None,
        depth,
    }
}

fn derive_flags(node: &RawNode, ancestors: &[&RawNode]) -> SemanticFlags {
    SemanticFlags {
        inside_class: ancestors.iter().any(|a| is_class_like(&a.raw_type)),
        inside_function: ancestors.iter().any(|a| is_function_like(&a.raw_type)),
        inside_control: ancestors.iter().any(|a| is_control_flow_type(&a.raw_type)),
        is_declaration: node.raw_type.ends_with("_declaration")
            || node.raw_type.ends_with("_definition")
            || node.raw_type.ends_with("_item")
            || node.raw_type.ends_with("declarator"),
    }
}
