use super::kind::{NodeKind, SemanticCategory};
use super::language::Language;
use super::significance::SignificanceLevel;
use super::symbol::{Point, Range};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeMap;

/// Structural coordinates of a node, the input to identity hashing.
///
/// Two identities that compare equal always hash to the same digest; any
/// differing field changes the digest with overwhelming probability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct NodeIdentity {
    pub file_path: String,
    /// Normalized or raw type string.
    pub node_type: String,
    pub name: Option<String>,
    pub start: Point,
    pub end: Point,
    /// Disambiguates nodes that would otherwise share every coordinate,
    /// e.g. two unnamed parameters at identical positions.
    pub discriminator: Option<String>,
}

impl NodeIdentity {
    pub fn new(
        file_path: impl Into<String>,
        node_type: impl Into<String>,
        start: Point,
        end: Point,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            node_type: node_type.into(),
            name: None,
            start,
            end,
            discriminator: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }
}

/// A parser-produced node in its original per-language vocabulary.
///
/// The tree owns children top-down; parent and sibling context is rebuilt
/// per traversal and never stored on the node itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawNode {
    #[schemars(with = "String")]
    pub raw_type: SmolStr,
    #[schemars(with = "Option<String>")]
    pub name: Option<SmolStr>,
    /// Source slice, when the caller retained it. Used for content hashing
    /// and size heuristics only.
    pub text: Option<String>,
    pub language: Language,
    pub span: Range,
    /// Opaque per-parser property bag (modifiers, accessor kind, ...).
    pub properties: BTreeMap<String, String>,
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(raw_type: impl Into<SmolStr>, language: Language, span: Range) -> Self {
        Self {
            raw_type: raw_type.into(),
            name: None,
            text: None,
            language,
            span,
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = RawNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Modifier list from the property bag (`modifiers` key, comma-separated).
    pub fn modifiers(&self) -> Vec<String> {
        self.properties
            .get("modifiers")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the parser flagged attached documentation.
    pub fn has_docs(&self) -> bool {
        self.properties.contains_key("doc") || self.properties.contains_key("documentation")
    }

    /// Parser-supplied complexity number, when present and numeric.
    pub fn explicit_complexity(&self) -> Option<u32> {
        self.properties.get("complexity").and_then(|v| v.parse().ok())
    }

    /// Caller-supplied discriminator for identity hashing.
    pub fn discriminator(&self) -> Option<&str> {
        self.properties.get("discriminator").map(String::as_str)
    }

    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// Cyclomatic / cognitive / nesting triple computed during normalization.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Complexity {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub nesting: u32,
}

impl Complexity {
    pub fn new(cyclomatic: u32, cognitive: u32, nesting: u32) -> Self {
        Self {
            cyclomatic,
            cognitive,
            nesting,
        }
    }
}

/// Per-node metadata block of a normalized node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeMetadata {
    pub category: SemanticCategory,
    pub scope_depth: u32,
    pub scope_id: String,
    pub creates_scope: bool,
    pub significance: SignificanceLevel,
    pub complexity: Complexity,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// The unified, language-agnostic output record of the pipeline.
///
/// Children are owned by value; the caller owns the whole tree once
/// processing returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedNode {
    /// Hex-encoded digest from the identity generator.
    pub id: String,
    pub kind: NodeKind,
    #[schemars(with = "String")]
    pub normalized_type: SmolStr,
    /// Original raw type, retained unless disabled.
    #[schemars(with = "Option<String>")]
    pub raw_type: Option<SmolStr>,
    #[schemars(with = "Option<String>")]
    pub name: Option<SmolStr>,
    pub language: Language,
    pub file_path: String,
    pub span: Range,
    pub metadata: NodeMetadata,
    pub children: Vec<NormalizedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub schema_version: u32,
}

impl NormalizedNode {
    /// Total nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NormalizedNode::node_count).sum::<usize>()
    }

    /// Depth of the deepest leaf, counting self as 1.
    pub fn tree_depth(&self) -> u32 {
        1 + self
            .children
            .iter()
            .map(NormalizedNode::tree_depth)
            .max()
            .unwrap_or(0)
    }

    /// Pre-order visit of this subtree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a NormalizedNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
