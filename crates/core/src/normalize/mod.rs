//! Cross-language AST normalization.
//!
//! Walks a raw tree recursively, pruning ignored subtrees, assigning
//! stable scope identifiers, classifying and scoring each node, and
//! producing the uniform [`NormalizedNode`] shape. The walk is
//! depth-bounded to guard against pathological or cyclic input.

pub mod config;

pub use config::{ExtensionRule, NormalizationConfig, NormalizationRegistry};

use crate::classify::context::is_control_flow_type;
use crate::classify::{Classifier, NodeContext};
use crate::error::{CanopyError, Result};
use crate::identity::{IdentityGenerator, content_digest};
use crate::significance::{FileContext, ScoreInput, SignificanceScorer, base_level};
use canopy_api::models::{
    ClassificationResult, Complexity, Language, NodeIdentity, NodeKind, NodeMetadata,
    NormalizedNode, RawNode,
};
use canopy_api::SCHEMA_VERSION;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Recursion bound; exceeding it fails the file.
    pub max_depth: u32,
    /// Retain the original raw type on each output node.
    pub keep_raw_type: bool,
    /// Hash `RawNode::text` into `content_hash` when present.
    pub content_hashing: bool,
    /// Invoke the classifier per node; otherwise the language fallback
    /// kind is assigned.
    pub classify: bool,
    /// Invoke the significance scorer per node; otherwise the kind's base
    /// level is assigned.
    pub score: bool,
    /// Populate diagnostic attributes and run extension rules.
    pub finalize_metadata: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            keep_raw_type: true,
            content_hashing: false,
            classify: true,
            score: true,
            finalize_metadata: true,
        }
    }
}

pub struct Normalizer {
    identity: Arc<IdentityGenerator>,
    classifier: Arc<Classifier>,
    scorer: Arc<SignificanceScorer>,
    registry: NormalizationRegistry,
}

/// Immutable per-file state threaded through the walk.
struct WalkContext<'a> {
    config: &'a NormalizationConfig,
    file_path: &'a str,
    file: &'a FileContext,
    options: &'a NormalizeOptions,
}

impl Normalizer {
    pub fn new(
        identity: Arc<IdentityGenerator>,
        classifier: Arc<Classifier>,
        scorer: Arc<SignificanceScorer>,
        registry: NormalizationRegistry,
    ) -> Self {
        Self {
            identity,
            classifier,
            scorer,
            registry,
        }
    }

    pub fn registry_mut(&mut self) -> &mut NormalizationRegistry {
        &mut self.registry
    }

    /// Normalize one raw tree into the uniform output shape.
    pub fn normalize(
        &self,
        raw: &RawNode,
        language: &Language,
        file_path: &str,
        file: &FileContext,
        options: &NormalizeOptions,
    ) -> Result<NormalizedNode> {
        let config = self.registry.config(language);
        let root_scope = self.root_scope_id(file_path)?;
        let ctx = WalkContext {
            config: &config,
            file_path,
            file,
            options,
        };
        let mut ancestors = Vec::new();
        self.walk(raw, &ctx, &root_scope, 0, 0, &mut ancestors, 0)
    }

    /// Stable file-level scope id, derived like every other identity so
    /// scope ids survive reprocessing.
    fn root_scope_id(&self, file_path: &str) -> Result<String> {
        let identity = NodeIdentity::new(
            file_path,
            "scope",
            canopy_api::models::Point::new(1, 0),
            canopy_api::models::Point::new(1, 0),
        )
        .with_discriminator("scope:root");
        self.identity.generate(&identity)
    }

    fn scope_id_for(&self, raw: &RawNode, file_path: &str, parent_scope: &str) -> Result<String> {
        let mut identity = NodeIdentity::new(
            file_path,
            raw.raw_type.as_str(),
            raw.span.start,
            raw.span.end,
        )
        .with_discriminator(format!("scope:{parent_scope}"));
        if let Some(name) = &raw.name {
            identity = identity.with_name(name.as_str());
        }
        self.identity.generate(&identity)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk<'a>(
        &self,
        raw: &'a RawNode,
        ctx: &WalkContext<'_>,
        scope_id: &str,
        scope_depth: u32,
        depth: u32,
        ancestors: &mut Vec<&'a RawNode>,
        sibling_count: usize,
    ) -> Result<NormalizedNode> {
        if depth > ctx.options.max_depth {
            return Err(CanopyError::DepthExceeded {
                depth,
                max: ctx.options.max_depth,
            });
        }

        // Ignored subtrees are pruned, not traversed.
        if ctx.config.ignored.contains(raw.raw_type.as_str()) {
            return self.placeholder(raw, ctx, scope_id, scope_depth, depth, ancestors, sibling_count);
        }

        let creates_scope = ctx.config.scope_boundaries.contains(raw.raw_type.as_str());
        let (child_scope_id, child_scope_depth) = if creates_scope {
            (
                self.scope_id_for(raw, ctx.file_path, scope_id)?,
                scope_depth + 1,
            )
        } else {
            (scope_id.to_string(), scope_depth)
        };

        let normalized_type = ctx.config.normalized_type(&raw.raw_type);
        let category = ctx.config.category_of(&raw.raw_type);
        let complexity = local_complexity(&raw.raw_type, depth);

        let classification = if ctx.options.classify {
            let node_ctx = NodeContext::new(ancestors.clone(), sibling_count);
            Some(self.classifier.classify(raw, &node_ctx))
        } else {
            None
        };
        let kind = classification
            .as_ref()
            .map(|c| c.kind)
            .unwrap_or_else(|| self.classifier.fallback_kind(&raw.language));

        // Children are fully resolved values before this node is built.
        let child_count = raw.children.len();
        ancestors.push(raw);
        let mut children = Vec::with_capacity(child_count);
        for child in &raw.children {
            children.push(self.walk(
                child,
                ctx,
                &child_scope_id,
                child_scope_depth,
                depth + 1,
                ancestors,
                child_count,
            )?);
        }
        ancestors.pop();

        let significance = if ctx.options.score {
            let input = self.score_input(raw, kind, &children, scope_depth, ctx.file);
            self.scorer.score(&input)
        } else {
            base_level(kind)
        };

        let mut attributes = BTreeMap::new();
        if ctx.options.finalize_metadata {
            if let Some(result) = &classification {
                attributes.insert(
                    "classification.confidence".to_string(),
                    format!("{:.2}", result.confidence),
                );
                attributes.insert(
                    "classification.method".to_string(),
                    result.method.as_str().to_string(),
                );
            }
            if let Some(modifiers) = raw.properties.get("modifiers") {
                attributes.insert("modifiers".to_string(), modifiers.clone());
            }
            for extension in &ctx.config.extensions {
                if extension.raw_type == raw.raw_type {
                    (extension.apply)(raw, &mut attributes);
                }
            }
        }

        // Identity comes last, once position and scope are fixed.
        let id = self.node_id(raw, &normalized_type, ctx.file_path)?;
        let content_hash = if ctx.options.content_hashing {
            raw.text.as_deref().map(content_digest)
        } else {
            None
        };

        trace!(
            raw_type = %raw.raw_type,
            kind = kind.as_str(),
            depth,
            scope_depth,
            "normalized node"
        );

        Ok(NormalizedNode {
            id,
            kind,
            normalized_type,
            raw_type: ctx.options.keep_raw_type.then(|| raw.raw_type.clone()),
            name: raw.name.clone(),
            language: raw.language.clone(),
            file_path: ctx.file_path.to_string(),
            span: raw.span,
            metadata: NodeMetadata {
                category,
                scope_depth,
                scope_id: scope_id.to_string(),
                creates_scope,
                significance,
                complexity,
                attributes,
            },
            children,
            content_hash,
            schema_version: SCHEMA_VERSION,
        })
    }

    /// Minimal leaf emitted for ignored raw types: no children, zero
    /// complexity, empty attributes, regardless of the raw subtree.
    #[allow(clippy::too_many_arguments)]
    fn placeholder<'a>(
        &self,
        raw: &'a RawNode,
        ctx: &WalkContext<'_>,
        scope_id: &str,
        scope_depth: u32,
        depth: u32,
        ancestors: &mut Vec<&'a RawNode>,
        sibling_count: usize,
    ) -> Result<NormalizedNode> {
        let normalized_type = ctx.config.normalized_type(&raw.raw_type);
        let classification: Option<ClassificationResult> = if ctx.options.classify {
            let node_ctx = NodeContext::new(ancestors.clone(), sibling_count);
            Some(self.classifier.classify(raw, &node_ctx))
        } else {
            None
        };
        let kind = classification
            .map(|c| c.kind)
            .unwrap_or_else(|| self.classifier.fallback_kind(&raw.language));
        let significance = if ctx.options.score {
            let mut input = ScoreInput::new(kind).in_file(ctx.file);
            input.name = raw.name.as_deref();
            input.scope_depth = scope_depth;
            input.line_span = raw.span.line_span();
            self.scorer.score(&input)
        } else {
            base_level(kind)
        };
        let id = self.node_id(raw, &normalized_type, ctx.file_path)?;

        Ok(NormalizedNode {
            id,
            kind,
            normalized_type,
            raw_type: ctx.options.keep_raw_type.then(|| raw.raw_type.clone()),
            name: raw.name.clone(),
            language: raw.language.clone(),
            file_path: ctx.file_path.to_string(),
            span: raw.span,
            metadata: NodeMetadata {
                category: ctx.config.category_of(&raw.raw_type),
                scope_depth,
                scope_id: scope_id.to_string(),
                creates_scope: false,
                significance,
                complexity: Complexity::new(0, 0, depth),
                attributes: BTreeMap::new(),
            },
            children: Vec::new(),
            content_hash: None,
            schema_version: SCHEMA_VERSION,
        })
    }

    fn node_id(
        &self,
        raw: &RawNode,
        normalized_type: &smol_str::SmolStr,
        file_path: &str,
    ) -> Result<String> {
        let mut identity = NodeIdentity::new(
            file_path,
            normalized_type.as_str(),
            raw.span.start,
            raw.span.end,
        );
        if let Some(name) = &raw.name {
            identity = identity.with_name(name.as_str());
        }
        if let Some(discriminator) = raw.discriminator() {
            identity = identity.with_discriminator(discriminator);
        }
        self.identity.generate(&identity)
    }

    fn score_input<'a>(
        &self,
        raw: &'a RawNode,
        kind: NodeKind,
        children: &[NormalizedNode],
        scope_depth: u32,
        file: &FileContext,
    ) -> ScoreInput<'a> {
        let member_count = children
            .iter()
            .filter(|c| {
                matches!(
                    c.kind,
                    NodeKind::Method
                        | NodeKind::Constructor
                        | NodeKind::Getter
                        | NodeKind::Setter
                        | NodeKind::Field
                        | NodeKind::Property
                )
            })
            .count();
        let parameter_count = children.iter().filter(|c| c.kind == NodeKind::Parameter).count();
        let modifiers = raw.modifiers();
        let exported_by_modifier = modifiers
            .iter()
            .any(|m| matches!(m.as_str(), "export" | "pub" | "public"));

        let mut input = ScoreInput::new(kind).in_file(file);
        input.name = raw.name.as_deref();
        input.child_count = raw.children.len();
        input.explicit_complexity = raw.explicit_complexity();
        input.line_span = raw.span.line_span();
        input.parameter_count = parameter_count;
        input.member_count = member_count;
        input.source_len = raw.text.as_ref().map(String::len);
        input.scope_depth = scope_depth;
        input.modifier_count = modifiers.len();
        input.has_docs = raw.has_docs();
        input.is_exported = input.is_exported || exported_by_modifier || file.exports(raw.name.as_deref());
        input
    }
}

/// Local complexity: control-flow-bearing raw types contribute cyclomatic
/// +1 and cognitive +1 plus nesting depth; everything else is zero.
/// Nesting always equals the current traversal depth.
fn local_complexity(raw_type: &str, depth: u32) -> Complexity {
    if is_control_flow_type(raw_type) {
        Complexity::new(1, 1 + depth, depth)
    } else {
        Complexity::new(0, 0, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierConfig;
    use crate::significance::ScorerConfig;
    use canopy_api::models::{Range, SemanticCategory};

    fn normalizer() -> Normalizer {
        Normalizer::new(
            Arc::new(IdentityGenerator::default()),
            Arc::new(Classifier::new(ClassifierConfig::default())),
            Arc::new(SignificanceScorer::new(ScorerConfig::default())),
            NormalizationRegistry::builtin(),
        )
    }

    fn ts(raw_type: &str, span: Range) -> RawNode {
        RawNode::new(raw_type, Language::TYPESCRIPT, span)
    }

    fn file_ctx() -> FileContext {
        FileContext::for_path("/src/widget.ts")
    }

    #[test]
    fn normalizes_a_small_tree() {
        let raw = ts("program", Range::of(1, 0, 10, 0)).with_child(
            ts("class_declaration", Range::of(1, 0, 9, 1))
                .with_name("Widget")
                .with_child(
                    ts("method_definition", Range::of(2, 2, 4, 3)).with_name("render"),
                ),
        );
        let out = normalizer()
            .normalize(
                &raw,
                &Language::TYPESCRIPT,
                "/src/widget.ts",
                &file_ctx(),
                &NormalizeOptions::default(),
            )
            .unwrap();

        assert_eq!(out.kind, NodeKind::File);
        assert_eq!(out.children.len(), 1);
        let class = &out.children[0];
        assert_eq!(class.kind, NodeKind::Class);
        assert_eq!(class.name.as_deref(), Some("Widget"));
        assert_eq!(class.metadata.category, SemanticCategory::Declaration);
        assert!(class.metadata.creates_scope);
        // program opened the root-child scope.
        assert_eq!(class.metadata.scope_depth, 1);
        let method = &class.children[0];
        assert_eq!(method.kind, NodeKind::Method);
        assert_eq!(method.metadata.scope_depth, 2);
        assert_ne!(class.metadata.scope_id, method.metadata.scope_id);
        assert_eq!(out.schema_version, canopy_api::SCHEMA_VERSION);
    }

    #[test]
    fn ignored_types_become_placeholders() {
        let raw = ts("ERROR", Range::of(1, 0, 5, 0))
            .with_child(ts("identifier", Range::of(1, 0, 1, 5)))
            .with_child(ts("identifier", Range::of(2, 0, 2, 5)))
            .with_child(ts("identifier", Range::of(3, 0, 3, 5)));
        let out = normalizer()
            .normalize(
                &raw,
                &Language::TYPESCRIPT,
                "/src/widget.ts",
                &file_ctx(),
                &NormalizeOptions::default(),
            )
            .unwrap();
        assert!(out.children.is_empty());
        assert_eq!(out.metadata.complexity, Complexity::new(0, 0, 0));
        assert!(out.metadata.attributes.is_empty());
    }

    #[test]
    fn depth_guard_fails_pathological_trees() {
        let mut raw = ts("identifier", Range::of(1, 0, 1, 1));
        for _ in 0..20 {
            raw = ts("call_expression", Range::of(1, 0, 1, 1)).with_child(raw);
        }
        let options = NormalizeOptions {
            max_depth: 10,
            ..NormalizeOptions::default()
        };
        let err = normalizer()
            .normalize(&raw, &Language::TYPESCRIPT, "/src/widget.ts", &file_ctx(), &options)
            .unwrap_err();
        match err {
            CanopyError::DepthExceeded { depth, max } => {
                assert_eq!(max, 10);
                assert!(depth > max);
            }
            other => panic!("expected depth error, got {other:?}"),
        }
    }

    #[test]
    fn control_flow_contributes_complexity() {
        let raw = ts("program", Range::of(1, 0, 10, 0)).with_child(
            ts("function_declaration", Range::of(1, 0, 8, 1))
                .with_name("run")
                .with_child(ts("if_statement", Range::of(2, 2, 4, 3))),
        );
        let out = normalizer()
            .normalize(
                &raw,
                &Language::TYPESCRIPT,
                "/src/widget.ts",
                &file_ctx(),
                &NormalizeOptions::default(),
            )
            .unwrap();
        let branch = &out.children[0].children[0];
        assert_eq!(branch.metadata.complexity.cyclomatic, 1);
        // +1 plus nesting depth of 2.
        assert_eq!(branch.metadata.complexity.cognitive, 3);
        assert_eq!(branch.metadata.complexity.nesting, 2);
    }

    #[test]
    fn scope_ids_are_stable_across_runs() {
        let raw = ts("program", Range::of(1, 0, 5, 0))
            .with_child(ts("function_declaration", Range::of(1, 0, 4, 1)).with_name("f"));
        let a = normalizer()
            .normalize(
                &raw,
                &Language::TYPESCRIPT,
                "/src/widget.ts",
                &file_ctx(),
                &NormalizeOptions::default(),
            )
            .unwrap();
        let b = normalizer()
            .normalize(
                &raw,
                &Language::TYPESCRIPT,
                "/src/widget.ts",
                &file_ctx(),
                &NormalizeOptions::default(),
            )
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_language_uses_default_config() {
        let lang = Language::new("cobol");
        let raw = RawNode::new("paragraph", lang.clone(), Range::of(1, 0, 3, 0))
            .with_child(RawNode::new("comment", lang.clone(), Range::of(2, 0, 2, 10)));
        let out = normalizer()
            .normalize(&raw, &lang, "/src/legacy.cob", &file_ctx(), &NormalizeOptions::default())
            .unwrap();
        assert_eq!(out.kind, NodeKind::Variable);
        // comment is ignorable in the default config.
        assert!(out.children[0].children.is_empty());
        assert_eq!(out.children[0].metadata.complexity.cyclomatic, 0);
    }

    #[test]
    fn content_hash_only_when_requested() {
        let raw = ts("program", Range::of(1, 0, 1, 20)).with_text("const x = 1;");
        let plain = normalizer()
            .normalize(
                &raw,
                &Language::TYPESCRIPT,
                "/src/widget.ts",
                &file_ctx(),
                &NormalizeOptions::default(),
            )
            .unwrap();
        assert!(plain.content_hash.is_none());

        let options = NormalizeOptions {
            content_hashing: true,
            ..NormalizeOptions::default()
        };
        let hashed = normalizer()
            .normalize(&raw, &Language::TYPESCRIPT, "/src/widget.ts", &file_ctx(), &options)
            .unwrap();
        let hash = hashed.content_hash.unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, content_digest("const x = 1;"));
    }

    #[test]
    fn extension_rules_augment_attributes() {
        let raw = ts("program", Range::of(1, 0, 5, 0)).with_child(
            ts("method_definition", Range::of(1, 0, 3, 1))
                .with_name("value")
                .with_property("accessor", "get"),
        );
        let out = normalizer()
            .normalize(
                &raw,
                &Language::TYPESCRIPT,
                "/src/widget.ts",
                &file_ctx(),
                &NormalizeOptions::default(),
            )
            .unwrap();
        let method = &out.children[0];
        assert_eq!(method.metadata.attributes.get("accessor").map(String::as_str), Some("get"));
        assert_eq!(method.kind, NodeKind::Getter);
    }
}
