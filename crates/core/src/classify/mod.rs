//! Multi-strategy node classification.
//!
//! Maps a raw per-language node to the normalized [`NodeKind`] taxonomy.
//! Resolution runs through five tiers in fixed order — context rules,
//! direct mappings, pattern rules, fuzzy rules, fallback — and each tier
//! is consulted only when the previous one yielded nothing. Classification
//! is total: every node gets a result, and internal faults degrade to the
//! language fallback rather than propagating.

pub mod cache;
pub mod context;
mod langs;
pub mod rules;
pub mod similarity;
mod stats;

pub use cache::{CacheConfig, CacheKey, ClassificationCache};
pub use context::{NodeContext, RuleContext, ScopeInfo, ScopeKind, SemanticFlags};
pub use rules::{
    CompoundRule, ContextRule, FuzzyRule, LanguageMapping, LanguageRegistry, PatternRule,
};
pub use stats::ClassifierStats;

use canopy_api::models::{
    ClassificationCandidate, ClassificationMethod, ClassificationResult, Language, NodeKind,
    RawNode,
};
use smol_str::SmolStr;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Confidence for exact raw-type lookups.
    pub direct_confidence: f32,
    /// Confidence for pattern matches with context available.
    pub pattern_confidence: f32,
    /// Confidence recorded for context-requiring patterns when no context
    /// was supplied; such matches become alternatives, never the result.
    pub pattern_no_context_confidence: f32,
    /// Confidence for compound (pattern-conjunction) matches.
    pub compound_confidence: f32,
    /// Fuzzy confidence is similarity times this weight.
    pub fuzzy_weight: f32,
    pub fallback_confidence: f32,
    /// Confidence after an internal rule-evaluation fault.
    pub fault_confidence: f32,
    /// Innermost ancestors kept when deriving rule context.
    pub max_ancestor_depth: usize,
    pub use_context_rules: bool,
    pub use_direct: bool,
    pub use_patterns: bool,
    pub use_fuzzy: bool,
    pub cache: CacheConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            direct_confidence: 0.9,
            pattern_confidence: 0.75,
            pattern_no_context_confidence: 0.6,
            compound_confidence: 0.8,
            fuzzy_weight: 0.8,
            fallback_confidence: 0.3,
            fault_confidence: 0.1,
            max_ancestor_depth: 8,
            use_context_rules: true,
            use_direct: true,
            use_patterns: true,
            use_fuzzy: true,
            cache: CacheConfig::default(),
        }
    }
}

pub struct Classifier {
    config: ClassifierConfig,
    registry: LanguageRegistry,
    cache: ClassificationCache,
    stats: stats::StatsRecorder,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_registry(config, LanguageRegistry::builtin())
    }

    pub fn with_registry(config: ClassifierConfig, registry: LanguageRegistry) -> Self {
        let cache = ClassificationCache::new(config.cache.clone());
        Self {
            config,
            registry,
            cache,
            stats: stats::StatsRecorder::default(),
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// The language mapping's default kind, used when the classification
    /// stage is disabled entirely.
    pub fn fallback_kind(&self, language: &Language) -> NodeKind {
        self.registry.mapping(language).fallback
    }

    /// Classify one raw node. Total: always returns a result with
    /// confidence in [0, 1] and a kind from the closed set.
    pub fn classify(&self, node: &RawNode, ctx: &NodeContext) -> ClassificationResult {
        let key = CacheKey {
            language: node.language.clone(),
            raw_type: node.raw_type.clone(),
            parent_type: SmolStr::new(ctx.parent_type()),
            sibling_count: ctx.sibling_count,
            name: node.name.clone(),
            props_fingerprint: fingerprint(node, ctx, self.config.max_ancestor_depth),
        };
        if let Some(hit) = self.cache.get(&key) {
            self.stats.record(&node.language, &hit);
            return hit;
        }

        let mapping = self.registry.mapping(&node.language);
        let result = self.resolve(node, ctx, &mapping);
        debug!(
            raw_type = %node.raw_type,
            language = %node.language,
            kind = result.kind.as_str(),
            method = result.method.as_str(),
            confidence = result.confidence,
            "classified node"
        );
        self.cache.insert(key, result.clone());
        self.stats.record(&node.language, &result);
        result
    }

    fn resolve(
        &self,
        node: &RawNode,
        ctx: &NodeContext,
        mapping: &LanguageMapping,
    ) -> ClassificationResult {
        let raw_type = node.raw_type.as_str();
        let rule_ctx = RuleContext::derive(node, ctx, self.config.max_ancestor_depth);
        let mut alternatives: Vec<ClassificationCandidate> = Vec::new();

        // Tier 1: context rules, by descending priority.
        if self.config.use_context_rules {
            for rule in &mapping.context_rules {
                match catch_unwind(AssertUnwindSafe(|| (rule.predicate)(&rule_ctx))) {
                    Ok(true) => {
                        return ClassificationResult {
                            kind: rule.kind,
                            confidence: rule.min_confidence.clamp(0.0, 1.0),
                            reason: format!("context rule '{}' matched '{raw_type}'", rule.name),
                            alternatives,
                            method: ClassificationMethod::Context,
                            rule: Some(rule.name.clone()),
                        };
                    }
                    Ok(false) => {}
                    Err(_) => {
                        error!(rule = %rule.name, raw_type, "context predicate panicked");
                        return self.fault_result(mapping, raw_type, &rule.name);
                    }
                }
            }
        }

        // Tier 2: exact raw-type lookup.
        if self.config.use_direct {
            if let Some(kind) = mapping.direct.get(raw_type) {
                return ClassificationResult {
                    kind: *kind,
                    confidence: self.config.direct_confidence,
                    reason: format!("exact mapping for '{raw_type}'"),
                    alternatives,
                    method: ClassificationMethod::Direct,
                    rule: None,
                };
            }
        }

        // Tier 3: pattern rules, then compound rules, by descending priority.
        if self.config.use_patterns {
            for rule in &mapping.patterns {
                if !rule.pattern.is_match(raw_type) {
                    continue;
                }
                if rule.requires_context && !ctx.has_semantic_context() {
                    alternatives.push(ClassificationCandidate {
                        kind: rule.kind,
                        confidence: self.config.pattern_no_context_confidence,
                        rule: Some(rule.name.clone()),
                    });
                    continue;
                }
                return ClassificationResult {
                    kind: rule.kind,
                    confidence: self.config.pattern_confidence,
                    reason: format!("pattern '{}' matched '{raw_type}'", rule.name),
                    alternatives,
                    method: ClassificationMethod::Pattern,
                    rule: Some(rule.name.clone()),
                };
            }
            for rule in &mapping.compound {
                if rule.matches(raw_type) {
                    return ClassificationResult {
                        kind: rule.kind,
                        confidence: self.config.compound_confidence,
                        reason: format!("compound rule '{}' matched '{raw_type}'", rule.name),
                        alternatives,
                        method: ClassificationMethod::Pattern,
                        rule: Some(rule.name.clone()),
                    };
                }
            }
        }

        // Tier 4: fuzzy similarity against known-similar type names.
        if self.config.use_fuzzy {
            let mut best: Option<(f32, &FuzzyRule, &str)> = None;
            for rule in &mapping.fuzzy {
                for known in &rule.known_types {
                    let score = similarity::char_overlap(raw_type, known);
                    if score >= rule.threshold
                        && best.is_none_or(|(prev, _, _)| score > prev)
                    {
                        best = Some((score, rule, known));
                    }
                }
            }
            if let Some((score, rule, known)) = best {
                return ClassificationResult {
                    kind: rule.kind,
                    confidence: (score * self.config.fuzzy_weight).clamp(0.0, 1.0),
                    reason: format!(
                        "fuzzy rule '{}': '{raw_type}' resembles '{known}' ({score:.2})",
                        rule.name
                    ),
                    alternatives,
                    method: ClassificationMethod::Fuzzy,
                    rule: Some(rule.name.clone()),
                };
            }
        }

        // Tier 5: language fallback.
        ClassificationResult {
            kind: mapping.fallback,
            confidence: self.config.fallback_confidence,
            reason: format!("no rule matched '{raw_type}'; language fallback"),
            alternatives,
            method: ClassificationMethod::Fallback,
            rule: None,
        }
    }

    fn fault_result(
        &self,
        mapping: &LanguageMapping,
        raw_type: &str,
        rule_name: &str,
    ) -> ClassificationResult {
        ClassificationResult {
            kind: mapping.fallback,
            confidence: self.config.fault_confidence,
            reason: format!("rule '{rule_name}' faulted while evaluating '{raw_type}'"),
            alternatives: Vec::new(),
            method: ClassificationMethod::Fallback,
            rule: None,
        }
    }

    pub fn stats(&self) -> ClassifierStats {
        self.stats
            .snapshot(self.cache.hits(), self.cache.misses(), self.cache.hit_ratio())
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
        self.cache.reset_counters();
    }

    /// Drop all memoized results. Stop-the-world relative to concurrent
    /// callers on this instance.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Shared handle used by the normalizer and pipeline.
pub type SharedClassifier = Arc<Classifier>;

/// Fingerprint of everything a context rule may consult beyond the plain
/// key fields: the property bag, immediate child types, and the bounded
/// ancestor type chain. Cache hits must not cross nodes that differ in any
/// of these. BTreeMap iteration is sorted, keeping the hash deterministic.
fn fingerprint(node: &RawNode, ctx: &NodeContext, max_ancestor_depth: usize) -> u64 {
    use std::hash::{Hash, Hasher};
    let skip = ctx.ancestors.len().saturating_sub(max_ancestor_depth);
    let ancestors = &ctx.ancestors[skip..];
    if node.properties.is_empty() && node.children.is_empty() && ancestors.len() <= 1 {
        return 0;
    }
    let mut hasher = std::hash::DefaultHasher::new();
    for (key, value) in &node.properties {
        key.hash(&mut hasher);
        value.hash(&mut hasher);
    }
    for child in &node.children {
        child.raw_type.hash(&mut hasher);
    }
    for ancestor in ancestors {
        ancestor.raw_type.hash(&mut hasher);
    }
    hasher.finish()
}
