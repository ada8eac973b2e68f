//! Per-language classification rule tables.
//!
//! Each supported language carries one [`LanguageMapping`]: an exact table,
//! ordered pattern rules, ordered context rules, and optional fuzzy and
//! compound rules, plus a mandatory fallback kind. Unknown languages
//! resolve to an empty mapping whose fallback is `Variable`.

use super::context::RuleContext;
use canopy_api::models::{Language, NodeKind};
use regex::Regex;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::sync::Arc;

/// Reference default for a context rule's minimum confidence.
pub const DEFAULT_CONTEXT_CONFIDENCE: f32 = 0.95;

/// Regex-style match against the raw type string.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    pub pattern: Regex,
    pub kind: NodeKind,
    pub priority: i32,
    /// Only fire when semantic context was computed; otherwise the match is
    /// recorded as a lower-confidence alternative.
    pub requires_context: bool,
}

impl PatternRule {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        kind: NodeKind,
        priority: i32,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            kind,
            priority,
            requires_context: false,
        })
    }

    /// Compile case-insensitively.
    pub fn new_insensitive(
        name: impl Into<String>,
        pattern: &str,
        kind: NodeKind,
        priority: i32,
    ) -> Result<Self, regex::Error> {
        Self::new(name, &format!("(?i){pattern}"), kind, priority)
    }

    pub fn requires_context(mut self) -> Self {
        self.requires_context = true;
        self
    }
}

/// Predicate over the derived rule context. First true predicate wins, by
/// descending priority, with confidence equal to `min_confidence`.
pub struct ContextRule {
    pub name: String,
    pub kind: NodeKind,
    pub priority: i32,
    pub min_confidence: f32,
    pub predicate: fn(&RuleContext) -> bool,
}

impl ContextRule {
    pub fn new(
        name: impl Into<String>,
        kind: NodeKind,
        priority: i32,
        predicate: fn(&RuleContext) -> bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            priority,
            min_confidence: DEFAULT_CONTEXT_CONFIDENCE,
            predicate,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

impl std::fmt::Debug for ContextRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("min_confidence", &self.min_confidence)
            .finish()
    }
}

/// Similarity match over a list of known-similar raw type strings.
#[derive(Debug, Clone)]
pub struct FuzzyRule {
    pub name: String,
    pub kind: NodeKind,
    /// Minimum similarity in (0, 1].
    pub threshold: f32,
    pub known_types: Vec<String>,
}

impl FuzzyRule {
    pub fn new(
        name: impl Into<String>,
        kind: NodeKind,
        threshold: f32,
        known_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            threshold,
            known_types: known_types.into_iter().map(Into::into).collect(),
        }
    }
}

/// Conjunction of patterns that must all match the raw type.
#[derive(Debug, Clone)]
pub struct CompoundRule {
    pub name: String,
    pub kind: NodeKind,
    pub priority: i32,
    pub patterns: Vec<Regex>,
}

impl CompoundRule {
    pub fn new(
        name: impl Into<String>,
        kind: NodeKind,
        priority: i32,
        patterns: &[&str],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            kind,
            priority,
            patterns: patterns.iter().map(|p| Regex::new(p)).collect::<Result<_, _>>()?,
        })
    }

    pub fn matches(&self, raw_type: &str) -> bool {
        self.patterns.iter().all(|p| p.is_match(raw_type))
    }
}

/// The complete rule set for one language.
#[derive(Debug)]
pub struct LanguageMapping {
    pub language: Language,
    pub direct: HashMap<SmolStr, NodeKind>,
    pub patterns: Vec<PatternRule>,
    pub context_rules: Vec<ContextRule>,
    pub fuzzy: Vec<FuzzyRule>,
    pub compound: Vec<CompoundRule>,
    pub fallback: NodeKind,
}

impl LanguageMapping {
    pub fn new(language: Language, fallback: NodeKind) -> Self {
        Self {
            language,
            direct: HashMap::new(),
            patterns: Vec::new(),
            context_rules: Vec::new(),
            fuzzy: Vec::new(),
            compound: Vec::new(),
            fallback,
        }
    }

    /// Empty mapping with the universal `Variable` fallback.
    pub fn empty(language: Language) -> Self {
        Self::new(language, NodeKind::Variable)
    }

    pub fn direct(mut self, raw_type: &str, kind: NodeKind) -> Self {
        self.direct.insert(SmolStr::new(raw_type), kind);
        self
    }

    pub fn pattern(mut self, rule: PatternRule) -> Self {
        self.patterns.push(rule);
        self
    }

    pub fn context_rule(mut self, rule: ContextRule) -> Self {
        self.context_rules.push(rule);
        self
    }

    pub fn fuzzy(mut self, rule: FuzzyRule) -> Self {
        self.fuzzy.push(rule);
        self
    }

    pub fn compound(mut self, rule: CompoundRule) -> Self {
        self.compound.push(rule);
        self
    }

    /// Order rules by descending priority. Call once after building.
    pub fn finalize(mut self) -> Self {
        self.patterns.sort_by(|a, b| b.priority.cmp(&a.priority));
        self.context_rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        self.compound.sort_by(|a, b| b.priority.cmp(&a.priority));
        self
    }
}

/// Lookup table from language tag to rule set.
///
/// Built-in mappings cover the shipped languages; callers may register
/// additional languages at startup. Lookups for anything unregistered fall
/// back to the shared empty mapping.
pub struct LanguageRegistry {
    mappings: HashMap<Language, Arc<LanguageMapping>>,
    unknown: Arc<LanguageMapping>,
}

impl LanguageRegistry {
    /// Registry with the built-in language tables.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for mapping in super::langs::builtin_mappings() {
            registry.mappings.insert(mapping.language.clone(), mapping);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            mappings: HashMap::new(),
            unknown: Arc::new(LanguageMapping::empty(Language::UNKNOWN)),
        }
    }

    /// Register or replace a language's rule set.
    pub fn register(&mut self, mapping: LanguageMapping) {
        self.mappings
            .insert(mapping.language.clone(), Arc::new(mapping.finalize()));
    }

    pub fn mapping(&self, language: &Language) -> Arc<LanguageMapping> {
        self.mappings
            .get(language)
            .cloned()
            .unwrap_or_else(|| self.unknown.clone())
    }

    pub fn languages(&self) -> Vec<Language> {
        self.mappings.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_orders_by_priority() {
        let mapping = LanguageMapping::empty(Language::new("toy"))
            .pattern(PatternRule::new("low", "a", NodeKind::Variable, 10).unwrap())
            .pattern(PatternRule::new("high", "b", NodeKind::Class, 90).unwrap())
            .finalize();
        assert_eq!(mapping.patterns[0].name, "high");
    }

    #[test]
    fn unknown_language_gets_variable_fallback() {
        let registry = LanguageRegistry::builtin();
        let mapping = registry.mapping(&Language::new("cobol"));
        assert_eq!(mapping.fallback, NodeKind::Variable);
        assert!(mapping.direct.is_empty());
    }

    #[test]
    fn registration_overrides_builtin() {
        let mut registry = LanguageRegistry::builtin();
        registry.register(LanguageMapping::new(Language::TYPESCRIPT, NodeKind::Property));
        assert_eq!(registry.mapping(&Language::TYPESCRIPT).fallback, NodeKind::Property);
    }
}
