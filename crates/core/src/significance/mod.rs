//! Multi-factor significance scoring.
//!
//! A node's level starts from a base determined solely by its normalized
//! kind, then signed adjustment factors (each independently clamped, then
//! weighted) move it, and the result is rounded and clamped back into the
//! 5-point ordinal. Disabling a factor omits its term entirely.

pub mod factors;

pub use factors::{ENTRY_POINT_NAMES, GENERIC_NAMES, PUBLIC_API_NAMES, ScoreThresholds};

use canopy_api::models::{NodeKind, SignificanceLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::trace;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub complexity: f32,
    pub scope: f32,
    pub size: f32,
    pub context: f32,
    pub usage: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            complexity: 1.0,
            scope: 1.0,
            size: 1.0,
            context: 1.0,
            usage: 1.0,
        }
    }
}

/// Per-factor enablement. A disabled factor contributes nothing, as
/// opposed to contributing zero-weighted noise to the explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorToggles {
    pub complexity: bool,
    pub scope: bool,
    pub size: bool,
    pub context: bool,
    pub usage: bool,
}

impl Default for FactorToggles {
    fn default() -> Self {
        Self {
            complexity: true,
            scope: true,
            size: true,
            context: true,
            usage: true,
        }
    }
}

impl FactorToggles {
    pub fn none() -> Self {
        Self {
            complexity: false,
            scope: false,
            size: false,
            context: false,
            usage: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub weights: ScoreWeights,
    pub toggles: FactorToggles,
    pub thresholds: ScoreThresholds,
}

/// File-level context shared by every node of one file.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub path: String,
    pub is_test: bool,
    pub is_config: bool,
    pub is_main: bool,
    /// Names exported from this file, from the caller's import/export
    /// tables when available.
    pub exported_names: Vec<String>,
}

const CONFIG_FILE_STEMS: &[&str] = &[
    "config",
    "configuration",
    "settings",
    "webpack.config",
    "vite.config",
    "tsconfig",
];

impl FileContext {
    /// Infer test/config/main membership from the path alone.
    pub fn for_path(path: &str) -> Self {
        let lower = path.to_lowercase().replace('\\', "/");
        let file_name = lower.rsplit('/').next().unwrap_or(&lower).to_string();
        let stem = file_name.split('.').next().unwrap_or(&file_name).to_string();

        let is_test = file_name.contains(".test.")
            || file_name.contains(".spec.")
            || file_name.starts_with("test_")
            || file_name.ends_with("_test.go")
            || file_name.ends_with("_test.py")
            || lower.contains("/tests/")
            || lower.contains("/__tests__/");
        let is_config = CONFIG_FILE_STEMS.iter().any(|c| file_name.starts_with(c));
        let is_main = matches!(stem.as_str(), "main" | "index" | "mod" | "lib");

        Self {
            path: path.to_string(),
            is_test,
            is_config,
            is_main,
            exported_names: Vec::new(),
        }
    }

    pub fn with_exports(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exported_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn exports(&self, name: Option<&str>) -> bool {
        name.is_some_and(|n| self.exported_names.iter().any(|e| e == n))
    }
}

/// Everything the scorer may look at for one node.
#[derive(Debug, Clone)]
pub struct ScoreInput<'a> {
    pub kind: NodeKind,
    pub name: Option<&'a str>,
    pub child_count: usize,
    pub explicit_complexity: Option<u32>,
    pub line_span: u32,
    pub parameter_count: usize,
    pub member_count: usize,
    pub source_len: Option<usize>,
    pub scope_depth: u32,
    pub modifier_count: usize,
    pub has_docs: bool,
    pub is_exported: bool,
    pub in_test_file: bool,
    pub in_config_file: bool,
    pub in_main_file: bool,
}

impl<'a> ScoreInput<'a> {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            child_count: 0,
            explicit_complexity: None,
            line_span: 1,
            parameter_count: 0,
            member_count: 0,
            source_len: None,
            scope_depth: 0,
            modifier_count: 0,
            has_docs: false,
            is_exported: false,
            in_test_file: false,
            in_config_file: false,
            in_main_file: false,
        }
    }

    pub fn in_file(mut self, file: &FileContext) -> Self {
        self.in_test_file = file.is_test;
        self.in_config_file = file.is_config;
        self.in_main_file = file.is_main;
        self.is_exported = self.is_exported || file.exports(self.name);
        self
    }
}

/// One weighted factor's contribution to a score.
#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    pub factor: &'static str,
    pub value: f32,
    pub weighted: f32,
}

/// Diagnostic account of a scoring decision. Informational only; never
/// feeds back into the numeric result.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreExplanation {
    pub base: SignificanceLevel,
    pub contributions: Vec<FactorContribution>,
    pub raw_score: f32,
    pub level: SignificanceLevel,
}

impl ScoreExplanation {
    pub fn render(&self) -> String {
        let mut out = format!("base {} ({})", self.base.label(), self.base.as_u8());
        for c in &self.contributions {
            out.push_str(&format!(", {} {:+.2}", c.factor, c.weighted));
        }
        out.push_str(&format!(" => {} ({:.2})", self.level.label(), self.raw_score));
        out
    }
}

/// Base level determined solely by normalized kind.
pub fn base_level(kind: NodeKind) -> SignificanceLevel {
    match kind {
        NodeKind::File
        | NodeKind::Module
        | NodeKind::Namespace
        | NodeKind::Class
        | NodeKind::Interface => SignificanceLevel::Critical,
        NodeKind::Function
        | NodeKind::Method
        | NodeKind::Constructor
        | NodeKind::Getter
        | NodeKind::Setter => SignificanceLevel::High,
        NodeKind::Enum
        | NodeKind::TypeAlias
        | NodeKind::Import
        | NodeKind::Export
        | NodeKind::SwitchStatement
        | NodeKind::TryStatement
        | NodeKind::Closure => SignificanceLevel::Medium,
        NodeKind::IfStatement
        | NodeKind::ForStatement
        | NodeKind::WhileStatement
        | NodeKind::Property
        | NodeKind::Field
        | NodeKind::Variable => SignificanceLevel::Low,
        NodeKind::Parameter
        | NodeKind::Comment
        | NodeKind::StringLiteral
        | NodeKind::Decorator => SignificanceLevel::Minimal,
    }
}

/// Snapshot of scorer activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScorerStats {
    pub scored: u64,
    pub by_level: BTreeMap<String, u64>,
    pub average_raw_score: f64,
}

#[derive(Default)]
struct StatsState {
    scored: u64,
    by_level: BTreeMap<String, u64>,
    raw_sum: f64,
}

pub struct SignificanceScorer {
    config: ScorerConfig,
    stats: Mutex<StatsState>,
}

impl SignificanceScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self {
            config,
            stats: Mutex::new(StatsState::default()),
        }
    }

    /// Score one node. Pure with respect to its input; internal running
    /// statistics never feed back into the result.
    pub fn score(&self, input: &ScoreInput) -> SignificanceLevel {
        self.score_explained(input).level
    }

    pub fn score_explained(&self, input: &ScoreInput) -> ScoreExplanation {
        let base = base_level(input.kind);
        let mut raw = f32::from(base.as_u8());
        let mut contributions = Vec::new();

        let toggles = &self.config.toggles;
        let weights = &self.config.weights;
        let thresholds = &self.config.thresholds;

        let mut apply = |name: &'static str, enabled: bool, weight: f32, value: f32| {
            if !enabled {
                return;
            }
            let weighted = value * weight;
            raw += weighted;
            if value != 0.0 {
                contributions.push(FactorContribution {
                    factor: name,
                    value,
                    weighted,
                });
            }
        };

        apply(
            "complexity",
            toggles.complexity,
            weights.complexity,
            factors::complexity_factor(input, thresholds),
        );
        apply(
            "scope",
            toggles.scope,
            weights.scope,
            factors::scope_factor(input, thresholds),
        );
        apply(
            "size",
            toggles.size,
            weights.size,
            factors::size_factor(input, thresholds),
        );
        apply(
            "context",
            toggles.context,
            weights.context,
            factors::context_factor(input),
        );
        apply("usage", toggles.usage, weights.usage, factors::usage_factor(input));

        let level = SignificanceLevel::from_score(raw);
        let explanation = ScoreExplanation {
            base,
            contributions,
            raw_score: raw,
            level,
        };
        trace!(kind = input.kind.as_str(), score = raw, level = level.label(), "scored node");

        let mut stats = self.stats.lock().expect("scorer stats lock poisoned");
        stats.scored += 1;
        *stats.by_level.entry(level.label().to_string()).or_default() += 1;
        stats.raw_sum += f64::from(raw);

        explanation
    }

    pub fn stats(&self) -> ScorerStats {
        let stats = self.stats.lock().expect("scorer stats lock poisoned");
        ScorerStats {
            scored: stats.scored,
            by_level: stats.by_level.clone(),
            average_raw_score: if stats.scored == 0 {
                0.0
            } else {
                stats.raw_sum / stats.scored as f64
            },
        }
    }

    pub fn reset_stats(&self) {
        *self.stats.lock().expect("scorer stats lock poisoned") = StatsState::default();
    }
}

impl Default for SignificanceScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_factors_yield_exact_base_level() {
        let scorer = SignificanceScorer::new(ScorerConfig {
            toggles: FactorToggles::none(),
            ..ScorerConfig::default()
        });
        for kind in NodeKind::ALL {
            let mut input = ScoreInput::new(kind);
            input.child_count = 100;
            input.scope_depth = 9;
            input.name = Some("main");
            assert_eq!(scorer.score(&input), base_level(kind), "kind {kind}");
        }
    }

    #[test]
    fn result_is_always_in_range() {
        let scorer = SignificanceScorer::default();
        for kind in NodeKind::ALL {
            let mut heavy = ScoreInput::new(kind);
            heavy.child_count = 100;
            heavy.member_count = 50;
            heavy.line_span = 1000;
            heavy.name = Some("main_api");
            heavy.in_main_file = true;
            let mut light = ScoreInput::new(kind);
            light.scope_depth = 20;
            light.in_test_file = true;
            light.in_config_file = true;
            light.source_len = Some(1);
            light.name = Some("tmp_helper");
            for input in [heavy, light] {
                let level = scorer.score(&input).as_u8();
                assert!((1..=5).contains(&level));
            }
        }
    }

    #[test]
    fn member_rich_class_outranks_sparse_class() {
        let scorer = SignificanceScorer::default();

        let mut sparse = ScoreInput::new(NodeKind::Class);
        sparse.name = Some("Widget");
        sparse.scope_depth = 7;
        sparse.child_count = 2;
        sparse.member_count = 2;
        sparse.source_len = Some(100);

        let mut rich = sparse.clone();
        rich.child_count = 12;
        rich.member_count = 12;

        let sparse_level = scorer.score(&sparse);
        let rich_level = scorer.score(&rich);
        assert!(
            rich_level.as_u8() >= sparse_level.as_u8() + 1,
            "rich {rich_level} vs sparse {sparse_level}"
        );
    }

    #[test]
    fn test_file_membership_drags_score_down() {
        let scorer = SignificanceScorer::default();
        let mut input = ScoreInput::new(NodeKind::Function);
        input.name = Some("compute");
        input.scope_depth = 2;
        let normal = scorer.score_explained(&input).raw_score;
        input.in_test_file = true;
        let in_test = scorer.score_explained(&input).raw_score;
        assert!(in_test < normal);
    }

    #[test]
    fn explanation_lists_nonzero_factors_only() {
        let scorer = SignificanceScorer::default();
        let mut input = ScoreInput::new(NodeKind::Function);
        input.scope_depth = 2;
        input.name = Some("plain");
        let explanation = scorer.score_explained(&input);
        assert!(explanation.contributions.is_empty());

        input.name = Some("main");
        let explanation = scorer.score_explained(&input);
        let factors: Vec<_> = explanation.contributions.iter().map(|c| c.factor).collect();
        assert_eq!(factors, vec!["usage"]);
        assert!(explanation.render().contains("usage"));
    }

    #[test]
    fn weights_scale_contributions() {
        let mut config = ScorerConfig::default();
        config.weights.usage = 0.0;
        let damped = SignificanceScorer::new(config);
        let mut input = ScoreInput::new(NodeKind::Variable);
        input.name = Some("main_state");
        input.scope_depth = 2;
        // usage factor 1.0 * weight 0.0 leaves the base untouched.
        assert_eq!(damped.score(&input), SignificanceLevel::Low);
    }

    #[test]
    fn file_context_inference() {
        let ctx = FileContext::for_path("src/__tests__/widget.test.ts");
        assert!(ctx.is_test);
        assert!(!ctx.is_config);

        let ctx = FileContext::for_path("webpack.config.js");
        assert!(ctx.is_config);

        let ctx = FileContext::for_path("src/main.rs");
        assert!(ctx.is_main);

        let ctx = FileContext::for_path("src/api.ts").with_exports(["createWidget"]);
        assert!(ctx.exports(Some("createWidget")));
        assert!(!ctx.exports(Some("hidden")));
    }

    #[test]
    fn stats_accumulate_and_reset() {
        let scorer = SignificanceScorer::default();
        scorer.score(&ScoreInput::new(NodeKind::Class));
        scorer.score(&ScoreInput::new(NodeKind::Comment));
        let stats = scorer.stats();
        assert_eq!(stats.scored, 2);
        assert!(stats.average_raw_score > 0.0);
        scorer.reset_stats();
        assert_eq!(scorer.stats().scored, 0);
    }
}
