//! Adjustment factors and their threshold constants.
//!
//! The tier boundaries are empirically chosen and intentionally preserved
//! as named, overridable configuration rather than re-derived. Treat them
//! as a tuning surface.

use super::ScoreInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreThresholds {
    /// Child-count tiers for the complexity factor.
    pub children_many: usize,
    pub children_several: usize,
    pub children_some: usize,
    /// Explicit-complexity tiers.
    pub explicit_high: u32,
    pub explicit_moderate: u32,
    /// Source-line-span tiers.
    pub span_long: u32,
    pub span_medium: u32,
    /// Parameter count past which a callable gains weight.
    pub params_many: usize,
    /// Member-count tiers for container kinds.
    pub members_many: usize,
    pub members_some: usize,
    /// Scope depths: at or below `scope_shallow` adds; past each of the
    /// deeper bounds subtracts progressively.
    pub scope_shallow: u32,
    pub scope_deep: u32,
    pub scope_deeper: u32,
    pub scope_deepest: u32,
    /// Source-length tiers for the size factor.
    pub size_small: usize,
    pub size_large: usize,
    pub size_huge: usize,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            children_many: 20,
            children_several: 10,
            children_some: 5,
            explicit_high: 10,
            explicit_moderate: 5,
            span_long: 100,
            span_medium: 30,
            params_many: 5,
            members_many: 10,
            members_some: 5,
            scope_shallow: 1,
            scope_deep: 2,
            scope_deeper: 4,
            scope_deepest: 6,
            size_small: 50,
            size_large: 500,
            size_huge: 2000,
        }
    }
}

/// Names that mark conventional entry points.
pub const ENTRY_POINT_NAMES: &[&str] = &["main", "index", "init", "start", "run"];

/// Names that suggest a public API surface.
pub const PUBLIC_API_NAMES: &[&str] = &["api", "public", "handle", "create", "serve", "export"];

/// Generic or utility-sounding names that dilute significance.
pub const GENERIC_NAMES: &[&str] = &["temp", "tmp", "test", "debug", "util", "helper"];

/// Structural complexity contribution, capped at +2.
pub fn complexity_factor(input: &ScoreInput, t: &ScoreThresholds) -> f32 {
    let mut factor: f32 = 0.0;

    factor += if input.child_count > t.children_many {
        2.0
    } else if input.child_count > t.children_several {
        1.0
    } else if input.child_count > t.children_some {
        0.5
    } else {
        0.0
    };

    if let Some(explicit) = input.explicit_complexity {
        factor += if explicit >= t.explicit_high {
            1.0
        } else if explicit >= t.explicit_moderate {
            0.5
        } else {
            0.0
        };
    }

    factor += if input.line_span >= t.span_long {
        1.0
    } else if input.line_span >= t.span_medium {
        0.5
    } else {
        0.0
    };

    if input.kind.is_callable() && input.parameter_count >= t.params_many {
        factor += 0.5;
    }

    if input.kind.is_container() {
        factor += if input.member_count >= t.members_many {
            1.0
        } else if input.member_count >= t.members_some {
            0.5
        } else {
            0.0
        };
    }

    factor.min(2.0)
}

/// Deeper nesting subtracts, top-of-file placement adds. In [-1, +0.5].
pub fn scope_factor(input: &ScoreInput, t: &ScoreThresholds) -> f32 {
    let depth = input.scope_depth;
    if depth <= t.scope_shallow {
        0.5
    } else if depth > t.scope_deepest {
        -1.0
    } else if depth > t.scope_deeper {
        -0.5
    } else if depth > t.scope_deep {
        -0.25
    } else {
        0.0
    }
}

/// Source-length contribution in [-0.5, +1]. Unknown length is neutral.
pub fn size_factor(input: &ScoreInput, t: &ScoreThresholds) -> f32 {
    match input.source_len {
        None => 0.0,
        Some(len) if len >= t.size_huge => 1.0,
        Some(len) if len >= t.size_large => 0.5,
        Some(len) if len < t.size_small => -0.5,
        Some(_) => 0.0,
    }
}

/// File and declaration context, clamped to [-1, +1].
pub fn context_factor(input: &ScoreInput) -> f32 {
    let mut factor: f32 = 0.0;
    if input.in_test_file {
        factor -= 0.5;
    }
    if input.in_config_file {
        factor -= 0.5;
    }
    if input.in_main_file {
        factor += 0.5;
    }
    if input.is_exported {
        factor += 0.25;
    }
    if input.has_docs {
        factor += 0.25;
    }
    if input.modifier_count > 2 {
        factor += 0.25;
    }
    factor.clamp(-1.0, 1.0)
}

/// Name-based heuristics, clamped to [0, +2]; never negative in total.
pub fn usage_factor(input: &ScoreInput) -> f32 {
    let Some(name) = input.name else {
        return 0.0;
    };
    let name = name.to_lowercase();
    let mut factor: f32 = 0.0;
    if ENTRY_POINT_NAMES.iter().any(|p| name.starts_with(p)) {
        factor += 1.0;
    }
    if PUBLIC_API_NAMES.iter().any(|p| name.starts_with(p)) {
        factor += 0.5;
    }
    if GENERIC_NAMES.iter().any(|p| name.contains(p)) {
        factor -= 0.5;
    }
    factor.clamp(0.0, 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_api::models::NodeKind;

    fn input(kind: NodeKind) -> ScoreInput<'static> {
        ScoreInput::new(kind)
    }

    #[test]
    fn complexity_is_capped_at_two() {
        let t = ScoreThresholds::default();
        let mut big = input(NodeKind::Class);
        big.child_count = 50;
        big.member_count = 40;
        big.line_span = 500;
        big.explicit_complexity = Some(99);
        assert_eq!(complexity_factor(&big, &t), 2.0);
    }

    #[test]
    fn scope_rewards_shallow_and_penalizes_deep() {
        let t = ScoreThresholds::default();
        let mut node = input(NodeKind::Function);
        node.scope_depth = 0;
        assert_eq!(scope_factor(&node, &t), 0.5);
        node.scope_depth = 3;
        assert_eq!(scope_factor(&node, &t), -0.25);
        node.scope_depth = 5;
        assert_eq!(scope_factor(&node, &t), -0.5);
        node.scope_depth = 9;
        assert_eq!(scope_factor(&node, &t), -1.0);
    }

    #[test]
    fn usage_never_goes_negative() {
        let mut node = input(NodeKind::Function);
        node.name = Some("temp_helper_util");
        assert_eq!(usage_factor(&node), 0.0);
        node.name = Some("main_loop");
        assert_eq!(usage_factor(&node), 1.0);
    }

    #[test]
    fn context_is_clamped() {
        let mut node = input(NodeKind::Function);
        node.in_main_file = true;
        node.is_exported = true;
        node.has_docs = true;
        node.modifier_count = 5;
        assert_eq!(context_factor(&node), 1.0);
        node.in_main_file = false;
        node.is_exported = false;
        node.has_docs = false;
        node.modifier_count = 0;
        node.in_test_file = true;
        node.in_config_file = true;
        assert_eq!(context_factor(&node), -1.0);
    }
}
