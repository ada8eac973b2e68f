use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a node for downstream indexing and ranking.
///
/// A closed 5-point ordinal; scoring rounds and clamps into this range and
/// never interpolates between levels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SignificanceLevel {
    Minimal = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    Critical = 5,
}

impl SignificanceLevel {
    pub const ALL: [SignificanceLevel; 5] = [
        SignificanceLevel::Minimal,
        SignificanceLevel::Low,
        SignificanceLevel::Medium,
        SignificanceLevel::High,
        SignificanceLevel::Critical,
    ];

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(SignificanceLevel::Minimal),
            2 => Some(SignificanceLevel::Low),
            3 => Some(SignificanceLevel::Medium),
            4 => Some(SignificanceLevel::High),
            5 => Some(SignificanceLevel::Critical),
            _ => None,
        }
    }

    /// Round a raw score to the nearest level, clamping into [Minimal, Critical].
    pub fn from_score(score: f32) -> Self {
        let rounded = score.round().clamp(1.0, 5.0) as u8;
        Self::from_u8(rounded).unwrap_or(SignificanceLevel::Minimal)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignificanceLevel::Minimal => "minimal",
            SignificanceLevel::Low => "low",
            SignificanceLevel::Medium => "medium",
            SignificanceLevel::High => "high",
            SignificanceLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for SignificanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_round_trip() {
        for level in SignificanceLevel::ALL {
            assert_eq!(SignificanceLevel::from_u8(level.as_u8()), Some(level));
        }
        assert_eq!(SignificanceLevel::from_u8(0), None);
        assert_eq!(SignificanceLevel::from_u8(6), None);
    }

    #[test]
    fn from_score_rounds_and_clamps() {
        assert_eq!(SignificanceLevel::from_score(-3.0), SignificanceLevel::Minimal);
        assert_eq!(SignificanceLevel::from_score(2.4), SignificanceLevel::Low);
        assert_eq!(SignificanceLevel::from_score(2.6), SignificanceLevel::Medium);
        assert_eq!(SignificanceLevel::from_score(11.0), SignificanceLevel::Critical);
    }

    #[test]
    fn ordinal_ordering() {
        assert!(SignificanceLevel::Critical > SignificanceLevel::High);
        assert!(SignificanceLevel::Minimal < SignificanceLevel::Low);
    }
}
