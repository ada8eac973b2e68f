use super::kind::NodeKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which resolution tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Direct,
    Pattern,
    Context,
    Fuzzy,
    Fallback,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMethod::Direct => "direct",
            ClassificationMethod::Pattern => "pattern",
            ClassificationMethod::Context => "context",
            ClassificationMethod::Fuzzy => "fuzzy",
            ClassificationMethod::Fallback => "fallback",
        }
    }
}

/// A candidate that matched with lower confidence than the selected result,
/// kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationCandidate {
    pub kind: NodeKind,
    pub confidence: f32,
    pub rule: Option<String>,
}

/// Outcome of classifying one raw node. Classification is total: every raw
/// node yields a result, with the language fallback kind as the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationResult {
    pub kind: NodeKind,
    /// In [0, 1].
    pub confidence: f32,
    /// Human-readable account of why this kind was chosen.
    pub reason: String,
    pub alternatives: Vec<ClassificationCandidate>,
    pub method: ClassificationMethod,
    /// Name of the specific rule or pattern that matched, when one did.
    pub rule: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_shape() {
        let result = ClassificationResult {
            kind: NodeKind::Class,
            confidence: 0.9,
            reason: "exact mapping".to_string(),
            alternatives: vec![],
            method: ClassificationMethod::Direct,
            rule: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "class");
        assert_eq!(json["method"], "direct");
    }
}
