use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Source language tag attached to raw and normalized nodes.
///
/// Open set: the pipeline ships rule tables for the well-known constants
/// below, but any tag round-trips untouched and resolves to the universal
/// fallback mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Language(#[schemars(with = "String")] Cow<'static, str>);

impl Language {
    pub const TYPESCRIPT: Language = Language(Cow::Borrowed("typescript"));
    pub const JAVASCRIPT: Language = Language(Cow::Borrowed("javascript"));
    pub const PYTHON: Language = Language(Cow::Borrowed("python"));
    pub const RUST: Language = Language(Cow::Borrowed("rust"));
    pub const JAVA: Language = Language(Cow::Borrowed("java"));
    pub const GO: Language = Language(Cow::Borrowed("go"));
    pub const UNKNOWN: Language = Language(Cow::Borrowed("unknown"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Map a file extension to a Language.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ts" | "tsx" => Self::TYPESCRIPT,
            "js" | "jsx" | "mjs" | "cjs" => Self::JAVASCRIPT,
            "py" | "pyi" | "pyw" => Self::PYTHON,
            "rs" => Self::RUST,
            "java" => Self::JAVA,
            "go" => Self::GO,
            ext => Self::new(ext.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping() {
        assert_eq!(Language::from_extension("ts"), Language::TYPESCRIPT);
        assert_eq!(Language::from_extension("TSX"), Language::TYPESCRIPT);
        assert_eq!(Language::from_extension("rs"), Language::RUST);
        assert_eq!(Language::from_extension("zig"), Language::new("zig"));
    }

    #[test]
    fn serde_transparent() {
        let json = serde_json::to_string(&Language::PYTHON).unwrap();
        assert_eq!(json, "\"python\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::PYTHON);
    }
}
