//! Built-in language rule tables.
//!
//! One module per shipped language. Tables are built once and shared; new
//! languages are added at runtime through [`LanguageRegistry::register`].

mod go;
mod java;
mod javascript;
mod python;
mod rust;
mod typescript;

use super::rules::{LanguageMapping, PatternRule};
use canopy_api::models::NodeKind;
use once_cell::sync::Lazy;
use std::sync::Arc;

static BUILTIN: Lazy<Vec<Arc<LanguageMapping>>> = Lazy::new(|| {
    vec![
        Arc::new(typescript::mapping().finalize()),
        Arc::new(javascript::mapping().finalize()),
        Arc::new(python::mapping().finalize()),
        Arc::new(rust::mapping().finalize()),
        Arc::new(java::mapping().finalize()),
        Arc::new(go::mapping().finalize()),
    ]
});

pub(crate) fn builtin_mappings() -> impl Iterator<Item = Arc<LanguageMapping>> {
    BUILTIN.iter().cloned()
}

/// Pattern constructor for the static built-in tables.
pub(super) fn pat(name: &str, pattern: &str, kind: NodeKind, priority: i32) -> PatternRule {
    PatternRule::new(name, pattern, kind, priority).expect("built-in pattern must compile")
}

pub(super) fn pat_ci(name: &str, pattern: &str, kind: NodeKind, priority: i32) -> PatternRule {
    PatternRule::new_insensitive(name, pattern, kind, priority)
        .expect("built-in pattern must compile")
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_api::models::Language;

    #[test]
    fn all_builtin_languages_present() {
        let languages: Vec<_> = builtin_mappings().map(|m| m.language.clone()).collect();
        for expected in [
            Language::TYPESCRIPT,
            Language::JAVASCRIPT,
            Language::PYTHON,
            Language::RUST,
            Language::JAVA,
            Language::GO,
        ] {
            assert!(languages.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn every_mapping_has_file_level_entry() {
        for mapping in builtin_mappings() {
            let has_root = mapping
                .direct
                .values()
                .any(|k| matches!(k, NodeKind::File | NodeKind::Module));
            assert!(has_root, "{} lacks a file/module mapping", mapping.language);
        }
    }
}
