//! Per-language normalization configuration.
//!
//! Unlike classification rules, these tables describe tree *shape*: which
//! raw types are pruned, which open a lexical scope, how raw type strings
//! map onto normalized ones, and which semantic category buckets apply.

use canopy_api::models::{Language, RawNode, SemanticCategory};
use smol_str::SmolStr;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Augments the attribute map for matching raw types after the standard
/// metadata is in place.
#[derive(Clone)]
pub struct ExtensionRule {
    pub raw_type: SmolStr,
    pub apply: fn(&RawNode, &mut BTreeMap<String, String>),
}

impl std::fmt::Debug for ExtensionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRule")
            .field("raw_type", &self.raw_type)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct NormalizationConfig {
    pub language: Language,
    /// Raw types pruned into placeholder leaves.
    pub ignored: HashSet<SmolStr>,
    /// Raw types that open a new lexical scope.
    pub scope_boundaries: HashSet<SmolStr>,
    /// Raw type -> normalized type string; identity when absent.
    pub type_map: HashMap<SmolStr, SmolStr>,
    pub declarations: HashSet<SmolStr>,
    pub statements: HashSet<SmolStr>,
    pub expressions: HashSet<SmolStr>,
    pub literals: HashSet<SmolStr>,
    pub identifiers: HashSet<SmolStr>,
    pub extensions: Vec<ExtensionRule>,
}

impl NormalizationConfig {
    pub fn normalized_type(&self, raw_type: &SmolStr) -> SmolStr {
        self.type_map.get(raw_type).cloned().unwrap_or_else(|| raw_type.clone())
    }

    /// First-match category lookup; buckets are mutually exclusive by
    /// construction of the check order.
    pub fn category_of(&self, raw_type: &SmolStr) -> SemanticCategory {
        if self.declarations.contains(raw_type) {
            SemanticCategory::Declaration
        } else if self.statements.contains(raw_type) {
            SemanticCategory::Statement
        } else if self.expressions.contains(raw_type) {
            SemanticCategory::Expression
        } else if self.literals.contains(raw_type) {
            SemanticCategory::Literal
        } else if self.identifiers.contains(raw_type) {
            SemanticCategory::Identifier
        } else {
            SemanticCategory::Other
        }
    }
}

fn set(items: &[&str]) -> HashSet<SmolStr> {
    items.iter().map(|s| SmolStr::new(s)).collect()
}

fn map(pairs: &[(&str, &str)]) -> HashMap<SmolStr, SmolStr> {
    pairs
        .iter()
        .map(|(from, to)| (SmolStr::new(from), SmolStr::new(to)))
        .collect()
}

/// Minimal built-in default for unknown languages.
fn default_config() -> NormalizationConfig {
    NormalizationConfig {
        language: Language::UNKNOWN,
        ignored: set(&["comment", "whitespace"]),
        scope_boundaries: set(&["block", "function", "class"]),
        type_map: HashMap::new(),
        declarations: HashSet::new(),
        statements: HashSet::new(),
        expressions: HashSet::new(),
        literals: set(&["string", "number", "string_literal", "number_literal"]),
        identifiers: set(&["identifier"]),
        extensions: Vec::new(),
    }
}

fn copy_property(key: &'static str) -> fn(&RawNode, &mut BTreeMap<String, String>) {
    match key {
        "accessor" => |raw, attrs| {
            if let Some(v) = raw.properties.get("accessor") {
                attrs.insert("accessor".to_string(), v.clone());
            }
        },
        "async" => |raw, attrs| {
            if let Some(v) = raw.properties.get("async") {
                attrs.insert("async".to_string(), v.clone());
            }
        },
        "unsafe" => |raw, attrs| {
            if let Some(v) = raw.properties.get("unsafe") {
                attrs.insert("unsafe".to_string(), v.clone());
            }
        },
        _ => |_, _| {},
    }
}

fn typescript_config() -> NormalizationConfig {
    NormalizationConfig {
        language: Language::TYPESCRIPT,
        ignored: set(&["whitespace", "empty_statement", "ERROR", ";"]),
        scope_boundaries: set(&[
            "program",
            "module",
            "internal_module",
            "namespace_declaration",
            "class_declaration",
            "abstract_class_declaration",
            "interface_declaration",
            "enum_declaration",
            "function_declaration",
            "generator_function_declaration",
            "method_definition",
            "arrow_function",
            "function_expression",
            "statement_block",
            "for_statement",
        ]),
        type_map: map(&[
            ("abstract_class_declaration", "class_declaration"),
            ("lexical_declaration", "variable_declaration"),
            ("method_signature", "method_definition"),
            ("generator_function_declaration", "function_declaration"),
            ("for_in_statement", "for_statement"),
            ("do_statement", "while_statement"),
        ]),
        declarations: set(&[
            "class_declaration",
            "abstract_class_declaration",
            "interface_declaration",
            "enum_declaration",
            "type_alias_declaration",
            "function_declaration",
            "generator_function_declaration",
            "method_definition",
            "method_signature",
            "variable_declaration",
            "lexical_declaration",
            "variable_declarator",
            "public_field_definition",
            "property_signature",
            "required_parameter",
            "optional_parameter",
            "namespace_declaration",
            "internal_module",
            "import_statement",
            "export_statement",
        ]),
        statements: set(&[
            "if_statement",
            "for_statement",
            "for_in_statement",
            "while_statement",
            "do_statement",
            "switch_statement",
            "try_statement",
            "return_statement",
            "throw_statement",
            "break_statement",
            "continue_statement",
            "expression_statement",
            "statement_block",
        ]),
        expressions: set(&[
            "call_expression",
            "binary_expression",
            "unary_expression",
            "assignment_expression",
            "member_expression",
            "arrow_function",
            "function_expression",
            "new_expression",
            "await_expression",
            "ternary_expression",
        ]),
        literals: set(&[
            "string",
            "template_string",
            "number",
            "true",
            "false",
            "null",
            "undefined",
            "regex",
        ]),
        identifiers: set(&[
            "identifier",
            "property_identifier",
            "type_identifier",
            "shorthand_property_identifier",
        ]),
        extensions: vec![
            ExtensionRule {
                raw_type: SmolStr::new("method_definition"),
                apply: copy_property("accessor"),
            },
            ExtensionRule {
                raw_type: SmolStr::new("function_declaration"),
                apply: copy_property("async"),
            },
        ],
    }
}

fn javascript_config() -> NormalizationConfig {
    let mut config = typescript_config();
    config.language = Language::JAVASCRIPT;
    // No TS-only surface.
    for ts_only in [
        "interface_declaration",
        "type_alias_declaration",
        "property_signature",
        "method_signature",
        "internal_module",
        "namespace_declaration",
    ] {
        config.declarations.remove(ts_only);
        config.scope_boundaries.remove(ts_only);
    }
    config.declarations.insert(SmolStr::new("field_definition"));
    config
}

fn python_config() -> NormalizationConfig {
    NormalizationConfig {
        language: Language::PYTHON,
        ignored: set(&["whitespace", "ERROR"]),
        scope_boundaries: set(&["module", "class_definition", "function_definition", "lambda"]),
        type_map: map(&[
            ("import_from_statement", "import_statement"),
            ("match_statement", "switch_statement"),
        ]),
        declarations: set(&[
            "class_definition",
            "function_definition",
            "assignment",
            "typed_parameter",
            "default_parameter",
            "typed_default_parameter",
            "import_statement",
            "import_from_statement",
            "global_statement",
        ]),
        statements: set(&[
            "if_statement",
            "for_statement",
            "while_statement",
            "try_statement",
            "match_statement",
            "with_statement",
            "return_statement",
            "raise_statement",
            "expression_statement",
            "pass_statement",
        ]),
        expressions: set(&[
            "call",
            "binary_operator",
            "boolean_operator",
            "comparison_operator",
            "lambda",
            "conditional_expression",
            "list_comprehension",
            "attribute",
        ]),
        literals: set(&[
            "string",
            "concatenated_string",
            "integer",
            "float",
            "true",
            "false",
            "none",
        ]),
        identifiers: set(&["identifier"]),
        extensions: vec![ExtensionRule {
            raw_type: SmolStr::new("function_definition"),
            apply: copy_property("async"),
        }],
    }
}

fn rust_config() -> NormalizationConfig {
    NormalizationConfig {
        language: Language::RUST,
        ignored: set(&["whitespace", "ERROR"]),
        scope_boundaries: set(&[
            "source_file",
            "mod_item",
            "struct_item",
            "enum_item",
            "trait_item",
            "impl_item",
            "function_item",
            "closure_expression",
            "block",
        ]),
        type_map: map(&[
            ("loop_expression", "while_expression"),
            ("function_signature_item", "function_item"),
        ]),
        declarations: set(&[
            "mod_item",
            "struct_item",
            "union_item",
            "enum_item",
            "trait_item",
            "impl_item",
            "type_item",
            "function_item",
            "function_signature_item",
            "let_declaration",
            "const_item",
            "static_item",
            "field_declaration",
            "parameter",
            "use_declaration",
        ]),
        statements: set(&["expression_statement", "empty_statement"]),
        expressions: set(&[
            "if_expression",
            "for_expression",
            "while_expression",
            "loop_expression",
            "match_expression",
            "call_expression",
            "macro_invocation",
            "binary_expression",
            "closure_expression",
            "await_expression",
        ]),
        literals: set(&[
            "string_literal",
            "raw_string_literal",
            "integer_literal",
            "float_literal",
            "boolean_literal",
            "char_literal",
        ]),
        identifiers: set(&["identifier", "type_identifier", "field_identifier"]),
        extensions: vec![ExtensionRule {
            raw_type: SmolStr::new("function_item"),
            apply: copy_property("unsafe"),
        }],
    }
}

fn java_config() -> NormalizationConfig {
    NormalizationConfig {
        language: Language::JAVA,
        ignored: set(&["whitespace", "ERROR"]),
        scope_boundaries: set(&[
            "program",
            "class_declaration",
            "record_declaration",
            "interface_declaration",
            "enum_declaration",
            "method_declaration",
            "constructor_declaration",
            "lambda_expression",
            "block",
        ]),
        type_map: map(&[
            ("enhanced_for_statement", "for_statement"),
            ("do_statement", "while_statement"),
            ("try_with_resources_statement", "try_statement"),
            ("switch_expression", "switch_statement"),
        ]),
        declarations: set(&[
            "package_declaration",
            "class_declaration",
            "record_declaration",
            "interface_declaration",
            "annotation_type_declaration",
            "enum_declaration",
            "method_declaration",
            "constructor_declaration",
            "field_declaration",
            "local_variable_declaration",
            "formal_parameter",
            "spread_parameter",
            "import_declaration",
        ]),
        statements: set(&[
            "if_statement",
            "for_statement",
            "enhanced_for_statement",
            "while_statement",
            "do_statement",
            "switch_expression",
            "try_statement",
            "try_with_resources_statement",
            "return_statement",
            "throw_statement",
            "expression_statement",
            "block",
        ]),
        expressions: set(&[
            "method_invocation",
            "object_creation_expression",
            "lambda_expression",
            "binary_expression",
            "assignment_expression",
            "ternary_expression",
        ]),
        literals: set(&[
            "string_literal",
            "decimal_integer_literal",
            "decimal_floating_point_literal",
            "true",
            "false",
            "null_literal",
            "character_literal",
        ]),
        identifiers: set(&["identifier", "type_identifier"]),
        extensions: Vec::new(),
    }
}

fn go_config() -> NormalizationConfig {
    NormalizationConfig {
        language: Language::GO,
        ignored: set(&["whitespace", "ERROR"]),
        scope_boundaries: set(&[
            "source_file",
            "function_declaration",
            "method_declaration",
            "func_literal",
            "block",
        ]),
        type_map: map(&[
            ("expression_switch_statement", "switch_statement"),
            ("type_switch_statement", "switch_statement"),
            ("short_var_declaration", "var_declaration"),
        ]),
        declarations: set(&[
            "package_clause",
            "function_declaration",
            "method_declaration",
            "type_declaration",
            "type_spec",
            "var_declaration",
            "short_var_declaration",
            "const_declaration",
            "parameter_declaration",
            "variadic_parameter_declaration",
            "field_declaration",
            "import_declaration",
        ]),
        statements: set(&[
            "if_statement",
            "for_statement",
            "expression_switch_statement",
            "type_switch_statement",
            "select_statement",
            "return_statement",
            "go_statement",
            "defer_statement",
            "expression_statement",
            "block",
        ]),
        expressions: set(&[
            "call_expression",
            "binary_expression",
            "unary_expression",
            "func_literal",
            "selector_expression",
        ]),
        literals: set(&[
            "interpreted_string_literal",
            "raw_string_literal",
            "int_literal",
            "float_literal",
            "true",
            "false",
            "nil",
        ]),
        identifiers: set(&["identifier", "type_identifier", "field_identifier"]),
        extensions: Vec::new(),
    }
}

/// Lookup table from language tag to normalization config, with the
/// minimal default for anything unregistered.
pub struct NormalizationRegistry {
    configs: HashMap<Language, Arc<NormalizationConfig>>,
    default: Arc<NormalizationConfig>,
}

impl NormalizationRegistry {
    pub fn builtin() -> Self {
        let mut configs = HashMap::new();
        for config in [
            typescript_config(),
            javascript_config(),
            python_config(),
            rust_config(),
            java_config(),
            go_config(),
        ] {
            configs.insert(config.language.clone(), Arc::new(config));
        }
        Self {
            configs,
            default: Arc::new(default_config()),
        }
    }

    pub fn register(&mut self, config: NormalizationConfig) {
        self.configs.insert(config.language.clone(), Arc::new(config));
    }

    pub fn config(&self, language: &Language) -> Arc<NormalizationConfig> {
        self.configs
            .get(language)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order_is_first_match() {
        let mut config = default_config();
        config.declarations.insert(SmolStr::new("dual"));
        config.statements.insert(SmolStr::new("dual"));
        assert_eq!(config.category_of(&SmolStr::new("dual")), SemanticCategory::Declaration);
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let registry = NormalizationRegistry::builtin();
        let config = registry.config(&Language::new("fortran"));
        assert!(config.ignored.contains("comment"));
        assert_eq!(
            config.category_of(&SmolStr::new("identifier")),
            SemanticCategory::Identifier
        );
    }

    #[test]
    fn type_map_falls_back_to_identity() {
        let registry = NormalizationRegistry::builtin();
        let ts = registry.config(&Language::TYPESCRIPT);
        assert_eq!(
            ts.normalized_type(&SmolStr::new("lexical_declaration")),
            SmolStr::new("variable_declaration")
        );
        assert_eq!(
            ts.normalized_type(&SmolStr::new("call_expression")),
            SmolStr::new("call_expression")
        );
    }
}
