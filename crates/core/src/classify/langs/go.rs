use super::pat;
use crate::classify::rules::{ContextRule, FuzzyRule, LanguageMapping};
use canopy_api::models::{Language, NodeKind};

pub(super) fn mapping() -> LanguageMapping {
    LanguageMapping::new(Language::GO, NodeKind::Variable)
        .direct("source_file", NodeKind::File)
        .direct("package_clause", NodeKind::Namespace)
        .direct("function_declaration", NodeKind::Function)
        .direct("method_declaration", NodeKind::Method)
        .direct("func_literal", NodeKind::Closure)
        .direct("type_declaration", NodeKind::TypeAlias)
        .direct("struct_type", NodeKind::Class)
        .direct("interface_type", NodeKind::Interface)
        .direct("var_declaration", NodeKind::Variable)
        .direct("short_var_declaration", NodeKind::Variable)
        .direct("const_declaration", NodeKind::Variable)
        .direct("parameter_declaration", NodeKind::Parameter)
        .direct("variadic_parameter_declaration", NodeKind::Parameter)
        .direct("field_declaration", NodeKind::Field)
        .direct("if_statement", NodeKind::IfStatement)
        .direct("for_statement", NodeKind::ForStatement)
        .direct("expression_switch_statement", NodeKind::SwitchStatement)
        .direct("type_switch_statement", NodeKind::SwitchStatement)
        .direct("select_statement", NodeKind::SwitchStatement)
        .direct("import_declaration", NodeKind::Import)
        .direct("comment", NodeKind::Comment)
        .direct("interpreted_string_literal", NodeKind::StringLiteral)
        .direct("raw_string_literal", NodeKind::StringLiteral)
        // A type_spec wrapping a struct or interface names that type.
        .context_rule(ContextRule::new(
            "go.named-struct",
            NodeKind::Class,
            90,
            |ctx| {
                ctx.node.raw_type == "type_spec"
                    && ctx.node.children.iter().any(|c| c.raw_type == "struct_type")
            },
        ))
        .context_rule(ContextRule::new(
            "go.named-interface",
            NodeKind::Interface,
            90,
            |ctx| {
                ctx.node.raw_type == "type_spec"
                    && ctx.node.children.iter().any(|c| c.raw_type == "interface_type")
            },
        ))
        .pattern(pat("go.comment-like", "comment$", NodeKind::Comment, 50))
        .pattern(pat("go.string-like", "string_literal$", NodeKind::StringLiteral, 40))
        .fuzzy(FuzzyRule::new(
            "go.function-like",
            NodeKind::Function,
            0.7,
            ["function_declaration", "function_definition"],
        ))
}
