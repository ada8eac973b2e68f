use super::pat;
use crate::classify::rules::{ContextRule, FuzzyRule, LanguageMapping};
use canopy_api::models::{Language, NodeKind};

pub(super) fn mapping() -> LanguageMapping {
    LanguageMapping::new(Language::JAVA, NodeKind::Variable)
        .direct("program", NodeKind::File)
        .direct("package_declaration", NodeKind::Namespace)
        .direct("class_declaration", NodeKind::Class)
        .direct("record_declaration", NodeKind::Class)
        .direct("interface_declaration", NodeKind::Interface)
        // Annotation types are interfaces under the hood.
        .direct("annotation_type_declaration", NodeKind::Interface)
        .direct("enum_declaration", NodeKind::Enum)
        .direct("method_declaration", NodeKind::Method)
        .direct("constructor_declaration", NodeKind::Constructor)
        .direct("lambda_expression", NodeKind::Closure)
        .direct("field_declaration", NodeKind::Field)
        .direct("local_variable_declaration", NodeKind::Variable)
        .direct("formal_parameter", NodeKind::Parameter)
        .direct("spread_parameter", NodeKind::Parameter)
        .direct("if_statement", NodeKind::IfStatement)
        .direct("for_statement", NodeKind::ForStatement)
        .direct("enhanced_for_statement", NodeKind::ForStatement)
        .direct("while_statement", NodeKind::WhileStatement)
        .direct("do_statement", NodeKind::WhileStatement)
        .direct("switch_expression", NodeKind::SwitchStatement)
        .direct("try_statement", NodeKind::TryStatement)
        .direct("try_with_resources_statement", NodeKind::TryStatement)
        .direct("import_declaration", NodeKind::Import)
        .direct("marker_annotation", NodeKind::Decorator)
        .direct("annotation", NodeKind::Decorator)
        .direct("line_comment", NodeKind::Comment)
        .direct("block_comment", NodeKind::Comment)
        .direct("string_literal", NodeKind::StringLiteral)
        .context_rule(ContextRule::new(
            "java.getter-convention",
            NodeKind::Getter,
            90,
            |ctx| {
                ctx.node.raw_type == "method_declaration"
                    && ctx.node.name.as_deref().is_some_and(|n| {
                        n.starts_with("get") && n.len() > 3 && ctx.sibling_count > 0
                    })
            },
        ))
        .context_rule(ContextRule::new(
            "java.setter-convention",
            NodeKind::Setter,
            90,
            |ctx| {
                ctx.node.raw_type == "method_declaration"
                    && ctx.node.name.as_deref().is_some_and(|n| {
                        n.starts_with("set") && n.len() > 3 && ctx.sibling_count > 0
                    })
            },
        ))
        .pattern(pat("java.comment-like", "comment$", NodeKind::Comment, 50))
        .pattern(pat("java.annotation-like", "annotation", NodeKind::Decorator, 40))
        .pattern(pat("java.string-like", "^string_", NodeKind::StringLiteral, 40))
        .fuzzy(FuzzyRule::new(
            "java.method-like",
            NodeKind::Method,
            0.7,
            ["method_declaration", "method_definition"],
        ))
        .fuzzy(FuzzyRule::new(
            "java.class-like",
            NodeKind::Class,
            0.7,
            ["class_declaration", "class_definition"],
        ))
}
