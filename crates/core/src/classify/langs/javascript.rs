use super::pat;
use crate::classify::rules::{ContextRule, FuzzyRule, LanguageMapping};
use canopy_api::models::{Language, NodeKind};

pub(super) fn mapping() -> LanguageMapping {
    LanguageMapping::new(Language::JAVASCRIPT, NodeKind::Variable)
        .direct("program", NodeKind::File)
        .direct("class_declaration", NodeKind::Class)
        .direct("class", NodeKind::Class)
        .direct("function_declaration", NodeKind::Function)
        .direct("generator_function_declaration", NodeKind::Function)
        .direct("method_definition", NodeKind::Method)
        .direct("arrow_function", NodeKind::Closure)
        .direct("function_expression", NodeKind::Closure)
        .direct("variable_declaration", NodeKind::Variable)
        .direct("lexical_declaration", NodeKind::Variable)
        .direct("variable_declarator", NodeKind::Variable)
        .direct("field_definition", NodeKind::Field)
        .direct("property_identifier", NodeKind::Property)
        .direct("pair", NodeKind::Property)
        .direct("if_statement", NodeKind::IfStatement)
        .direct("for_statement", NodeKind::ForStatement)
        .direct("for_in_statement", NodeKind::ForStatement)
        .direct("while_statement", NodeKind::WhileStatement)
        .direct("do_statement", NodeKind::WhileStatement)
        .direct("switch_statement", NodeKind::SwitchStatement)
        .direct("try_statement", NodeKind::TryStatement)
        .direct("import_statement", NodeKind::Import)
        .direct("export_statement", NodeKind::Export)
        .direct("comment", NodeKind::Comment)
        .direct("string", NodeKind::StringLiteral)
        .direct("template_string", NodeKind::StringLiteral)
        .context_rule(ContextRule::new(
            "js.identifier-under-class",
            NodeKind::Class,
            100,
            |ctx| ctx.node.raw_type == "identifier" && ctx.parent_is("class_declaration"),
        ))
        .context_rule(ContextRule::new(
            "js.constructor-method",
            NodeKind::Constructor,
            95,
            |ctx| {
                ctx.node.raw_type == "method_definition"
                    && ctx.node.name.as_deref() == Some("constructor")
            },
        ))
        .context_rule(ContextRule::new(
            "js.getter",
            NodeKind::Getter,
            90,
            |ctx| {
                ctx.node.raw_type == "method_definition"
                    && ctx.node.properties.get("accessor").is_some_and(|a| a == "get")
            },
        ))
        .context_rule(ContextRule::new(
            "js.setter",
            NodeKind::Setter,
            90,
            |ctx| {
                ctx.node.raw_type == "method_definition"
                    && ctx.node.properties.get("accessor").is_some_and(|a| a == "set")
            },
        ))
        .pattern(pat("js.import-like", "^import_", NodeKind::Import, 60))
        .pattern(pat("js.export-like", "^export_", NodeKind::Export, 60))
        .pattern(pat("js.comment-like", "comment$", NodeKind::Comment, 50))
        .pattern(pat("js.string-like", "^string_", NodeKind::StringLiteral, 50))
        .fuzzy(FuzzyRule::new(
            "js.function-like",
            NodeKind::Function,
            0.7,
            ["function_declaration", "function_definition"],
        ))
        .fuzzy(FuzzyRule::new(
            "js.class-like",
            NodeKind::Class,
            0.7,
            ["class_declaration", "class_definition"],
        ))
}
