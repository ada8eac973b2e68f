use super::pat;
use crate::classify::rules::{ContextRule, FuzzyRule, LanguageMapping};
use canopy_api::models::{Language, NodeKind};

pub(super) fn mapping() -> LanguageMapping {
    LanguageMapping::new(Language::PYTHON, NodeKind::Variable)
        .direct("module", NodeKind::File)
        .direct("class_definition", NodeKind::Class)
        .direct("function_definition", NodeKind::Function)
        .direct("lambda", NodeKind::Closure)
        .direct("assignment", NodeKind::Variable)
        .direct("augmented_assignment", NodeKind::Variable)
        .direct("typed_parameter", NodeKind::Parameter)
        .direct("default_parameter", NodeKind::Parameter)
        .direct("typed_default_parameter", NodeKind::Parameter)
        .direct("if_statement", NodeKind::IfStatement)
        .direct("for_statement", NodeKind::ForStatement)
        .direct("while_statement", NodeKind::WhileStatement)
        .direct("match_statement", NodeKind::SwitchStatement)
        .direct("try_statement", NodeKind::TryStatement)
        .direct("import_statement", NodeKind::Import)
        .direct("import_from_statement", NodeKind::Import)
        .direct("decorator", NodeKind::Decorator)
        .direct("comment", NodeKind::Comment)
        .direct("string", NodeKind::StringLiteral)
        .direct("concatenated_string", NodeKind::StringLiteral)
        // Methods are functions that live in a class body; dunder-init is
        // the constructor.
        .context_rule(ContextRule::new(
            "py.dunder-init",
            NodeKind::Constructor,
            100,
            |ctx| {
                ctx.node.raw_type == "function_definition"
                    && ctx.node.name.as_deref() == Some("__init__")
                    && ctx.flags.inside_class
            },
        ))
        .context_rule(ContextRule::new(
            "py.method-in-class",
            NodeKind::Method,
            90,
            |ctx| ctx.node.raw_type == "function_definition" && ctx.flags.inside_class,
        ))
        .context_rule(ContextRule::new(
            "py.property-getter",
            NodeKind::Getter,
            95,
            |ctx| {
                ctx.node.raw_type == "function_definition"
                    && ctx.flags.inside_class
                    && ctx.node.properties.get("decorator").is_some_and(|d| d == "property")
            },
        ))
        .pattern(pat("py.import-like", "^import_", NodeKind::Import, 60))
        .pattern(pat("py.string-like", "^string_", NodeKind::StringLiteral, 50))
        .pattern(pat("py.comment-like", "comment$", NodeKind::Comment, 50))
        .fuzzy(FuzzyRule::new(
            "py.function-like",
            NodeKind::Function,
            0.7,
            ["function_definition", "function_declaration"],
        ))
        .fuzzy(FuzzyRule::new(
            "py.class-like",
            NodeKind::Class,
            0.7,
            ["class_definition", "class_declaration"],
        ))
}
