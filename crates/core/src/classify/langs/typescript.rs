use super::{pat, pat_ci};
use crate::classify::rules::{CompoundRule, ContextRule, FuzzyRule, LanguageMapping};
use canopy_api::models::{Language, NodeKind};

pub(super) fn mapping() -> LanguageMapping {
    LanguageMapping::new(Language::TYPESCRIPT, NodeKind::Variable)
        // Roots and containers
        .direct("program", NodeKind::File)
        .direct("module", NodeKind::Module)
        .direct("internal_module", NodeKind::Namespace)
        .direct("namespace_declaration", NodeKind::Namespace)
        .direct("class_declaration", NodeKind::Class)
        .direct("abstract_class_declaration", NodeKind::Class)
        .direct("class", NodeKind::Class)
        .direct("interface_declaration", NodeKind::Interface)
        .direct("enum_declaration", NodeKind::Enum)
        .direct("type_alias_declaration", NodeKind::TypeAlias)
        // Callables
        .direct("function_declaration", NodeKind::Function)
        .direct("generator_function_declaration", NodeKind::Function)
        .direct("method_definition", NodeKind::Method)
        .direct("method_signature", NodeKind::Method)
        .direct("arrow_function", NodeKind::Closure)
        .direct("function_expression", NodeKind::Closure)
        // Bindings
        .direct("variable_declaration", NodeKind::Variable)
        .direct("lexical_declaration", NodeKind::Variable)
        .direct("variable_declarator", NodeKind::Variable)
        .direct("required_parameter", NodeKind::Parameter)
        .direct("optional_parameter", NodeKind::Parameter)
        .direct("public_field_definition", NodeKind::Property)
        .direct("property_signature", NodeKind::Property)
        .direct("property_identifier", NodeKind::Property)
        // Statements
        .direct("if_statement", NodeKind::IfStatement)
        .direct("for_statement", NodeKind::ForStatement)
        .direct("for_in_statement", NodeKind::ForStatement)
        .direct("while_statement", NodeKind::WhileStatement)
        .direct("do_statement", NodeKind::WhileStatement)
        .direct("switch_statement", NodeKind::SwitchStatement)
        .direct("try_statement", NodeKind::TryStatement)
        // Module surface
        .direct("import_statement", NodeKind::Import)
        .direct("export_statement", NodeKind::Export)
        .direct("decorator", NodeKind::Decorator)
        .direct("comment", NodeKind::Comment)
        .direct("string", NodeKind::StringLiteral)
        .direct("template_string", NodeKind::StringLiteral)
        // Context rules
        .context_rule(ContextRule::new(
            "ts.identifier-under-class",
            NodeKind::Class,
            100,
            |ctx| ctx.node.raw_type == "identifier" && ctx.parent_is("class_declaration"),
        ))
        .context_rule(ContextRule::new(
            "ts.constructor-method",
            NodeKind::Constructor,
            95,
            |ctx| {
                ctx.node.raw_type == "method_definition"
                    && ctx.node.name.as_deref() == Some("constructor")
            },
        ))
        .context_rule(ContextRule::new(
            "ts.get-accessor",
            NodeKind::Getter,
            90,
            |ctx| {
                ctx.node.raw_type == "method_definition"
                    && ctx.node.properties.get("accessor").is_some_and(|a| a == "get")
            },
        ))
        .context_rule(ContextRule::new(
            "ts.set-accessor",
            NodeKind::Setter,
            90,
            |ctx| {
                ctx.node.raw_type == "method_definition"
                    && ctx.node.properties.get("accessor").is_some_and(|a| a == "set")
            },
        ))
        .context_rule(ContextRule::new(
            "ts.class-member-arrow",
            NodeKind::Method,
            80,
            |ctx| {
                ctx.node.raw_type == "arrow_function"
                    && ctx.parent_is("public_field_definition")
                    && ctx.flags.inside_class
            },
        ))
        // Pattern rules
        .pattern(pat("ts.import-like", "^import_", NodeKind::Import, 60))
        .pattern(pat("ts.export-like", "^export_", NodeKind::Export, 60))
        .pattern(pat("ts.comment-like", "comment$", NodeKind::Comment, 50))
        .pattern(pat("ts.string-like", "^string_", NodeKind::StringLiteral, 50))
        .pattern(pat_ci("ts.jsx-component", "^jsx_element", NodeKind::Property, 30))
        .pattern(
            pat("ts.member-function", "function", NodeKind::Method, 20).requires_context(),
        )
        // Compound rules
        .compound(
            CompoundRule::new(
                "ts.abstract-class",
                NodeKind::Class,
                50,
                &["abstract", "class"],
            )
            .expect("built-in pattern must compile"),
        )
        // Fuzzy rules
        .fuzzy(FuzzyRule::new(
            "ts.function-like",
            NodeKind::Function,
            0.7,
            ["function_declaration", "function_definition", "func_declaration"],
        ))
        .fuzzy(FuzzyRule::new(
            "ts.class-like",
            NodeKind::Class,
            0.7,
            ["class_declaration", "class_definition"],
        ))
}
