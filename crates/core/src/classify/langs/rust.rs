use super::pat;
use crate::classify::rules::{ContextRule, FuzzyRule, LanguageMapping};
use canopy_api::models::{Language, NodeKind};

pub(super) fn mapping() -> LanguageMapping {
    LanguageMapping::new(Language::RUST, NodeKind::Variable)
        .direct("source_file", NodeKind::File)
        .direct("mod_item", NodeKind::Module)
        .direct("struct_item", NodeKind::Class)
        .direct("union_item", NodeKind::Class)
        .direct("trait_item", NodeKind::Interface)
        .direct("enum_item", NodeKind::Enum)
        .direct("type_item", NodeKind::TypeAlias)
        .direct("function_item", NodeKind::Function)
        .direct("function_signature_item", NodeKind::Function)
        .direct("closure_expression", NodeKind::Closure)
        .direct("let_declaration", NodeKind::Variable)
        .direct("const_item", NodeKind::Variable)
        .direct("static_item", NodeKind::Variable)
        .direct("parameter", NodeKind::Parameter)
        .direct("field_declaration", NodeKind::Field)
        .direct("if_expression", NodeKind::IfStatement)
        .direct("for_expression", NodeKind::ForStatement)
        .direct("while_expression", NodeKind::WhileStatement)
        .direct("loop_expression", NodeKind::WhileStatement)
        .direct("match_expression", NodeKind::SwitchStatement)
        .direct("use_declaration", NodeKind::Import)
        .direct("attribute_item", NodeKind::Decorator)
        .direct("line_comment", NodeKind::Comment)
        .direct("block_comment", NodeKind::Comment)
        .direct("string_literal", NodeKind::StringLiteral)
        .direct("raw_string_literal", NodeKind::StringLiteral)
        // Functions inside an impl block are methods; `new` is the
        // conventional constructor.
        .context_rule(ContextRule::new(
            "rs.constructor-new",
            NodeKind::Constructor,
            100,
            |ctx| {
                ctx.node.raw_type == "function_item"
                    && ctx.node.name.as_deref() == Some("new")
                    && ctx.any_ancestor(|a| a.raw_type == "impl_item")
            },
        ))
        .context_rule(ContextRule::new(
            "rs.method-in-impl",
            NodeKind::Method,
            90,
            |ctx| {
                ctx.node.raw_type == "function_item"
                    && ctx.any_ancestor(|a| a.raw_type == "impl_item" || a.raw_type == "trait_item")
            },
        ))
        .pattern(pat("rs.comment-like", "comment$", NodeKind::Comment, 50))
        .pattern(pat("rs.string-like", "^string", NodeKind::StringLiteral, 40))
        .pattern(pat("rs.macro-like", "^macro_", NodeKind::Function, 30))
        .fuzzy(FuzzyRule::new(
            "rs.function-like",
            NodeKind::Function,
            0.7,
            ["function_item", "function_definition"],
        ))
        .fuzzy(FuzzyRule::new(
            "rs.struct-like",
            NodeKind::Class,
            0.7,
            ["struct_item", "struct_definition"],
        ))
}
