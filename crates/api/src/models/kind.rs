use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized node taxonomy. Closed set: classification always resolves to
/// one of these, falling back to `Variable` when nothing else applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Module,
    Namespace,
    Class,
    Interface,
    Enum,
    TypeAlias,
    Function,
    Method,
    Constructor,
    Getter,
    Setter,
    Closure,
    Variable,
    Parameter,
    Property,
    Field,
    IfStatement,
    ForStatement,
    WhileStatement,
    SwitchStatement,
    TryStatement,
    Import,
    Export,
    Decorator,
    Comment,
    StringLiteral,
}

impl NodeKind {
    pub const ALL: [NodeKind; 27] = [
        NodeKind::File,
        NodeKind::Module,
        NodeKind::Namespace,
        NodeKind::Class,
        NodeKind::Interface,
        NodeKind::Enum,
        NodeKind::TypeAlias,
        NodeKind::Function,
        NodeKind::Method,
        NodeKind::Constructor,
        NodeKind::Getter,
        NodeKind::Setter,
        NodeKind::Closure,
        NodeKind::Variable,
        NodeKind::Parameter,
        NodeKind::Property,
        NodeKind::Field,
        NodeKind::IfStatement,
        NodeKind::ForStatement,
        NodeKind::WhileStatement,
        NodeKind::SwitchStatement,
        NodeKind::TryStatement,
        NodeKind::Import,
        NodeKind::Export,
        NodeKind::Decorator,
        NodeKind::Comment,
        NodeKind::StringLiteral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Module => "module",
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::Enum => "enum",
            NodeKind::TypeAlias => "type_alias",
            NodeKind::Function => "function",
            NodeKind::Method => "method",
            NodeKind::Constructor => "constructor",
            NodeKind::Getter => "getter",
            NodeKind::Setter => "setter",
            NodeKind::Closure => "closure",
            NodeKind::Variable => "variable",
            NodeKind::Parameter => "parameter",
            NodeKind::Property => "property",
            NodeKind::Field => "field",
            NodeKind::IfStatement => "if_statement",
            NodeKind::ForStatement => "for_statement",
            NodeKind::WhileStatement => "while_statement",
            NodeKind::SwitchStatement => "switch_statement",
            NodeKind::TryStatement => "try_statement",
            NodeKind::Import => "import",
            NodeKind::Export => "export",
            NodeKind::Decorator => "decorator",
            NodeKind::Comment => "comment",
            NodeKind::StringLiteral => "string_literal",
        }
    }

    pub fn from_label(label: &str) -> Option<NodeKind> {
        NodeKind::ALL.iter().copied().find(|k| k.as_str() == label)
    }

    /// Declaration-like kinds introduce a named construct.
    pub fn is_declaration_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Module
                | NodeKind::Namespace
                | NodeKind::Class
                | NodeKind::Interface
                | NodeKind::Enum
                | NodeKind::TypeAlias
                | NodeKind::Function
                | NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::Getter
                | NodeKind::Setter
                | NodeKind::Variable
                | NodeKind::Parameter
                | NodeKind::Property
                | NodeKind::Field
        )
    }

    /// Kinds that take parameters.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            NodeKind::Function
                | NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::Getter
                | NodeKind::Setter
                | NodeKind::Closure
        )
    }

    /// Kinds that hold members (methods, fields, properties).
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Interface | NodeKind::Enum | NodeKind::Module
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse semantic category assigned during normalization. Categories are
/// mutually exclusive; membership checks run in declaration → statement →
/// expression → literal → identifier order, first match wins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SemanticCategory {
    Declaration,
    Statement,
    Expression,
    Literal,
    Identifier,
    #[default]
    Other,
}
