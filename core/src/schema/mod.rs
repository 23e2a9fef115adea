//! Schema tree: the declarative description of an expected input shape.
//!
//! A schema is a tree of [`SchemaNode`]s. Every node carries an ordered list
//! of [`CompiledRule`]s, executed in that order. Object nodes own an ordered
//! list of named children and array nodes describe their members with a
//! single element node. Nodes are immutable once built.

use core::fmt;

use crate::rules::CompiledRule;

mod declaration;

#[cfg(test)]
mod declaration_test;

/// The three node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Literal,
    Object,
    Array,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Literal => write!(f, "literal"),
            NodeKind::Object => write!(f, "object"),
            NodeKind::Array => write!(f, "array"),
        }
    }
}

/// One field of a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Literal(LiteralNode),
    Object(ObjectNode),
    Array(ArrayNode),
}

impl SchemaNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            SchemaNode::Literal(_) => NodeKind::Literal,
            SchemaNode::Object(_) => NodeKind::Object,
            SchemaNode::Array(_) => NodeKind::Array,
        }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        match self {
            SchemaNode::Literal(node) => &node.rules,
            SchemaNode::Object(node) => &node.rules,
            SchemaNode::Array(node) => &node.rules,
        }
    }

    /// The subtype rules are compiled against. Structural nodes report their
    /// own kind.
    pub fn subtype(&self) -> Option<&str> {
        match self {
            SchemaNode::Literal(node) => node.subtype.as_deref(),
            SchemaNode::Object(_) => Some("object"),
            SchemaNode::Array(_) => Some("array"),
        }
    }
}

/// A scalar field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiteralNode {
    pub subtype: Option<String>,
    pub rules: Vec<CompiledRule>,
}

impl LiteralNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(subtype: impl Into<String>) -> Self {
        Self {
            subtype: Some(subtype.into()),
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: CompiledRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A key-value structure with named children, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    pub rules: Vec<CompiledRule>,
    pub children: Vec<(String, SchemaNode)>,
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: CompiledRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn child(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        self.children.push((name.into(), node.into()));
        self
    }
}

/// A sequence whose members all follow `element`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayNode {
    pub rules: Vec<CompiledRule>,
    pub element: Option<Box<SchemaNode>>,
}

impl ArrayNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: CompiledRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn of(mut self, element: impl Into<SchemaNode>) -> Self {
        self.element = Some(Box::new(element.into()));
        self
    }
}

impl From<LiteralNode> for SchemaNode {
    fn from(node: LiteralNode) -> Self {
        SchemaNode::Literal(node)
    }
}

impl From<ObjectNode> for SchemaNode {
    fn from(node: ObjectNode) -> Self {
        SchemaNode::Object(node)
    }
}

impl From<ArrayNode> for SchemaNode {
    fn from(node: ArrayNode) -> Self {
        SchemaNode::Array(node)
    }
}
