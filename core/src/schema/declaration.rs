//! Loading a schema tree from a JSON declaration.
//!
//! ```json
//! {
//!   "type": "object",
//!   "children": {
//!     "email": { "type": "literal", "subtype": "string",
//!                "rules": ["required", { "name": "string", "args": [{ "trim": true }] }] },
//!     "tags":  { "type": "array", "rules": ["array"],
//!                "element": { "type": "literal", "subtype": "string", "rules": ["string"] } }
//!   }
//! }
//! ```
//!
//! Every declared rule goes through its compile phase here, so argument
//! errors and unknown rule names surface before anything is compiled.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ArrayNode, LiteralNode, NodeKind, ObjectNode, SchemaNode};
use crate::errors::BuildError;
use crate::rules::{CompiledRule, RuleRegistry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DeclaredKind {
    Literal,
    Object,
    Array,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeDeclaration {
    #[serde(rename = "type")]
    kind: DeclaredKind,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    rules: Vec<RuleDeclaration>,
    #[serde(default)]
    children: Option<Map<String, Value>>,
    #[serde(default)]
    element: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleDeclaration {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

impl RuleDeclaration {
    fn name(&self) -> &str {
        match self {
            RuleDeclaration::Name(name) | RuleDeclaration::Full { name, .. } => name,
        }
    }

    fn args(&self) -> &[Value] {
        match self {
            RuleDeclaration::Name(_) => &[],
            RuleDeclaration::Full { args, .. } => args,
        }
    }
}

impl SchemaNode {
    /// Build a schema tree from its JSON declaration.
    pub fn from_declaration(
        declaration: &Value,
        registry: &RuleRegistry,
    ) -> Result<SchemaNode, BuildError> {
        Loader { registry }.node(declaration, "", false)
    }

    /// Parse and build a schema tree from JSON source text.
    pub fn from_json_str(source: &str, registry: &RuleRegistry) -> Result<SchemaNode, BuildError> {
        let declaration: Value = serde_json::from_str(source)
            .map_err(|err| BuildError::malformed("", format!("invalid JSON: {err}")))?;
        Self::from_declaration(&declaration, registry)
    }
}

struct Loader<'r> {
    registry: &'r RuleRegistry,
}

impl Loader<'_> {
    fn node(&self, value: &Value, path: &str, is_array_member: bool) -> Result<SchemaNode, BuildError> {
        let declaration = NodeDeclaration::deserialize(value)
            .map_err(|err| BuildError::malformed(path, err.to_string()))?;

        let kind = match declaration.kind {
            DeclaredKind::Literal => NodeKind::Literal,
            DeclaredKind::Object => NodeKind::Object,
            DeclaredKind::Array => NodeKind::Array,
        };

        if kind != NodeKind::Literal && declaration.subtype.is_some() {
            return Err(BuildError::malformed(
                path,
                format!("\"subtype\" is only allowed on literal nodes, found {kind} node"),
            ));
        }
        if kind != NodeKind::Object && declaration.children.is_some() {
            return Err(BuildError::malformed(
                path,
                format!("\"children\" is only allowed on object nodes, found {kind} node"),
            ));
        }
        if kind != NodeKind::Array && declaration.element.is_some() {
            return Err(BuildError::malformed(
                path,
                format!("\"element\" is only allowed on array nodes, found {kind} node"),
            ));
        }

        let subtype = match kind {
            NodeKind::Literal => declaration.subtype.as_deref(),
            NodeKind::Object => Some("object"),
            NodeKind::Array => Some("array"),
        };
        let rules = self.rules(&declaration.rules, subtype, is_array_member)?;

        Ok(match kind {
            NodeKind::Literal => SchemaNode::Literal(LiteralNode {
                subtype: declaration.subtype,
                rules,
            }),
            NodeKind::Object => {
                let children = declaration
                    .children
                    .unwrap_or_default()
                    .iter()
                    .map(|(name, child)| {
                        let child_path = join(path, name);
                        Ok((name.clone(), self.node(child, &child_path, false)?))
                    })
                    .collect::<Result<Vec<_>, BuildError>>()?;
                SchemaNode::Object(ObjectNode { rules, children })
            }
            NodeKind::Array => {
                let element = match &declaration.element {
                    Some(element) => Some(Box::new(self.node(element, &join(path, "*"), true)?)),
                    None => None,
                };
                SchemaNode::Array(ArrayNode { rules, element })
            }
        })
    }

    fn rules(
        &self,
        declared: &[RuleDeclaration],
        subtype: Option<&str>,
        is_array_member: bool,
    ) -> Result<Vec<CompiledRule>, BuildError> {
        declared
            .iter()
            .map(|rule| {
                self.registry
                    .compile(rule.name(), subtype, is_array_member, rule.args())
            })
            .collect()
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}
