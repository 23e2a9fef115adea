//! Tests for loading schema declarations.

use crate::errors::BuildError;
use crate::rules::{CompiledRule, RuleRegistry};
use crate::schema::{ArrayNode, LiteralNode, ObjectNode, SchemaNode};
use pretty_assertions::assert_eq;
use serde_json::json;

fn load(declaration: serde_json::Value) -> Result<SchemaNode, BuildError> {
    SchemaNode::from_declaration(&declaration, RuleRegistry::builtins())
}

#[test]
fn test_load_nested_declaration() {
    let node = load(json!({
        "type": "object",
        "children": {
            "user": {
                "type": "object",
                "rules": ["object"],
                "children": {
                    "username": {
                        "type": "literal",
                        "subtype": "string",
                        "rules": ["required", {"name": "string", "args": [{"trim": true}]}]
                    }
                }
            },
            "tags": {
                "type": "array",
                "element": {"type": "literal", "subtype": "string", "rules": ["string"]}
            }
        }
    }))
    .unwrap();

    let expected: SchemaNode = ObjectNode::new()
        .child(
            "user",
            ObjectNode::new().rule(CompiledRule::new("object")).child(
                "username",
                LiteralNode::of("string")
                    .rule(CompiledRule::new("required").allow_undefineds())
                    .rule(CompiledRule::new("string").with_options(json!({"trim": true}))),
            ),
        )
        .child(
            "tags",
            ArrayNode::new().of(
                LiteralNode::of("string")
                    .rule(CompiledRule::new("string").with_options(json!({"trim": false}))),
            ),
        )
        .into();

    assert_eq!(node, expected);
}

#[test]
fn test_children_keep_declaration_order() {
    let node = load(json!({
        "type": "object",
        "children": {
            "zeta": {"type": "literal"},
            "alpha": {"type": "literal"},
            "mid": {"type": "literal"}
        }
    }))
    .unwrap();

    let SchemaNode::Object(object) = node else {
        panic!("expected an object node");
    };
    let names: Vec<_> = object.children.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_unknown_node_type_fails() {
    let err = load(json!({
        "type": "object",
        "children": {"tags": {"type": "set"}}
    }))
    .unwrap_err();
    match err {
        BuildError::MalformedSchema { path, reason } => {
            assert_eq!(path, "tags");
            assert!(reason.contains("unknown variant `set`"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_kind_decides_populated_members() {
    let err = load(json!({
        "type": "object",
        "children": {"name": {"type": "literal", "children": {}}}
    }))
    .unwrap_err();
    assert_eq!(
        err,
        BuildError::malformed(
            "name",
            "\"children\" is only allowed on object nodes, found literal node"
        )
    );

    let err = load(json!({"type": "object", "element": {"type": "literal"}})).unwrap_err();
    assert_eq!(
        err,
        BuildError::malformed("", "\"element\" is only allowed on array nodes, found object node")
    );
}

#[test]
fn test_unknown_fields_fail() {
    let err = load(json!({"type": "literal", "rulez": []})).unwrap_err();
    assert!(matches!(err, BuildError::MalformedSchema { .. }));
}

#[test]
fn test_unknown_rule_fails() {
    let err = load(json!({
        "type": "object",
        "children": {"email": {"type": "literal", "rules": ["email"]}}
    }))
    .unwrap_err();
    assert_eq!(
        err,
        BuildError::UnknownRule {
            name: "email".to_string()
        }
    );
}

#[test]
fn test_rule_argument_errors_abort_the_build() {
    let err = load(json!({
        "type": "object",
        "children": {
            "phone": {"type": "literal", "rules": [{"name": "requiredIfNotExistsAll", "args": ["email"]}]}
        }
    }))
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "requiredIfNotExistsAll: expects \"fields\" to be an array"
    );
}

#[test]
fn test_rules_see_subtype_and_array_membership() {
    use crate::rules::{Rule, RuleContext};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Spy(Mutex<Vec<(Option<String>, bool)>>);

    struct SpyRule(Arc<Spy>);

    impl Rule for SpyRule {
        fn name(&self) -> &'static str {
            "spy"
        }

        fn compile(
            &self,
            subtype: Option<&str>,
            is_array_member: bool,
            _args: &[Value],
        ) -> Result<CompiledRule, BuildError> {
            self.0
                .0
                .lock()
                .unwrap()
                .push((subtype.map(str::to_string), is_array_member));
            Ok(CompiledRule::new("spy"))
        }

        fn validate(&self, _value: Option<&Value>, _options: &Value, _ctx: &mut RuleContext<'_>) {}
    }

    let spy = Arc::new(Spy::default());
    let mut registry = RuleRegistry::new();
    registry.register(SpyRule(spy.clone()));

    SchemaNode::from_declaration(
        &json!({
            "type": "object",
            "children": {
                "scores": {
                    "type": "array",
                    "rules": ["spy"],
                    "element": {"type": "literal", "subtype": "number", "rules": ["spy"]}
                }
            }
        }),
        &registry,
    )
    .unwrap();

    assert_eq!(
        *spy.0.lock().unwrap(),
        vec![
            (Some("array".to_string()), false),
            (Some("number".to_string()), true),
        ]
    );
}

#[test]
fn test_invalid_json_source() {
    let err = SchemaNode::from_json_str("{ nope", RuleRegistry::builtins()).unwrap_err();
    assert!(err.to_string().starts_with("malformed schema at \"\": invalid JSON"));
}
