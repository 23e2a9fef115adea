mod cases;

use serde_json::json;

test_case!(
    numbers_are_cast_from_strings,
    schema: json!({
        "type": "object",
        "children": {
            "age": {"type": "literal", "subtype": "number", "rules": ["number"]},
            "score": {"type": "literal", "subtype": "number", "rules": ["number"]}
        }
    }),
    input: json!({"age": "42", "score": 9.5}),
    output: json!({"age": 42, "score": 9.5}),
);

test_case!(
    booleans_are_cast_from_strings,
    schema: json!({
        "type": "object",
        "children": {
            "active": {"type": "literal", "subtype": "boolean", "rules": ["boolean"]},
            "admin": {"type": "literal", "subtype": "boolean", "rules": ["boolean"]}
        }
    }),
    input: json!({"active": "true", "admin": "0"}),
    output: json!({"active": true, "admin": false}),
);

test_case!(
    type_rules_report_mismatches,
    schema: json!({
        "type": "object",
        "children": {
            "name": {"type": "literal", "subtype": "string", "rules": ["string"]},
            "age": {"type": "literal", "subtype": "number", "rules": ["number"]},
            "active": {"type": "literal", "subtype": "boolean", "rules": ["boolean"]}
        }
    }),
    input: json!({"name": 7, "age": "old", "active": "yes"}),
    errors: [("name", "string"), ("age", "number"), ("active", "boolean")],
);

test_case!(
    trimmed_strings,
    schema: json!({
        "type": "object",
        "children": {
            "name": {
                "type": "literal",
                "subtype": "string",
                "rules": [{"name": "string", "args": [{"trim": true}]}]
            }
        }
    }),
    input: json!({"name": "  ada  "}),
    output: json!({"name": "ada"}),
);

test_case!(
    required_rejects_blank_values,
    schema: json!({
        "type": "object",
        "children": {
            "a": {"type": "literal", "rules": ["required"]},
            "b": {"type": "literal", "rules": ["required"]},
            "c": {"type": "literal", "rules": ["required"]},
            "d": {"type": "literal", "rules": ["required"]}
        }
    }),
    input: json!({"b": null, "c": "", "d": 0}),
    errors: [("a", "required"), ("b", "required"), ("c", "required")],
);

test_case!(
    falsy_values_are_kept,
    schema: json!({
        "type": "object",
        "children": {
            "count": {"type": "literal", "rules": ["required"]},
            "enabled": {"type": "literal", "rules": ["required"]},
            "tags": {"type": "literal", "rules": ["required"]}
        }
    }),
    input: json!({"count": 0, "enabled": false, "tags": []}),
    output: json!({"count": 0, "enabled": false, "tags": []}),
);

test_case!(
    null_values_are_not_copied,
    schema: json!({
        "type": "object",
        "children": {
            "nickname": {"type": "literal", "subtype": "string", "rules": ["string"]}
        }
    }),
    input: json!({"nickname": null}),
    output: json!({}),
);
