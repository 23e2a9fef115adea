//! Tests for the schema compiler.

use crate::api::CompilationOptions;
use crate::compiler::Compiler;
use crate::errors::BuildError;
use crate::rules::{CompiledRule, Rule, RuleContext, RuleRegistry};
use crate::schema::{ArrayNode, LiteralNode, ObjectNode, SchemaNode};
use crate::vm::{Binding, Instruction, Program};
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::Value;

fn compile(root: impl Into<SchemaNode>) -> Result<Program, BuildError> {
    Compiler::compile(
        RuleRegistry::builtins(),
        CompilationOptions::default(),
        &root.into(),
    )
}

fn field(name: &str, node: impl Into<SchemaNode>) -> SchemaNode {
    ObjectNode::new().child(name, node).into()
}

fn rule(name: &str) -> CompiledRule {
    CompiledRule::new(name)
}

#[test]
fn test_literal_without_rules_emits_nothing() {
    let program = compile(field("username", LiteralNode::of("string"))).unwrap();
    assert!(program.is_empty());
    assert_eq!(program.num_bindings(), 0);
    assert_eq!(program.to_string(), "");
}

#[test]
fn test_empty_object_emits_nothing() {
    let program = compile(field("user", ObjectNode::new())).unwrap();
    assert!(program.is_empty());
}

#[test]
fn test_empty_array_emits_nothing() {
    let program = compile(field("tags", ArrayNode::new())).unwrap();
    assert!(program.is_empty());
}

#[test]
fn test_nested_empty_nodes_emit_only_their_guards() {
    let program = compile(field(
        "user",
        ObjectNode::new().child("name", LiteralNode::new()),
    ))
    .unwrap();

    // The guard and container are still emitted for the un-ruled parent.
    assert_eq!(
        program.instructions().len(),
        4,
        "Bind, GuardObject, NewObject, EndGuard"
    );
    assert_eq!(program.num_bindings(), 1);
}

#[test]
fn test_compile_literal() {
    let program = compile(field(
        "username",
        LiteralNode::of("string").rule(rule("required").allow_undefineds()),
    ))
    .unwrap();

    assert_eq!(
        program.to_string(),
        indoc! {"
            // Validate root['username']
            let val_0 = root['username'];
            let val_0_exists = helpers.exists(val_0);
            function mutate_val_0 (newValue) {
              val_0 = newValue;
              val_0_exists = helpers.exists(val_0);
            }
            const val_0_options = {
              root,
              field: 'username',
              tip: root,
              pointer: 'username',
              mutate: mutate_val_0,
              errorReporter
            };
            validations.required.validate(val_0, {}, val_0_options);
            if (val_0_exists) {
              out['username'] = val_0;
            }
        "}
    );
}

#[test]
fn test_compile_object_with_rules_and_children() {
    let program = compile(field(
        "user",
        ObjectNode::new()
            .rule(rule("object"))
            .child("username", LiteralNode::of("string").rule(rule("string"))),
    ))
    .unwrap();

    assert_eq!(
        program.to_string(),
        indoc! {"
            // Validate root['user']
            let val_0 = root['user'];
            let val_0_exists = helpers.exists(val_0);
            function mutate_val_0 (newValue) {
              val_0 = newValue;
              val_0_exists = helpers.exists(val_0);
            }
            const val_0_options = {
              root,
              field: 'user',
              tip: root,
              pointer: 'user',
              mutate: mutate_val_0,
              errorReporter
            };
            val_0_exists && validations.object.validate(val_0, {}, val_0_options);

            if (val_0_exists && helpers.isObject(val_0)) {
              const out_0 = out['user'] = {};

              // Validate val_0['username']
              let val_1 = val_0['username'];
              let val_1_exists = helpers.exists(val_1);
              function mutate_val_1 (newValue) {
                val_1 = newValue;
                val_1_exists = helpers.exists(val_1);
              }
              const val_1_options = {
                root,
                field: 'username',
                tip: val_0,
                pointer: 'user.username',
                mutate: mutate_val_1,
                errorReporter
              };
              val_1_exists && validations.string.validate(val_1, {}, val_1_options);
              if (val_1_exists) {
                out_0['username'] = val_1;
              }
            }
        "}
    );
}

#[test]
fn test_compile_object_without_rules() {
    let program = compile(field(
        "user",
        ObjectNode::new().child("username", LiteralNode::of("string").rule(rule("string"))),
    ))
    .unwrap();

    // No rule invocation for the parent, but the guard and recursion remain.
    assert_eq!(
        program.to_string(),
        indoc! {"
            // Validate root['user']
            let val_0 = root['user'];
            let val_0_exists = helpers.exists(val_0);

            if (val_0_exists && helpers.isObject(val_0)) {
              const out_0 = out['user'] = {};

              // Validate val_0['username']
              let val_1 = val_0['username'];
              let val_1_exists = helpers.exists(val_1);
              function mutate_val_1 (newValue) {
                val_1 = newValue;
                val_1_exists = helpers.exists(val_1);
              }
              const val_1_options = {
                root,
                field: 'username',
                tip: val_0,
                pointer: 'user.username',
                mutate: mutate_val_1,
                errorReporter
              };
              val_1_exists && validations.string.validate(val_1, {}, val_1_options);
              if (val_1_exists) {
                out_0['username'] = val_1;
              }
            }
        "}
    );
}

#[test]
fn test_compile_object_without_children() {
    let program = compile(field("meta", ObjectNode::new().rule(rule("object")))).unwrap();

    assert_eq!(
        program.to_string(),
        indoc! {"
            // Validate root['meta']
            let val_0 = root['meta'];
            let val_0_exists = helpers.exists(val_0);
            function mutate_val_0 (newValue) {
              val_0 = newValue;
              val_0_exists = helpers.exists(val_0);
            }
            const val_0_options = {
              root,
              field: 'meta',
              tip: root,
              pointer: 'meta',
              mutate: mutate_val_0,
              errorReporter
            };
            val_0_exists && validations.object.validate(val_0, {}, val_0_options);
            if (val_0_exists) {
              out['meta'] = val_0;
            }
        "}
    );
}

#[test]
fn test_compile_array_without_element() {
    let program = compile(field("tags", ArrayNode::new().rule(rule("array")))).unwrap();

    let kinds: Vec<_> = program
        .instructions()
        .iter()
        .map(|instruction| match instruction {
            Instruction::Bind { .. } => "Bind",
            Instruction::MutateHook { .. } => "MutateHook",
            Instruction::Context { .. } => "Context",
            Instruction::Validate { .. } => "Validate",
            Instruction::CopyIfExists { .. } => "CopyIfExists",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["Bind", "MutateHook", "Context", "Validate", "CopyIfExists"]
    );
}

#[test]
fn test_compile_array_of_literals() {
    let program = compile(field(
        "tags",
        ArrayNode::new().of(LiteralNode::of("string").rule(rule("string"))),
    ))
    .unwrap();

    assert_eq!(
        program.to_string(),
        indoc! {"
            // Validate root['tags']
            let val_0 = root['tags'];
            let val_0_exists = helpers.exists(val_0);

            if (val_0_exists && helpers.isArray(val_0)) {
              const out_0 = out['tags'] = [];
              for (let index_0 = 0; index_0 < val_0.length; index_0++) {
                // Validate val_0[index_0]
                let val_1 = val_0[index_0];
                let val_1_exists = helpers.exists(val_1);
                function mutate_val_1 (newValue) {
                  val_1 = newValue;
                  val_1_exists = helpers.exists(val_1);
                }
                const val_1_options = {
                  root,
                  field: index_0,
                  tip: val_0,
                  pointer: `tags.${index_0}`,
                  arrayExpressionPointer: 'tags.*',
                  mutate: mutate_val_1,
                  errorReporter
                };
                val_1_exists && validations.string.validate(val_1, {}, val_1_options);
                if (val_1_exists) {
                  out_0[index_0] = val_1;
                }
              }
            }
        "}
    );
}

#[test]
fn test_compile_array_of_objects() {
    let program = compile(field(
        "users",
        ArrayNode::new().rule(rule("array")).of(
            ObjectNode::new().child("username", LiteralNode::of("string").rule(rule("string"))),
        ),
    ))
    .unwrap();

    assert_eq!(
        program.to_string(),
        indoc! {"
            // Validate root['users']
            let val_0 = root['users'];
            let val_0_exists = helpers.exists(val_0);
            function mutate_val_0 (newValue) {
              val_0 = newValue;
              val_0_exists = helpers.exists(val_0);
            }
            const val_0_options = {
              root,
              field: 'users',
              tip: root,
              pointer: 'users',
              mutate: mutate_val_0,
              errorReporter
            };
            val_0_exists && validations.array.validate(val_0, {}, val_0_options);

            if (val_0_exists && helpers.isArray(val_0)) {
              const out_0 = out['users'] = [];
              for (let index_0 = 0; index_0 < val_0.length; index_0++) {
                // Validate val_0[index_0]
                let val_1 = val_0[index_0];
                let val_1_exists = helpers.exists(val_1);

                if (val_1_exists && helpers.isObject(val_1)) {
                  const out_1 = out_0[index_0] = {};

                  // Validate val_1['username']
                  let val_2 = val_1['username'];
                  let val_2_exists = helpers.exists(val_2);
                  function mutate_val_2 (newValue) {
                    val_2 = newValue;
                    val_2_exists = helpers.exists(val_2);
                  }
                  const val_2_options = {
                    root,
                    field: 'username',
                    tip: val_1,
                    pointer: `users.${index_0}.username`,
                    arrayExpressionPointer: 'users.*.username',
                    mutate: mutate_val_2,
                    errorReporter
                  };
                  val_2_exists && validations.string.validate(val_2, {}, val_2_options);
                  if (val_2_exists) {
                    out_1['username'] = val_2;
                  }
                }
              }
            }
        "}
    );
}

#[test]
fn test_comments_can_be_disabled() {
    let root: SchemaNode = field(
        "age",
        LiteralNode::of("number").rule(rule("number")),
    );
    let program = Compiler::compile(
        RuleRegistry::builtins(),
        CompilationOptions { comments: false },
        &root,
    )
    .unwrap();

    assert!(program.to_string().starts_with("let val_0 = root['age'];\n"));
}

#[test]
fn test_binding_names_are_unique_across_the_tree() {
    let leaf = || LiteralNode::of("string").rule(rule("string"));
    let profile = || {
        ObjectNode::new()
            .rule(rule("object"))
            .child("name", leaf())
            .child("nick", leaf())
    };
    let root = ObjectNode::new()
        .child("owner", ObjectNode::new().child("profile", profile()).child("id", leaf()))
        .child("admin", ObjectNode::new().child("profile", profile()).child("id", leaf()))
        .child(
            "members",
            ArrayNode::new().of(
                ObjectNode::new()
                    .child("profile", profile())
                    .child("tags", ArrayNode::new().of(leaf())),
            ),
        );

    let program = compile(root).unwrap();
    let bindings = program.bindings();

    let mut sorted = bindings.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), bindings.len(), "duplicate binding in {bindings:?}");
    assert_eq!(bindings.len(), program.num_bindings());
    assert_eq!(
        bindings,
        (0..bindings.len() as u32).map(Binding).collect::<Vec<_>>(),
        "bindings are minted in emission order"
    );
    assert_eq!(program.num_indices(), 2);
}

#[test]
fn test_rules_run_in_declared_order() {
    let program = compile(field(
        "age",
        LiteralNode::of("number")
            .rule(rule("required").allow_undefineds())
            .rule(rule("number")),
    ))
    .unwrap();

    let names: Vec<_> = program
        .instructions()
        .iter()
        .filter_map(|instruction| match instruction {
            Instruction::Validate { rule, .. } => Some(program.rule(*rule).compiled.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["required", "number"]);
}

#[test]
fn test_root_must_be_an_object_without_rules() {
    let err = compile(LiteralNode::of("string")).unwrap_err();
    assert_eq!(
        err,
        BuildError::InvalidRoot {
            reason: "expected an object node, found literal node".to_string()
        }
    );

    let err = compile(ObjectNode::new().rule(rule("object"))).unwrap_err();
    assert!(matches!(err, BuildError::InvalidRoot { .. }));
}

#[test]
fn test_unregistered_rule_fails_compilation() {
    let err = Compiler::compile(
        &RuleRegistry::new(),
        CompilationOptions::default(),
        &field("a", LiteralNode::new().rule(rule("string"))),
    )
    .unwrap_err();
    assert_eq!(
        err,
        BuildError::UnknownRule {
            name: "string".to_string()
        }
    );
}

#[test]
fn test_async_rules_render_awaited() {
    struct Unique;

    impl Rule for Unique {
        fn name(&self) -> &'static str {
            "unique"
        }

        fn compile(
            &self,
            _subtype: Option<&str>,
            _is_array_member: bool,
            _args: &[Value],
        ) -> Result<CompiledRule, BuildError> {
            Ok(CompiledRule::new("unique").asynchronous())
        }

        fn validate(&self, _value: Option<&Value>, _options: &Value, _ctx: &mut RuleContext<'_>) {}
    }

    let mut registry = RuleRegistry::with_builtins();
    registry.register(Unique);
    let compiled = registry.compile("unique", Some("string"), false, &[]).unwrap();

    let program = Compiler::compile(
        &registry,
        CompilationOptions::default(),
        &field("email", LiteralNode::of("string").rule(compiled)),
    )
    .unwrap();

    assert!(program.is_async());
    assert!(
        program
            .to_string()
            .contains("val_0_exists && await validations.unique.validate(val_0, {}, val_0_options);")
    );
}
