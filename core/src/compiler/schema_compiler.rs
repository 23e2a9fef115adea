//! Recursive descent from a schema tree to a [`Program`].

use tracing::{debug, trace};

use super::array::ArrayCompiler;
use super::buffer::Buffer;
use super::literal::LiteralCompiler;
use super::object::ObjectCompiler;
use super::references::References;

use crate::api::CompilationOptions;
use crate::errors::BuildError;
use crate::rules::{CompiledRule, RuleRegistry};
use crate::schema::SchemaNode;
use crate::vm::{Binding, BoundRule, IndexVar, Instruction, Key, OutVar, Program, RuleId};

/// Schema compiler.
///
/// Owns the instruction buffer and the counters that mint every `val_N`,
/// `out_N` and `index_N` name for one compile pass. A single counter per name
/// kind spans the whole tree, so no two nodes ever share a binding.
pub struct Compiler<'r> {
    registry: &'r RuleRegistry,
    options: CompilationOptions,
    buffer: Buffer,
    rules: Vec<BoundRule>,
    next_binding: u32,
    next_output: u32,
    next_index: u32,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r RuleRegistry, options: CompilationOptions) -> Self {
        Self {
            registry,
            options,
            buffer: Buffer::new(),
            rules: Vec::new(),
            next_binding: 0,
            next_output: 0,
            next_index: 0,
        }
    }

    /// Compile a whole schema.
    ///
    /// The root must be an object node without rules; its children are read
    /// from the input document and written to the output object.
    pub fn compile(
        registry: &'r RuleRegistry,
        options: CompilationOptions,
        root: &SchemaNode,
    ) -> Result<Program, BuildError> {
        let SchemaNode::Object(object) = root else {
            return Err(BuildError::InvalidRoot {
                reason: format!("expected an object node, found {} node", root.kind()),
            });
        };
        if !object.rules.is_empty() {
            return Err(BuildError::InvalidRoot {
                reason: "the root object cannot carry rules".to_string(),
            });
        }

        debug!(fields = object.children.len(), "compiling schema");

        let mut compiler = Self::new(registry, options);
        let references = References::root();
        for (name, child) in &object.children {
            compiler.compile_node(&Key::Name(name.clone()), child, &references)?;
        }
        let program = compiler.finalize();

        debug!(
            instructions = program.instructions().len(),
            bindings = program.num_bindings(),
            rules = program.rules().len(),
            "compiled schema"
        );
        Ok(program)
    }

    /// Compile the field `key` of the container described by `references`.
    pub(crate) fn compile_node(
        &mut self,
        key: &Key,
        node: &SchemaNode,
        references: &References,
    ) -> Result<(), BuildError> {
        trace!(kind = %node.kind(), rules = node.rules().len(), "compiling node");
        match node {
            SchemaNode::Literal(literal) => LiteralCompiler::new(key, literal, references).compile(self),
            SchemaNode::Object(object) => ObjectCompiler::new(key, object, references).compile(self),
            SchemaNode::Array(array) => ArrayCompiler::new(key, array, references).compile(self),
        }
    }

    /// Hand over the compiled program.
    pub fn finalize(self) -> Program {
        Program {
            instructions: self.buffer.into_instructions(),
            rules: self.rules,
            num_bindings: self.next_binding as usize,
            num_outputs: self.next_output as usize,
            num_indices: self.next_index as usize,
            comments: self.options.comments,
        }
    }

    // === Naming ===

    pub(crate) fn mint_binding(&mut self) -> Binding {
        let binding = Binding(self.next_binding);
        self.next_binding += 1;
        binding
    }

    pub(crate) fn mint_output(&mut self) -> OutVar {
        let out = OutVar(self.next_output);
        self.next_output += 1;
        out
    }

    pub(crate) fn mint_index(&mut self) -> IndexVar {
        let index = IndexVar(self.next_index);
        self.next_index += 1;
        index
    }

    // === Emission ===

    pub(crate) fn buffer(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub(crate) fn emit(&mut self, instruction: Instruction) {
        self.buffer.emit(instruction);
    }

    /// Read the field into a fresh binding and derive its existence flag.
    pub(crate) fn bind(&mut self, key: &Key, references: &References) -> Binding {
        let binding = self.mint_binding();
        self.emit(Instruction::Bind {
            binding,
            source: references.source,
            key: key.clone(),
        });
        binding
    }

    /// Bind the field, install its write-back hook and context, then run
    /// every rule in declared order.
    pub(crate) fn scaffold(
        &mut self,
        key: &Key,
        rules: &[CompiledRule],
        references: &References,
    ) -> Result<Binding, BuildError> {
        let binding = self.bind(key, references);
        self.emit(Instruction::MutateHook { binding });
        self.emit(Instruction::Context {
            binding,
            tip: references.source,
            field: key.clone(),
            pointer: references.pointer(key),
        });
        for rule in rules {
            let rule = self.bind_rule(rule)?;
            self.emit(Instruction::Validate { binding, rule });
        }
        Ok(binding)
    }

    /// Close the guard opened at `guard`.
    pub(crate) fn close_guard(&mut self, guard: usize) -> Result<(), BuildError> {
        self.emit(Instruction::EndGuard);
        let end = self.buffer.label();
        self.buffer.patch_jump(guard, end)
    }

    fn bind_rule(&mut self, compiled: &CompiledRule) -> Result<RuleId, BuildError> {
        let rule = self.registry.require(&compiled.name)?.clone();
        let id = u32::try_from(self.rules.len())
            .map_err(|_| BuildError::malformed("", "too many rules"))?;
        self.rules.push(BoundRule {
            compiled: compiled.clone(),
            rule,
        });
        Ok(RuleId(id))
    }
}
