use super::references::References;
use super::schema_compiler::Compiler;

use crate::errors::BuildError;
use crate::schema::ObjectNode;
use crate::vm::{Instruction, Key};

/// Compiles a key-value structure.
///
/// | rules | children | emitted                                               |
/// |-------|----------|-------------------------------------------------------|
/// | no    | no       | nothing                                               |
/// | yes   | no       | scaffold, rules, copy of the whole value              |
/// | no    | yes      | binding, object guard, nested container, children     |
/// | yes   | yes      | scaffold, rules, object guard, nested container, children |
pub(crate) struct ObjectCompiler<'a> {
    key: &'a Key,
    node: &'a ObjectNode,
    references: &'a References,
}

impl<'a> ObjectCompiler<'a> {
    pub fn new(key: &'a Key, node: &'a ObjectNode, references: &'a References) -> Self {
        Self {
            key,
            node,
            references,
        }
    }

    pub fn compile(&self, compiler: &mut Compiler<'_>) -> Result<(), BuildError> {
        let has_rules = !self.node.rules.is_empty();
        let has_children = !self.node.children.is_empty();

        if !has_children {
            if has_rules {
                let binding = compiler.scaffold(self.key, &self.node.rules, self.references)?;
                compiler.emit(Instruction::CopyIfExists {
                    binding,
                    out: self.references.out,
                    key: self.key.clone(),
                });
            }
            return Ok(());
        }

        let binding = if has_rules {
            compiler.scaffold(self.key, &self.node.rules, self.references)?
        } else {
            compiler.bind(self.key, self.references)
        };

        let guard = compiler
            .buffer()
            .placeholder(Instruction::GuardObject { binding, skip: 0 });
        let out = compiler.mint_output();
        compiler.emit(Instruction::NewObject {
            out,
            parent: self.references.out,
            key: self.key.clone(),
        });

        let members = self.references.descend(self.key, binding, out);
        for (name, child) in &self.node.children {
            compiler.compile_node(&Key::Name(name.clone()), child, &members)?;
        }

        compiler.close_guard(guard)
    }
}
