use super::references::References;
use super::schema_compiler::Compiler;

use crate::errors::BuildError;
use crate::schema::ArrayNode;
use crate::vm::{Instruction, Key};

/// Compiles a sequence. Mirrors [`ObjectCompiler`](super::object::ObjectCompiler)
/// with an array guard and a loop over the members in place of the fixed set
/// of named children.
pub(crate) struct ArrayCompiler<'a> {
    key: &'a Key,
    node: &'a ArrayNode,
    references: &'a References,
}

impl<'a> ArrayCompiler<'a> {
    pub fn new(key: &'a Key, node: &'a ArrayNode, references: &'a References) -> Self {
        Self {
            key,
            node,
            references,
        }
    }

    pub fn compile(&self, compiler: &mut Compiler<'_>) -> Result<(), BuildError> {
        let has_rules = !self.node.rules.is_empty();

        let Some(element) = self.node.element.as_deref() else {
            if has_rules {
                let binding = compiler.scaffold(self.key, &self.node.rules, self.references)?;
                compiler.emit(Instruction::CopyIfExists {
                    binding,
                    out: self.references.out,
                    key: self.key.clone(),
                });
            }
            return Ok(());
        };

        let binding = if has_rules {
            compiler.scaffold(self.key, &self.node.rules, self.references)?
        } else {
            compiler.bind(self.key, self.references)
        };

        let guard = compiler
            .buffer()
            .placeholder(Instruction::GuardArray { binding, skip: 0 });
        let out = compiler.mint_output();
        compiler.emit(Instruction::NewArray {
            out,
            parent: self.references.out,
            key: self.key.clone(),
        });

        let index = compiler.mint_index();
        let head = compiler.buffer().placeholder(Instruction::IterBegin {
            array: binding,
            index,
            skip: 0,
        });

        let members = self.references.descend(self.key, binding, out);
        compiler.compile_node(&Key::Index(index), element, &members)?;

        let next = compiler
            .buffer()
            .placeholder(Instruction::IterNext { index, back: 0 });
        compiler.buffer().patch_jump(next, head)?;
        let exit = compiler.buffer().label();
        compiler.buffer().patch_jump(head, exit)?;

        compiler.close_guard(guard)
    }
}
