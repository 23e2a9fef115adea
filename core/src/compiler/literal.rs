use super::references::References;
use super::schema_compiler::Compiler;

use crate::errors::BuildError;
use crate::schema::LiteralNode;
use crate::vm::{Instruction, Key};

/// Compiles a scalar field.
///
/// An un-ruled literal emits nothing at all and never reaches the output.
pub(crate) struct LiteralCompiler<'a> {
    key: &'a Key,
    node: &'a LiteralNode,
    references: &'a References,
}

impl<'a> LiteralCompiler<'a> {
    pub fn new(key: &'a Key, node: &'a LiteralNode, references: &'a References) -> Self {
        Self {
            key,
            node,
            references,
        }
    }

    pub fn compile(&self, compiler: &mut Compiler<'_>) -> Result<(), BuildError> {
        if self.node.rules.is_empty() {
            return Ok(());
        }

        let binding = compiler.scaffold(self.key, &self.node.rules, self.references)?;
        compiler.emit(Instruction::CopyIfExists {
            binding,
            out: self.references.out,
            key: self.key.clone(),
        });
        Ok(())
    }
}
