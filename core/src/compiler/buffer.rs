use crate::errors::BuildError;
use crate::vm::Instruction;

/// Append-only instruction accumulator owned by one compile pass.
#[derive(Debug, Default)]
pub(crate) struct Buffer {
    instructions: Vec<Instruction>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Current instruction index (for use as a jump label).
    pub fn label(&self) -> usize {
        self.instructions.len()
    }

    /// Emit a jumping instruction whose offset is not known yet and return
    /// its index for [`Buffer::patch_jump`].
    pub fn placeholder(&mut self, instruction: Instruction) -> usize {
        let index = self.label();
        self.emit(instruction);
        index
    }

    /// Point the jump at `at` to `target`.
    ///
    /// The VM has already advanced past the jumping instruction, so forward
    /// offsets are `target - at - 1` and backward offsets `at + 1 - target`.
    pub fn patch_jump(&mut self, at: usize, target: usize) -> Result<(), BuildError> {
        let forward = || offset(target.checked_sub(at + 1));
        let backward = || offset((at + 1).checked_sub(target));

        match &mut self.instructions[at] {
            Instruction::GuardObject { skip, .. }
            | Instruction::GuardArray { skip, .. }
            | Instruction::IterBegin { skip, .. } => *skip = forward()?,
            Instruction::IterNext { back, .. } => *back = backward()?,
            other => {
                return Err(BuildError::malformed(
                    "",
                    format!("cannot patch non-jumping instruction {other:?}"),
                ));
            }
        }
        Ok(())
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

fn offset(distance: Option<usize>) -> Result<u32, BuildError> {
    distance
        .and_then(|distance| u32::try_from(distance).ok())
        .ok_or_else(|| BuildError::malformed("", "jump offset out of range"))
}
