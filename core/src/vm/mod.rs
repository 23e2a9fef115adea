//! The instruction set, the compiled program and the executor.

mod code;
mod instruction_set;
mod runtime;


pub use code::{BoundRule, Program};
pub use instruction_set::{Binding, IndexVar, Instruction, Key, OutRef, OutVar, Pointer, RuleId, Source};
pub use runtime::VM;
