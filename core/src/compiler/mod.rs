//! Schema compiler for Sieve.
//!
//! Turns a schema tree into a [`Program`](crate::vm::Program): a flat,
//! ordered instruction sequence that validates one input in a single pass.
//!
//! ## Design
//!
//! - One node compiler per node kind (literal, object, array), picked by an
//!   exhaustive match over [`SchemaNode`](crate::schema::SchemaNode)
//! - Immutable [`References`](references::References) threaded through the
//!   recursion: output container, input container and path of each level
//! - Counters owned by the [`Compiler`] mint every binding name
//! - Guards and loops are emitted as jump placeholders and patched once their
//!   block is complete

mod array;
mod buffer;
mod literal;
mod object;
mod references;
mod schema_compiler;

#[cfg(test)]
mod tests;

pub use schema_compiler::Compiler;
