//! Sieve VM instructions.
//!
//! A compiled program is a flat, ordered list of [`Instruction`]s. Blocks
//! (guards and array loops) are delimited by a closing instruction and carry
//! a relative jump to skip or repeat their body:
//!
//! ```text
//!  0  Bind val_0 = root['user']
//!  1  GuardObject val_0 (skip 3)   ──┐ guard fails: continue at 5
//!  2  NewObject out_0 = out['user']  │
//!  3  ...                            │
//!  4  EndGuard                     <─┘
//!  5  ...
//! ```
//!
//! Jumps are relative to the instruction *after* the jumping one, the same
//! way the instruction pointer has already advanced when the jump executes.

use core::fmt;

/// Holder of one field's current value (`val_N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding(pub u32);

/// Nested output container (`out_N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutVar(pub u32);

/// Loop position of an array member loop (`index_N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexVar(pub u32);

/// Position of a compiled rule in the program's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(pub u32);

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "val_{}", self.0)
    }
}

impl fmt::Display for OutVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "out_{}", self.0)
    }
}

impl fmt::Display for IndexVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index_{}", self.0)
    }
}

/// Container a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The input document.
    Root,
    Binding(Binding),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Root => write!(f, "root"),
            Source::Binding(binding) => write!(f, "{binding}"),
        }
    }
}

/// Container sanitized output is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutRef {
    /// The top-level output object.
    Root,
    Container(OutVar),
}

impl fmt::Display for OutRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutRef::Root => write!(f, "out"),
            OutRef::Container(out) => write!(f, "{out}"),
        }
    }
}

/// A field key: an object member name, or the current position of a loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Name(String),
    Index(IndexVar),
}

impl Key {
    /// Subscript form: `['name']` or `[index_0]`.
    pub fn subscript(&self) -> String {
        match self {
            Key::Name(name) => format!("['{}']", escape(name)),
            Key::Index(index) => format!("[{index}]"),
        }
    }
}

/// Path from the document root to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointer {
    pub segments: Vec<Key>,
}

impl Pointer {
    pub fn child(&self, key: Key) -> Pointer {
        let mut segments = self.segments.clone();
        segments.push(key);
        Pointer { segments }
    }

    /// Whether the path crosses an array.
    pub fn has_index(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Key::Index(_)))
    }

    /// Join the path, rendering each loop position with `index`.
    pub fn join_with(&self, mut index: impl FnMut(IndexVar) -> String) -> String {
        let mut joined = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                joined.push('.');
            }
            match segment {
                Key::Name(name) => joined.push_str(name),
                Key::Index(var) => joined.push_str(&index(*var)),
            }
        }
        joined
    }

    /// Path with every array position replaced by `*`, if the path crosses
    /// an array.
    pub fn array_expression(&self) -> Option<String> {
        self.has_index()
            .then(|| self.join_with(|_| "*".to_string()))
    }
}

/// A single VM instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Read `source[key]` into `binding` and derive its existence flag.
    /// `let val_N = source[key]; let val_N_exists = helpers.exists(val_N);`
    Bind {
        binding: Binding,
        source: Source,
        key: Key,
    },

    /// Install the write-back hook used by rules to coerce `binding`.
    MutateHook { binding: Binding },

    /// Build the runtime validation context for `binding`.
    Context {
        binding: Binding,
        tip: Source,
        field: Key,
        pointer: Pointer,
    },

    /// Run one rule against `binding`. Skipped for undefined or null values
    /// unless the rule allows undefineds.
    Validate { binding: Binding, rule: RuleId },

    /// `if (val_N_exists) { out[key] = val_N; }`
    CopyIfExists {
        binding: Binding,
        out: OutRef,
        key: Key,
    },

    /// Enter the block when `binding` exists and is an object, otherwise
    /// jump forward by `skip`.
    GuardObject { binding: Binding, skip: u32 },

    /// Enter the block when `binding` exists and is an array, otherwise
    /// jump forward by `skip`.
    GuardArray { binding: Binding, skip: u32 },

    /// `const out_N = parent[key] = {};`
    NewObject {
        out: OutVar,
        parent: OutRef,
        key: Key,
    },

    /// `const out_N = parent[key] = [];`
    NewArray {
        out: OutVar,
        parent: OutRef,
        key: Key,
    },

    /// Loop head over the members of `array`. When the loop is exhausted
    /// jump forward by `skip`, past the matching `IterNext`.
    IterBegin {
        array: Binding,
        index: IndexVar,
        skip: u32,
    },

    /// Advance `index` and jump back by `back` to the loop head.
    IterNext { index: IndexVar, back: u32 },

    /// Closes a guard block.
    EndGuard,
}

/// Escape a field name for use inside a single quoted literal.
pub(crate) fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}
