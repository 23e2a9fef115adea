use crate::vm::{Binding, Key, OutRef, OutVar, Pointer, Source};

/// Where the node being compiled reads input from and writes output to.
///
/// Built fresh for every nesting level and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct References {
    /// Container receiving the sanitized output at this level.
    pub out: OutRef,
    /// Container holding the input at this level.
    pub source: Source,
    /// Path from the document root to the container.
    pub path: Pointer,
}

impl References {
    /// References for the direct children of the schema root.
    pub fn root() -> Self {
        Self {
            out: OutRef::Root,
            source: Source::Root,
            path: Pointer::default(),
        }
    }

    /// Path of the field `key` at this level.
    pub fn pointer(&self, key: &Key) -> Pointer {
        self.path.child(key.clone())
    }

    /// References for the members of the container bound to `binding` at
    /// `key`, whose output goes to `out`.
    pub fn descend(&self, key: &Key, binding: Binding, out: OutVar) -> Self {
        Self {
            out: OutRef::Container(out),
            source: Source::Binding(binding),
            path: self.pointer(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::IndexVar;

    #[test]
    fn test_descend_extends_path() {
        let root = References::root();
        let users = Key::Name("users".to_string());
        let members = root.descend(&users, Binding(0), OutVar(0));

        assert_eq!(members.out, OutRef::Container(OutVar(0)));
        assert_eq!(members.source, Source::Binding(Binding(0)));
        let pointer = members.pointer(&Key::Index(IndexVar(0)));
        assert_eq!(pointer.join_with(|_| "1".to_string()), "users.1");
        assert_eq!(pointer.array_expression().as_deref(), Some("users.*"));

        // The parent references are left untouched.
        assert_eq!(root, References::root());
    }
}
