//! Cross-field lookup.
//!
//! Rules that depend on other fields name them with a dotted reference. A
//! reference starting with `/` is absolute and is evaluated from the document
//! root; anything else is relative and is evaluated from the tip, the nearest
//! enclosing container of the field being validated.
//!
//! ```text
//! "/account.email"   root -> account -> email
//! "email"            tip  -> email
//! "items.0.sku"      tip  -> items -> [0] -> sku
//! ```
//!
//! Resolution never fails: a missing segment anywhere along the way resolves
//! to undefined (`None`) and the calling rule decides what that means.

use serde_json::Value;

use crate::values::{get_field, get_index};

/// A parsed field reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    /// Evaluated from the document root.
    Absolute(&'a str),
    /// Evaluated from the tip.
    Relative(&'a str),
}

impl<'a> FieldRef<'a> {
    pub fn parse(reference: &'a str) -> Self {
        match reference.strip_prefix('/') {
            Some(path) => FieldRef::Absolute(path),
            None => FieldRef::Relative(reference),
        }
    }

    pub fn path(&self) -> &'a str {
        match self {
            FieldRef::Absolute(path) | FieldRef::Relative(path) => path,
        }
    }
}

/// Resolve `reference` against `root` or `tip`.
pub fn resolve<'v>(reference: &str, root: &'v Value, tip: Option<&'v Value>) -> Option<&'v Value> {
    match FieldRef::parse(reference) {
        FieldRef::Absolute(path) => walk(Some(root), path),
        FieldRef::Relative(path) => walk(tip, path),
    }
}

/// Follow a dot separated path. Numeric segments index into arrays.
fn walk<'v>(start: Option<&'v Value>, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return start;
    }

    path.split('.').try_fold(start?, |current, segment| match current {
        Value::Object(_) => get_field(Some(current), segment),
        Value::Array(_) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| get_index(Some(current), index)),
        _ => None,
    })
}
