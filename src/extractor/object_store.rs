//! The object-resolution collaborator.
//!
//! This crate never parses file structure (xref tables, object streams,
//! trailers) or decodes/decrypts stream data — it consumes an
//! [`ObjectStore`] that has already done so. [`InMemoryObjectStore`] is a
//! minimal in-process implementation useful for tests and embedders that
//! have already materialized every object they care about.

use std::collections::HashMap;

use crate::error::{ExtractError, Result};
use crate::object::{Object, ObjectRef};

/// Resolves indirect object references to their decoded values.
///
/// Implementations are expected to resolve chains of references
/// transparently: [`ObjectStore::get`] always returns a direct (non-
/// reference) object, or an error.
pub trait ObjectStore {
    /// Resolve an indirect reference to its direct object value.
    fn get(&self, r: ObjectRef) -> Result<Object>;

    /// Resolve `obj` one level if it is a reference, otherwise return it
    /// unchanged. Convenience wrapper used throughout the page-tree walk.
    fn resolve<'a>(&self, obj: &'a Object) -> Result<std::borrow::Cow<'a, Object>> {
        match obj {
            Object::Reference(r) => Ok(std::borrow::Cow::Owned(self.get(*r)?)),
            other => Ok(std::borrow::Cow::Borrowed(other)),
        }
    }
}

/// A simple in-process [`ObjectStore`] backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: HashMap<ObjectRef, Object>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) an object at the given reference.
    pub fn insert(&mut self, r: ObjectRef, obj: Object) {
        self.objects.insert(r, obj);
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get(&self, r: ObjectRef) -> Result<Object> {
        self.objects
            .get(&r)
            .cloned()
            .ok_or_else(|| ExtractError::MissingKey(format!("object {r}")))
    }
}
