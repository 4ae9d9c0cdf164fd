//! PDF object model.
//!
//! Opaque to the interpreter: values are produced by the
//! [`crate::extractor::object_store::ObjectStore`] collaborator and never
//! constructed from raw file bytes by this crate. Stream payloads
//! ([`Object::Stream`]) arrive already decrypted and filter-decoded; this
//! crate never applies `/Filter`s or a decryption key itself.

use std::collections::HashMap;

/// A PDF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Real (floating-point) value.
    Real(f64),
    /// String (byte array, already decrypted/unescaped).
    String(Vec<u8>),
    /// Name, without the leading `/`.
    Name(String),
    /// Array of objects.
    Array(Vec<Object>),
    /// Dictionary (key-value pairs); keys do not include the leading `/`.
    Dictionary(HashMap<String, Object>),
    /// Stream object: a dictionary plus already-decoded payload bytes
    /// (content streams, `ToUnicode` CMaps, Form XObject bodies).
    Stream {
        /// The stream dictionary.
        dict: HashMap<String, Object>,
        /// Decoded payload bytes.
        data: Vec<u8>,
    },
    /// Indirect object reference.
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number.
    pub id: u32,
    /// Generation number.
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Numeric value, accepting both Integer and Real.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Also matches a stream's dictionary half,
    /// since `/Resources`, `/MediaBox`, and similar keys are read the same
    /// way off either.
    pub fn as_dict(&self) -> Option<&HashMap<String, Object>> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Try to cast to a stream's `(dict, data)` halves.
    pub fn as_stream(&self) -> Option<(&HashMap<String, Object>, &[u8])> {
        match self {
            Object::Stream { dict, data } => Some((dict, data)),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to cast to string bytes.
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// True for `Object::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}
