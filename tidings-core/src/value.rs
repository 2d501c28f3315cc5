//! Dynamically typed values carried by bundles.
//!
//! Bundles are loosely typed: a producer does not know the parameter layout
//! of the handlers it reaches. Every field therefore travels as a [`Value`],
//! and every handler parameter declares a [`ParamType`] it is willing to
//! accept.

use std::{
    any::{Any, TypeId},
    collections::BTreeMap,
    fmt,
    sync::Arc,
};

/// A dynamically typed field value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absent value. A `Null` field binds as if it were missing.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer above `i64::MAX`.
    ///
    /// Unsigned values that fit in an `i64` are carried as [`Value::Int`].
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A string-keyed map of values.
    Map(BTreeMap<String, Value>),
    /// An arbitrary shared Rust object.
    Opaque(Opaque),
}

impl Value {
    /// Wraps an arbitrary object as an opaque value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Opaque::new(value))
    }

    /// Returns the runtime type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) | Value::UInt(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Opaque(o) => ValueKind::Opaque(o.type_name()),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(i), Value::UInt(u)) | (Value::UInt(u), Value::Int(i)) => {
                u64::try_from(*i).is_ok_and(|i| i == *u)
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// A shared, type-erased Rust object travelling inside a [`Value`].
///
/// Cloning is O(1); equality is identity of the shared allocation.
#[derive(Clone)]
pub struct Opaque {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Opaque {
    /// Wraps `value` in a new shared allocation.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared object without copying it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` of the wrapped object.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The type name of the wrapped object, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns a typed handle if the object is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Returns `true` if both handles point at the same object.
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.type_name).finish()
    }
}

/// The runtime type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// See [`Value::Null`].
    Null,
    /// See [`Value::Bool`].
    Bool,
    /// See [`Value::Int`] and [`Value::UInt`].
    Int,
    /// See [`Value::Float`].
    Float,
    /// See [`Value::Str`].
    Str,
    /// See [`Value::Bytes`].
    Bytes,
    /// See [`Value::List`].
    List,
    /// See [`Value::Map`].
    Map,
    /// See [`Value::Opaque`]; carries the object's type name.
    Opaque(&'static str),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => f.write_str("null"),
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Int => f.write_str("int"),
            ValueKind::Float => f.write_str("float"),
            ValueKind::Str => f.write_str("str"),
            ValueKind::Bytes => f.write_str("bytes"),
            ValueKind::List => f.write_str("list"),
            ValueKind::Map => f.write_str("map"),
            ValueKind::Opaque(name) => write!(f, "opaque({name})"),
        }
    }
}

/// The declared type of a handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Accepts every value.
    Any,
    /// Accepts [`Value::Bool`].
    Bool,
    /// Accepts [`Value::Int`] and [`Value::UInt`].
    Int,
    /// Accepts [`Value::Float`].
    Float,
    /// Accepts [`Value::Str`].
    Str,
    /// Accepts [`Value::Bytes`].
    Bytes,
    /// Accepts a list whose elements are all accepted by the element type.
    List(Box<ParamType>),
    /// Accepts a map whose values are all accepted by the element type.
    Map(Box<ParamType>),
    /// Accepts whatever the inner type accepts; unset binds to `None`.
    Optional(Box<ParamType>),
    /// Accepts an opaque object of exactly this Rust type.
    Opaque {
        /// The expected `TypeId`.
        type_id: TypeId,
        /// The expected type name, for diagnostics.
        type_name: &'static str,
    },
}

impl ParamType {
    /// The declared type of an opaque parameter of type `T`.
    pub fn opaque<T: Any>() -> Self {
        ParamType::Opaque {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns `true` if `value` can be assigned to this type without adaptation.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamType::Any, _) => true,
            (ParamType::Optional(inner), value) => value.is_null() || inner.accepts(value),
            (ParamType::Bool, Value::Bool(_))
            | (ParamType::Int, Value::Int(_) | Value::UInt(_))
            | (ParamType::Float, Value::Float(_))
            | (ParamType::Str, Value::Str(_))
            | (ParamType::Bytes, Value::Bytes(_)) => true,
            (ParamType::List(elem), Value::List(items)) => items.iter().all(|v| elem.accepts(v)),
            (ParamType::Map(elem), Value::Map(entries)) => {
                entries.values().all(|v| elem.accepts(v))
            }
            (ParamType::Opaque { type_id, .. }, Value::Opaque(o)) => o.type_id() == *type_id,
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Any => f.write_str("any"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Int => f.write_str("int"),
            ParamType::Float => f.write_str("float"),
            ParamType::Str => f.write_str("str"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::List(elem) => write!(f, "list<{elem}>"),
            ParamType::Map(elem) => write!(f, "map<{elem}>"),
            ParamType::Optional(inner) => write!(f, "optional<{inner}>"),
            ParamType::Opaque { type_name, .. } => write!(f, "opaque({type_name})"),
        }
    }
}
