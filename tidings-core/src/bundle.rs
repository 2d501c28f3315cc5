//! Parameter bundles.
//!
//! A bundle is the loosely-typed payload a producer passes with a
//! notification. The registry never knows its shape ahead of time; it only
//! asks for fields by name while binding each handler.

use crate::{convert::ToValue, value::Value};
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
    sync::Arc,
};

/// A named-field accessor over a notification payload.
///
/// Field lookup is exact and case-sensitive. Returning `None` or
/// [`Value::Null`] leaves the matching parameter unset.
///
/// Derive it for structs with `#[derive(Bundle)]` (requires the `macros`
/// feature of `tidings`), or use [`Fields`] for ad-hoc payloads.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a notification bundle",
    label = "missing `Bundle` implementation",
    note = "Derive `Bundle` for structs or build the payload with `Fields`."
)]
pub trait Bundle: Send + Sync {
    /// Returns the value of the field called `name`, if present.
    fn field(&self, name: &str) -> Option<Value>;
}

/// An ordered, ad-hoc bundle.
///
/// # Example
///
/// ```rust
/// use tidings_core::{Bundle, Fields, Value};
///
/// let bundle = Fields::new().with("name", "Alice").with("age", 30);
/// assert_eq!(bundle.field("age"), Some(Value::Int(30)));
/// assert_eq!(bundle.field("Age"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing an earlier field of the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a field in place, replacing an earlier field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToValue) {
        let name = name.into();
        let value = value.to_value();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// The number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Bundle for Fields {
    fn field(&self, name: &str) -> Option<Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

impl<K: Into<String>, V: ToValue> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl Bundle for () {
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl<S: BuildHasher + Send + Sync> Bundle for HashMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Bundle for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// A [`Value::Map`] exposes its entries; any other value has no fields.
impl Bundle for Value {
    fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Map(entries) => entries.get(name).cloned(),
            _ => None,
        }
    }
}

impl<B: Bundle + ?Sized> Bundle for &B {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<B: Bundle + ?Sized> Bundle for Box<B> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<B: Bundle + ?Sized> Bundle for Arc<B> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}
