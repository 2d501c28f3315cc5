//! Conversions between Rust types and [`Value`]s.
//!
//! - [`ToValue`] is implemented by bundle field types
//! - [`FromValue`] is implemented by handler parameter types

use crate::value::{Opaque, ParamType, Value};
use std::{
    any::Any,
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
    sync::Arc,
};

/// Converts a bundle field into a [`Value`].
pub trait ToValue {
    /// Produces the dynamic representation of `self`.
    fn to_value(&self) -> Value;
}

/// A handler parameter type.
///
/// Declares the [`ParamType`] the binder checks fields against, converts the
/// bound value into `Self`, and supplies the value an unset argument takes.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a handler parameter",
    label = "missing `FromValue` implementation",
    note = "Handler parameters must be owned types implementing `FromValue`."
)]
pub trait FromValue: Sized + Send + 'static {
    /// The declared type of a parameter of this Rust type.
    fn param_type() -> ParamType;

    /// Converts a bound value, or returns `None` if it has the wrong shape.
    fn from_value(value: Value) -> Option<Self>;

    /// The value an unset argument takes, if the type has one.
    fn default_value() -> Option<Self> {
        None
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn param_type() -> ParamType {
        ParamType::Any
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }

    fn default_value() -> Option<Self> {
        Some(Value::Null)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn param_type() -> ParamType {
        ParamType::Bool
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn default_value() -> Option<Self> {
        Some(false)
    }
}

macro_rules! impl_int {
    ($($t:ty),+) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(i) => Value::Int(i),
                        // Only unsigned values above i64::MAX get here.
                        Err(_) => u64::try_from(*self).map_or(Value::Null, Value::UInt),
                    }
                }
            }

            impl FromValue for $t {
                fn param_type() -> ParamType {
                    ParamType::Int
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(i) => <$t>::try_from(i).ok(),
                        Value::UInt(u) => <$t>::try_from(u).ok(),
                        _ => None,
                    }
                }

                fn default_value() -> Option<Self> {
                    Some(0)
                }
            }
        )+
    };
}

impl_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($t:ty),+) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Float(f64::from(*self))
                }
            }

            impl FromValue for $t {
                fn param_type() -> ParamType {
                    ParamType::Float
                }

                #[allow(clippy::cast_possible_truncation)]
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Float(f) => Some(f as $t),
                        _ => None,
                    }
                }

                fn default_value() -> Option<Self> {
                    Some(0.0)
                }
            }
        )+
    };
}

impl_float!(f32, f64);

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for String {
    fn param_type() -> ParamType {
        ParamType::Str
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn default_value() -> Option<Self> {
        Some(String::new())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn param_type() -> ParamType {
        ParamType::Optional(Box::new(T::param_type()))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn default_value() -> Option<Self> {
        Some(None)
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn param_type() -> ParamType {
        ParamType::List(Box::new(T::param_type()))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }

    fn default_value() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn param_type() -> ParamType {
        ParamType::Map(Box::new(T::param_type()))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            _ => None,
        }
    }

    fn default_value() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<T: ToValue, S> ToValue for HashMap<String, T, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T, S> FromValue for HashMap<String, T, S>
where
    T: FromValue,
    S: BuildHasher + Default + Send + 'static,
{
    fn param_type() -> ParamType {
        ParamType::Map(Box::new(T::param_type()))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            _ => None,
        }
    }

    fn default_value() -> Option<Self> {
        Some(HashMap::default())
    }
}

impl ToValue for Opaque {
    fn to_value(&self) -> Value {
        Value::Opaque(self.clone())
    }
}

/// Shared objects travel as [`Value::Opaque`] without being copied.
impl<T: Any + Send + Sync> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        Value::Opaque(Opaque::from_arc(Arc::clone(self)))
    }
}

/// Opaque parameters have no default; wrap them in `Option` to make them optional.
impl<T: Any + Send + Sync> FromValue for Arc<T> {
    fn param_type() -> ParamType {
        ParamType::opaque::<T>()
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Opaque(o) => o.downcast::<T>(),
            _ => None,
        }
    }
}
