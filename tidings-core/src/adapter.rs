//! The parameter adapter capability.
//!
//! The binder only consults an adapter when a bundle field is not
//! assignment-compatible with the declared parameter type. Standard adapters
//! live in `tidings-std`.

use crate::{
    error::AdaptationError,
    value::{ParamType, Value},
};

/// Converts a field value into a parameter's declared type.
///
/// Returning [`Value::Null`] leaves the argument unset, so it takes its
/// type's default value.
///
/// # Example
///
/// ```rust
/// use tidings_core::{AdaptationError, ParamType, ParameterAdapter, Value};
///
/// let upper = |value: Value, target: &ParamType| match (value, target) {
///     (Value::Int(i), ParamType::Str) => Ok(Value::Str(format!("#{i}"))),
///     (value, target) => Err(AdaptationError::unsupported(&value, target)),
/// };
///
/// assert_eq!(
///     upper.adapt(Value::Int(7), &ParamType::Str).unwrap(),
///     Value::Str("#7".into())
/// );
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a parameter adapter",
    label = "missing `ParameterAdapter` implementation",
    note = "Implement `ParameterAdapter` or pass a closure `Fn(Value, &ParamType) -> Result<Value, AdaptationError>`."
)]
pub trait ParameterAdapter: Send + Sync + 'static {
    /// Converts `value` into `target`, or fails.
    fn adapt(&self, value: Value, target: &ParamType) -> Result<Value, AdaptationError>;
}

// Blanket impl for closures
impl<F> ParameterAdapter for F
where
    F: Fn(Value, &ParamType) -> Result<Value, AdaptationError> + Send + Sync + 'static,
{
    fn adapt(&self, value: Value, target: &ParamType) -> Result<Value, AdaptationError> {
        (self)(value, target)
    }
}
