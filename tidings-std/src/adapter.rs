//! Standard parameter adapters.
//!
//! - [`StandardAdapter`] - Lossless scalar conversions, parsing and formatting
//! - [`StrictAdapter`] - Rejects every conversion
//! - [`Chain`] - Tries one adapter, then another

use std::collections::BTreeMap;
use tidings_core::{AdaptationError, ParamType, ParameterAdapter, Value};

/// The default adapter.
///
/// | From | To | Rule |
/// |---|---|---|
/// | int | float | widened |
/// | float | int | only when integral and in `i64` or `u64` range |
/// | bool | int | `0` / `1` |
/// | int | bool | only `0` / `1` |
/// | str | int, float, bool | parsed after trimming |
/// | int, float, bool | str | formatted |
/// | str | bytes | UTF-8 bytes |
/// | bytes | str | only valid UTF-8 |
/// | list, map | list, map | element-wise |
/// | scalar | list | wrapped as one element |
///
/// `optional<T>` adapts to `T`. Anything else is unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAdapter;

impl StandardAdapter {
    /// Creates the adapter.
    pub const fn new() -> Self {
        Self
    }

    fn convert(&self, value: Value, target: &ParamType) -> Result<Value, AdaptationError> {
        if target.accepts(&value) {
            return Ok(value);
        }

        match (value, target) {
            (value, ParamType::Optional(inner)) => self.convert(value, inner),

            (Value::Int(i), ParamType::Float) => Ok(Value::Float(i as f64)),
            (Value::UInt(u), ParamType::Float) => Ok(Value::Float(u as f64)),
            (Value::Float(f), ParamType::Int) => float_to_int(f, target),
            (Value::Bool(b), ParamType::Int) => Ok(Value::Int(i64::from(b))),
            (Value::Int(i), ParamType::Bool) => match i {
                0 => Ok(Value::Bool(false)),
                1 => Ok(Value::Bool(true)),
                _ => Err(AdaptationError::invalid(
                    &Value::Int(i),
                    target,
                    "only 0 and 1 convert to bool",
                )),
            },

            (Value::Str(s), ParamType::Int) => parse_int(s.trim())
                .map_err(|e| AdaptationError::invalid(&Value::Str(s.clone()), target, e.to_string())),
            (Value::Str(s), ParamType::Float) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| AdaptationError::invalid(&Value::Str(s.clone()), target, e.to_string())),
            (Value::Str(s), ParamType::Bool) => s
                .trim()
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|e| AdaptationError::invalid(&Value::Str(s.clone()), target, e.to_string())),

            (Value::Int(i), ParamType::Str) => Ok(Value::Str(i.to_string())),
            (Value::UInt(u), ParamType::Str) => Ok(Value::Str(u.to_string())),
            (Value::Float(f), ParamType::Str) => Ok(Value::Str(f.to_string())),
            (Value::Bool(b), ParamType::Str) => Ok(Value::Str(b.to_string())),

            (Value::Str(s), ParamType::Bytes) => Ok(Value::Bytes(s.into_bytes())),
            (Value::Bytes(bytes), ParamType::Str) => match String::from_utf8(bytes) {
                Ok(s) => Ok(Value::Str(s)),
                Err(e) => {
                    let reason = e.utf8_error().to_string();
                    Err(AdaptationError::invalid(
                        &Value::Bytes(e.into_bytes()),
                        target,
                        reason,
                    ))
                }
            },

            (Value::List(items), ParamType::List(elem)) => items
                .into_iter()
                .map(|item| self.convert(item, elem))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (Value::Map(entries), ParamType::Map(elem)) => entries
                .into_iter()
                .map(|(k, v)| self.convert(v, elem).map(|v| (k, v)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Value::Map),
            (
                value @ (Value::Bool(_)
                | Value::Int(_)
                | Value::UInt(_)
                | Value::Float(_)
                | Value::Str(_)),
                ParamType::List(elem),
            ) => Ok(Value::List(vec![self.convert(value, elem)?])),

            (value, target) => Err(AdaptationError::unsupported(&value, target)),
        }
    }
}

// i64::MAX is not representable as f64; 2^63 is the first float out of range.
const INT_RANGE: f64 = 9_223_372_036_854_775_808.0;
// 2^64, the first float above u64::MAX.
const UINT_RANGE: f64 = 18_446_744_073_709_551_616.0;

fn parse_int(text: &str) -> Result<Value, std::num::ParseIntError> {
    text.parse::<i64>()
        .map(Value::Int)
        .or_else(|e| text.parse::<u64>().map(Value::UInt).map_err(|_| e))
}

fn float_to_int(f: f64, target: &ParamType) -> Result<Value, AdaptationError> {
    if f.fract() != 0.0 || !f.is_finite() {
        return Err(AdaptationError::invalid(
            &Value::Float(f),
            target,
            "not an integral number",
        ));
    }
    if f < -INT_RANGE || f >= UINT_RANGE {
        return Err(AdaptationError::invalid(
            &Value::Float(f),
            target,
            "out of range",
        ));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = if f >= INT_RANGE {
        Value::UInt(f as u64)
    } else {
        Value::Int(f as i64)
    };
    Ok(value)
}

impl ParameterAdapter for StandardAdapter {
    fn adapt(&self, value: Value, target: &ParamType) -> Result<Value, AdaptationError> {
        self.convert(value, target)
    }
}

/// An adapter that never converts.
///
/// With it, only assignment-compatible fields bind.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictAdapter;

impl ParameterAdapter for StrictAdapter {
    fn adapt(&self, value: Value, target: &ParamType) -> Result<Value, AdaptationError> {
        Err(AdaptationError::unsupported(&value, target))
    }
}

/// Tries the first adapter, then the second if the first fails.
///
/// The second adapter sees the original value. If both fail, the second
/// adapter's error is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chain<A, B>(pub A, pub B);

impl<A, B> ParameterAdapter for Chain<A, B>
where
    A: ParameterAdapter,
    B: ParameterAdapter,
{
    fn adapt(&self, value: Value, target: &ParamType) -> Result<Value, AdaptationError> {
        match self.0.adapt(value.clone(), target) {
            Ok(adapted) => Ok(adapted),
            Err(_) => self.1.adapt(value, target),
        }
    }
}
