//! Error types for Tidings.
//!
//! Failures are handler-scoped. The hierarchy, from the narrowest scope up:
//!
//! - [`AdaptationError`] - One value could not be converted to a declared type
//! - [`ParameterError`] - An [`AdaptationError`] tied to a named parameter
//! - [`BindingFailure`] - All parameter errors of one handler; it is not invoked
//! - [`ArgumentError`] - A bound argument did not fit the handler's Rust type
//! - [`InvocationError`] - A handler returned an error or panicked
//! - [`HandlerFailure`] - Either of the two handler-level failures
//! - [`NotifyError`] - Every handler failure of one notification

use crate::{
    tag::NotificationTag,
    value::{ParamType, Value, ValueKind},
};
use std::borrow::Cow;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A parameter adapter could not convert a value.
#[derive(Error, Debug)]
pub enum AdaptationError {
    /// No conversion exists between the two types.
    #[error("no conversion from {found} to {expected}")]
    Unsupported {
        /// The runtime type of the field.
        found: ValueKind,
        /// The declared parameter type.
        expected: ParamType,
    },

    /// A conversion exists but this particular value cannot be converted.
    #[error("cannot convert {found} to {expected}: {reason}")]
    Invalid {
        /// The runtime type of the field.
        found: ValueKind,
        /// The declared parameter type.
        expected: ParamType,
        /// Why the value was rejected.
        reason: String,
    },

    /// A custom adapter error.
    #[error(transparent)]
    Custom(BoxError),
}

impl AdaptationError {
    /// No conversion exists from `value` to `expected`.
    pub fn unsupported(value: &Value, expected: &ParamType) -> Self {
        AdaptationError::Unsupported {
            found: value.kind(),
            expected: expected.clone(),
        }
    }

    /// `value` cannot be converted to `expected`.
    pub fn invalid(value: &Value, expected: &ParamType, reason: impl Into<String>) -> Self {
        AdaptationError::Invalid {
            found: value.kind(),
            expected: expected.clone(),
            reason: reason.into(),
        }
    }
}

/// An adaptation failure for one named parameter.
#[derive(Error, Debug)]
#[error("parameter `{name}` at position {index} could not be adapted")]
pub struct ParameterError {
    /// Position of the parameter in the handler signature.
    pub index: usize,
    /// Name of the parameter (and of the bundle field).
    pub name: String,
    /// The underlying adapter failure.
    #[source]
    pub source: AdaptationError,
}

/// A handler's argument list could not be bound; the handler was skipped.
#[derive(Error, Debug)]
#[error("handler `{handler}` for `{tag}`: {count} parameter(s) failed to bind", count = .errors.len())]
pub struct BindingFailure {
    /// The notification being delivered.
    pub tag: NotificationTag,
    /// The handler that was skipped.
    pub handler: Cow<'static, str>,
    /// Type name of the enlisted target.
    pub target: &'static str,
    /// One entry per parameter that failed, in signature order.
    pub errors: Vec<ParameterError>,
}

/// A bound argument could not be converted into the handler's Rust type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The value has the wrong shape for the parameter.
    #[error("argument {index}: expected {expected}, found {found}")]
    Mismatch {
        /// Position of the argument.
        index: usize,
        /// The declared parameter type.
        expected: ParamType,
        /// The runtime type of the bound value.
        found: ValueKind,
    },

    /// No value was bound and the parameter type has no default.
    #[error("argument {index}: no value bound and {expected} has no default")]
    Missing {
        /// Position of the argument.
        index: usize,
        /// The declared parameter type.
        expected: ParamType,
    },
}

/// A handler failed while executing.
#[derive(Error, Debug)]
pub enum InvocationError {
    /// The handler returned an error.
    #[error("handler `{handler}` for `{tag}` failed")]
    Failed {
        /// The notification being delivered.
        tag: NotificationTag,
        /// The failing handler.
        handler: Cow<'static, str>,
        /// The handler's error.
        #[source]
        source: BoxError,
    },

    /// The handler panicked.
    #[error("handler `{handler}` for `{tag}` panicked: {message}")]
    Panicked {
        /// The notification being delivered.
        tag: NotificationTag,
        /// The panicking handler.
        handler: Cow<'static, str>,
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl InvocationError {
    /// The notification being delivered.
    pub fn tag(&self) -> &NotificationTag {
        match self {
            InvocationError::Failed { tag, .. } | InvocationError::Panicked { tag, .. } => tag,
        }
    }

    /// The handler that failed.
    pub fn handler(&self) -> &str {
        match self {
            InvocationError::Failed { handler, .. } | InvocationError::Panicked { handler, .. } => {
                handler
            }
        }
    }
}

/// The failure of a single handler during one notification.
#[derive(Error, Debug)]
pub enum HandlerFailure {
    /// Arguments could not be bound; the handler never ran.
    #[error(transparent)]
    Binding(#[from] BindingFailure),

    /// The handler ran and failed.
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

impl HandlerFailure {
    /// The notification being delivered.
    pub fn tag(&self) -> &NotificationTag {
        match self {
            HandlerFailure::Binding(b) => &b.tag,
            HandlerFailure::Invocation(i) => i.tag(),
        }
    }

    /// The handler that failed.
    pub fn handler(&self) -> &str {
        match self {
            HandlerFailure::Binding(b) => &b.handler,
            HandlerFailure::Invocation(i) => i.handler(),
        }
    }
}

/// Aggregated report of every handler that failed during one notification.
///
/// Handlers not listed here either succeeded or, under an aborting failure
/// policy, were never attempted.
#[derive(Error, Debug)]
#[error("{failed} of {attempted} handler(s) for `{tag}` failed", failed = .failures.len())]
pub struct NotifyError {
    /// The notification that was delivered.
    pub tag: NotificationTag,
    /// How many handlers delivery was attempted for.
    pub attempted: usize,
    /// The failures, in invocation order.
    pub failures: Vec<HandlerFailure>,
}

impl NotifyError {
    /// How many attempted handlers completed successfully.
    pub fn succeeded(&self) -> usize {
        self.attempted.saturating_sub(self.failures.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_error_display() {
        let err = NotifyError {
            tag: "user.saved".into(),
            attempted: 3,
            failures: vec![HandlerFailure::Invocation(InvocationError::Panicked {
                tag: "user.saved".into(),
                handler: "audit".into(),
                message: "boom".into(),
            })],
        };
        assert_eq!(err.to_string(), "1 of 3 handler(s) for `user.saved` failed");
        assert_eq!(err.succeeded(), 2);
        assert_eq!(err.failures[0].handler(), "audit");
    }

    #[test]
    fn test_succeeded_never_underflows() {
        let err = NotifyError {
            tag: "user.saved".into(),
            attempted: 0,
            failures: vec![HandlerFailure::Invocation(InvocationError::Panicked {
                tag: "user.saved".into(),
                handler: "audit".into(),
                message: "boom".into(),
            })],
        };
        assert_eq!(err.succeeded(), 0);
    }

    #[test]
    fn test_adaptation_error_display() {
        let err = AdaptationError::unsupported(&Value::Bool(true), &ParamType::Bytes);
        assert_eq!(err.to_string(), "no conversion from bool to bytes");
    }
}
