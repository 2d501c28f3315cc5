//! Testing utilities for Tidings.
//!
//! This module provides utilities to make testing handlers and adapters easier.
//!
//! # Features
//!
//! - [`RecordingAdapter`]: An adapter that records every conversion it is asked for
//! - [`FailingAdapter`]: An adapter that rejects every conversion with a fixed message
//! - [`CallLog`]: A shared, ordered record of handler invocations

use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tidings_core::{AdaptationError, ParamType, ParameterAdapter, Value};

// ============================================================================
// Recording Adapter
// ============================================================================

/// An adapter that records every `(value, declared type)` pair it receives
/// and delegates to an inner adapter.
///
/// Clones share the same record.
///
/// # Example
///
/// ```rust
/// use tidings_std::{StandardAdapter, testing::RecordingAdapter};
/// use tidings_core::{ParamType, ParameterAdapter, Value};
///
/// let recorder = RecordingAdapter::new(StandardAdapter);
/// let adapted = recorder.adapt(Value::Int(2), &ParamType::Float).unwrap();
///
/// assert_eq!(adapted, Value::Float(2.0));
/// assert_eq!(recorder.calls(), vec![(Value::Int(2), ParamType::Float)]);
/// ```
pub struct RecordingAdapter<A> {
    inner: Arc<A>,
    calls: Arc<Mutex<Vec<(Value, ParamType)>>>,
}

impl<A: ParameterAdapter> RecordingAdapter<A> {
    /// Create a recording adapter delegating to `inner`.
    pub fn new(inner: A) -> Self {
        Self {
            inner: Arc::new(inner),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded calls, in call order.
    pub fn calls(&self) -> Vec<(Value, ParamType)> {
        self.lock().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Value, ParamType)>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> Clone for RecordingAdapter<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<A: ParameterAdapter> ParameterAdapter for RecordingAdapter<A> {
    fn adapt(&self, value: Value, target: &ParamType) -> Result<Value, AdaptationError> {
        self.lock().push((value.clone(), target.clone()));
        self.inner.adapt(value, target)
    }
}

// ============================================================================
// Failing Adapter
// ============================================================================

/// The error produced by [`FailingAdapter`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Rejected {
    /// The configured message.
    pub message: String,
}

/// An adapter that fails every conversion with [`AdaptationError::Custom`].
#[derive(Debug, Clone)]
pub struct FailingAdapter {
    message: String,
}

impl FailingAdapter {
    /// Create an adapter that fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingAdapter {
    fn default() -> Self {
        Self::new("conversion refused")
    }
}

impl ParameterAdapter for FailingAdapter {
    fn adapt(&self, _value: Value, _target: &ParamType) -> Result<Value, AdaptationError> {
        Err(AdaptationError::Custom(Box::new(Rejected {
            message: self.message.clone(),
        })))
    }
}

// ============================================================================
// Call Log
// ============================================================================

/// A shared, ordered record of handler invocations.
///
/// Handlers push an entry when they run; tests then assert on the order.
/// Clones share the same record.
///
/// # Example
///
/// ```rust
/// use tidings_std::testing::CallLog;
///
/// let log = CallLog::new();
/// let handle = log.clone();
/// handle.record("first");
/// handle.record("second");
///
/// assert_eq!(log.entries(), ["first", "second"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// Get a clone of the entries, in record order.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Count the entries equal to `entry`.
    pub fn count_of(&self, entry: &str) -> usize {
        self.lock().iter().filter(|e| *e == entry).count()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
