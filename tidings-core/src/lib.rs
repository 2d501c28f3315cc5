//! # tidings-core
//!
//! Core types and capability traits for the Tidings notification registry.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! crates that declare handlers or produce bundles without pulling in the
//! dispatcher itself.
//!
//! # Data Flow
//!
//! A notification travels through four stages:
//!
//! ## Stage 1: Declaration ([`Introspect`])
//!
//! A target type announces its handlers. Each handler is described by a
//! [`HandlerDescriptor`]: the notification tag it answers to, a [`Callable`],
//! and the [`Signature`] of named, typed parameters it expects.
//!
//! - **Declared**: Only handlers the type itself lists are ever enlisted
//! - **Pluggable**: Implement [`Introspect`] by hand, with [`HandlerTable`],
//!   or with the `#[handlers]` attribute from `tidings-macros`
//!
//! ## Stage 2: Enlistment ([`HandlerBinding`])
//!
//! Each descriptor is bound to a shared reference of its target and stored
//! under its [`NotificationTag`].
//!
//! ## Stage 3: Binding ([`Bundle`] → [`Arguments`])
//!
//! A producer hands over a loosely-typed [`Bundle`]. Its fields are matched to
//! the handler's parameters by exact name. Compatible values are passed as is;
//! incompatible ones go through a [`ParameterAdapter`].
//!
//! ## Stage 4: Invocation ([`Callable`])
//!
//! The positional [`Arguments`] are converted into the handler's Rust types
//! ([`FromValue`]) and the handler runs. Its return value becomes an outcome
//! through [`IntoOutcome`].
//!
//! # Error Types
//!
//! - [`AdaptationError`] - A single value could not be converted
//! - [`BindingFailure`] - A handler's arguments could not be bound
//! - [`InvocationError`] - A handler failed or panicked while running
//! - [`NotifyError`] - Aggregated per-handler failures of one notification

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod adapter;
mod args;
mod bundle;
mod convert;
mod error;
mod handler;
mod introspect;
mod signature;
mod tag;
mod value;

// Re-exports
pub use adapter::ParameterAdapter;
pub use args::{Arguments, FromArguments};
pub use bundle::{Bundle, Fields};
pub use convert::{FromValue, ToValue};
pub use error::{
    AdaptationError, ArgumentError, BindingFailure, BoxError, HandlerFailure, InvocationError,
    NotifyError, ParameterError,
};
pub use handler::{Callable, HandlerBinding, HandlerDescriptor, IntoOutcome};
pub use introspect::{HandlerTable, Introspect};
pub use signature::{Param, Signature};
pub use tag::NotificationTag;
pub use value::{Opaque, ParamType, Value, ValueKind};
