//! # tidings - Named-Notification Dispatch Registry
//!
//! `tidings` decouples notification producers from their consumers.
//! Consumers declare handlers on their types and enlist instances; producers
//! broadcast a notification by name together with a loosely-typed bundle of
//! named fields. Each handler receives the fields its parameters ask for, by
//! name, adapted to the declared types where needed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tidings::{Bundle, Dispatcher, handlers};
//!
//! struct Mailer;
//!
//! #[handlers]
//! impl Mailer {
//!     #[notification("user.joined")]
//!     async fn welcome(&self, name: String, age: u32) {
//!         println!("welcome {name} ({age})");
//!     }
//! }
//!
//! #[derive(Bundle)]
//! struct Joined {
//!     name: String,
//!     age: i64,
//! }
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.enlist(&Arc::new(Mailer));
//!
//! if dispatcher.should_notify("user.joined") {
//!     dispatcher
//!         .notify("user.joined", &Joined { name: "Alice".into(), age: 30 })
//!         .await?;
//! }
//! ```
//!
//! ## Features
//!
//! - `macros` (default): `#[handlers]` and `#[derive(Bundle)]`
//! - `tracing` (default): structured logs for enlistment, delivery and failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use tidings_core::{
    // Binding
    AdaptationError,
    Arguments,
    // Errors
    ArgumentError,
    BindingFailure,
    BoxError,
    // Bundles
    Bundle,
    // Handlers
    Callable,
    Fields,
    FromArguments,
    // Values
    FromValue,
    HandlerBinding,
    HandlerDescriptor,
    HandlerFailure,
    HandlerTable,
    // Introspection
    Introspect,
    IntoOutcome,
    InvocationError,
    // Tags
    NotificationTag,
    NotifyError,
    Opaque,
    Param,
    ParamType,
    ParameterAdapter,
    ParameterError,
    Signature,
    ToValue,
    Value,
    ValueKind,
};

// Standard implementations
pub use tidings_std::{Binder, Chain, RegistrationIndex, Snapshot, StandardAdapter, StrictAdapter};

pub mod orchestrator;

pub use orchestrator::{Dispatcher, DispatcherBuilder, FailurePolicy};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use tidings_std::testing::*;
}

/// Prelude module - common imports for Tidings.
///
/// # Usage
///
/// ```rust,ignore
/// use tidings::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Bundles
        Bundle,
        // Dispatch
        Dispatcher,
        FailurePolicy,
        Fields,
        HandlerDescriptor,
        HandlerTable,
        Introspect,
        NotifyError,
        ParamType,
        ParameterAdapter,
        StandardAdapter,
        ToValue,
        Value,
    };

    #[cfg(feature = "macros")]
    pub use crate::handlers;
}

#[cfg(feature = "macros")]
pub use tidings_macros::{Bundle, handlers};
