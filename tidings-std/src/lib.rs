//! # tidings-std
//!
//! Standard implementations for the Tidings notification registry.
//!
//! This crate provides:
//! - **Registration**: [`RegistrationIndex`], the tag to handler index
//! - **Binding**: [`Binder`], which turns a bundle into positional arguments
//! - **Adapters**: [`StandardAdapter`], [`StrictAdapter`], [`Chain`]
//! - **Testing**: recording and failing adapters, [`testing::CallLog`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use tidings_core;

// Modules
pub mod adapter;
pub mod binder;
pub mod index;
pub mod testing;

pub use adapter::{Chain, StandardAdapter, StrictAdapter};
pub use binder::Binder;
pub use index::{RegistrationIndex, Snapshot};
