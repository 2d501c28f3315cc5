//! The dispatcher and the policies it runs with.

pub(crate) mod builder;
pub(crate) mod delivery;
pub(crate) mod dispatcher;

// Re-export key components

pub use builder::DispatcherBuilder;
pub use delivery::FailurePolicy;
pub use dispatcher::Dispatcher;
