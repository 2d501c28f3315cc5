use super::{
    delivery::{FailurePolicy, SequentialDelivery},
    dispatcher::Dispatcher,
};
use std::sync::Arc;
use tidings_core::ParameterAdapter;
use tidings_std::{Binder, RegistrationIndex, StandardAdapter};

/// Builder for constructing a [`Dispatcher`].
///
/// # Example
///
/// ```rust
/// use tidings::{Dispatcher, FailurePolicy, StrictAdapter};
///
/// let dispatcher = Dispatcher::builder()
///     .adapter(StrictAdapter)
///     .failure_policy(FailurePolicy::Abort)
///     .catch_panics(false)
///     .build();
/// assert!(dispatcher.is_empty());
/// ```
pub struct DispatcherBuilder {
    adapter: Option<Arc<dyn ParameterAdapter>>,
    policy: FailurePolicy,
    catch_panics: bool,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    /// Create a builder with the default settings.
    pub fn new() -> Self {
        Self {
            adapter: None,
            policy: FailurePolicy::default(),
            catch_panics: true,
        }
    }

    /// Set the parameter adapter. Defaults to [`StandardAdapter`].
    pub fn adapter<A: ParameterAdapter>(mut self, adapter: A) -> Self {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    /// Set an adapter shared with other dispatchers.
    pub fn shared_adapter(mut self, adapter: Arc<dyn ParameterAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Set what happens after a handler fails. Defaults to [`FailurePolicy::Isolate`].
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set whether handler panics are reported as failures. Defaults to `true`.
    ///
    /// When disabled, a panicking handler unwinds through `notify`.
    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher {
        let binder = match self.adapter {
            Some(adapter) => Binder::from_shared(adapter),
            None => Binder::new(StandardAdapter),
        };
        Dispatcher::from_parts(
            RegistrationIndex::new(),
            binder,
            SequentialDelivery {
                policy: self.policy,
                catch_panics: self.catch_panics,
            },
        )
    }
}

impl std::fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("custom_adapter", &self.adapter.is_some())
            .field("policy", &self.policy)
            .field("catch_panics", &self.catch_panics)
            .finish()
    }
}
