//! The public entry point of the registry.

use super::{builder::DispatcherBuilder, delivery::SequentialDelivery};
use std::sync::Arc;
use tidings_core::{Bundle, HandlerBinding, Introspect, NotificationTag, NotifyError};
use tidings_std::{Binder, RegistrationIndex};

/// Enlists targets and delivers notifications to their handlers.
///
/// A dispatcher is `Send + Sync`; share it behind an `Arc` to enlist and
/// notify from several tasks at once. Handlers run on the notifying task,
/// one after another, in the order they were enlisted.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tidings::{Dispatcher, Fields, HandlerDescriptor, HandlerTable, Introspect};
///
/// struct Greeter;
///
/// impl Introspect for Greeter {
///     fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
///         HandlerTable::new(target)
///             .on("user.joined", "greet", &["name"], |_t: Arc<Self>, (name,): (String,)| async move {
///                 println!("welcome, {name}");
///             })
///             .build()
///     }
/// }
///
/// # futures::executor::block_on(async {
/// let dispatcher = Dispatcher::new();
/// dispatcher.enlist(&Arc::new(Greeter));
///
/// assert!(dispatcher.should_notify("user.joined"));
/// let invoked = dispatcher
///     .notify("user.joined", &Fields::new().with("name", "Alice"))
///     .await
///     .unwrap();
/// assert_eq!(invoked, 1);
/// # });
/// ```
pub struct Dispatcher {
    index: RegistrationIndex,
    binder: Binder,
    delivery: SequentialDelivery,
}

impl Dispatcher {
    /// Create a dispatcher with the default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub(crate) fn from_parts(
        index: RegistrationIndex,
        binder: Binder,
        delivery: SequentialDelivery,
    ) -> Self {
        Self {
            index,
            binder,
            delivery,
        }
    }

    /// Registers every handler `target` declares.
    ///
    /// Returns the number of bindings added; zero if the target declares no
    /// handlers. Enlisting the same target again adds its bindings again.
    pub fn enlist<T: Introspect>(&self, target: &Arc<T>) -> usize {
        let bindings = T::introspect(target)
            .into_iter()
            .map(|descriptor| HandlerBinding::new(target, descriptor));
        let count = self.index.register_all(bindings);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target_type = std::any::type_name::<T>(),
            bindings = count,
            "enlisted target"
        );

        count
    }

    /// Returns `true` if at least one handler is registered for `tag`.
    ///
    /// Lets producers skip building a bundle nobody will receive.
    pub fn should_notify(&self, tag: &str) -> bool {
        self.index.contains(tag)
    }

    /// Delivers `bundle` to every handler registered for `tag`.
    ///
    /// Handlers run in registration order, over the set registered when the
    /// call started. Returns how many handlers ran successfully, or the
    /// report of every handler that failed. An unknown tag delivers nothing
    /// and returns `Ok(0)`.
    pub async fn notify<B>(&self, tag: &str, bundle: &B) -> Result<usize, NotifyError>
    where
        B: Bundle + ?Sized,
    {
        let handlers = self.index.lookup(tag);
        if handlers.is_empty() {
            return Ok(0);
        }

        let tag = NotificationTag::new(tag);

        #[cfg(feature = "tracing")]
        tracing::debug!(tag = %tag, handlers = handlers.len(), "notifying");

        self.delivery
            .deliver(&tag, &handlers, &self.binder, bundle)
            .await
    }

    /// All tags with at least one handler, sorted.
    pub fn tags(&self) -> Vec<NotificationTag> {
        self.index.tags()
    }

    /// Number of handlers registered for `tag`.
    pub fn handler_count(&self, tag: &str) -> usize {
        self.index.handler_count(tag)
    }

    /// Total number of handler bindings.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no handler has been enlisted.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("index", &self.index)
            .field("delivery", &self.delivery)
            .finish_non_exhaustive()
    }
}
