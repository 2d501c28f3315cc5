//! # Handlers
//!
//! A handler is a [`Callable`] bound to an enlisted target, together with the
//! [`Signature`] the binder uses to build its arguments.
//!
//! - [`HandlerDescriptor`] - What an introspected target declares
//! - [`HandlerBinding`] - A descriptor after enlistment, holding its target
//!
//! Handlers report their outcome through [`IntoOutcome`], so user methods may
//! return `()`, `Result<(), E>`, or any type implementing the trait.

use crate::{args::Arguments, error::BoxError, signature::Signature, tag::NotificationTag};
use futures::future::BoxFuture;
use std::{
    any::Any,
    borrow::Cow,
    fmt,
    future::Future,
    sync::Arc,
};

/// Converts a handler's return value into an outcome.
///
/// # Default Implementations
///
/// - `()` → Success
/// - `Result<T, E>` → Delegates to inner `T` or fails with `E`
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a handler outcome",
    label = "missing `IntoOutcome` implementation",
    note = "Handlers must return `()`, `Result<(), E>`, or a type implementing `IntoOutcome`."
)]
pub trait IntoOutcome {
    /// Converts the value into success or a boxed error.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        match self {
            Ok(t) => t.into_outcome(),
            Err(e) => Err(e.into()),
        }
    }
}

/// An invocable handler, already bound to its target.
///
/// The returned future owns everything it needs, so it can outlive the
/// borrow of the binding that produced it.
pub trait Callable: Send + Sync + 'static {
    /// Invokes the handler with positional arguments.
    fn call(&self, args: Arguments) -> BoxFuture<'static, Result<(), BoxError>>;
}

// Blanket impl for closures
impl<F, Fut> Callable for F
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn call(&self, args: Arguments) -> BoxFuture<'static, Result<(), BoxError>> {
        Box::pin((self)(args))
    }
}

/// A handler as declared by an introspected target.
#[derive(Clone)]
pub struct HandlerDescriptor {
    tag: NotificationTag,
    name: Cow<'static, str>,
    signature: Signature,
    callable: Arc<dyn Callable>,
}

impl HandlerDescriptor {
    /// Creates a descriptor.
    pub fn new<C: Callable>(
        tag: impl Into<NotificationTag>,
        name: impl Into<Cow<'static, str>>,
        signature: Signature,
        callable: C,
    ) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            signature,
            callable: Arc::new(callable),
        }
    }

    /// The notification this handler answers to.
    pub fn tag(&self) -> &NotificationTag {
        &self.tag
    }

    /// The handler name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameters.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// An enlisted handler.
///
/// Holds a strong reference to its target, so the target stays alive for as
/// long as the binding is registered. Immutable once created.
pub struct HandlerBinding {
    target: Arc<dyn Any + Send + Sync>,
    target_type: &'static str,
    name: Cow<'static, str>,
    signature: Signature,
    callable: Arc<dyn Callable>,
}

impl HandlerBinding {
    /// Binds a descriptor to the target it was introspected from.
    ///
    /// Returns the binding together with the tag it must be registered under.
    pub fn new<T: Any + Send + Sync>(
        target: &Arc<T>,
        descriptor: HandlerDescriptor,
    ) -> (NotificationTag, Self) {
        let HandlerDescriptor {
            tag,
            name,
            signature,
            callable,
        } = descriptor;
        let binding = Self {
            target: Arc::clone(target) as Arc<dyn Any + Send + Sync>,
            target_type: std::any::type_name::<T>(),
            name,
            signature,
            callable,
        };
        (tag, binding)
    }

    /// The enlisted target.
    pub fn target(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.target
    }

    /// Returns the target as a `T`, if that is its type.
    pub fn target_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.target).downcast::<T>().ok()
    }

    /// Type name of the enlisted target.
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    /// The handler name, for diagnostics.
    pub fn name(&self) -> &Cow<'static, str> {
        &self.name
    }

    /// The declared parameters.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The invocable handler.
    pub fn callable(&self) -> &dyn Callable {
        &*self.callable
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("target", &self.target_type)
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{signature::Param, value::ParamType};

    struct Inbox;

    #[test]
    fn test_outcome_conversions() {
        assert!(().into_outcome().is_ok());
        assert!(Ok::<(), std::io::Error>(()).into_outcome().is_ok());
        let err = Err::<(), _>("rejected").into_outcome().unwrap_err();
        assert_eq!(err.to_string(), "rejected");
    }

    #[tokio::test]
    async fn test_closure_callable() {
        let callable = |args: Arguments| async move {
            if args.is_unset(0) {
                Err(BoxError::from("missing"))
            } else {
                Ok(())
            }
        };
        assert!(Callable::call(&callable, Arguments::new(vec![None])).await.is_err());
        assert!(
            Callable::call(&callable, Arguments::new(vec![Some(crate::Value::Int(1))]))
                .await
                .is_ok()
        );
    }

    #[test]
    fn test_binding_keeps_target_alive() {
        let target = Arc::new(Inbox);
        let descriptor = HandlerDescriptor::new(
            "mail.received",
            "on_mail",
            Signature::new(vec![Param::new("from", ParamType::Str)]),
            |_args: Arguments| async { Ok::<(), BoxError>(()) },
        );
        let (tag, binding) = HandlerBinding::new(&target, descriptor);

        assert_eq!(tag, "mail.received");
        assert_eq!(Arc::strong_count(&target), 2);
        assert!(binding.target_as::<Inbox>().is_some());
        assert!(binding.target_as::<String>().is_none());
        assert!(binding.target_type().ends_with("Inbox"));

        drop(binding);
        assert_eq!(Arc::strong_count(&target), 1);
    }
}
