//! # Introspection
//!
//! The capability that turns a target object into the handlers it declares.
//!
//! Only handlers the target's own type lists are produced. Handlers
//! reachable through other types (trait default methods, wrapped fields)
//! are never picked up, so enlisting a target never re-enlists handlers
//! shared with other types.
//!
//! # Usage Patterns
//!
//! 1. **Attribute**: `#[handlers]` on an inherent `impl` block, tagging
//!    methods with `#[notification("name")]`
//! 2. **Table**: implement [`Introspect`] with a [`HandlerTable`]
//! 3. **Manual**: implement [`Introspect`] returning [`HandlerDescriptor`]s

use crate::{
    args::{Arguments, FromArguments},
    error::BoxError,
    handler::{HandlerDescriptor, IntoOutcome},
    signature::{Param, Signature},
    tag::NotificationTag,
};
use futures::{
    FutureExt,
    future::{self, BoxFuture},
};
use std::{future::Future, sync::Arc};

/// A type whose instances can be enlisted.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tidings_core::{HandlerDescriptor, HandlerTable, Introspect};
///
/// struct Greeter;
///
/// impl Greeter {
///     async fn greet(&self, name: String) {
///         println!("hello {name}");
///     }
/// }
///
/// impl Introspect for Greeter {
///     fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
///         HandlerTable::new(target)
///             .on("user.joined", "greet", &["name"], |t: Arc<Self>, (name,): (String,)| async move {
///                 t.greet(name).await
///             })
///             .build()
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be enlisted",
    label = "missing `Introspect` implementation",
    note = "Add `#[handlers]` to an `impl` block of `{Self}` or implement `Introspect` with a `HandlerTable`."
)]
pub trait Introspect: Send + Sync + 'static {
    /// Lists the handlers declared by `target`, in declaration order.
    fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor>
    where
        Self: Sized;
}

/// Builder for the handler list of one target.
pub struct HandlerTable<T> {
    target: Arc<T>,
    handlers: Vec<HandlerDescriptor>,
}

impl<T: Send + Sync + 'static> HandlerTable<T> {
    /// Starts an empty table for `target`.
    pub fn new(target: &Arc<T>) -> Self {
        Self {
            target: Arc::clone(target),
            handlers: Vec::new(),
        }
    }

    /// Declares a handler.
    ///
    /// `params` names the bundle field of each element of the argument tuple
    /// `A`, in order. The closure receives the target and the converted
    /// arguments.
    ///
    /// # Panics
    ///
    /// Panics if `params` does not have one name per element of `A`.
    pub fn on<A, F, Fut>(
        mut self,
        tag: impl Into<NotificationTag>,
        name: &'static str,
        params: &[&'static str],
        func: F,
    ) -> Self
    where
        A: FromArguments,
        F: Fn(Arc<T>, A) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: IntoOutcome,
    {
        let types = A::param_types();
        assert_eq!(
            params.len(),
            types.len(),
            "handler `{name}` names {} parameter(s) but takes {}",
            params.len(),
            types.len()
        );
        let signature: Signature = params
            .iter()
            .zip(types)
            .map(|(param, ty)| Param::new(*param, ty))
            .collect();

        let target = Arc::clone(&self.target);
        let callable = move |args: Arguments| -> BoxFuture<'static, Result<(), BoxError>> {
            match A::from_arguments(args) {
                Ok(args) => func(Arc::clone(&target), args)
                    .map(IntoOutcome::into_outcome)
                    .boxed(),
                Err(e) => future::ready(Err(BoxError::from(e))).boxed(),
            }
        };

        self.handlers
            .push(HandlerDescriptor::new(tag, name, signature, callable));
        self
    }

    /// Finishes the table.
    pub fn build(self) -> Vec<HandlerDescriptor> {
        self.handlers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Callable, ParamType, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Ledger {
        entries: Mutex<Vec<String>>,
    }

    impl Ledger {
        fn record(&self, account: String, amount: i64) -> Result<(), String> {
            if amount < 0 {
                return Err(format!("negative amount for {account}"));
            }
            self.entries
                .lock()
                .unwrap()
                .push(format!("{account}:{amount}"));
            Ok(())
        }
    }

    impl Introspect for Ledger {
        fn introspect(target: &Arc<Self>) -> Vec<HandlerDescriptor> {
            HandlerTable::new(target)
                .on(
                    "ledger.credit",
                    "record",
                    &["account", "amount"],
                    |t: Arc<Self>, (account, amount): (String, i64)| {
                        future::ready(t.record(account, amount))
                    },
                )
                .on("ledger.reset", "reset", &[], |t: Arc<Self>, (): ()| async move {
                    t.entries.lock().unwrap().clear();
                })
                .build()
        }
    }

    #[test]
    fn test_table_builds_signatures_in_order() {
        let ledger = Arc::new(Ledger::default());
        let handlers = Ledger::introspect(&ledger);

        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].tag(), &NotificationTag::from("ledger.credit"));
        assert_eq!(handlers[0].name(), "record");
        assert_eq!(
            handlers[0].signature().to_string(),
            "(account: str, amount: int)"
        );
        assert_eq!(handlers[0].signature().params()[1].ty(), &ParamType::Int);
        assert!(handlers[1].signature().is_empty());
    }

    #[tokio::test]
    async fn test_table_callable_converts_and_reports() {
        let ledger = Arc::new(Ledger::default());
        let handlers = Ledger::introspect(&ledger);
        let (_, binding) = crate::HandlerBinding::new(&ledger, handlers[0].clone());

        let ok = Arguments::new(vec![Some(Value::Str("acme".into())), Some(Value::Int(5))]);
        binding.callable().call(ok).await.unwrap();
        assert_eq!(*ledger.entries.lock().unwrap(), vec!["acme:5".to_string()]);

        let negative = Arguments::new(vec![Some(Value::Str("acme".into())), Some(Value::Int(-1))]);
        let err = binding.callable().call(negative).await.unwrap_err();
        assert_eq!(err.to_string(), "negative amount for acme");

        let mismatched = Arguments::new(vec![Some(Value::Int(1)), None]);
        assert!(binding.callable().call(mismatched).await.is_err());
    }

    #[test]
    #[should_panic(expected = "names 1 parameter(s) but takes 2")]
    fn test_table_rejects_name_count_mismatch() {
        let ledger = Arc::new(Ledger::default());
        let _ = HandlerTable::new(&ledger).on(
            "ledger.credit",
            "record",
            &["account"],
            |_t: Arc<Ledger>, (_a, _b): (String, i64)| async {},
        );
    }
}
