use futures::FutureExt;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};
use tidings_core::{
    Arguments, BindingFailure, Bundle, HandlerBinding, HandlerFailure, InvocationError,
    NotificationTag, NotifyError,
};
use tidings_std::Binder;

/// What happens to the remaining handlers after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and keep delivering to the remaining handlers.
    #[default]
    Isolate,
    /// Stop at the first failure; later handlers are not attempted.
    Abort,
}

/// Sequential delivery to a snapshot of handlers.
///
/// Handlers run one at a time in registration order. Each is bound, then
/// invoked; every failure is recorded in the returned report.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SequentialDelivery {
    pub(crate) policy: FailurePolicy,
    pub(crate) catch_panics: bool,
}

impl SequentialDelivery {
    /// Delivers `bundle` to `handlers`, returning how many succeeded.
    pub(crate) async fn deliver<B>(
        &self,
        tag: &NotificationTag,
        handlers: &[Arc<HandlerBinding>],
        binder: &Binder,
        bundle: &B,
    ) -> Result<usize, NotifyError>
    where
        B: Bundle + ?Sized,
    {
        let mut attempted = 0;
        let mut failures = Vec::new();

        for binding in handlers {
            attempted += 1;

            let outcome = match binder.bind(binding.signature(), bundle) {
                Ok(args) => {
                    let attempt = self.invoke(tag, binding, args);
                    #[cfg(feature = "tracing")]
                    let attempt = tracing::Instrument::instrument(
                        attempt,
                        tracing::debug_span!("handler", tag = %tag, handler = %binding.name()),
                    );
                    attempt.await.map_err(HandlerFailure::from)
                }
                Err(errors) => Err(HandlerFailure::from(BindingFailure {
                    tag: tag.clone(),
                    handler: binding.name().clone(),
                    target: binding.target_type(),
                    errors,
                })),
            };

            if let Err(failure) = outcome {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    tag = %tag,
                    handler = %binding.name(),
                    target_type = binding.target_type(),
                    error = %failure,
                    "handler failed"
                );
                failures.push(failure);
                if self.policy == FailurePolicy::Abort {
                    break;
                }
            }
        }

        if failures.is_empty() {
            Ok(attempted)
        } else {
            Err(NotifyError {
                tag: tag.clone(),
                attempted,
                failures,
            })
        }
    }

    async fn invoke(
        &self,
        tag: &NotificationTag,
        binding: &HandlerBinding,
        args: Arguments,
    ) -> Result<(), InvocationError> {
        let outcome = if self.catch_panics {
            // Synchronous handlers run while the future is created.
            match panic::catch_unwind(AssertUnwindSafe(|| binding.callable().call(args))) {
                Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
                Err(payload) => Err(payload),
            }
        } else {
            Ok(binding.callable().call(args).await)
        };

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(InvocationError::Failed {
                tag: tag.clone(),
                handler: binding.name().clone(),
                source,
            }),
            Err(payload) => Err(InvocationError::Panicked {
                tag: tag.clone(),
                handler: binding.name().clone(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
