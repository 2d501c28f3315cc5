//! Bundle to argument binding.
//!
//! For each declared parameter, in order:
//!
//! 1. Look up the bundle field with exactly the parameter's name
//! 2. A missing or null field leaves the argument unset
//! 3. A field the declared type accepts is passed as is
//! 4. Anything else goes through the [`ParameterAdapter`], once; its
//!    result must be null or accepted by the declared type
//!
//! Every parameter is attempted; failures are collected rather than
//! stopping at the first one.

use crate::adapter::StandardAdapter;
use std::{fmt, sync::Arc};
use tidings_core::{
    AdaptationError, Arguments, Bundle, ParameterAdapter, ParameterError, Signature, Value,
};

/// Produces positional [`Arguments`] from a [`Bundle`].
#[derive(Clone)]
pub struct Binder {
    adapter: Arc<dyn ParameterAdapter>,
}

impl Binder {
    /// Creates a binder consulting `adapter` for mismatched fields.
    pub fn new<A: ParameterAdapter>(adapter: A) -> Self {
        Self {
            adapter: Arc::new(adapter),
        }
    }

    /// Creates a binder from an already shared adapter.
    pub fn from_shared(adapter: Arc<dyn ParameterAdapter>) -> Self {
        Self { adapter }
    }

    /// The adapter this binder consults.
    pub fn adapter(&self) -> &dyn ParameterAdapter {
        &*self.adapter
    }

    /// Binds `bundle` to `signature`.
    ///
    /// Returns one argument per parameter, or the error of every parameter
    /// whose field could not be adapted.
    pub fn bind<B>(&self, signature: &Signature, bundle: &B) -> Result<Arguments, Vec<ParameterError>>
    where
        B: Bundle + ?Sized,
    {
        let mut slots = Vec::with_capacity(signature.len());
        let mut errors = Vec::new();

        for (index, param) in signature.iter().enumerate() {
            let value = match bundle.field(param.name()) {
                None | Some(Value::Null) => {
                    slots.push(None);
                    continue;
                }
                Some(value) => value,
            };

            if param.ty().accepts(&value) {
                slots.push(Some(value));
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(
                param = param.name(),
                found = %value.kind(),
                expected = %param.ty(),
                "adapting field"
            );

            let adapted = self.adapter.adapt(value, param.ty()).and_then(|adapted| {
                if adapted.is_null() || param.ty().accepts(&adapted) {
                    Ok(adapted)
                } else {
                    Err(AdaptationError::invalid(
                        &adapted,
                        param.ty(),
                        "adapter returned an incompatible value",
                    ))
                }
            });

            match adapted {
                Ok(Value::Null) => slots.push(None),
                Ok(adapted) => slots.push(Some(adapted)),
                Err(source) => {
                    slots.push(None);
                    errors.push(ParameterError {
                        index,
                        name: param.name().to_owned(),
                        source,
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(Arguments::new(slots))
        } else {
            Err(errors)
        }
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(StandardAdapter)
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StrictAdapter, testing::RecordingAdapter};
    use tidings_core::{Fields, Param, ParamType, ValueKind};

    fn signature(params: &[(&'static str, ParamType)]) -> Signature {
        params
            .iter()
            .map(|(name, ty)| Param::new(*name, ty.clone()))
            .collect()
    }

    #[test]
    fn test_exact_fields_bind_positionally() {
        let sig = signature(&[("name", ParamType::Str), ("age", ParamType::Int)]);
        let bundle = Fields::new().with("age", 30).with("name", "Alice");

        let args = Binder::default().bind(&sig, &bundle).unwrap();
        assert_eq!(args.get(0), Some(&Value::Str("Alice".into())));
        assert_eq!(args.get(1), Some(&Value::Int(30)));
    }

    #[test]
    fn test_missing_and_null_fields_are_unset() {
        let sig = signature(&[("name", ParamType::Str), ("age", ParamType::Int)]);
        let bundle = Fields::new().with("name", Value::Null).with("Age", 3);

        let args = Binder::new(StrictAdapter).bind(&sig, &bundle).unwrap();
        assert_eq!(args.len(), 2);
        assert!(args.is_unset(0));
        assert!(args.is_unset(1));
    }

    #[test]
    fn test_compatible_fields_skip_the_adapter() {
        let recorder = RecordingAdapter::new(StrictAdapter);
        let sig = signature(&[("tags", ParamType::List(Box::new(ParamType::Any)))]);
        let bundle = Fields::new().with("tags", vec!["a", "b"]);

        let args = Binder::new(recorder.clone()).bind(&sig, &bundle).unwrap();
        assert_eq!(args.get(0).map(Value::kind), Some(ValueKind::List));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_adapter_called_once_per_mismatch() {
        let recorder = RecordingAdapter::new(StandardAdapter);
        let sig = signature(&[
            ("id", ParamType::Int),
            ("score", ParamType::Float),
            ("label", ParamType::Str),
        ]);
        let bundle = Fields::new()
            .with("id", "17")
            .with("score", 3)
            .with("label", "ok");

        let args = Binder::new(recorder.clone()).bind(&sig, &bundle).unwrap();
        assert_eq!(args.get(0), Some(&Value::Int(17)));
        assert_eq!(args.get(1), Some(&Value::Float(3.0)));
        assert_eq!(
            recorder.calls(),
            vec![
                (Value::Str("17".into()), ParamType::Int),
                (Value::Int(3), ParamType::Float),
            ]
        );
    }

    #[test]
    fn test_adapted_null_leaves_slot_unset() {
        let nulling = |_v: Value, _t: &ParamType| Ok::<_, AdaptationError>(Value::Null);
        let sig = signature(&[("count", ParamType::Int)]);
        let bundle = Fields::new().with("count", "many");

        let args = Binder::new(nulling).bind(&sig, &bundle).unwrap();
        assert!(args.is_unset(0));
    }

    #[test]
    fn test_incompatible_adapter_output_fails_the_parameter() {
        let sloppy = |_v: Value, _t: &ParamType| Ok::<_, AdaptationError>(Value::Str("oops".into()));
        let sig = signature(&[("label", ParamType::Str), ("count", ParamType::Int)]);
        let bundle = Fields::new().with("label", 4).with("count", "7");

        let errors = Binder::new(sloppy).bind(&sig, &bundle).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!((errors[0].index, errors[0].name.as_str()), (1, "count"));
        assert!(matches!(
            &errors[0].source,
            AdaptationError::Invalid { found: ValueKind::Str, expected: ParamType::Int, .. }
        ));
    }

    #[test]
    fn test_every_failure_is_reported() {
        let sig = signature(&[
            ("a", ParamType::Int),
            ("b", ParamType::Str),
            ("c", ParamType::Bool),
        ]);
        let bundle = Fields::new().with("a", "x").with("b", "fine").with("c", 2.5);

        let errors = Binder::default().bind(&sig, &bundle).unwrap_err();
        let failed: Vec<_> = errors.iter().map(|e| (e.index, e.name.as_str())).collect();
        assert_eq!(failed, [(0, "a"), (2, "c")]);
        assert!(matches!(errors[1].source, AdaptationError::Unsupported { .. }));
    }
}
