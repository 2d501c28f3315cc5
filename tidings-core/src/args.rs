//! Positional argument lists produced by binding.

use crate::{
    convert::FromValue,
    error::ArgumentError,
    value::{ParamType, Value},
};

/// The positional arguments bound for one handler invocation.
///
/// A slot is `None` when the bundle had no usable field for that parameter;
/// the parameter then takes its type's default value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    slots: Vec<Option<Value>>,
}

impl Arguments {
    /// Creates an argument list from bound slots.
    pub fn new(slots: Vec<Option<Value>>) -> Self {
        Self { slots }
    }

    /// The number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The value bound at `index`, or `None` if unset or out of range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Returns `true` if no value is bound at `index`.
    pub fn is_unset(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    /// Removes the value at `index` and converts it into `T`.
    ///
    /// An unset slot yields `T`'s default value.
    pub fn take<T: FromValue>(&mut self, index: usize) -> Result<T, ArgumentError> {
        match self.slots.get_mut(index).and_then(Option::take) {
            Some(value) => {
                let found = value.kind();
                T::from_value(value).ok_or_else(|| ArgumentError::Mismatch {
                    index,
                    expected: T::param_type(),
                    found,
                })
            }
            None => T::default_value().ok_or_else(|| ArgumentError::Missing {
                index,
                expected: T::param_type(),
            }),
        }
    }

    /// Consumes the list, returning its slots.
    pub fn into_slots(self) -> Vec<Option<Value>> {
        self.slots
    }
}

impl FromIterator<Option<Value>> for Arguments {
    fn from_iter<I: IntoIterator<Item = Option<Value>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A tuple of handler parameter types.
///
/// Implemented for tuples of up to twelve [`FromValue`] types. Supplies the
/// declared types of a handler signature and converts bound [`Arguments`]
/// into the typed tuple.
pub trait FromArguments: Sized + Send + 'static {
    /// The declared parameter types, in positional order.
    fn param_types() -> Vec<ParamType>;

    /// Converts bound arguments into the typed tuple.
    fn from_arguments(args: Arguments) -> Result<Self, ArgumentError>;
}

impl FromArguments for () {
    fn param_types() -> Vec<ParamType> {
        Vec::new()
    }

    fn from_arguments(_args: Arguments) -> Result<Self, ArgumentError> {
        Ok(())
    }
}

/// Macro to implement FromArguments for tuples of parameter types.
macro_rules! impl_from_arguments_tuple {
    ($($T:ident => $idx:tt),+) => {
        impl<$($T,)+> FromArguments for ($($T,)+)
        where
            $($T: FromValue,)+
        {
            fn param_types() -> Vec<ParamType> {
                vec![$($T::param_type(),)+]
            }

            fn from_arguments(mut args: Arguments) -> Result<Self, ArgumentError> {
                Ok(($(args.take::<$T>($idx)?,)+))
            }
        }
    };
}

impl_from_arguments_tuple!(T1 => 0);
impl_from_arguments_tuple!(T1 => 0, T2 => 1);
impl_from_arguments_tuple!(T1 => 0, T2 => 1, T3 => 2);
impl_from_arguments_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3);
impl_from_arguments_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4);
impl_from_arguments_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5);
impl_from_arguments_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6);
impl_from_arguments_tuple!(
    T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6, T8 => 7
);
impl_from_arguments_tuple!(
    T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6, T8 => 7, T9 => 8
);
impl_from_arguments_tuple!(
    T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6, T8 => 7, T9 => 8,
    T10 => 9
);
impl_from_arguments_tuple!(
    T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6, T8 => 7, T9 => 8,
    T10 => 9, T11 => 10
);
impl_from_arguments_tuple!(
    T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6, T8 => 7, T9 => 8,
    T10 => 9, T11 => 10, T12 => 11
);
