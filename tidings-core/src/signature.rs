//! Handler parameter signatures.

use crate::value::ParamType;
use std::{borrow::Cow, fmt};

/// One named, typed handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: Cow<'static, str>,
    ty: ParamType,
}

impl Param {
    /// Creates a parameter.
    pub fn new(name: impl Into<Cow<'static, str>>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// The bundle field this parameter binds to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn ty(&self) -> &ParamType {
        &self.ty
    }
}

/// The ordered parameter list of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Creates a signature from parameters in positional order.
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// Returns the parameters in positional order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Iterates over the parameters in positional order.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// The number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` for a handler taking no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<Param> for Signature {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.name, param.ty)?;
        }
        f.write_str(")")
    }
}
