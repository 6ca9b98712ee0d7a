use std::fmt;

use serde::{Deserialize, Serialize};

/// A single typed scalar.
///
/// Binary, date, name/path and reference values have no representation here;
/// stores hand them over as strings and they are kept verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoreValue {
    Long(i64),
    Double(f64),
    Boolean(bool),
    String(String),
}

impl fmt::Display for CoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for CoreValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for CoreValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for CoreValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for CoreValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for CoreValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// The value of a property: one scalar, or an ordered sequence of scalars.
///
/// Multi-valued properties are not required to be homogeneous.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Single(CoreValue),
    Multi(Vec<CoreValue>),
}

impl PropertyValue {
    /// Returns `true` for multi-valued properties (even when empty).
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// All scalars, in order. A single-valued property yields one element.
    pub fn values(&self) -> &[CoreValue] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(v) => write!(f, "{v}"),
            Self::Multi(vs) => {
                write!(f, "[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<CoreValue> for PropertyValue {
    fn from(v: CoreValue) -> Self {
        Self::Single(v)
    }
}

impl From<Vec<CoreValue>> for PropertyValue {
    fn from(vs: Vec<CoreValue>) -> Self {
        Self::Multi(vs)
    }
}
