//! Attribute values carried by a [`ComposableError`](crate::ComposableError).
//!
//! Attributes are stored as a closed sum type so that reads can distinguish a
//! missing key from a key holding a value of another type. Narrowing is exact:
//! no numeric widening or string parsing is attempted.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

/// Attribute map keyed by name. Ordered so that rendering is deterministic.
pub type Attrs = BTreeMap<String, AttrValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Platform-width signed integer.
    Int(isize),
    Int64(i64),
    /// Platform-width unsigned integer.
    Uint(usize),
    Uint64(u64),
    String(String),
    Time(DateTime<Utc>),
    Duration(Duration),
    Bool(bool),
    Float(f64),
}

impl AttrValue {
    /// Name of the stored type, as reported in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Int(_) => isize::TYPE_NAME,
            AttrValue::Int64(_) => i64::TYPE_NAME,
            AttrValue::Uint(_) => usize::TYPE_NAME,
            AttrValue::Uint64(_) => u64::TYPE_NAME,
            AttrValue::String(_) => String::TYPE_NAME,
            AttrValue::Time(_) => <DateTime<Utc>>::TYPE_NAME,
            AttrValue::Duration(_) => Duration::TYPE_NAME,
            AttrValue::Bool(_) => bool::TYPE_NAME,
            AttrValue::Float(_) => f64::TYPE_NAME,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Int64(v) => write!(f, "{v}"),
            AttrValue::Uint(v) => write!(f, "{v}"),
            AttrValue::Uint64(v) => write!(f, "{v}"),
            AttrValue::String(v) => f.write_str(v),
            AttrValue::Time(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            AttrValue::Duration(v) => write!(f, "{v:?}"),
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Failure to read an attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttrError {
    #[error("{key}: attribute not found")]
    NotFound { key: String },

    #[error("{key}: cannot convert attribute value to {expected} (found {found})")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl AttrError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AttrError::NotFound { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, AttrError::TypeMismatch { .. })
    }

    /// The key the failed lookup was made with.
    pub fn key(&self) -> &str {
        match self {
            AttrError::NotFound { key } | AttrError::TypeMismatch { key, .. } => key,
        }
    }
}

/// Exact narrowing from an [`AttrValue`] to a concrete Rust type.
///
/// Implemented for every type an `AttrValue` variant holds. The lifetime lets
/// string attributes be read without copying.
pub trait FromAttr<'a>: Sized {
    /// Type name used in [`AttrError::TypeMismatch`].
    const TYPE_NAME: &'static str;

    /// Returns `None` when `value` holds a different variant.
    fn from_attr(value: &'a AttrValue) -> Option<Self>;
}

macro_rules! from_attr_copy {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl<'a> FromAttr<'a> for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_attr(value: &'a AttrValue) -> Option<Self> {
                match value {
                    AttrValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

from_attr_copy!(isize, Int, "isize");
from_attr_copy!(i64, Int64, "i64");
from_attr_copy!(usize, Uint, "usize");
from_attr_copy!(u64, Uint64, "u64");
from_attr_copy!(DateTime<Utc>, Time, "DateTime<Utc>");
from_attr_copy!(Duration, Duration, "Duration");
from_attr_copy!(bool, Bool, "bool");
from_attr_copy!(f64, Float, "f64");

impl<'a> FromAttr<'a> for &'a str {
    const TYPE_NAME: &'static str = "string";

    fn from_attr(value: &'a AttrValue) -> Option<Self> {
        match value {
            AttrValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl<'a> FromAttr<'a> for String {
    const TYPE_NAME: &'static str = "string";

    fn from_attr(value: &'a AttrValue) -> Option<Self> {
        <&str>::from_attr(value).map(str::to_owned)
    }
}

// ── Conversions into AttrValue ────────────────────────────────────

macro_rules! into_attr {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(v: $ty) -> Self {
                    AttrValue::$variant(v)
                }
            }
        )*
    };
}

into_attr! {
    isize => Int,
    i64 => Int64,
    usize => Uint,
    u64 => Uint64,
    String => String,
    DateTime<Utc> => Time,
    Duration => Duration,
    bool => Bool,
    f64 => Float,
}

// Unsuffixed integer literals infer to i32; store them as the platform int.
impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as isize)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::Uint(v as usize)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(f64::from(v))
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_owned())
    }
}

impl From<&String> for AttrValue {
    fn from(v: &String) -> Self {
        AttrValue::String(v.clone())
    }
}
