//! # Tagged argument values.
//!
//! [`Value`] is the uniform currency between emitters and listeners: every
//! argument of a dispatch, and every value handed to a registration call, is a
//! `Value`. [`Value::Nil`] is the absence value.
//!
//! [`FromValue`] converts a value back into a concrete Rust type for
//! [`Args::get`](crate::Args::get), including the zero value used when an
//! argument is `Nil` or missing.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::listeners::{self, Listener, ListenerRef};

/// A single dispatch argument (or a value supplied for registration).
#[derive(Clone, Default)]
pub enum Value {
    /// Absence value.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Any shareable Rust value; retrieve with [`Value::downcast`].
    Opaque(Arc<dyn Any + Send + Sync>),
    /// A callable listener.
    Listener(ListenerRef),
}

impl Value {
    /// Wraps an arbitrary value as [`Value::Opaque`].
    pub fn opaque<T: Any + Send + Sync>(v: T) -> Self {
        Value::Opaque(Arc::new(v))
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Opaque(_) => "opaque",
            Value::Listener(_) => "listener",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the listener if this value is callable.
    pub fn as_listener(&self) -> Option<&ListenerRef> {
        match self {
            Value::Listener(l) => Some(l),
            _ => None,
        }
    }

    /// Downcasts an opaque value to `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Opaque(any) => Arc::clone(any).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Value::Opaque(_) => f.write_str("Opaque(..)"),
            Value::Listener(l) => write!(f, "Listener({})", l.name()),
        }
    }
}

impl PartialEq for Value {
    /// Listeners and opaque values compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            (Value::Listener(a), Value::Listener(b)) => listeners::same(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<ListenerRef> for Value {
    fn from(v: ListenerRef) -> Self {
        Value::Listener(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

/// Conversion from a [`Value`] into a concrete argument type.
///
/// `zero` is what a listener sees for a `Nil` or missing argument.
pub trait FromValue: Sized {
    /// Type name reported in [`ListenerError::ArgType`](crate::ListenerError::ArgType).
    const EXPECTED: &'static str;

    /// Returns `None` when the value has a different type.
    fn from_value(value: &Value) -> Option<Self>;

    /// Zero value of the type.
    fn zero() -> Self;
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn zero() -> Self {
        false
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn zero() -> Self {
        0
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }

    fn zero() -> Self {
        0
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn zero() -> Self {
        0.0
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "str";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn zero() -> Self {
        String::new()
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b.clone()),
            _ => None,
        }
    }

    fn zero() -> Self {
        Vec::new()
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn zero() -> Self {
        Value::Nil
    }
}
