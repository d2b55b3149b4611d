//! # Argument list shared by all listeners of one dispatch.
//!
//! [`Args`] is an immutable, `Arc`-backed sequence of [`Value`]s. Cloning is a
//! reference-count bump, so each spawned listener task gets its own handle.
//!
//! ## Zero values
//! [`Args::get`] fills a `Nil` or missing position with the zero value of the
//! requested type, so a listener expecting `(String, i64)` can be triggered with
//! `args![Value::Nil]` and observe `("", 0)`.
//!
//! ## Example
//! ```rust
//! use trigger::{args, Args, Value};
//!
//! let a: Args = args!["report", 3, Value::Nil];
//! assert_eq!(a.get::<String>(0).unwrap(), "report");
//! assert_eq!(a.get::<i64>(1).unwrap(), 3);
//! assert_eq!(a.get::<i64>(2).unwrap(), 0);
//! assert_eq!(a.get::<bool>(9).unwrap(), false);
//! assert!(a.get::<bool>(0).is_err());
//! ```

use std::ops::Deref;
use std::sync::Arc;

use crate::error::ListenerError;

use super::value::{FromValue, Value};

static NIL: Value = Value::Nil;

/// Ordered dispatch arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    values: Arc<[Value]>,
}

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the raw value at `index`, or `Nil` past the end.
    pub fn value(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NIL)
    }

    /// Converts the argument at `index` into `T`.
    ///
    /// `Nil` and missing positions yield [`FromValue::zero`]; a value of any
    /// other type yields [`ListenerError::ArgType`].
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, ListenerError> {
        let value = self.value(index);
        if value.is_nil() {
            return Ok(T::zero());
        }
        T::from_value(value).ok_or(ListenerError::ArgType {
            index,
            expected: T::EXPECTED,
            found: value.kind(),
        })
    }

    /// Underlying values.
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl Deref for Args {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self {
            values: values.into(),
        }
    }
}

impl From<()> for Args {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Builds [`Args`] from values convertible into [`Value`].
///
/// ```rust
/// use trigger::args;
///
/// let a = args![1, "two", 3.0];
/// assert_eq!(a.len(), 3);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::empty()
    };
    ($($v:expr),+ $(,)?) => {
        $crate::Args::from(::std::vec![$($crate::Value::from($v)),+])
    };
}
