//! Error types used by the dispatcher and by listener bodies.
//!
//! This module defines two main error enums:
//!
//! - [`DispatchError`]: errors raised by the dispatcher itself (validation at
//!   registration time, and listener failures observed during dispatch).
//! - [`ListenerError`]: errors returned by individual listener bodies.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

/// # Errors produced by the dispatcher.
///
/// With a recoverer installed these are handed to it and never surface to the
/// caller. Without one they are returned from the call that raised them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A value supplied where a listener was expected is not invocable.
    #[error("argument is not a listener (found {found})")]
    NotCallable {
        /// Kind of the rejected value (see [`Value::kind`](crate::Value::kind)).
        found: &'static str,
    },

    /// Adding the listener would exceed the per-event cap.
    #[error("event exceeds the maximum listener count ({max})")]
    ExceedMaxListeners {
        /// The configured cap at the time of the rejected add.
        max: usize,
    },

    /// A listener body returned an error or panicked during dispatch.
    #[error("listener '{listener}' failed: {reason}")]
    ListenerFailure {
        /// Name of the failing listener.
        listener: String,
        /// Error message or panic payload.
        reason: String,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use trigger::DispatchError;
    ///
    /// let err = DispatchError::ExceedMaxListeners { max: 16 };
    /// assert_eq!(err.as_label(), "exceed_max_listeners");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::NotCallable { .. } => "not_callable",
            DispatchError::ExceedMaxListeners { .. } => "exceed_max_listeners",
            DispatchError::ListenerFailure { .. } => "listener_failure",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::NotCallable { found } => format!("not callable: {found}"),
            DispatchError::ExceedMaxListeners { max } => format!("listener cap reached: {max}"),
            DispatchError::ListenerFailure { listener, reason } => {
                format!("listener={listener} reason={reason}")
            }
        }
    }

    /// True for errors raised at registration/removal time.
    ///
    /// ```
    /// use trigger::DispatchError;
    ///
    /// assert!(DispatchError::NotCallable { found: "int" }.is_validation());
    /// ```
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DispatchError::NotCallable { .. } | DispatchError::ExceedMaxListeners { .. }
        )
    }
}

/// # Errors returned by listener bodies.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener could not handle the event.
    #[error("listener failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// An argument had a different type than the listener expected.
    #[error("argument {index}: expected {expected}, found {found}")]
    ArgType {
        /// Position of the argument.
        index: usize,
        /// Type the listener asked for.
        expected: &'static str,
        /// Kind of the value actually supplied.
        found: &'static str,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Fail`].
    pub fn fail(error: impl std::fmt::Display) -> Self {
        ListenerError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Fail { .. } => "listener_failed",
            ListenerError::ArgType { .. } => "listener_arg_type",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Fail { error } => format!("error: {error}"),
            ListenerError::ArgType {
                index,
                expected,
                found,
            } => format!("arg #{index}: want {expected}, got {found}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            DispatchError::NotCallable { found: "str" }.as_label(),
            "not_callable"
        );
        assert_eq!(
            DispatchError::ListenerFailure {
                listener: "a".into(),
                reason: "b".into()
            }
            .as_label(),
            "listener_failure"
        );
        assert_eq!(ListenerError::fail("x").as_label(), "listener_failed");
    }

    #[test]
    fn test_validation_split() {
        assert!(DispatchError::ExceedMaxListeners { max: 1 }.is_validation());
        assert!(
            !DispatchError::ListenerFailure {
                listener: "a".into(),
                reason: "b".into()
            }
            .is_validation()
        );
    }

    #[test]
    fn test_display() {
        let err = ListenerError::ArgType {
            index: 0,
            expected: "str",
            found: "int",
        };
        assert_eq!(err.to_string(), "argument 0: expected str, found int");
        assert_eq!(
            DispatchError::ExceedMaxListeners { max: 16 }.to_string(),
            "event exceeds the maximum listener count (16)"
        );
    }
}
