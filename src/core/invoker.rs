//! # Listener invocation with failure isolation.
//!
//! [`invoke`] runs one listener and turns every way it can fail into a
//! [`DispatchError::ListenerFailure`]:
//! - `Err(ListenerError)` returned by the body
//! - a panic while creating the body's future or while polling it (caught with
//!   `catch_unwind` in both places)
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a listener uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use futures::FutureExt;

use crate::error::DispatchError;
use crate::listeners::{Listener, ListenerRef};
use crate::values::Args;

/// Runs `listener` once with `args`.
pub(crate) async fn invoke(listener: &ListenerRef, args: &Args) -> Result<(), DispatchError> {
    let fut = match catch_unwind(AssertUnwindSafe(|| listener.on_event(args))) {
        Ok(fut) => fut,
        Err(panic_err) => return Err(failure(listener, panic_message(&*panic_err))),
    };
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(failure(listener, err.to_string())),
        Err(panic_err) => Err(failure(listener, panic_message(&*panic_err))),
    }
}

fn failure(listener: &ListenerRef, reason: String) -> DispatchError {
    DispatchError::ListenerFailure {
        listener: listener.name().to_string(),
        reason,
    }
}

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        format!("panic: {msg}")
    } else if let Some(msg) = any.downcast_ref::<String>() {
        format!("panic: {msg}")
    } else {
        "unknown panic".to_string()
    }
}
