//! # One-shot listener wrapper.
//!
//! [`OnceListener`] is what [`Dispatcher::once`](crate::Dispatcher::once) actually
//! registers. On invocation it first unregisters **itself** (by its own identity,
//! not the wrapped listener's) and only then forwards the call.
//!
//! ```text
//! emit(k) ─► snapshot [.., OnceListener, ..]
//!                           │
//!                           ├─► registry.remove(k, self)   (write lock, released)
//!                           └─► inner.on_event(args)       (failure still removed)
//! ```
//!
//! ## Race
//! Dispatch snapshots before invoking. Two overlapping `emit` calls that both
//! snapshot before either removal runs will both invoke the wrapper, so the inner
//! listener may run twice. Sequential `emit_sync` calls cannot overlap this way.

use std::sync::Weak;

use async_trait::async_trait;

use crate::core::{EventKey, Shared};
use crate::error::ListenerError;
use crate::listeners::listener::{Listener, ListenerRef};
use crate::values::Args;

/// Self-removing wrapper around a listener.
pub(crate) struct OnceListener<K: EventKey> {
    event: K,
    inner: ListenerRef,
    shared: Weak<Shared<K>>,
}

impl<K: EventKey> OnceListener<K> {
    pub(crate) fn new(event: K, inner: ListenerRef, shared: Weak<Shared<K>>) -> Self {
        Self {
            event,
            inner,
            shared,
        }
    }

    fn identity(&self) -> *const () {
        (self as *const Self).cast::<()>()
    }
}

#[async_trait]
impl<K: EventKey> Listener for OnceListener<K> {
    async fn on_event(&self, args: &Args) -> Result<(), ListenerError> {
        // Dispatcher already dropped: nothing left to unregister from.
        if let Some(shared) = self.shared.upgrade() {
            shared.remove_entry(&self.event, self.identity());
        }
        self.inner.on_event(args).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
