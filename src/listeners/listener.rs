//! # Listener trait.
//!
//! Provides [`Listener`], the extension point invoked by the dispatcher for every
//! emission of an event it is registered on.
//!
//! ## Rules
//! - A listener receives the full [`Args`] of the emission.
//! - Errors are returned, not raised: return [`ListenerError`] and the dispatcher
//!   reports it as `DispatchError::ListenerFailure`.
//! - Panics are caught and reported the same way; sibling listeners are unaffected.
//! - Identity is the `Arc` allocation: registering the same [`ListenerRef`] twice
//!   creates two entries, and removing it removes both.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use trigger::{Args, Listener, ListenerError};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Listener for Audit {
//!     async fn on_event(&self, args: &Args) -> Result<(), ListenerError> {
//!         let user: String = args.get(0)?;
//!         println!("audit: {user}");
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str { "audit" }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::values::Args;

/// Callable registered against an event key.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Handles one emission.
    ///
    /// Called outside the dispatcher lock, so the body may register, remove or
    /// emit on the same dispatcher.
    async fn on_event(&self, args: &Args) -> Result<(), ListenerError>;

    /// Returns the listener name used in logs and failure reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a listener; the unit stored in the registry.
pub type ListenerRef = Arc<dyn Listener>;

/// Address of the allocation behind a listener handle.
#[inline]
pub(crate) fn identity(listener: &ListenerRef) -> *const () {
    Arc::as_ptr(listener).cast::<()>()
}

/// True if both handles point at the same listener.
#[inline]
pub fn same(a: &ListenerRef, b: &ListenerRef) -> bool {
    identity(a) == identity(b)
}
