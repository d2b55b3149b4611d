//! # Closure-backed listeners (`ListenerFn`, `SyncListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(Args) -> Fut`, producing a fresh future
//! per emission. The closure receives its own [`Args`] handle, so the future owns
//! everything it needs.
//!
//! [`SyncListenerFn`] wraps a plain `Fn(&Args) -> Result<..>` for bodies that
//! never await.
//!
//! ## Example
//! ```rust
//! use trigger::{Args, Listener, ListenerError, ListenerFn, ListenerRef, SyncListenerFn};
//!
//! let l: ListenerRef = ListenerFn::arc("greeter", |args: Args| async move {
//!     let who: String = args.get(0)?;
//!     println!("hello {who}");
//!     Ok::<_, ListenerError>(())
//! });
//! assert_eq!(l.name(), "greeter");
//!
//! let s: ListenerRef = SyncListenerFn::arc("noop", |_args: &Args| Ok(()));
//! assert_eq!(s.name(), "noop");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::listeners::listener::{Listener, ListenerRef};
use crate::values::Args;

/// Async closure listener.
#[derive(Debug)]
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new closure listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a [`ListenerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F, Fut> ListenerFn<F>
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
{
    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> ListenerRef {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Listener for ListenerFn<F>
where
    F: Fn(Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
{
    async fn on_event(&self, args: &Args) -> Result<(), ListenerError> {
        (self.f)(args.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Synchronous closure listener.
#[derive(Debug)]
pub struct SyncListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncListenerFn<F>
where
    F: Fn(&Args) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    /// Creates a new closure listener.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> ListenerRef {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F> Listener for SyncListenerFn<F>
where
    F: Fn(&Args) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    async fn on_event(&self, args: &Args) -> Result<(), ListenerError> {
        (self.f)(args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
