//! # Event listeners.
//!
//! This module provides the [`Listener`] trait and the adapters used to build
//! listeners from closures.
//!
//! ## Contents
//! - [`Listener`] trait invoked by the dispatcher
//! - [`ListenerRef`] shared handle; its allocation is the listener's identity
//! - [`ListenerFn`] / [`SyncListenerFn`] closure adapters
//! - `OnceListener` self-removing wrapper installed by `Dispatcher::once`

mod listener;
mod listener_fn;
mod once;

pub(crate) use listener::identity;
pub use listener::{same, Listener, ListenerRef};
pub use listener_fn::{ListenerFn, SyncListenerFn};
pub(crate) use once::OnceListener;
