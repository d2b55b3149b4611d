//! Dispatcher core: registry, invocation and dispatch.
//!
//! The public API from this module is [`Dispatcher`], its [`DispatcherBuilder`]
//! and [`DispatcherConfig`].
//!
//! Internal modules:
//! - [`dispatcher`]: registration, removal, `emit` / `emit_sync`, policy setters;
//! - [`registry`]: event key → ordered listener entries;
//! - [`invoker`]: runs one listener, catching errors and panics;
//! - [`builder`]: assembles config + recoverer;
//! - [`config`]: listener cap and its sentinel.

mod builder;
mod config;
mod dispatcher;
mod invoker;
mod registry;

pub use builder::DispatcherBuilder;
pub use config::{DispatcherConfig, DEFAULT_MAX_LISTENERS};
pub use dispatcher::{Dispatcher, EventKey};
pub(crate) use dispatcher::Shared;
