//! # trigger
//!
//! **Trigger** is an in-process event dispatcher for async Rust.
//!
//! Callers register listeners against an event key, then emit that key with a
//! list of arguments; every registered listener is invoked with those arguments.
//! It decouples producers of occurrences from the consumers reacting to them
//! within a single process.
//!
//! ## Architecture
//! ```text
//!   on(k, l) / once(k, l) / off(k, l)            emit(k, args) / emit_sync(k, args)
//!            │                                              │
//!            ▼ write lock                                   ▼ read lock (snapshot only)
//! ┌───────────────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                               │
//! │  - Registry  (K → [ListenerRef, ...] in registration order)               │
//! │  - Policy    (max_listeners, recoverer)                                   │
//! └───────────────────────────────────────┬───────────────────────────────────┘
//!                                         │ lock released before invoking
//!                  ┌──────────────────────┴──────────────────────┐
//!                  ▼ emit                                        ▼ emit_sync
//!        one tokio task per listener                  listeners in order,
//!        joined before returning                      on the caller's task
//!                  │                                             │
//!                  └────────► invoke(listener, args) ◄───────────┘
//!                                  │
//!                                  └─ Err / panic ─► recoverer(k, listener, err)
//!                                                    (or returned as Err if none)
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types / traits                        |
//! |-----------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Dispatch**    | Register, remove, one-shot, concurrent and sequential emit.   | [`Dispatcher`], [`EventKey`]              |
//! | **Listeners**   | Async trait or closures; identity is the `Arc` allocation.    | [`Listener`], [`ListenerFn`], [`SyncListenerFn`] |
//! | **Arguments**   | Tagged values with zero-value fill for `Nil`/missing.         | [`Args`], [`Value`], [`FromValue`]        |
//! | **Policies**    | Per-event listener cap and failure recoverer.                 | [`DispatcherConfig`], [`Recoverer`]       |
//! | **Errors**      | Typed dispatcher and listener errors.                         | [`DispatchError`], [`ListenerError`]      |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use trigger::{args, Args, Dispatcher, DispatchError, ListenerError, ListenerFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), DispatchError> {
//!     let hits = Arc::new(AtomicUsize::new(0));
//!     let d = Dispatcher::new();
//!
//!     let counter = {
//!         let hits = Arc::clone(&hits);
//!         ListenerFn::arc("counter", move |args: Args| {
//!             let hits = Arc::clone(&hits);
//!             async move {
//!                 let n: i64 = args.get(0)?;
//!                 hits.fetch_add(n as usize, Ordering::SeqCst);
//!                 Ok::<_, ListenerError>(())
//!             }
//!         })
//!     };
//!
//!     d.on("tick", counter.clone())?.on("tick", counter)?;
//!     d.emit("tick", args![2]).await?;
//!     assert_eq!(hits.load(Ordering::SeqCst), 4);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod listeners;
mod policies;
mod values;

// ---- Public re-exports ----

pub use crate::core::{
    Dispatcher, DispatcherBuilder, DispatcherConfig, EventKey, DEFAULT_MAX_LISTENERS,
};
pub use error::{DispatchError, ListenerError};
pub use listeners::{same, Listener, ListenerFn, ListenerRef, SyncListenerFn};
pub use policies::{default_recoverer, print_recoverer, Recoverer};
pub use values::{Args, FromValue, Value};
