//! # Dispatcher: registry, policy and the two dispatch modes.
//!
//! The [`Dispatcher`] owns the listener registry and the per-instance policy
//! (listener cap + recoverer) behind one private reader/writer lock.
//!
//! ## Key responsibilities
//! - validate and register listeners (`add_listener`/`on`, `once`)
//! - identity-based removal (`remove_listener`/`off`)
//! - concurrent, joined dispatch ([`Dispatcher::emit`])
//! - sequential, ordered dispatch ([`Dispatcher::emit_sync`])
//! - route every failure to the recoverer, or return it when none is installed
//!
//! ## Architecture
//! ```text
//! on / off / once / set_max_listeners / recover_with
//!     └─► state.write()  ──► Registry (K → Vec<ListenerRef>) + Policy
//!
//! emit(k, args)
//!     ├─► state.read()   ──► snapshot(listeners[k]) + recoverer   (lock released)
//!     ├─► tokio::spawn(invoke(l1, args)) ─┐
//!     ├─► tokio::spawn(invoke(l2, args)) ─┼─► failure → recoverer(k, l, err)
//!     ├─► tokio::spawn(invoke(lN, args)) ─┘
//!     └─► await handles in order ──► Ok(&self)
//!
//! emit_sync(k, args)
//!     ├─► state.read()   ──► snapshot (lock released)
//!     └─► for l in snapshot: invoke(l, args).await  (registration order, caller's task)
//! ```
//!
//! ## Rules
//! - Listeners and recoverers run outside the lock; they may call back into the dispatcher.
//! - `emit` has no ordering between listeners; it only guarantees all have finished on return.
//! - `emit_sync` runs listeners one at a time in registration order.
//! - One failing listener never prevents the others from running.
//! - With a recoverer, no error reaches the caller. Without one, validation errors
//!   are returned immediately and listener failures after the dispatch completes.
//! - `emit` spawns tokio tasks and must be called inside a tokio runtime.
//!   Dropping an `emit` future detaches its tasks; listeners are never aborted.
//! - A panicking recoverer is not isolated: in both modes the panic unwinds to
//!   the caller of `emit` / `emit_sync`.
//!
//! ## Once race
//! A [`Dispatcher::once`] listener removes itself when invoked, but dispatch
//! snapshots first. Overlapping `emit` calls on the same key that both snapshot
//! before the removal may each run the listener.
//!
//! ## Example
//! ```rust
//! use trigger::{args, Args, Dispatcher, DispatchError, ListenerError, SyncListenerFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), DispatchError> {
//!     let d = Dispatcher::new();
//!
//!     let greet = SyncListenerFn::arc("greet", |args: &Args| {
//!         let who: String = args.get(0)?;
//!         println!("hello {who}");
//!         Ok::<_, ListenerError>(())
//!     });
//!
//!     d.on("greet", greet.clone())?
//!         .once("greet", greet.clone())?;
//!     assert_eq!(d.get_listener_count("greet"), 2);
//!
//!     d.emit("greet", args!["world"]).await?;
//!     assert_eq!(d.get_listener_count("greet"), 1);
//!
//!     d.off("greet", greet)?;
//!     assert_eq!(d.get_listener_count("greet"), 0);
//!     Ok(())
//! }
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::core::{
    builder::DispatcherBuilder, config::DispatcherConfig, invoker, registry::Registry,
};
use crate::error::DispatchError;
use crate::listeners::{identity, Listener, ListenerRef, OnceListener};
use crate::policies::{Policy, Recoverer};
use crate::values::{Args, Value};

/// Requirements on an event key: a stable, comparable, shareable identifier.
///
/// Blanket-implemented; strings, integers and small enums all qualify.
pub trait EventKey: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> EventKey for T where T: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

/// Everything guarded by the dispatcher lock.
struct State<K> {
    registry: Registry<K>,
    policy: Policy<K>,
}

/// Lock + state shared between dispatcher handles and once-wrappers.
pub(crate) struct Shared<K: EventKey> {
    state: RwLock<State<K>>,
}

impl<K: EventKey> Shared<K> {
    /// Removes every entry on `event` with the given identity.
    pub(crate) fn remove_entry(&self, event: &K, id: *const ()) -> usize {
        let removed = self.state.write().registry.remove(event, id);
        trace!(event = ?event, removed, "entry removed");
        removed
    }

    /// Listeners for `event` plus the recoverer, read under one shared lock.
    fn snapshot(&self, event: &K) -> (Vec<ListenerRef>, Option<Recoverer<K>>) {
        let state = self.state.read();
        (
            state.registry.snapshot(event),
            state.policy.recoverer.clone(),
        )
    }

    fn recoverer(&self) -> Option<Recoverer<K>> {
        self.state.read().policy.recoverer.clone()
    }
}

/// In-process event dispatcher.
///
/// Cloning yields another handle to the same registry and policy.
pub struct Dispatcher<K: EventKey> {
    shared: Arc<Shared<K>>,
}

impl<K: EventKey> Clone for Dispatcher<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K: EventKey> Default for Dispatcher<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventKey> fmt::Debug for Dispatcher<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("Dispatcher")
            .field("events", &state.registry.keys())
            .field("max_listeners", &state.policy.cfg.max_listeners)
            .field("recoverer", &state.policy.recoverer.is_some())
            .finish()
    }
}

impl<K: EventKey> Dispatcher<K> {
    /// Creates a dispatcher with `max_listeners = 16` and the stdout recoverer.
    #[must_use]
    pub fn new() -> Self {
        Self::builder(DispatcherConfig::default()).build()
    }

    /// Returns a builder for custom configuration.
    pub fn builder(cfg: DispatcherConfig) -> DispatcherBuilder<K> {
        DispatcherBuilder::new(cfg)
    }

    pub(crate) fn from_parts(cfg: DispatcherConfig, recoverer: Option<Recoverer<K>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(State {
                    registry: Registry::new(),
                    policy: Policy::new(cfg, recoverer),
                }),
            }),
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Appends `listener` to `event`.
    ///
    /// Fails with `NotCallable` if `listener` is not a [`Value::Listener`], and with
    /// `ExceedMaxListeners` if `event` already holds `max_listeners` entries. With a
    /// recoverer installed the failure goes to it, nothing is added, and `Ok` is returned.
    pub fn add_listener(
        &self,
        event: K,
        listener: impl Into<Value>,
    ) -> Result<&Self, DispatchError> {
        let value = listener.into();
        let Some(l) = value.as_listener().cloned() else {
            return self.reject(&event, &value);
        };
        self.register(event, l, &value)
    }

    /// Alias for [`Dispatcher::add_listener`].
    pub fn on(&self, event: K, listener: impl Into<Value>) -> Result<&Self, DispatchError> {
        self.add_listener(event, listener)
    }

    /// Removes every entry of `listener` (by identity) from `event`.
    ///
    /// Unknown events and listeners are a no-op. A non-listener value fails with
    /// `NotCallable`, handled like in [`Dispatcher::add_listener`].
    pub fn remove_listener(
        &self,
        event: K,
        listener: impl Into<Value>,
    ) -> Result<&Self, DispatchError> {
        let value = listener.into();
        let Some(l) = value.as_listener() else {
            return self.reject(&event, &value);
        };
        let removed = self.shared.remove_entry(&event, identity(l));
        debug!(event = ?event, listener = l.name(), removed, "listener removed");
        Ok(self)
    }

    /// Alias for [`Dispatcher::remove_listener`].
    pub fn off(&self, event: K, listener: impl Into<Value>) -> Result<&Self, DispatchError> {
        self.remove_listener(event, listener)
    }

    /// Registers `listener` to run on the next emission of `event` only.
    ///
    /// The registered entry is a wrapper that unregisters itself before calling
    /// `listener`, so a failing listener is still removed. Because the wrapper has
    /// its own identity, `off(event, listener)` does not remove it. Capacity and
    /// validation behave as in [`Dispatcher::add_listener`].
    pub fn once(&self, event: K, listener: impl Into<Value>) -> Result<&Self, DispatchError> {
        let value = listener.into();
        let Some(inner) = value.as_listener().cloned() else {
            return self.reject(&event, &value);
        };
        let wrapper: ListenerRef = Arc::new(OnceListener::new(
            event.clone(),
            inner,
            Arc::downgrade(&self.shared),
        ));
        self.register(event, wrapper, &value)
    }

    /// Drops every listener registered on `event`.
    pub fn remove_all_listeners<Q>(&self, event: &Q) -> &Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.shared.state.write().registry.clear(event);
        debug!(removed, "all listeners removed");
        self
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Invokes every listener of `event` concurrently and waits for all of them.
    ///
    /// One tokio task per listener; no ordering between them. Each task routes
    /// its own failure to the recoverer. Without a recoverer, the first failure
    /// (in registration order) is returned once every task has finished.
    ///
    /// Dropping the returned future stops the wait, not the listeners: the
    /// spawned tasks are detached and still run to completion.
    pub async fn emit(&self, event: K, args: impl Into<Args>) -> Result<&Self, DispatchError> {
        let args = args.into();
        let (listeners, recoverer) = self.shared.snapshot(&event);
        if listeners.is_empty() {
            return Ok(self);
        }
        debug!(event = ?event, listeners = listeners.len(), "emit");

        let mut handles = Vec::with_capacity(listeners.len());
        for listener in listeners {
            let event = event.clone();
            let args = args.clone();
            let recoverer = recoverer.clone();

            handles.push(tokio::spawn(async move {
                match invoker::invoke(&listener, &args).await {
                    Ok(()) => Ok(()),
                    Err(err) => {
                        let value = Value::Listener(listener);
                        recover(&event, &value, err, recoverer.as_ref())
                    }
                }
            }));
        }

        let mut first_err = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                // Listener panics are caught by the invoker; this is the recoverer.
                Err(join_err) if join_err.is_panic() => {
                    std::panic::resume_unwind(join_err.into_panic())
                }
                Err(_) => {
                    warn!(event = ?event, "listener task cancelled");
                    Err(DispatchError::ListenerFailure {
                        listener: "<task>".to_string(),
                        reason: "listener task cancelled".to_string(),
                    })
                }
            };
            if let Err(err) = outcome {
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Invokes every listener of `event` one at a time, in registration order,
    /// on the caller's task.
    ///
    /// A failing listener is routed to the recoverer and the next one still runs.
    /// Without a recoverer, the first failure is returned after the last listener.
    pub async fn emit_sync(
        &self,
        event: K,
        args: impl Into<Args>,
    ) -> Result<&Self, DispatchError> {
        let args = args.into();
        let (listeners, recoverer) = self.shared.snapshot(&event);
        if listeners.is_empty() {
            return Ok(self);
        }
        debug!(event = ?event, listeners = listeners.len(), "emit_sync");

        let mut first_err = None;
        for listener in listeners {
            if let Err(err) = invoker::invoke(&listener, &args).await {
                let value = Value::Listener(listener);
                if let Err(err) = recover(&event, &value, err, recoverer.as_ref()) {
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    // ---------------------------
    // Queries
    // ---------------------------

    /// Copy of the listeners on `event`, in registration order (empty if none).
    pub fn get_listeners_by_event<Q>(&self, event: &Q) -> Vec<ListenerRef>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.state.read().registry.snapshot(event)
    }

    /// Number of listeners on `event`.
    pub fn get_listener_count<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.state.read().registry.len(event)
    }

    /// Events that currently hold at least one listener (unordered).
    pub fn event_names(&self) -> Vec<K> {
        self.shared.state.read().registry.keys()
    }

    /// Current per-event cap (`-1` = unlimited).
    pub fn max_listeners(&self) -> isize {
        self.shared.state.read().policy.cfg.max_listeners
    }

    // ---------------------------
    // Policy
    // ---------------------------

    /// Installs `f` as the failure recoverer.
    pub fn recover_with<F>(&self, f: F) -> &Self
    where
        F: Fn(&K, &Value, &DispatchError) + Send + Sync + 'static,
    {
        self.shared.state.write().policy.recoverer = Some(Arc::new(f));
        self
    }

    /// Removes the recoverer; failures are then returned as `Err`.
    pub fn clear_recoverer(&self) -> &Self {
        self.shared.state.write().policy.recoverer = None;
        self
    }

    /// Sets the per-event cap (`-1` disables it). Existing listeners are kept.
    pub fn set_max_listeners(&self, max_listeners: isize) -> &Self {
        self.shared.state.write().policy.cfg.max_listeners = max_listeners;
        self
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Capacity check + append under one write lock.
    fn register(
        &self,
        event: K,
        listener: ListenerRef,
        value: &Value,
    ) -> Result<&Self, DispatchError> {
        let name = listener.name().to_string();
        let outcome = {
            let mut state = self.shared.state.write();
            let current = state.registry.len(&event);
            match state.policy.admit(current) {
                Ok(()) => {
                    state.registry.push(event.clone(), listener);
                    Ok(current + 1)
                }
                Err(err) => Err((err, state.policy.recoverer.clone())),
            }
        };

        match outcome {
            Ok(count) => {
                debug!(event = ?event, listener = %name, count, "listener added");
                Ok(self)
            }
            Err((err, recoverer)) => {
                recover(&event, value, err, recoverer.as_ref())?;
                Ok(self)
            }
        }
    }

    /// Handles a value that is not a listener.
    fn reject(&self, event: &K, value: &Value) -> Result<&Self, DispatchError> {
        let err = DispatchError::NotCallable {
            found: value.kind(),
        };
        recover(event, value, err, self.shared.recoverer().as_ref())?;
        Ok(self)
    }
}

/// Hands `err` to the recoverer, or gives it back when there is none.
fn recover<K: EventKey>(
    event: &K,
    value: &Value,
    err: DispatchError,
    recoverer: Option<&Recoverer<K>>,
) -> Result<(), DispatchError> {
    match recoverer {
        Some(recoverer) => {
            debug!(event = ?event, label = err.as_label(), err = %err, "failure recovered");
            recoverer(event, value, &err);
            Ok(())
        }
        None => {
            warn!(event = ?event, label = err.as_label(), err = %err, "no recoverer installed");
            Err(err)
        }
    }
}
