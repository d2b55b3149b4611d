//! # Listener registry.
//!
//! Maps each event key to its listeners in registration order.
//!
//! ## Rules
//! - Insertion order is invocation order for sequential dispatch.
//! - Removal is identity-based: every entry sharing the listener's allocation goes.
//! - A key whose last listener is removed is dropped, so "empty" and "absent"
//!   are the same state.
//! - Reads hand out copies (`Arc` clones), never the live vector.
//!
//! The registry itself is not synchronized; the dispatcher keeps it behind its lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::listeners::{identity, ListenerRef};

/// Event key → ordered listeners.
pub(crate) struct Registry<K> {
    events: HashMap<K, Vec<ListenerRef>>,
}

impl<K: Eq + Hash> Registry<K> {
    pub(crate) fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    /// Number of listeners on `event` (0 if absent).
    pub(crate) fn len<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.get(event).map_or(0, Vec::len)
    }

    /// Copy of the listeners on `event`, in registration order.
    pub(crate) fn snapshot<Q>(&self, event: &Q) -> Vec<ListenerRef>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.get(event).cloned().unwrap_or_default()
    }

    /// Appends a listener.
    pub(crate) fn push(&mut self, event: K, listener: ListenerRef) {
        self.events.entry(event).or_default().push(listener);
    }

    /// Removes every entry with the given identity; returns how many went.
    pub(crate) fn remove<Q>(&mut self, event: &Q, id: *const ()) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(listeners) = self.events.get_mut(event) else {
            return 0;
        };
        let before = listeners.len();
        listeners.retain(|l| identity(l) != id);
        let removed = before - listeners.len();
        if listeners.is_empty() {
            self.events.remove(event);
        }
        removed
    }

    /// Drops every listener on `event`; returns how many went.
    pub(crate) fn clear<Q>(&mut self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events.remove(event).map_or(0, |v| v.len())
    }

    /// Keys that currently hold at least one listener.
    pub(crate) fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.events.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::{same, SyncListenerFn};
    use crate::values::Args;

    fn noop(name: &'static str) -> ListenerRef {
        SyncListenerFn::arc(name, |_: &Args| Ok(()))
    }

    #[test]
    fn test_push_preserves_order() {
        let mut r: Registry<String> = Registry::new();
        let (a, b) = (noop("a"), noop("b"));
        r.push("k".into(), a.clone());
        r.push("k".into(), b.clone());

        let snap = r.snapshot("k");
        assert_eq!(snap.len(), 2);
        assert!(same(&snap[0], &a));
        assert!(same(&snap[1], &b));
    }

    #[test]
    fn test_remove_by_identity_drops_duplicates() {
        let mut r: Registry<String> = Registry::new();
        let (a, b) = (noop("a"), noop("b"));
        r.push("k".into(), a.clone());
        r.push("k".into(), b.clone());
        r.push("k".into(), a.clone());

        assert_eq!(r.remove("k", identity(&a)), 2);
        assert_eq!(r.len("k"), 1);
        assert!(same(&r.snapshot("k")[0], &b));
    }

    #[test]
    fn test_emptied_key_is_absent() {
        let mut r: Registry<String> = Registry::new();
        let a = noop("a");
        r.push("k".into(), a.clone());
        r.remove("k", identity(&a));

        assert_eq!(r.len("k"), 0);
        assert!(r.keys().is_empty());
        assert_eq!(r.remove("missing", identity(&a)), 0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut r: Registry<String> = Registry::new();
        r.push("k".into(), noop("a"));
        let snap = r.snapshot("k");
        assert_eq!(r.clear("k"), 1);
        assert_eq!(snap.len(), 1);
        assert_eq!(r.len("k"), 0);
    }
}
