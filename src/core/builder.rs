use std::sync::Arc;

use crate::core::{config::DispatcherConfig, dispatcher::Dispatcher, dispatcher::EventKey};
use crate::error::DispatchError;
use crate::policies::{default_recoverer, Recoverer};
use crate::values::Value;

/// Builder for constructing a [`Dispatcher`] with a custom policy.
///
/// ```rust
/// use trigger::{Dispatcher, DispatcherConfig};
///
/// let d: Dispatcher<u32> = Dispatcher::builder(DispatcherConfig { max_listeners: -1 })
///     .without_recoverer()
///     .build();
/// assert_eq!(d.max_listeners(), -1);
/// ```
pub struct DispatcherBuilder<K: EventKey> {
    cfg: DispatcherConfig,
    recoverer: Option<Recoverer<K>>,
}

impl<K: EventKey> DispatcherBuilder<K> {
    /// Creates a new builder with the given configuration and the stdout recoverer.
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self {
            cfg,
            recoverer: Some(default_recoverer()),
        }
    }

    /// Replaces the recoverer.
    ///
    /// The recoverer receives every failure the dispatcher observes:
    /// rejected registrations and failing listeners.
    pub fn recover_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&K, &Value, &DispatchError) + Send + Sync + 'static,
    {
        self.recoverer = Some(Arc::new(f));
        self
    }

    /// Builds without a recoverer: failures are returned as `Err` to the caller.
    pub fn without_recoverer(mut self) -> Self {
        self.recoverer = None;
        self
    }

    /// Builds and returns the dispatcher.
    pub fn build(self) -> Dispatcher<K> {
        Dispatcher::from_parts(self.cfg, self.recoverer)
    }
}
