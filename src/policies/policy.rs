//! # Per-dispatcher policy.
//!
//! [`Policy`] bundles the listener cap and the recoverer. It lives next to the
//! registry behind the dispatcher lock and is only changed through the
//! dispatcher's setters.

use crate::core::DispatcherConfig;
use crate::error::DispatchError;

use super::recover::Recoverer;

/// Listener cap + failure routing.
pub(crate) struct Policy<K> {
    pub(crate) cfg: DispatcherConfig,
    pub(crate) recoverer: Option<Recoverer<K>>,
}

impl<K> Policy<K> {
    pub(crate) fn new(cfg: DispatcherConfig, recoverer: Option<Recoverer<K>>) -> Self {
        Self { cfg, recoverer }
    }

    /// Checks whether one more listener fits next to `current` existing ones.
    pub(crate) fn admit(&self, current: usize) -> Result<(), DispatchError> {
        match self.cfg.listener_limit() {
            Some(max) if current >= max => Err(DispatchError::ExceedMaxListeners { max }),
            _ => Ok(()),
        }
    }
}
