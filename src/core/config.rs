//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`] centralized settings for a [`Dispatcher`](crate::Dispatcher).
//!
//! ## Sentinel values
//! - `max_listeners = -1` → unlimited (any negative value is treated the same)
//! - `max_listeners = 0` → every registration is rejected

/// Default cap on listeners per event key.
pub const DEFAULT_MAX_LISTENERS: isize = 16;

/// Configuration for a dispatcher.
///
/// ## Field semantics
/// - `max_listeners`: per-event listener cap (`-1` = unlimited)
///
/// ## Notes
/// Prefer [`DispatcherConfig::listener_limit`] to sprinkling sentinel checks
/// across the codebase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Maximum number of listeners registered on a single event key.
    ///
    /// - `-1` = unlimited
    /// - `n >= 0` = adding the `n + 1`-th listener fails with `ExceedMaxListeners`
    pub max_listeners: isize,
}

impl DispatcherConfig {
    /// Returns the per-event cap as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` listeners per event
    #[inline]
    pub fn listener_limit(&self) -> Option<usize> {
        usize::try_from(self.max_listeners).ok()
    }

    /// Returns a copy with the given cap.
    #[must_use]
    pub fn with_max_listeners(mut self, max_listeners: isize) -> Self {
        self.max_listeners = max_listeners;
        self
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `max_listeners = 16`
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}
