//! Dispatcher policies.
//!
//! ## Contents
//! - [`Recoverer`] failure callback `(event, value, error)`
//! - [`print_recoverer`] the default stdout recoverer
//! - `Policy` listener cap + recoverer, stored behind the dispatcher lock
//!
//! ## Defaults
//! - `max_listeners = 16` (see [`DispatcherConfig`](crate::DispatcherConfig)).
//! - Recoverer installed: [`print_recoverer`]. Clear it to get errors back as `Err`.

mod policy;
mod recover;

pub(crate) use policy::Policy;
pub use recover::{default_recoverer, print_recoverer, Recoverer};
