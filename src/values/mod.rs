//! Dispatch arguments.
//!
//! ## Contents
//! - [`Value`] tagged argument (and registration) value
//! - [`Args`] immutable argument list handed to every listener
//! - [`FromValue`] typed extraction with zero-value fill for `Nil`

mod args;
mod value;

pub use args::Args;
pub use value::{FromValue, Value};
