//! # Failure recovery callback.
//!
//! A [`Recoverer`] receives every failure the dispatcher observes:
//! `(event, offending value, error)`. The offending value is the listener that
//! failed, or the value rejected at registration.
//!
//! The default, [`print_recoverer`], writes one line to stdout:
//! ```text
//! [listener-failed] event="job" listener=Listener(mailer) err=listener 'mailer' failed: smtp down
//! [not-callable] event="job" value=Int(5) err=argument is not a listener (found int)
//! [exceed-max-listeners] event="job" value=Listener(audit) err=event exceeds the maximum listener count (16)
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::DispatchError;
use crate::values::Value;

/// Failure callback: `(event, offending value, error)`.
pub type Recoverer<K> = Arc<dyn Fn(&K, &Value, &DispatchError) + Send + Sync>;

/// Default recoverer: prints the failure to stdout.
pub fn print_recoverer<K: Debug>(event: &K, value: &Value, err: &DispatchError) {
    match err {
        DispatchError::ListenerFailure { .. } => {
            println!("[listener-failed] event={event:?} listener={value:?} err={err}");
        }
        DispatchError::NotCallable { .. } => {
            println!("[not-callable] event={event:?} value={value:?} err={err}");
        }
        DispatchError::ExceedMaxListeners { .. } => {
            println!("[exceed-max-listeners] event={event:?} value={value:?} err={err}");
        }
    }
}

/// Returns [`print_recoverer`] as a fresh [`Recoverer`].
pub fn default_recoverer<K: Debug + 'static>() -> Recoverer<K> {
    Arc::new(print_recoverer::<K>)
}
