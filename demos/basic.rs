//! # Example: basic
//!
//! Walks through the dispatcher API with a handful of closure listeners.
//!
//! Demonstrates how to:
//! - Build listeners with [`ListenerFn`] and [`SyncListenerFn`].
//! - Register them with `on` / `once` and remove them with `off`.
//! - Dispatch concurrently (`emit`) and in order (`emit_sync`).
//! - Install a custom recoverer for failing listeners and rejected registrations.
//!
//! ## Flow
//! ```text
//! Dispatcher::builder(cfg).recover_with(..).build()
//!     ├─► on("order", audit) / on("order", mailer) / once("order", welcome)
//!     ├─► emit("order", [42, "alice"])      (audit ∥ mailer ∥ welcome)
//!     ├─► emit_sync("order", [43, "bob"])   (audit → mailer, welcome already gone)
//!     ├─► on("order", 7)                    (not a listener → recoverer)
//!     └─► off("order", mailer)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=trigger=debug cargo run --example basic
//! ```

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use trigger::{
    args, Args, Dispatcher, DispatcherConfig, Listener, ListenerError, ListenerFn, ListenerRef,
    SyncListenerFn,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logs from the dispatcher are opt-in via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Dispatcher with a small cap and a custom recoverer
    let d: Dispatcher<&'static str> = Dispatcher::builder(DispatcherConfig { max_listeners: 4 })
        .recover_with(|event, value, err| {
            eprintln!("[recovered] event={event} value={value:?} label={}", err.as_label());
        })
        .build();

    // 3. Listeners
    let audit: ListenerRef = SyncListenerFn::arc("audit", |args: &Args| {
        let id: i64 = args.get(0)?;
        println!("[audit] order #{id}");
        Ok(())
    });

    let mailer: ListenerRef = ListenerFn::arc("mailer", |args: Args| async move {
        let who: String = args.get(1)?;
        if who.is_empty() {
            return Err(ListenerError::fail("no recipient"));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        println!("[mailer] mail sent to {who}");
        Ok(())
    });

    let welcome: ListenerRef = SyncListenerFn::arc("welcome", |args: &Args| {
        let who: String = args.get(1)?;
        println!("[welcome] first order, welcome {who}!");
        Ok(())
    });

    // 4. Register
    d.on("order", audit)?
        .on("order", mailer.clone())?
        .once("order", welcome)?;
    println!(
        "listeners on 'order': {:?}",
        d.get_listeners_by_event("order")
            .iter()
            .map(|l| l.name().to_string())
            .collect::<Vec<_>>()
    );

    // 5. Concurrent dispatch: all three run, welcome removes itself
    d.emit("order", args![42, "alice"]).await?;

    // 6. Ordered dispatch on this task; the missing name fails the mailer
    d.emit_sync("order", args![43]).await?;

    // 7. Not a listener: handed to the recoverer, nothing registered
    d.on("order", 7)?;

    // 8. Remove by identity
    d.off("order", mailer)?;
    println!("listeners left on 'order': {}", d.get_listener_count("order"));
    Ok(())
}
