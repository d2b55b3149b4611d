use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use trigger::{
    args, Args, DispatchError, Dispatcher, DispatcherConfig, Listener, ListenerError, ListenerFn,
    ListenerRef, SyncListenerFn, Value,
};

fn counting(name: &'static str, hits: &Arc<AtomicUsize>) -> ListenerRef {
    let hits = Arc::clone(hits);
    SyncListenerFn::arc(name, move |_: &Args| {
        hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

fn sleeper(delay: Duration, done: &Arc<AtomicUsize>) -> ListenerRef {
    let done = Arc::clone(done);
    ListenerFn::arc("sleeper", move |_: Args| {
        let done = Arc::clone(&done);
        async move {
            tokio::time::sleep(delay).await;
            done.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ListenerError>(())
        }
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn emit_returns_after_every_listener_completed() {
    let done = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.set_max_listeners(-1);
    for i in 0..20 {
        d.on("slow", sleeper(Duration::from_millis(5 * (i % 4)), &done))
            .unwrap();
    }

    d.emit("slow", ()).await.unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn emit_runs_listeners_concurrently() {
    let done = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    for _ in 0..8 {
        d.on("slow", sleeper(Duration::from_millis(200), &done)).unwrap();
    }

    let started = tokio::time::Instant::now();
    d.emit("slow", ()).await.unwrap();

    assert_eq!(done.load(Ordering::SeqCst), 8);
    // Sequential execution would take 1.6s.
    assert!(started.elapsed() < Duration::from_millis(1200));
}

#[tokio::test]
async fn emit_sync_runs_in_registration_order() {
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let d = Dispatcher::new();
    for i in 0..5_i64 {
        let order = Arc::clone(&order);
        let l = ListenerFn::arc(format!("step-{i}"), move |args: Args| {
            let order = Arc::clone(&order);
            async move {
                // Yield so a concurrent runner would get a chance to reorder.
                tokio::task::yield_now().await;
                let base: i64 = args.get(0)?;
                order.lock().push(base + i);
                Ok::<_, ListenerError>(())
            }
        });
        d.on(7_u8, l).unwrap();
    }

    d.emit_sync(7_u8, args![10]).await.unwrap();
    assert_eq!(*order.lock(), vec![10, 11, 12, 13, 14]);
}

#[tokio::test]
async fn emit_sync_runs_on_callers_task_and_emit_does_not() {
    let ids = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let d = Dispatcher::new();
    for _ in 0..3 {
        let ids = Arc::clone(&ids);
        let l = SyncListenerFn::arc("task-id", move |_: &Args| {
            ids.lock().push(tokio::task::try_id());
            Ok(())
        });
        d.on("where", l).unwrap();
    }

    // Run as a spawned task so the caller has a task id of its own.
    let caller = tokio::spawn({
        let d = d.clone();
        async move {
            d.emit_sync("where", ()).await.unwrap();
            tokio::task::id()
        }
    })
    .await
    .unwrap();

    let seen: Vec<_> = ids.lock().drain(..).collect();
    assert_eq!(seen, vec![Some(caller); 3]);

    tokio::spawn({
        let d = d.clone();
        async move { d.emit("where", ()).await.map(|_| ()) }
    })
    .await
    .unwrap()
    .unwrap();

    let seen = ids.lock();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|id| id.is_some() && *id != Some(caller)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_emit_does_not_abort_listeners() {
    let done = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.on("k", sleeper(Duration::from_millis(50), &done)).unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(10), d.emit("k", ())).await;
    assert!(waited.is_err());
    assert_eq!(done.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn once_then_two_emits_fires_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.once("once", counting("once", &hits)).unwrap();

    d.emit("once", args!["first"]).await.unwrap();
    d.emit("once", args!["second"]).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(d.get_listener_count("once"), 0);
}

#[tokio::test]
async fn sequential_emit_sync_never_repeats_once_listener() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.once("once", counting("once", &hits)).unwrap();

    for _ in 0..10 {
        d.emit_sync("once", ()).await.unwrap();
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

/// Both emissions snapshot before either spawned task runs (current-thread
/// runtime, joined futures), so the once listener is invoked by both.
#[tokio::test(flavor = "current_thread")]
async fn overlapping_emits_may_run_once_listener_twice() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.once("race", counting("racy", &hits)).unwrap();

    let (a, b) = tokio::join!(d.emit("race", ()), d.emit("race", ()));
    assert!(a.is_ok() && b.is_ok());

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(d.get_listener_count("race"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registration_respects_cap() {
    let rejected = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&rejected);
    let d: Dispatcher<String> = Dispatcher::builder(DispatcherConfig { max_listeners: 10 })
        .recover_with(move |_, _, err| {
            if matches!(err, DispatchError::ExceedMaxListeners { .. }) {
                sink.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build();
    let hits = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for _ in 0..50 {
        let d = d.clone();
        let l = counting("l", &hits);
        tasks.push(tokio::spawn(async move {
            d.on("capped".to_string(), l).map(|_| ())
        }));
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }

    assert_eq!(d.get_listener_count("capped"), 10);
    assert_eq!(rejected.load(Ordering::SeqCst), 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn registration_is_not_blocked_by_running_listener() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let d = Dispatcher::new();

    let waiter = {
        let gate = Arc::clone(&gate);
        ListenerFn::arc("waiter", move |_: Args| {
            let gate = Arc::clone(&gate);
            async move {
                gate.notified().await;
                Ok::<_, ListenerError>(())
            }
        })
    };
    d.on("block", waiter).unwrap();

    let emitter = {
        let d = d.clone();
        tokio::spawn(async move { d.emit("block", ()).await.map(|_| ()) })
    };

    // The emit above is parked inside the listener; the lock must be free.
    let hits = Arc::new(AtomicUsize::new(0));
    tokio::time::sleep(Duration::from_millis(20)).await;
    d.on("other", counting("other", &hits)).unwrap();
    d.emit_sync("other", ()).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    gate.notify_one();
    emitter.await.unwrap().unwrap();
}

#[tokio::test]
async fn failing_listener_without_recoverer_still_lets_siblings_run() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::builder(DispatcherConfig::default())
        .without_recoverer()
        .build();
    let bad = SyncListenerFn::arc("bad", |args: &Args| {
        // Expects a string, gets an int.
        let _: String = args.get(0)?;
        Ok(())
    });
    d.on("sad", bad)
        .unwrap()
        .on("sad", counting("good", &hits))
        .unwrap();

    let err = d.emit("sad", args![1]).await.unwrap_err();
    assert_eq!(
        err,
        DispatchError::ListenerFailure {
            listener: "bad".into(),
            reason: "argument 0: expected str, found int".into()
        }
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn default_recoverer_keeps_dispatch_alive() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.set_max_listeners(1);

    d.on("y", counting("f1", &hits)).unwrap();
    // Rejected and printed by the default recoverer.
    d.on("y", counting("f2", &hits)).unwrap();
    d.on("y", Value::Int(3)).unwrap();
    assert_eq!(d.get_listener_count("y"), 1);

    d.emit("y", ()).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn once_listener_outliving_dispatcher_is_harmless() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.once("gone", counting("late", &hits)).unwrap();

    let snapshot = d.get_listeners_by_event("gone");
    drop(d);

    for l in snapshot {
        l.on_event(&args![]).await.unwrap();
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn event_names_and_remove_all() {
    let hits = Arc::new(AtomicUsize::new(0));
    let d = Dispatcher::new();
    d.on("a", counting("a", &hits))
        .unwrap()
        .on("b", counting("b", &hits))
        .unwrap();

    let mut names = d.event_names();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "b"]);

    d.remove_all_listeners("a");
    assert_eq!(d.event_names(), vec!["b"]);
    d.emit_sync("a", ()).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
