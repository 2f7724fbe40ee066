//! Handlers calling back into the dispatcher.

use std::{
    error::Error,
    sync::{
        Arc, Barrier, Mutex, Weak,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};
use tidings::{
    CallbackHandler, Capabilities, ChangeEvent, DispatchError, Dispatcher, Handler, Record,
    SharedHandler, listener, testing::RecordingHandler,
};

mod common;
use common::{CounterStore, increment};

fn has_too_deep(err: &DispatchError, expected: usize) -> bool {
    let mut current: Option<&(dyn Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(DispatchError::TooDeep { limit }) = e.downcast_ref::<DispatchError>() {
            return *limit == expected;
        }
        current = e.source();
    }
    false
}

#[test]
fn test_nested_dispatch_runs_its_own_cycle() {
    let dispatcher = Arc::new(Dispatcher::<Record>::new());
    let counter = CounterStore::new("count");
    let weak: Weak<Dispatcher<Record>> = Arc::downgrade(&dispatcher);
    let relay = CallbackHandler::<Record>::new().on("relay", move |_| {
        if let Some(dispatcher) = weak.upgrade() {
            dispatcher.dispatch([increment(5)])?;
        }
        Ok(())
    });
    dispatcher.add_handler(counter.clone());
    dispatcher.add_handler(Arc::new(relay));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    dispatcher
        .subscribe(listener(move |event: &ChangeEvent| {
            sink.lock().unwrap().push(event.data.get("count").cloned())
        }))
        .unwrap();
    seen.lock().unwrap().clear();

    dispatcher.dispatch([Record::new("relay")]).unwrap();

    assert_eq!(counter.count(), 5);
    // The inner cycle notifies first, then the outer one.
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some(serde_json::json!(5)), Some(serde_json::json!(5))]
    );
}

#[test]
fn test_handler_added_mid_cycle_sees_later_actions() {
    let dispatcher = Arc::new(Dispatcher::<Record>::new());
    let late = Arc::new(RecordingHandler::<Record>::new().handling(["second"]));
    let weak = Arc::downgrade(&dispatcher);
    let late_shared: SharedHandler<Record> = late.clone();
    let installer = CallbackHandler::<Record>::new().on("first", move |_| {
        if let Some(dispatcher) = weak.upgrade() {
            dispatcher.add_handler(late_shared.clone());
        }
        Ok(())
    });
    dispatcher.add_handler(Arc::new(installer));

    dispatcher
        .dispatch([Record::new("second"), Record::new("first"), Record::new("second")])
        .unwrap();

    assert_eq!(late.count(), 1);
}

#[test]
fn test_handler_removing_itself() {
    let dispatcher = Arc::new(Dispatcher::<Record>::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let handler: Arc<Mutex<Option<SharedHandler<Record>>>> = Arc::new(Mutex::new(None));

    let once: SharedHandler<Record> = {
        let weak = Arc::downgrade(&dispatcher);
        let calls = calls.clone();
        let me = handler.clone();
        Arc::new(CallbackHandler::<Record>::new().on("once", move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            let me = me.lock().unwrap().take();
            if let (Some(dispatcher), Some(me)) = (weak.upgrade(), me) {
                dispatcher.remove_handler(&me);
            }
            Ok(())
        }))
    };
    *handler.lock().unwrap() = Some(once.clone());
    dispatcher.add_handler(once);

    dispatcher
        .dispatch([Record::new("once"), Record::new("once")])
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.handler_count(), 0);
}

#[test]
fn test_runaway_recursion_hits_the_limit() {
    let dispatcher = Arc::new(Dispatcher::<Record>::builder().max_depth(3).build());
    let calls = Arc::new(AtomicUsize::new(0));
    let weak = Arc::downgrade(&dispatcher);
    let counted = calls.clone();
    let echo = CallbackHandler::<Record>::new().on("echo", move |action| {
        counted.fetch_add(1, Ordering::SeqCst);
        if let Some(dispatcher) = weak.upgrade() {
            dispatcher.dispatch_one(action)?;
        }
        Ok(())
    });
    dispatcher.add_handler(Arc::new(echo));

    let err = dispatcher.dispatch([Record::new("echo")]).unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(has_too_deep(&err, 3), "unexpected error chain: {err:?}");

    // The nesting count unwound; plain dispatches work again.
    dispatcher.refresh().unwrap();
}

#[test]
fn test_unbounded_nesting() {
    let dispatcher = Arc::new(Dispatcher::<Record>::builder().unbounded().build());
    let remaining = Arc::new(AtomicUsize::new(100));
    let weak = Arc::downgrade(&dispatcher);
    let left = remaining.clone();
    let countdown = CallbackHandler::<Record>::new().on("countdown", move |action| {
        if left.fetch_sub(1, Ordering::SeqCst) > 1 {
            if let Some(dispatcher) = weak.upgrade() {
                dispatcher.dispatch_one(action)?;
            }
        }
        Ok(())
    });
    dispatcher.add_handler(Arc::new(countdown));

    dispatcher.dispatch([Record::new("countdown")]).unwrap();

    assert_eq!(remaining.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.dispatch_count(), 100);
}

#[test]
fn test_concurrent_cycles_are_not_nested() {
    const THREADS: usize = 4;
    let dispatcher = Dispatcher::<Record>::builder().max_depth(1).build();
    let rendezvous = Arc::new(Barrier::new(THREADS));
    dispatcher.add_handler(Arc::new(CallbackHandler::<Record>::new().on(
        "wait",
        move |_| {
            rendezvous.wait();
            Ok(())
        },
    )));

    // Every thread is inside its own cycle at the same time.
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| scope.spawn(|| dispatcher.dispatch([Record::new("wait")])))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(Result::is_ok), "{results:?}");
    assert_eq!(dispatcher.dispatch_count(), THREADS as u64);
}

/// Reports the handler count from its destructor.
struct Farewell {
    dispatcher: Weak<Dispatcher<Record>>,
    remaining: Arc<AtomicUsize>,
}

impl Handler<Record> for Farewell {
    fn capabilities(&self) -> Capabilities {
        Capabilities::APPEND_DATA
    }
}

impl Drop for Farewell {
    fn drop(&mut self) {
        if let Some(dispatcher) = self.dispatcher.upgrade() {
            self.remaining
                .store(dispatcher.handler_count() + 1, Ordering::SeqCst);
        }
    }
}

#[test]
fn test_removed_handler_dropped_outside_the_lock() {
    let dispatcher = Arc::new(Dispatcher::<Record>::new());
    let remaining = Arc::new(AtomicUsize::new(0));
    let handler: SharedHandler<Record> = Arc::new(Farewell {
        dispatcher: Arc::downgrade(&dispatcher),
        remaining: remaining.clone(),
    });
    dispatcher.add_handler(handler.clone());
    // Cache the aggregation route so it holds the handler too.
    dispatcher.refresh().unwrap();

    assert!(dispatcher.remove_handler(&handler));
    // Clears the route cache, dropping its copy as well.
    assert!(dispatcher.add_handler(Arc::new(CallbackHandler::<Record>::new())));
    drop(handler);

    assert_eq!(remaining.load(Ordering::SeqCst), 2);
}
