//! Testing utilities for Tidings.
//!
//! This module provides handlers and listeners that record what happens to
//! them, so tests can assert on routing and notification.
//!
//! # Features
//!
//! - [`RecordingHandler`]: Records routed actions and counts every hook call
//! - [`RecordingListener`]: Records every change event it receives

use crate::emitter::{ListenerFn, listener};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tidings_core::{Action, Capabilities, ChangeEvent, Data, Handler, HandlerResult, Route};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records every action routed to it.
///
/// By default it handles no kinds and announces no capabilities; opt in with
/// the builder methods.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = Arc::new(RecordingHandler::<Record>::new().handling(["load"]));
/// dispatcher.add_handler(recorder.clone());
///
/// dispatcher.dispatch([Record::new("load")])?;
///
/// assert_eq!(recorder.count(), 1);
/// ```
pub struct RecordingHandler<A: Clone> {
    kinds: Vec<String>,
    contribution: Option<(String, Value)>,
    capabilities: Capabilities,
    actions: Mutex<Vec<A>>,
    appends: AtomicUsize,
    pre_dispatches: AtomicUsize,
    post_dispatches: AtomicUsize,
}

impl<A: Clone> RecordingHandler<A> {
    /// Create a handler that handles nothing.
    pub fn new() -> Self {
        Self {
            kinds: Vec::new(),
            contribution: None,
            capabilities: Capabilities::empty(),
            actions: Mutex::new(Vec::new()),
            appends: AtomicUsize::new(0),
            pre_dispatches: AtomicUsize::new(0),
            post_dispatches: AtomicUsize::new(0),
        }
    }

    /// Handle actions of these kinds.
    pub fn handling<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.kinds
            .extend(kinds.into_iter().map(|kind| Route::stem(kind.as_ref())));
        self
    }

    /// Write `key = value` during aggregation.
    pub fn contributing(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.contribution = Some((key.into(), value.into()));
        self.capabilities |= Capabilities::APPEND_DATA;
        self
    }

    /// Count pre- and post-dispatch hook calls.
    pub fn with_hooks(mut self) -> Self {
        self.capabilities |= Capabilities::PRE_DISPATCH | Capabilities::POST_DISPATCH;
        self
    }

    /// Get a clone of the recorded actions.
    pub fn actions(&self) -> Vec<A> {
        self.actions.lock().clone()
    }

    /// Get the number of recorded actions.
    pub fn count(&self) -> usize {
        self.actions.lock().len()
    }

    /// How many times data was appended.
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    /// How many times `pre_dispatch` ran.
    pub fn pre_dispatch_count(&self) -> usize {
        self.pre_dispatches.load(Ordering::SeqCst)
    }

    /// How many times `post_dispatch` ran.
    pub fn post_dispatch_count(&self) -> usize {
        self.post_dispatches.load(Ordering::SeqCst)
    }

    /// Clear recorded actions and counters.
    pub fn clear(&self) {
        self.actions.lock().clear();
        self.appends.store(0, Ordering::SeqCst);
        self.pre_dispatches.store(0, Ordering::SeqCst);
        self.post_dispatches.store(0, Ordering::SeqCst);
    }
}

impl<A: Clone> Default for RecordingHandler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action + Clone> Handler<A> for RecordingHandler<A> {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn handles(&self, stem: &str) -> bool {
        self.kinds.iter().any(|k| k == stem)
    }

    fn on_action(&self, action: &A) -> HandlerResult {
        self.actions.lock().push(action.clone());
        Ok(())
    }

    fn append_data_to(&self, data: &mut Data) -> HandlerResult {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if let Some((key, value)) = &self.contribution {
            data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn pre_dispatch(&self) -> HandlerResult {
        self.pre_dispatches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn post_dispatch(&self) -> HandlerResult {
        self.post_dispatches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records every change event.
///
/// Clones share the same record.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::new();
/// dispatcher.subscribe(recorder.listener())?;
///
/// assert_eq!(recorder.count(), 1);
/// ```
#[derive(Clone)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
    listener: ListenerFn<ChangeEvent>,
}

impl RecordingListener {
    /// Create a new recording listener.
    pub fn new() -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        Self {
            events,
            listener: listener(move |event: &ChangeEvent| sink.lock().push(event.clone())),
        }
    }

    /// The listener to subscribe. Always the same `Arc`, so it can be used
    /// to unsubscribe as well.
    pub fn listener(&self) -> ListenerFn<ChangeEvent> {
        self.listener.clone()
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().clone()
    }

    /// The most recent event.
    pub fn last(&self) -> Option<ChangeEvent> {
        self.events.lock().last().cloned()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}
