//! The dispatcher: routes actions to handlers and publishes view data.
//!
//! One call to [`Dispatcher::dispatch`] runs one cycle:
//!
//! 1. `pre_dispatch` on every handler announcing it
//! 2. every action, in argument order, to the handlers on its route
//! 3. `post_dispatch` on every handler announcing it
//! 4. a fresh [`Data`] filled by every `append_data_to` handler
//! 5. exactly one [`ChangeEvent`] to the listeners
//!
//! A failing step aborts the rest of the cycle and is returned to the
//! caller. Nothing is rolled back or retried.

mod config;

pub use config::{DEFAULT_MAX_DEPTH, DispatcherBuilder, DispatcherConfig};

use crate::{
    emitter::{Emitter, ListenerFn},
    registry::{HandlerRegistry, RouteHandlers},
};
use futures::future::ready;
use parking_lot::Mutex;
use std::{
    borrow::Borrow,
    collections::{HashMap, hash_map::Entry},
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    thread::{self, ThreadId},
};
use tidings_core::{
    Action, ChangeEvent, Data, Dispatch, DispatchError, Handler, HandlerResult, Route,
    SharedHandler,
};

/// Routes actions to registered handlers and notifies subscribers of the
/// aggregated result.
///
/// Construct one explicitly and share it (usually in an `Arc`) with whoever
/// needs it; independent instances do not interact.
///
/// # Re-entrancy
///
/// Handlers and listeners may call back into the dispatcher: registering or
/// removing handlers, subscribing, or dispatching again. The handler lock is
/// released before any handler or listener runs. A registry change in the
/// middle of a cycle makes later steps of that cycle resolve their routes
/// afresh. A nested `dispatch` runs its own complete cycle before returning
/// to the outer one; nesting is bounded by [`DispatcherConfig::max_depth`].
///
/// # Threads
///
/// The dispatcher is `Send + Sync`, but a cycle is meant to be driven from
/// one thread at a time. Cycles started concurrently from several threads
/// interleave freely. Nesting is counted per thread, so they do not count
/// towards each other's limit.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::<Record>::new();
/// dispatcher.add_handler(Arc::new(todos));
/// dispatcher.subscribe(listener(|event: &ChangeEvent| render(&event.data)))?;
/// dispatcher.dispatch([Record::new("add").with("text", "milk")])?;
/// ```
pub struct Dispatcher<A: Action> {
    registry: Mutex<HandlerRegistry<A>>,
    emitter: Emitter<ChangeEvent>,
    config: DispatcherConfig,
    count: AtomicU64,
    depth: Mutex<HashMap<ThreadId, usize>>,
}

impl<A: Action> Dispatcher<A> {
    /// Create a dispatcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Start building a dispatcher.
    pub fn builder() -> DispatcherBuilder<A> {
        DispatcherBuilder::new()
    }

    /// Create a dispatcher with the given configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            registry: Mutex::new(HandlerRegistry::new()),
            emitter: Emitter::with_policy(config.listener_policy),
            config,
            count: AtomicU64::new(0),
            depth: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration this dispatcher was built with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The name attached to this dispatcher's log records.
    pub fn name(&self) -> &'static str {
        self.config.name
    }

    /// How many cycles have been started so far. Diagnostic only.
    pub fn dispatch_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    /// Register a handler. Returns `false` if it was already registered.
    pub fn add_handler(&self, handler: SharedHandler<A>) -> bool {
        self.add_handlers([handler])
    }

    /// Register several handlers, skipping those already registered.
    ///
    /// Returns `true` if anything was added; every cached route is then
    /// dropped.
    pub fn add_handlers<I>(&self, handlers: I) -> bool
    where
        I: IntoIterator<Item = SharedHandler<A>>,
    {
        self.registry.lock().add(handlers)
    }

    /// Unregister a handler. Returns `false` if it was not registered.
    pub fn remove_handler(&self, handler: &SharedHandler<A>) -> bool {
        self.remove_handlers([handler])
    }

    /// Unregister several handlers.
    ///
    /// Returns `true` if anything was removed; every cached route is then
    /// dropped.
    pub fn remove_handlers<'h, I>(&self, handlers: I) -> bool
    where
        I: IntoIterator<Item = &'h SharedHandler<A>>,
    {
        self.registry.lock().remove(handlers)
    }

    /// Whether this exact handler is registered.
    pub fn has_handler(&self, handler: &SharedHandler<A>) -> bool {
        self.registry.lock().contains(handler)
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// The handlers on `route`, in registration order.
    pub fn resolve_route(&self, route: &Route) -> RouteHandlers<A> {
        self.registry.lock().resolve(route)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Run one cycle for the given actions.
    ///
    /// Accepts anything iterable over actions or references to them. Actions
    /// without a kind are logged and skipped. Exactly one change event is
    /// published per successful cycle, however many actions it carried.
    ///
    /// On error, handlers that already ran keep their side effects; later
    /// actions were not routed and the change event may not have been
    /// published.
    pub fn dispatch<I>(&self, actions: I) -> Result<(), DispatchError>
    where
        I: IntoIterator,
        I::Item: Borrow<A>,
    {
        let actions: Vec<I::Item> = actions.into_iter().collect();
        let _depth = self.enter()?;
        let cycle = self.count.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            dispatcher = self.name(),
            cycle,
            actions = ?actions
                .iter()
                .map(|a| <I::Item as Borrow<A>>::borrow(a).kind())
                .collect::<Vec<_>>(),
            "Dispatching actions"
        );

        self.run_hooks(&Route::PreDispatch, |h| h.pre_dispatch())?;
        for action in &actions {
            self.dispatch_action(cycle, <I::Item as Borrow<A>>::borrow(action))?;
        }
        self.run_hooks(&Route::PostDispatch, |h| h.post_dispatch())?;
        self.fire_changed(cycle)?;

        tracing::debug!(dispatcher = self.name(), cycle, "Dispatch complete");
        Ok(())
    }

    /// Run one cycle for a single action.
    pub fn dispatch_one(&self, action: &A) -> Result<(), DispatchError> {
        self.dispatch(std::iter::once(action))
    }

    /// Run one cycle without actions: hooks, aggregation and a change event.
    pub fn refresh(&self) -> Result<(), DispatchError> {
        self.dispatch(std::iter::empty::<A>())
    }

    // ------------------------------------------------------------------
    // Subscription
    // ------------------------------------------------------------------

    /// Subscribe to change events, then run an action-less cycle so the
    /// listener receives the current data before this call returns.
    ///
    /// Every other listener is notified by that cycle as well.
    pub fn subscribe(&self, listener: ListenerFn<ChangeEvent>) -> Result<(), DispatchError> {
        self.emitter.add_listener(listener);
        self.refresh()
    }

    /// Unsubscribe. The listener receives no events from cycles started
    /// after this returns. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, listener: &ListenerFn<ChangeEvent>) -> bool {
        self.emitter.remove_listener(listener)
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.emitter.listener_count()
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Collect a snapshot from every handler announcing `SAVE`, in
    /// registration order. Independent of the dispatch cycle.
    pub fn save(&self) -> Result<Data, DispatchError> {
        self.collect(&Route::Save, |h, snapshot| h.save(snapshot))
    }

    /// Hand a snapshot to every handler announcing `LOAD`, in registration
    /// order. No change event is published; call [`refresh`] for that.
    ///
    /// [`refresh`]: Dispatcher::refresh
    pub fn load(&self, snapshot: &Data) -> Result<(), DispatchError> {
        self.run_hooks(&Route::Load, |h| h.load(snapshot))
    }

    // ------------------------------------------------------------------
    // Cycle steps
    // ------------------------------------------------------------------

    fn dispatch_action(&self, cycle: u64, action: &A) -> Result<(), DispatchError> {
        let Some(kind) = action.kind() else {
            tracing::error!(
                dispatcher = self.name(),
                cycle,
                ?action,
                "Action without type"
            );
            return Ok(());
        };

        let route = Route::for_action(kind);
        let handlers = self.resolve_route(&route);
        tracing::debug!(
            dispatcher = self.name(),
            cycle,
            %route,
            ?action,
            handlers = handlers.len(),
            "Dispatching action"
        );
        invoke(&route, &handlers, |h| h.on_action(action))
    }

    fn fire_changed(&self, cycle: u64) -> Result<(), DispatchError> {
        let data = self.collect(&Route::AppendData, |h, data| h.append_data_to(data))?;
        tracing::debug!(
            dispatcher = self.name(),
            cycle,
            ?data,
            listeners = self.emitter.listener_count(),
            "Updating view data"
        );
        self.emitter.emit(&ChangeEvent::new(data))?;
        Ok(())
    }

    fn run_hooks<F>(&self, route: &Route, call: F) -> Result<(), DispatchError>
    where
        F: FnMut(&dyn Handler<A>) -> HandlerResult,
    {
        let handlers = self.resolve_route(route);
        invoke(route, &handlers, call)
    }

    fn collect<F>(&self, route: &Route, mut contribute: F) -> Result<Data, DispatchError>
    where
        F: FnMut(&dyn Handler<A>, &mut Data) -> HandlerResult,
    {
        let mut data = Data::new();
        let handlers = self.resolve_route(route);
        invoke(route, &handlers, |h| contribute(h, &mut data))?;
        Ok(data)
    }

    fn enter(&self) -> Result<DepthGuard<'_>, DispatchError> {
        let thread = thread::current().id();
        let depth = {
            let mut depths = self.depth.lock();
            let depth = depths.entry(thread).or_insert(0);
            *depth += 1;
            *depth
        };
        let guard = DepthGuard {
            depths: &self.depth,
            thread,
        };
        match self.config.max_depth {
            Some(limit) if depth > limit => {
                tracing::warn!(
                    dispatcher = self.name(),
                    depth,
                    limit,
                    "Dispatch nested too deeply"
                );
                Err(DispatchError::TooDeep { limit })
            }
            _ => Ok(guard),
        }
    }
}

/// Call every handler on a route, stopping at the first failure.
fn invoke<A, F>(route: &Route, handlers: &[SharedHandler<A>], mut call: F) -> Result<(), DispatchError>
where
    A: Action,
    F: FnMut(&dyn Handler<A>) -> HandlerResult,
{
    for handler in handlers {
        call(handler.as_ref()).map_err(|source| DispatchError::Handler {
            route: route.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Tracks how many cycles are running inside each other on one thread.
struct DepthGuard<'a> {
    depths: &'a Mutex<HashMap<ThreadId, usize>>,
    thread: ThreadId,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        if let Entry::Occupied(mut entry) = self.depths.lock().entry(self.thread) {
            *entry.get_mut() -= 1;
            if *entry.get() == 0 {
                entry.remove();
            }
        }
    }
}

impl<A: Action> Default for Dispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.config.name)
            .field("handlers", &self.handler_count())
            .field("listeners", &self.listener_count())
            .field("dispatch_count", &self.dispatch_count())
            .finish()
    }
}

impl<A: Action> Dispatch<A> for Dispatcher<A> {
    type Error = DispatchError;

    /// Runs the cycle immediately; the returned future is already resolved.
    fn dispatch_batch(
        &self,
        actions: Vec<A>,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        ready(self.dispatch(actions))
    }
}
