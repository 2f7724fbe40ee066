//! Handler registry and route cache.
//!
//! The registry keeps handlers in registration order together with the
//! capabilities each one announced. Routes are resolved lazily and memoized;
//! any change to the handler set drops the whole cache, so a cached route is
//! always exactly what a fresh resolution would return.

use std::{collections::HashMap, sync::Arc};
use tidings_core::{Action, Capabilities, Route, SharedHandler};

/// The handlers on one route, in registration order.
///
/// Cache hits hand out clones of the same `Arc`, so callers can hold on to a
/// route while the registry changes underneath them.
pub type RouteHandlers<A> = Arc<[SharedHandler<A>]>;

/// A registered handler and the capabilities it announced.
struct HandlerEntry<A: Action> {
    handler: SharedHandler<A>,
    capabilities: Capabilities,
}

impl<A: Action> HandlerEntry<A> {
    fn new(handler: SharedHandler<A>) -> Self {
        let capabilities = handler.capabilities();
        Self {
            handler,
            capabilities,
        }
    }

    fn is_on(&self, route: &Route) -> bool {
        match route {
            Route::Action(stem) => self.handler.handles(stem),
            fixed => fixed
                .capability()
                .is_some_and(|cap| self.capabilities.contains(cap)),
        }
    }
}

/// An ordered set of handlers with a memoized route table.
///
/// The registry is not synchronized itself; the dispatcher keeps it behind a
/// lock. Only [`Handler::capabilities`] and [`Handler::handles`] are called
/// while that lock is held.
///
/// No handler is destroyed under that lock either: [`remove`] borrows what
/// it removes, so the caller still owns a reference, and cached routes only
/// hold handlers that are also in the entry list.
///
/// [`remove`]: HandlerRegistry::remove
///
/// [`Handler::capabilities`]: tidings_core::Handler::capabilities
/// [`Handler::handles`]: tidings_core::Handler::handles
pub struct HandlerRegistry<A: Action> {
    entries: Vec<HandlerEntry<A>>,
    cache: HashMap<Route, RouteHandlers<A>>,
}

impl<A: Action> HandlerRegistry<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cache: HashMap::new(),
        }
    }

    /// Append every handler that is not registered yet.
    ///
    /// Returns `true` if at least one was added, in which case all cached
    /// routes were dropped.
    pub fn add<I>(&mut self, handlers: I) -> bool
    where
        I: IntoIterator<Item = SharedHandler<A>>,
    {
        let mut added = false;
        for handler in handlers {
            if self.contains(&handler) {
                continue;
            }
            self.entries.push(HandlerEntry::new(handler));
            added = true;
        }

        if added {
            self.cache.clear();
        }
        added
    }

    /// Remove every given handler that is registered.
    ///
    /// Returns `true` if at least one was removed, in which case all cached
    /// routes were dropped.
    pub fn remove<'h, I>(&mut self, handlers: I) -> bool
    where
        I: IntoIterator<Item = &'h SharedHandler<A>>,
    {
        let mut removed = false;
        for handler in handlers {
            if let Some(index) = self.position(handler) {
                self.entries.remove(index);
                removed = true;
            }
        }

        if removed {
            self.cache.clear();
        }
        removed
    }

    /// Whether this exact handler is registered.
    pub fn contains(&self, handler: &SharedHandler<A>) -> bool {
        self.position(handler).is_some()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The handlers on `route`, computing and caching them on first access.
    pub fn resolve(&mut self, route: &Route) -> RouteHandlers<A> {
        if let Some(handlers) = self.cache.get(route) {
            return handlers.clone();
        }

        let handlers: RouteHandlers<A> = self
            .entries
            .iter()
            .filter(|entry| entry.is_on(route))
            .map(|entry| entry.handler.clone())
            .collect();
        self.cache.insert(route.clone(), handlers.clone());
        handlers
    }

    /// Number of routes currently memoized.
    pub fn cached_routes(&self) -> usize {
        self.cache.len()
    }

    fn position(&self, handler: &SharedHandler<A>) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| Arc::ptr_eq(&entry.handler, handler))
    }
}

impl<A: Action> Default for HandlerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> std::fmt::Debug for HandlerRegistry<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.entries.len())
            .field("cached_routes", &self.cache.len())
            .finish()
    }
}
