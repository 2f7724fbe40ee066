//! Closure-based handlers.
//!
//! [`CallbackHandler`] is an explicit registration table: each action kind
//! and each capability maps to a closure. Its [`Capabilities`] are derived
//! from the closures it was given, so it never needs to be described twice.

use std::collections::HashMap;
use tidings_core::{Action, Capabilities, Data, Handler, HandlerResult, Route};

type ActionFn<A> = Box<dyn Fn(&A) -> HandlerResult + Send + Sync>;
type WriteFn = Box<dyn Fn(&mut Data) -> HandlerResult + Send + Sync>;
type ReadFn = Box<dyn Fn(&Data) -> HandlerResult + Send + Sync>;
type HookFn = Box<dyn Fn() -> HandlerResult + Send + Sync>;

/// A handler assembled from closures.
///
/// # Example
///
/// ```rust,ignore
/// let selected = Arc::new(AtomicU64::new(0));
/// let handler = CallbackHandler::<Record>::new()
///     .on("select", {
///         let selected = selected.clone();
///         move |action| {
///             let id = action.get("id").and_then(|v| v.as_u64()).unwrap_or(0);
///             selected.store(id, Ordering::SeqCst);
///             Ok(())
///         }
///     })
///     .append_data(move |data| {
///         data.insert("selected", selected.load(Ordering::SeqCst));
///         Ok(())
///     });
///
/// dispatcher.add_handler(Arc::new(handler));
/// ```
pub struct CallbackHandler<A: Action> {
    actions: HashMap<String, ActionFn<A>>,
    append_data: Option<WriteFn>,
    pre_dispatch: Option<HookFn>,
    post_dispatch: Option<HookFn>,
    save: Option<WriteFn>,
    load: Option<ReadFn>,
}

impl<A: Action> CallbackHandler<A> {
    /// Create a handler with no callbacks.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            append_data: None,
            pre_dispatch: None,
            post_dispatch: None,
            save: None,
            load: None,
        }
    }

    /// Handle actions of `kind`. Kinds differing only in the case of their
    /// first character are the same route; a second registration for the
    /// same route replaces the first.
    pub fn on<F>(mut self, kind: impl AsRef<str>, f: F) -> Self
    where
        F: Fn(&A) -> HandlerResult + Send + Sync + 'static,
    {
        self.actions.insert(Route::stem(kind.as_ref()), Box::new(f));
        self
    }

    /// Contribute view data.
    pub fn append_data<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Data) -> HandlerResult + Send + Sync + 'static,
    {
        self.append_data = Some(Box::new(f));
        self
    }

    /// Run at the start of every cycle.
    pub fn pre_dispatch<F>(mut self, f: F) -> Self
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        self.pre_dispatch = Some(Box::new(f));
        self
    }

    /// Run after the actions of every cycle.
    pub fn post_dispatch<F>(mut self, f: F) -> Self
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        self.post_dispatch = Some(Box::new(f));
        self
    }

    /// Contribute to snapshots.
    pub fn save<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Data) -> HandlerResult + Send + Sync + 'static,
    {
        self.save = Some(Box::new(f));
        self
    }

    /// Restore from snapshots.
    pub fn load<F>(mut self, f: F) -> Self
    where
        F: Fn(&Data) -> HandlerResult + Send + Sync + 'static,
    {
        self.load = Some(Box::new(f));
        self
    }
}

impl<A: Action> Default for CallbackHandler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> Handler<A> for CallbackHandler<A> {
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::APPEND_DATA, self.append_data.is_some());
        caps.set(Capabilities::PRE_DISPATCH, self.pre_dispatch.is_some());
        caps.set(Capabilities::POST_DISPATCH, self.post_dispatch.is_some());
        caps.set(Capabilities::SAVE, self.save.is_some());
        caps.set(Capabilities::LOAD, self.load.is_some());
        caps
    }

    fn handles(&self, stem: &str) -> bool {
        self.actions.contains_key(stem)
    }

    fn on_action(&self, action: &A) -> HandlerResult {
        match action.kind().and_then(|kind| self.actions.get(&Route::stem(kind))) {
            Some(f) => f(action),
            None => Ok(()),
        }
    }

    fn append_data_to(&self, data: &mut Data) -> HandlerResult {
        self.append_data.as_ref().map_or(Ok(()), |f| f(data))
    }

    fn pre_dispatch(&self) -> HandlerResult {
        self.pre_dispatch.as_ref().map_or(Ok(()), |f| f())
    }

    fn post_dispatch(&self) -> HandlerResult {
        self.post_dispatch.as_ref().map_or(Ok(()), |f| f())
    }

    fn save(&self, snapshot: &mut Data) -> HandlerResult {
        self.save.as_ref().map_or(Ok(()), |f| f(snapshot))
    }

    fn load(&self, snapshot: &Data) -> HandlerResult {
        self.load.as_ref().map_or(Ok(()), |f| f(snapshot))
    }
}
