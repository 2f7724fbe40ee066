//! Dispatcher configuration.

use super::Dispatcher;
use crate::emitter::ListenerPolicy;
use std::marker::PhantomData;
use tidings_core::Action;

/// Default limit on nested dispatch cycles.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings for a [`Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Name attached to every log record of this dispatcher.
    pub name: &'static str,
    /// What happens when a change listener fails.
    pub listener_policy: ListenerPolicy,
    /// How many dispatch cycles may be nested inside each other (a handler
    /// dispatching from within a cycle). `None` means no limit.
    pub max_depth: Option<usize>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: "dispatcher",
            listener_policy: ListenerPolicy::Abort,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Builder for a [`Dispatcher`].
///
/// # Example
/// ```ignore
/// let dispatcher = Dispatcher::<Record>::builder()
///     .name("todos")
///     .listener_policy(ListenerPolicy::Isolate)
///     .max_depth(4)
///     .build();
/// ```
pub struct DispatcherBuilder<A> {
    config: DispatcherConfig,
    _action: PhantomData<fn() -> A>,
}

impl<A: Action> DispatcherBuilder<A> {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            _action: PhantomData,
        }
    }

    /// Set the name used in log records.
    pub fn name(mut self, name: &'static str) -> Self {
        self.config.name = name;
        self
    }

    /// Set the listener failure policy.
    pub fn listener_policy(mut self, policy: ListenerPolicy) -> Self {
        self.config.listener_policy = policy;
        self
    }

    /// Limit nested dispatch cycles to `depth`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Allow unbounded nesting of dispatch cycles.
    pub fn unbounded(mut self) -> Self {
        self.config.max_depth = None;
        self
    }

    /// The configuration assembled so far.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher<A> {
        Dispatcher::with_config(self.config)
    }
}

impl<A: Action> Default for DispatcherBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for DispatcherBuilder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("config", &self.config)
            .finish()
    }
}
