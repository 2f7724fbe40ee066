//! # tidings-std
//!
//! Standard implementations for the Tidings action dispatch framework.
//!
//! This crate provides:
//! - **Notification**: [`Emitter`], the one-to-many change channel
//! - **Routing**: [`HandlerRegistry`], the handler list and its route cache
//! - **Dispatch**: [`Dispatcher`], configured through [`DispatcherBuilder`]
//! - **Handlers**: [`CallbackHandler`] for closure-based handlers
//! - **Testing**: recording handlers and listeners in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use tidings_core;

// Modules
pub mod callback;
pub mod dispatcher;
pub mod emitter;
pub mod registry;
pub mod testing;

pub use callback::CallbackHandler;
pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use emitter::{Emitter, ListenerFn, ListenerPolicy, listener, try_listener};
pub use registry::{HandlerRegistry, RouteHandlers};
