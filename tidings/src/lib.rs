//! # tidings - In-Process Action Dispatch and Change Notification
//!
//! `tidings` routes named actions to the handlers (stores) interested in
//! them, aggregates the view data those handlers contribute, and notifies
//! subscribers with a single change event per dispatch.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tidings::prelude::*;
//! use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
//!
//! let count = Arc::new(AtomicU64::new(0));
//! let counter = CallbackHandler::<Record>::new()
//!     .on("increment", {
//!         let count = count.clone();
//!         move |_| {
//!             count.fetch_add(1, Ordering::SeqCst);
//!             Ok(())
//!         }
//!     })
//!     .append_data(move |data| {
//!         data.insert("count", count.load(Ordering::SeqCst));
//!         Ok(())
//!     });
//!
//! let dispatcher = Dispatcher::<Record>::new();
//! dispatcher.add_handler(Arc::new(counter));
//! dispatcher.subscribe(listener(|event: &ChangeEvent| println!("{:?}", event.data)))?;
//! dispatcher.dispatch([Record::new("increment")])?;
//! ```
//!
//! ## Typed Actions
//!
//! With the `macros` feature (on by default), `#[derive(Action)]` turns an
//! enum into an action type whose kinds are its variant names.
//!
//! ## Guarantees
//!
//! Everything runs synchronously on the calling thread. A failing handler or
//! listener aborts the rest of its cycle and is reported to the caller of
//! `dispatch`; there is no retry and no rollback.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use tidings_core::{
    // Action
    Action,
    // Error types
    BoxError,
    // Handler
    Capabilities,
    // Notification
    ChangeEvent,
    Data,
    Dispatch,
    DispatchError,
    EmitError,
    Handler,
    HandlerResult,
    Record,
    // Routing
    Route,
    SharedHandler,
};

pub use tidings_std::{
    CallbackHandler, Dispatcher, DispatcherBuilder, DispatcherConfig, Emitter, HandlerRegistry,
    ListenerFn, ListenerPolicy, RouteHandlers, listener, try_listener,
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use tidings_std::testing::*;
}

/// Prelude module - common imports for Tidings.
///
/// # Usage
///
/// ```rust,ignore
/// use tidings::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Core traits
        Action,
        // Errors
        BoxError,
        // Handlers
        CallbackHandler,
        Capabilities,
        // Notification
        ChangeEvent,
        Data,
        DispatchError,
        Dispatcher,
        Handler,
        HandlerResult,
        ListenerFn,
        Record,
        SharedHandler,
        listener,
        try_listener,
    };
}

#[cfg(feature = "macros")]
pub use tidings_macros::Action;
