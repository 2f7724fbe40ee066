//! Error types for Tidings.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`DispatchError`] - A dispatch cycle, save or load failed
//! - [`EmitError`] - A change listener failed
//!
//! Handlers and listeners report their own failures as [`BoxError`]; the
//! dispatcher wraps them with the route they failed on.

use crate::route::Route;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The result of invoking a single handler capability.
pub type HandlerResult = Result<(), BoxError>;

/// Errors that can occur while publishing a change event.
#[derive(Error, Debug)]
pub enum EmitError {
    /// A listener failed and the remaining listeners were skipped.
    #[error("listener failed")]
    Listener(#[source] BoxError),

    /// One or more listeners failed; every listener still ran.
    #[error("{} of {total} listeners failed", .failures.len())]
    Isolated {
        /// The failures, in listener order.
        failures: Vec<BoxError>,
        /// How many listeners were invoked.
        total: usize,
    },
}

/// Errors that can occur during a dispatch cycle.
///
/// A failure aborts the remaining steps of the cycle. Side effects of
/// handlers that already ran are not rolled back: some actions may have been
/// routed, and the change notification may or may not have fired.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler returned an error.
    #[error("handler failed in `{route}`")]
    Handler {
        /// The route being invoked when the handler failed.
        route: Route,
        /// The handler's error.
        #[source]
        source: BoxError,
    },

    /// Publishing the change event failed.
    #[error("change notification failed")]
    Notify(#[from] EmitError),

    /// Nested dispatches went deeper than the configured limit.
    #[error("dispatch nesting exceeded the limit of {limit}")]
    TooDeep {
        /// The configured nesting limit.
        limit: usize,
    },
}

impl DispatchError {
    /// The route of the failing handler, if a handler failed.
    pub fn route(&self) -> Option<&Route> {
        match self {
            DispatchError::Handler { route, .. } => Some(route),
            _ => None,
        }
    }
}
