//! # tidings-core
//!
//! Core traits and data model for the Tidings action dispatch framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! handler crates that don't need the full `tidings-std` implementation.
//!
//! # Dispatch Cycle
//!
//! A single coordinator accepts named [`Action`]s, routes each one to the
//! [`Handler`]s that declared interest in its kind, then aggregates the
//! view [`Data`] every handler contributes and publishes it as one
//! [`ChangeEvent`]:
//!
//! ```text
//! Idle -> PreDispatch -> Routing(a1) .. Routing(an) -> PostDispatch
//!      -> Aggregating -> Notifying -> Idle
//! ```
//!
//! ## Routing ([`Route`])
//!
//! Every step of the cycle is a [`Route`]: one per action kind, plus one per
//! fixed capability (aggregation, pre/post hooks, save/load). Routes are
//! plain enum values, so no method names are built from strings at runtime.
//!
//! ## Capabilities ([`Capabilities`])
//!
//! Handlers implement any subset of the optional methods on [`Handler`] and
//! announce which fixed capabilities they carry. The announcement is read
//! once, when the handler is registered.
//!
//! # Error Types
//!
//! - [`DispatchError`] - A dispatch cycle (or save/load) failed
//! - [`EmitError`] - A change listener failed

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod capability;
mod data;
mod dispatcher;
mod error;
mod event;
mod handler;
mod record;
mod route;

// Re-exports
pub use action::Action;
pub use capability::Capabilities;
pub use data::Data;
pub use dispatcher::Dispatch;
pub use error::{BoxError, DispatchError, EmitError, HandlerResult};
pub use event::ChangeEvent;
pub use handler::{Handler, SharedHandler};
pub use record::Record;
pub use route::Route;
