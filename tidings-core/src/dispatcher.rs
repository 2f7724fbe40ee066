//! Dispatcher core trait.

use crate::action::Action;
use std::future::Future;

/// A dispatcher that runs one cycle for a batch of actions as a unit of
/// work.
///
/// The returned future resolves once the change event has been published,
/// or with the error that aborted the cycle.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot dispatch actions of type `{A}`",
    label = "missing `Dispatch` implementation",
    note = "Implement `Dispatch<{A}>` to run dispatch cycles."
)]
pub trait Dispatch<A: Action>: Send + Sync {
    /// The error type returned by dispatch operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dispatch the actions, in order, within a single cycle.
    fn dispatch_batch(&self, actions: Vec<A>) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
