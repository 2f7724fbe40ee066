//! Action trait for dispatchable intents.

use std::fmt::Debug;

/// An intended state change, identified by its kind.
///
/// The kind selects which handlers receive the action: an action of kind
/// `"load"` is routed to every handler whose [`Handler::handles`] accepts
/// `"load"`. Actions are never mutated while being dispatched.
///
/// Returning `None` marks the action as malformed. The dispatcher logs it and
/// skips routing for it, but keeps going with the rest of the batch.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug)]
/// enum TodoAction { Add(String), Clear }
///
/// impl Action for TodoAction {
///     fn kind(&self) -> Option<&str> {
///         Some(match self {
///             TodoAction::Add(_) => "add",
///             TodoAction::Clear => "clear",
///         })
///     }
/// }
/// ```
///
/// [`Handler::handles`]: crate::Handler::handles
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Action",
    label = "missing `Action` implementation",
    note = "Implement `kind()` or use `#[derive(Action)]`."
)]
pub trait Action: Debug + Send + Sync + 'static {
    /// The kind of this action, or `None` if it has none.
    fn kind(&self) -> Option<&str>;
}

impl<T: Action> Action for Box<T> {
    fn kind(&self) -> Option<&str> {
        (**self).kind()
    }
}

impl<T: Action> Action for std::sync::Arc<T> {
    fn kind(&self) -> Option<&str> {
        (**self).kind()
    }
}
