//! # Handler Layer
//!
//! Handlers (stores) hold the business state. The dispatcher routes actions
//! to them and asks them for view data after every cycle.
//!
//! Every method on [`Handler`] is optional. A handler opts in to per-action
//! routing through [`Handler::handles`], and to the fixed capabilities
//! through [`Handler::capabilities`].
//!
//! # Usage Patterns
//!
//! 1. **Struct implementation**: `impl Handler<MyAction> for MyStore`
//! 2. **Callbacks**: `CallbackHandler::new().on("load", |a| ...)` from
//!    `tidings-std`, which derives its capabilities from the closures given.

use crate::{action::Action, capability::Capabilities, data::Data, error::HandlerResult};
use std::sync::Arc;

/// A registered handler, shared between the owner and the dispatcher.
///
/// Identity is pointer identity: registering the same `Arc` twice is a
/// no-op, two distinct `Arc`s are two handlers even if they compare equal.
pub type SharedHandler<A> = Arc<dyn Handler<A>>;

/// An object that reacts to actions and contributes view data.
///
/// Handlers receive `&self`; state that changes in response to actions
/// lives behind interior mutability. Handlers may call back into the
/// dispatcher (register handlers, dispatch more actions) while being
/// invoked.
///
/// # Example
///
/// ```rust,ignore
/// struct Counter(AtomicU64);
///
/// impl Handler<Record> for Counter {
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::APPEND_DATA
///     }
///
///     fn handles(&self, stem: &str) -> bool {
///         stem == "Increment"
///     }
///
///     fn on_action(&self, _action: &Record) -> HandlerResult {
///         self.0.fetch_add(1, Ordering::SeqCst);
///         Ok(())
///     }
///
///     fn append_data_to(&self, data: &mut Data) -> HandlerResult {
///         data.insert("count", self.0.load(Ordering::SeqCst));
///         Ok(())
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle actions of type `{A}`",
    label = "missing `Handler<{A}>` implementation",
    note = "Handlers must be `Send + Sync + 'static`; every method has a default."
)]
pub trait Handler<A: Action>: Send + Sync + 'static {
    /// The fixed capabilities this handler implements.
    ///
    /// Read once at registration time, while the registry is locked: it
    /// must not call back into the dispatcher.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Whether actions whose kind has this stem should be routed to
    /// [`Handler::on_action`].
    ///
    /// The stem is the kind with its first character uppercased (see
    /// [`Route::stem`]): a handler answering `"Load"` receives actions of
    /// kind `"load"` and `"Load"`, the `onLoad` route.
    ///
    /// Asked the first time a route is resolved after the handler set last
    /// changed; the answer is cached until the next change. Like
    /// [`Handler::capabilities`], it must not call back into the dispatcher.
    ///
    /// [`Route::stem`]: crate::Route::stem
    fn handles(&self, stem: &str) -> bool {
        let _ = stem;
        false
    }

    /// Handle an action whose kind this handler accepts.
    fn on_action(&self, action: &A) -> HandlerResult {
        let _ = action;
        Ok(())
    }

    /// Write view data. Later-registered handlers overwrite earlier keys.
    fn append_data_to(&self, data: &mut Data) -> HandlerResult {
        let _ = data;
        Ok(())
    }

    /// Called at the start of every dispatch cycle.
    fn pre_dispatch(&self) -> HandlerResult {
        Ok(())
    }

    /// Called after all actions of a cycle were routed.
    fn post_dispatch(&self) -> HandlerResult {
        Ok(())
    }

    /// Write this handler's state into a snapshot.
    fn save(&self, snapshot: &mut Data) -> HandlerResult {
        let _ = snapshot;
        Ok(())
    }

    /// Restore this handler's state from a snapshot, reading only the keys
    /// it recognizes.
    fn load(&self, snapshot: &Data) -> HandlerResult {
        let _ = snapshot;
        Ok(())
    }
}
