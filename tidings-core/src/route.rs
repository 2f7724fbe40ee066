//! Route keys for the handler cache.

use crate::capability::Capabilities;
use std::fmt;

/// One step of the dispatch cycle that handlers can be routed to.
///
/// Action routes are keyed by the kind's stem: the kind with its first
/// character uppercased, so `"load"` and `"Load"` share the route `onLoad`.
/// The remaining variants are the fixed capabilities. The registry memoizes
/// the handlers of each route, keyed by this enum.
///
/// `Display` renders the conventional method name (`onLoad`,
/// `appendDataTo`, ...), which is used in logs and error messages only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Actions whose kind has this stem.
    Action(Box<str>),
    /// View data aggregation.
    AppendData,
    /// Start-of-cycle hook.
    PreDispatch,
    /// End-of-routing hook.
    PostDispatch,
    /// Snapshot contribution.
    Save,
    /// Snapshot restore.
    Load,
}

impl Route {
    /// The route for actions of `kind`.
    pub fn for_action(kind: &str) -> Self {
        Route::Action(Self::stem(kind).into())
    }

    /// The stem of an action kind: `kind` with its first character
    /// uppercased. This is what [`Handler::handles`] is asked about.
    ///
    /// [`Handler::handles`]: crate::Handler::handles
    pub fn stem(kind: &str) -> String {
        let mut chars = kind.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The stem of an action route, `None` for the fixed routes.
    pub fn action_stem(&self) -> Option<&str> {
        match self {
            Route::Action(stem) => Some(stem),
            _ => None,
        }
    }

    /// The capability a handler must announce to be on this route.
    ///
    /// `None` for action routes, which are decided per kind.
    pub fn capability(&self) -> Option<Capabilities> {
        match self {
            Route::Action(_) => None,
            Route::AppendData => Some(Capabilities::APPEND_DATA),
            Route::PreDispatch => Some(Capabilities::PRE_DISPATCH),
            Route::PostDispatch => Some(Capabilities::POST_DISPATCH),
            Route::Save => Some(Capabilities::SAVE),
            Route::Load => Some(Capabilities::LOAD),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Action(stem) => write!(f, "on{stem}"),
            Route::AppendData => f.write_str("appendDataTo"),
            Route::PreDispatch => f.write_str("preDispatch"),
            Route::PostDispatch => f.write_str("postDispatch"),
            Route::Save => f.write_str("save"),
            Route::Load => f.write_str("load"),
        }
    }
}
