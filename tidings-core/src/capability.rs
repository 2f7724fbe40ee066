//! Capability flags announced by handlers.

use bitflags::bitflags;

bitflags! {
    /// The fixed, non-action capabilities a [`Handler`] implements.
    ///
    /// Handlers announce these once via [`Handler::capabilities`]; the
    /// registry stores the announcement next to the handler and never asks
    /// again. A handler that overrides a method without announcing the
    /// matching flag is simply never routed to for it.
    ///
    /// Per-action routing is not part of this set because the action kinds
    /// are open; see [`Handler::handles`].
    ///
    /// [`Handler`]: crate::Handler
    /// [`Handler::capabilities`]: crate::Handler::capabilities
    /// [`Handler::handles`]: crate::Handler::handles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Contributes view data through `append_data_to`.
        const APPEND_DATA = 1;
        /// Runs `pre_dispatch` at the start of every cycle.
        const PRE_DISPATCH = 1 << 1;
        /// Runs `post_dispatch` after the actions of a cycle were routed.
        const POST_DISPATCH = 1 << 2;
        /// Contributes to snapshots through `save`.
        const SAVE = 1 << 3;
        /// Restores itself from snapshots through `load`.
        const LOAD = 1 << 4;
    }
}
