//! The change notification published after each cycle.

use crate::data::Data;

/// Published once per dispatch cycle, carrying the freshly aggregated data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeEvent {
    /// The aggregated view data.
    pub data: Data,
}

impl ChangeEvent {
    /// The tag every change notification carries.
    pub const TYPE: &'static str = "change";

    /// Create a change event.
    pub fn new(data: Data) -> Self {
        Self { data }
    }

    /// The event tag, always [`ChangeEvent::TYPE`].
    pub fn kind(&self) -> &'static str {
        Self::TYPE
    }
}
