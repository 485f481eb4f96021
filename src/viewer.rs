//! The viewing context: who is looking, with which rights, at which tab

use crate::channel::Channel;
use crate::events::UserId;

/// Current viewer and selected tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerContext {
    pub viewer_id: UserId,

    /// GM privilege: sees every whisper
    pub is_privileged: bool,

    /// Currently selected tab
    pub active_channel: Channel,
}

impl ViewerContext {
    pub fn new(viewer_id: impl Into<String>, is_privileged: bool) -> Self {
        Self {
            viewer_id: UserId::new(viewer_id),
            is_privileged,
            active_channel: Channel::default(),
        }
    }

    /// Builder-style override of the selected tab
    pub fn with_active_channel(mut self, channel: Channel) -> Self {
        self.active_channel = channel;
        self
    }

    /// Select a tab. Returns true if the selection changed
    pub fn select(&mut self, channel: Channel) -> bool {
        if self.active_channel == channel {
            return false;
        }
        self.active_channel = channel;
        true
    }
}
