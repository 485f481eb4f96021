//! Per-viewer visibility of tagged events

use crate::channel::Channel;
use crate::events::TaggedEvent;
use crate::viewer::ViewerContext;

/// Whether the viewer may see `event` at all, ignoring the selected tab
///
/// Only the `Messages` channel is restricted: an ordinary viewer sees the
/// whispers they sent or received, a privileged viewer sees all of them.
pub fn can_view(event: &TaggedEvent, viewer: &ViewerContext) -> bool {
    if event.channel() != Channel::Messages {
        return true;
    }

    viewer.is_privileged
        || event.author().id == viewer.viewer_id
        || event.raw().is_addressed_to(&viewer.viewer_id)
}

/// Whether `event` should be shown right now in the viewer's selected tab
pub fn is_visible(event: &TaggedEvent, viewer: &ViewerContext) -> bool {
    event.channel() == viewer.active_channel && can_view(event, viewer)
}
