//! Neutral defaults for unconnected channels.
//!
//! Runs last in the conversion sequence, so a channel satisfied by
//! migration or disk resolution is never overwritten. Channels that
//! received a migrated constant are passed in as `preserve`.

use tracing::warn;

use super::channel::Channel;
use crate::scene::{NodeId, Plug, SceneGraph};

/// Assign the neutral default to every defaulted channel that has neither
/// an incoming connection nor a migrated constant. Returns the channels
/// that were defaulted.
pub fn apply_defaults(
    scene: &mut dyn SceneGraph,
    shader: NodeId,
    preserve: &[Channel],
) -> Vec<Channel> {
    let mut applied = Vec::new();
    for channel in Channel::ALL {
        if channel.is_binding_level() || preserve.contains(&channel) {
            continue;
        }
        let Some(value) = channel.default_value() else {
            continue;
        };
        if scene
            .incoming(&Plug::new(shader, channel.input_attr()))
            .is_some()
        {
            continue;
        }
        match scene.set_attr(shader, channel.input_attr(), value) {
            Ok(()) => applied.push(channel),
            Err(err) => warn!(?channel, %err, "default assignment failed"),
        }
    }
    applied
}
