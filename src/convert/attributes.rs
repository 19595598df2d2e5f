//! Migration of constant legacy shader parameters.
//!
//! Copies unconnected values from the legacy shader onto the canonical
//! one. Every copy is independently best-effort: a source attribute that
//! does not exist, has the wrong type, or is driven by a connection is
//! skipped without affecting the others.

use glam::Vec3;
use tracing::debug;

use super::channel::Channel;
use crate::scene::{AttrValue, NodeId, Plug, SceneGraph};

/// Emission strength forced on when a constant emission color migrates.
const EMISSION_ON: f32 = 1.0;

/// Copy constant legacy parameters onto the canonical shader. Returns the
/// channels that received a value, so the defaults pass can leave them
/// alone.
pub fn migrate_attrs(scene: &mut dyn SceneGraph, legacy: NodeId, canonical: NodeId) -> Vec<Channel> {
    let mut copied = Vec::new();

    if let Some(color) = constant_color(scene, legacy, "color") {
        set(scene, canonical, Channel::BaseColor, AttrValue::Color(color), &mut copied);
    }
    if let Some(color) = constant_color(scene, legacy, "specularColor") {
        set(scene, canonical, Channel::SpecularColor, AttrValue::Color(color), &mut copied);
    }
    if let Some(transparency) = constant_color(scene, legacy, "transparency") {
        let opacity = Vec3::ONE - transparency;
        set(scene, canonical, Channel::Opacity, AttrValue::Color(opacity), &mut copied);
    }
    if let Some(metalness) = constant_scalar(scene, legacy, "metalness") {
        set(scene, canonical, Channel::Metalness, AttrValue::Scalar(metalness), &mut copied);
    }
    if let Some(emission) = constant_scalar(scene, legacy, "emission") {
        set(scene, canonical, Channel::Emission, AttrValue::Scalar(emission), &mut copied);
    }
    if let Some(color) = constant_color(scene, legacy, "incandescence") {
        set(scene, canonical, Channel::EmissionColor, AttrValue::Color(color), &mut copied);
        if color != Vec3::ZERO {
            set(scene, canonical, Channel::Emission, AttrValue::Scalar(EMISSION_ON), &mut copied);
        }
    }

    copied
}

/// Read a constant (unconnected) color attribute, if present and of the
/// right type.
fn constant_color(scene: &dyn SceneGraph, node: NodeId, attr: &str) -> Option<Vec3> {
    if scene.incoming(&Plug::new(node, attr)).is_some() {
        return None;
    }
    scene.get_attr(node, attr).ok()?.as_color()
}

/// Read a constant (unconnected) scalar attribute, if present and of the
/// right type.
fn constant_scalar(scene: &dyn SceneGraph, node: NodeId, attr: &str) -> Option<f32> {
    if scene.incoming(&Plug::new(node, attr)).is_some() {
        return None;
    }
    scene.get_attr(node, attr).ok()?.as_scalar()
}

fn set(
    scene: &mut dyn SceneGraph,
    node: NodeId,
    channel: Channel,
    value: AttrValue,
    copied: &mut Vec<Channel>,
) {
    match scene.set_attr(node, channel.input_attr(), value) {
        Ok(()) => {
            if !copied.contains(&channel) {
                copied.push(channel);
            }
        }
        Err(err) => debug!(?channel, %err, "attribute copy skipped"),
    }
}
