//! Shading network construction.
//!
//! Builds the node chain feeding one canonical channel from a resolved
//! texture file: the file-texture node and its 2d placement, plus the
//! intermediate normal-map or displacement node where the channel family
//! requires one. All connections force-overwrite any existing producer.

use std::path::Path;

use smallvec::{smallvec, SmallVec};
use tracing::debug;

use super::channel::{Channel, ChannelFamily};
use super::{ConvertOptions, OUT_COLOR};
use crate::scene::{AttrValue, NodeId, NodeKind, Plug, SceneGraph, DISPLACEMENT_INPUT};
use crate::util::Result;

/// Role of a node created by the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// File texture node.
    Texture,
    /// 2d placement node.
    Placement,
    /// Normal-map decode node.
    NormalMap,
    /// Displacement evaluation node.
    Displacement,
}

/// Nodes created for one channel, tagged by role.
pub type BuiltNodes = SmallVec<[(NodeRole, NodeId); 4]>;

/// Placement outputs driving the texture's UV attributes.
const PLACEMENT_LINKS: &[(&str, &str)] = &[
    ("outUV", "uvCoord"),
    ("outUvFilterSize", "uvFilterSize"),
    ("coverage", "coverage"),
    ("repeatUV", "repeatUV"),
    ("offset", "offset"),
    ("rotateUV", "rotateUV"),
    ("wrapU", "wrapU"),
    ("wrapV", "wrapV"),
    ("mirrorU", "mirrorU"),
    ("mirrorV", "mirrorV"),
    ("stagger", "stagger"),
];

/// Create a file-texture node with its placement, pointing at `path`.
/// Created nodes are pushed onto `built` as they appear, so a failing
/// caller can discard them.
///
/// The colorspace tag is best-effort: a service that rejects the attribute
/// does not fail the build.
fn create_texture(
    scene: &mut dyn SceneGraph,
    name_hint: &str,
    path: &Path,
    colorspace: &str,
    built: &mut BuiltNodes,
) -> Result<NodeId> {
    let texture = scene.create_node(NodeKind::Texture, &format!("{name_hint}_tex"))?;
    built.push((NodeRole::Texture, texture));
    let placement = scene.create_node(NodeKind::Placement, &format!("{name_hint}_place"))?;
    built.push((NodeRole::Placement, placement));
    for (out, input) in PLACEMENT_LINKS {
        scene.connect(Plug::new(placement, *out), Plug::new(texture, *input))?;
    }
    scene.set_attr(
        texture,
        "fileTextureName",
        AttrValue::Text(path.display().to_string()),
    )?;
    if let Err(err) = scene.set_attr(texture, "colorSpace", AttrValue::Text(colorspace.to_string()))
    {
        debug!(%name_hint, %err, "colorspace tag rejected, continuing");
    }
    Ok(texture)
}

/// Insert a normal-map node between `source` and the shader's normal input.
/// A failed wiring leaves no orphan behind.
pub fn wrap_normal_map(
    scene: &mut dyn SceneGraph,
    shader: NodeId,
    name_hint: &str,
    source: Plug,
) -> Result<NodeId> {
    let normal_map = scene.create_node(NodeKind::NormalMap, &format!("{name_hint}_normalMap"))?;
    if let Err(err) = wire_normal(scene, normal_map, shader, source) {
        discard(scene, &smallvec![(NodeRole::NormalMap, normal_map)]);
        return Err(err);
    }
    Ok(normal_map)
}

fn wire_normal(
    scene: &mut dyn SceneGraph,
    normal_map: NodeId,
    shader: NodeId,
    source: Plug,
) -> Result<()> {
    scene.connect(source, Plug::new(normal_map, "input"))?;
    scene.connect(
        Plug::new(normal_map, "outValue"),
        Plug::new(shader, Channel::Normal.input_attr()),
    )?;
    Ok(())
}

/// Build and wire the node chain feeding `channel` from the texture at
/// `path`. Displacement chains land on `binding`'s displacement port;
/// every other family lands on the shader.
///
/// On failure the partially built nodes are deleted, so a contained
/// per-channel failure never leaves a dangling chain in the scene.
pub fn build_channel(
    scene: &mut dyn SceneGraph,
    opts: &ConvertOptions,
    shader: NodeId,
    binding: NodeId,
    channel: Channel,
    path: &Path,
) -> Result<BuiltNodes> {
    let shader_name = scene.node_name(shader)?;
    let mut built = BuiltNodes::new();
    if let Err(err) = wire_channel(scene, opts, shader, binding, channel, path, &mut built) {
        discard(scene, &built);
        return Err(err);
    }

    debug!(
        shader = %shader_name,
        channel = ?channel,
        path = %path.display(),
        nodes = built.len(),
        "channel network built"
    );
    Ok(built)
}

fn wire_channel(
    scene: &mut dyn SceneGraph,
    opts: &ConvertOptions,
    shader: NodeId,
    binding: NodeId,
    channel: Channel,
    path: &Path,
    built: &mut BuiltNodes,
) -> Result<()> {
    let name_hint = format!("{}_{}", scene.node_name(shader)?, channel.input_attr());
    let texture = create_texture(scene, &name_hint, path, channel.colorspace(), built)?;

    match channel.family() {
        ChannelFamily::Color => {
            scene.connect(
                Plug::new(texture, OUT_COLOR),
                Plug::new(shader, channel.input_attr()),
            )?;
        }
        ChannelFamily::Scalar => {
            scene.connect(
                Plug::new(texture, opts.extraction.output_attr()),
                Plug::new(shader, channel.input_attr()),
            )?;
        }
        ChannelFamily::NormalMap => {
            let normal_map =
                scene.create_node(NodeKind::NormalMap, &format!("{name_hint}_normalMap"))?;
            built.push((NodeRole::NormalMap, normal_map));
            wire_normal(scene, normal_map, shader, Plug::new(texture, OUT_COLOR))?;
        }
        ChannelFamily::Displacement => {
            let disp = scene.create_node(NodeKind::Displacement, &format!("{name_hint}_disp"))?;
            built.push((NodeRole::Displacement, disp));
            scene.connect(
                Plug::new(texture, opts.extraction.output_attr()),
                Plug::new(disp, "displacement"),
            )?;
            scene.connect(
                Plug::new(disp, "displacement"),
                Plug::new(binding, DISPLACEMENT_INPUT),
            )?;
        }
    }
    Ok(())
}

/// Delete partially built nodes after a wiring failure.
fn discard(scene: &mut dyn SceneGraph, built: &BuiltNodes) {
    for (role, node) in built {
        if let Err(err) = scene.delete_node(*node) {
            debug!(?role, %err, "orphan cleanup failed");
        }
    }
}
