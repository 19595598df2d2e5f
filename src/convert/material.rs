//! Per-binding conversion sequencing.
//!
//! Drives one material binding from its imported shader to the canonical
//! standard surface: reuse existing connections first, resolve the rest
//! from disk, default whatever is left, then rebind and clean up. A
//! binding whose shader is already canonical is left untouched.
//!
//! Every step after canonical-shader creation is individually contained:
//! a failing step is recorded as a warning on the outcome and the
//! remaining steps still run, so one bad attribute or stale connection
//! never costs the material its conversion.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use super::attributes::migrate_attrs;
use super::channel::Channel;
use super::connections;
use super::defaults::apply_defaults;
use super::network::build_channel;
use super::resolver::TextureResolver;
use super::{material_base, ConvertOptions, OUT_COLOR};
use crate::scene::{NodeId, NodeKind, Plug, SceneGraph, SURFACE_INPUT};
use crate::util::{Error, Result};

/// How a binding left the converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingStatus {
    /// The imported shader was already canonical; nothing was touched.
    AlreadyCanonical,
    /// The binding now drives a canonical shader.
    Converted,
}

/// How one channel was satisfied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSource {
    /// Reconnected from the legacy shader's existing upstream network.
    Migrated,
    /// Wired to a texture file found on disk.
    Resolved(PathBuf),
    /// Left unconnected, neutral value assigned.
    Defaulted,
}

/// One channel's fill record.
#[derive(Clone, Debug, Serialize)]
pub struct ChannelFill {
    /// The canonical channel.
    pub channel: Channel,
    /// Where its value came from.
    pub source: ChannelSource,
}

/// Result of converting one binding.
#[derive(Clone, Debug, Serialize)]
pub struct BindingOutcome {
    /// Binding name.
    pub binding: String,
    /// Name of the shader now driving the binding.
    pub shader: String,
    /// Terminal state.
    pub status: BindingStatus,
    /// Per-channel fill records.
    pub channels: Vec<ChannelFill>,
    /// Whether the legacy shader was deleted (only when unreferenced).
    pub legacy_deleted: bool,
    /// Contained step failures, empty on a clean run.
    pub warnings: Vec<String>,
}

/// Convert one material binding.
///
/// Returns an error only when conversion cannot start at all (no surface
/// shader, canonical shader creation failed); everything past that point
/// degrades into warnings on the outcome.
pub fn convert_material(
    scene: &mut dyn SceneGraph,
    opts: &ConvertOptions,
    resolver: &TextureResolver,
    binding: NodeId,
) -> Result<BindingOutcome> {
    let binding_name = scene.node_name(binding)?;
    let legacy = scene
        .surface_shader(binding)
        .ok_or_else(|| Error::NoSurfaceShader(binding_name.clone()))?;
    let legacy_name = scene.node_name(legacy)?;

    if scene.node_kind(legacy)? == NodeKind::StandardSurface {
        debug!(binding = %binding_name, shader = %legacy_name, "already canonical");
        return Ok(BindingOutcome {
            binding: binding_name,
            shader: legacy_name,
            status: BindingStatus::AlreadyCanonical,
            channels: Vec::new(),
            legacy_deleted: false,
            warnings: Vec::new(),
        });
    }

    let mut warnings = Vec::new();
    let mut channels = Vec::new();

    // Canonical shader, created once per binding (look up by name first)
    let base = {
        let stripped = material_base(&legacy_name);
        if stripped.is_empty() {
            legacy_name.as_str()
        } else {
            stripped
        }
        .to_string()
    };
    let canonical = resolve_or_create_shader(scene, &base)?;

    // Capture UV assignments before any rewiring
    let mut uv_state = Vec::new();
    for mesh in scene.bound_meshes(binding) {
        match scene.current_uv_set(mesh) {
            Ok(name) => uv_state.push((mesh, name)),
            Err(err) => warnings.push(format!("uv capture failed for {mesh}: {err}")),
        }
    }

    let copied = migrate_attrs(scene, legacy, canonical);

    let migration = connections::migrate(scene, opts, legacy, canonical);
    for channel in migration.channels() {
        channels.push(ChannelFill {
            channel,
            source: ChannelSource::Migrated,
        });
    }

    // Disk resolution for channels migration did not satisfy. Channels
    // already connected (from a previous run) are also left alone.
    for channel in Channel::RESOLVABLE {
        if migration.contains(channel) {
            continue;
        }
        let target = if channel.is_binding_level() {
            binding
        } else {
            canonical
        };
        if scene.has_incoming(target, channel.input_attr()) {
            continue;
        }
        let Some(path) = resolver.resolve(&base, channel) else {
            continue;
        };
        match build_channel(scene, opts, canonical, binding, channel, &path) {
            Ok(_) => channels.push(ChannelFill {
                channel,
                source: ChannelSource::Resolved(path),
            }),
            Err(err) => warnings.push(format!("building {channel:?} from {path:?} failed: {err}")),
        }
    }

    for channel in apply_defaults(scene, canonical, &copied) {
        channels.push(ChannelFill {
            channel,
            source: ChannelSource::Defaulted,
        });
    }

    // Rebind the surface port; this drops the legacy shader's link
    if let Err(err) = scene.connect(
        Plug::new(canonical, OUT_COLOR),
        Plug::new(binding, SURFACE_INPUT),
    ) {
        warnings.push(format!("surface rebind failed: {err}"));
    }

    for (mesh, name) in uv_state {
        if let Err(err) = scene.set_current_uv_set(mesh, &name) {
            warnings.push(format!("uv restore failed for {mesh}: {err}"));
        }
    }

    // Delete the legacy shader only once nothing references it
    let legacy_deleted = if scene.outgoing(legacy).is_empty() {
        match scene.delete_node(legacy) {
            Ok(()) => true,
            Err(err) => {
                warnings.push(format!("legacy shader cleanup failed: {err}"));
                false
            }
        }
    } else {
        debug!(shader = %legacy_name, "legacy shader still referenced, kept");
        false
    };

    if !warnings.is_empty() {
        warn!(binding = %binding_name, count = warnings.len(), "conversion finished with warnings");
    }

    let shader_name = scene.node_name(canonical)?;
    Ok(BindingOutcome {
        binding: binding_name,
        shader: shader_name,
        status: BindingStatus::Converted,
        channels,
        legacy_deleted,
        warnings,
    })
}

/// Find the canonical shader for `base`, or create it. An unrelated node
/// squatting on the name does not stop conversion; the service uniquifies.
fn resolve_or_create_shader(scene: &mut dyn SceneGraph, base: &str) -> Result<NodeId> {
    let name = format!("{base}_surface");
    if let Some(existing) = scene.find_node(&name) {
        if scene.node_kind(existing)? == NodeKind::StandardSurface {
            return Ok(existing);
        }
    }
    scene.create_node(NodeKind::StandardSurface, &name)
}
