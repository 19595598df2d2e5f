//! Reuse of existing shading connections.
//!
//! Before any disk search, the legacy shader's inputs are inspected: a
//! texture already feeding a legacy channel is reconnected directly onto
//! the matching canonical channel, and the old link is detached. A channel
//! satisfied here is never resolved from disk (reuse takes priority over
//! search); a channel whose reconnect fails falls back to disk resolution
//! by simply not being marked migrated.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::channel::{Channel, ChannelFamily};
use super::network::wrap_normal_map;
use super::{ConvertOptions, OUT_COLOR};
use crate::scene::{NodeId, NodeKind, Plug, SceneGraph};
use crate::util::Result;

/// Fixed mapping from legacy shader inputs to canonical channels.
const LEGACY_LINKS: &[(&str, Channel)] = &[
    ("color", Channel::BaseColor),
    ("specularColor", Channel::SpecularColor),
    ("incandescence", Channel::EmissionColor),
    ("transparency", Channel::Opacity),
    ("normalCamera", Channel::Normal),
];

/// Which channels connection migration satisfied.
#[derive(Clone, Debug, Default)]
pub struct MigrationOutcome {
    migrated: HashSet<Channel>,
}

impl MigrationOutcome {
    /// True if at least one channel was reconnected.
    pub fn reconnected_any(&self) -> bool {
        !self.migrated.is_empty()
    }

    /// Whether `channel` was satisfied by migration.
    pub fn contains(&self, channel: Channel) -> bool {
        self.migrated.contains(&channel)
    }

    /// Migrated channels, in canonical channel order.
    pub fn channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|ch| self.migrated.contains(ch))
            .collect()
    }
}

/// Inspect the legacy shader's inputs and reconnect upstream texture
/// producers onto the canonical shader.
pub fn migrate(
    scene: &mut dyn SceneGraph,
    opts: &ConvertOptions,
    legacy: NodeId,
    canonical: NodeId,
) -> MigrationOutcome {
    let mut outcome = MigrationOutcome::default();

    for (legacy_attr, channel) in LEGACY_LINKS {
        let legacy_plug = Plug::new(legacy, *legacy_attr);
        let Some(producer) = scene.incoming(&legacy_plug) else {
            continue;
        };
        let kind = match scene.node_kind(producer.node) {
            Ok(kind) => kind,
            Err(err) => {
                warn!(plug = %legacy_plug, %err, "skipping stale producer");
                continue;
            }
        };
        match reconnect(scene, opts, producer.node, &kind, canonical, *channel) {
            Ok(true) => {
                if let Err(err) = scene.disconnect(&legacy_plug) {
                    warn!(plug = %legacy_plug, %err, "legacy link left behind after migration");
                }
                debug!(?channel, producer = %producer.node, "channel migrated");
                outcome.migrated.insert(*channel);
            }
            Ok(false) => {}
            Err(err) => {
                warn!(?channel, %err, "reconnect failed, channel falls back to disk");
            }
        }
    }

    outcome
}

/// Wire `producer` onto the canonical channel. Returns `Ok(false)` when the
/// producer is not a migratable kind for that channel.
fn reconnect(
    scene: &mut dyn SceneGraph,
    opts: &ConvertOptions,
    producer: NodeId,
    kind: &NodeKind,
    canonical: NodeId,
    channel: Channel,
) -> Result<bool> {
    let target = Plug::new(canonical, channel.input_attr());
    match channel.family() {
        ChannelFamily::Color if *kind == NodeKind::Texture => {
            scene.connect(Plug::new(producer, OUT_COLOR), target)?;
            Ok(true)
        }
        ChannelFamily::Scalar if *kind == NodeKind::Texture => {
            scene.connect(Plug::new(producer, opts.extraction.output_attr()), target)?;
            Ok(true)
        }
        ChannelFamily::NormalMap => match kind {
            // An existing normal-map chain is reused as-is
            NodeKind::NormalMap => {
                scene.connect(Plug::new(producer, "outValue"), target)?;
                Ok(true)
            }
            // A bare texture gets the intermediate node synthesized
            NodeKind::Texture => {
                let name_hint = format!(
                    "{}_{}",
                    scene.node_name(canonical)?,
                    channel.input_attr()
                );
                wrap_normal_map(scene, canonical, &name_hint, Plug::new(producer, OUT_COLOR))?;
                Ok(true)
            }
            _ => Ok(false),
        },
        _ => Ok(false),
    }
}
