//! Whole-scene conversion.
//!
//! Runs the material converter over every binding in the scene, skipping
//! the built-in defaults and isolating per-binding failures: one broken
//! material never stops the batch, it becomes a `failed` entry in the
//! report.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::material::{convert_material, BindingOutcome, BindingStatus};
use super::resolver::TextureResolver;
use super::ConvertOptions;
use crate::scene::memory::BUILTIN_BINDINGS;
use crate::scene::SceneGraph;
use crate::util::Result;

/// A binding the batch could not convert.
#[derive(Clone, Debug, Serialize)]
pub struct FailedBinding {
    /// Binding name.
    pub binding: String,
    /// Failure description.
    pub reason: String,
}

/// Per-run summary of a scene conversion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConvertReport {
    /// Bindings converted to the canonical shader.
    pub converted: Vec<BindingOutcome>,
    /// Bindings skipped because their shader was already canonical.
    pub skipped: Vec<String>,
    /// Bindings that failed, with reasons.
    pub failed: Vec<FailedBinding>,
}

impl ConvertReport {
    /// Number of bindings the batch looked at.
    pub fn total(&self) -> usize {
        self.converted.len() + self.skipped.len() + self.failed.len()
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} binding(s): {} converted, {} already canonical, {} failed",
            self.total(),
            self.converted.len(),
            self.skipped.len(),
            self.failed.len()
        )?;
        for outcome in &self.converted {
            writeln!(f, "  converted {} -> {}", outcome.binding, outcome.shader)?;
            for warning in &outcome.warnings {
                writeln!(f, "    warning: {warning}")?;
            }
        }
        for name in &self.skipped {
            writeln!(f, "  skipped {name}")?;
        }
        for failure in &self.failed {
            writeln!(f, "  failed {}: {}", failure.binding, failure.reason)?;
        }
        Ok(())
    }
}

/// Convert every material binding in the scene, searching `texture_dir`
/// for texture files.
pub fn convert_scene(
    scene: &mut dyn SceneGraph,
    opts: &ConvertOptions,
    texture_dir: impl AsRef<Path>,
) -> ConvertReport {
    let resolver = TextureResolver::new(texture_dir.as_ref());
    let mut report = ConvertReport::default();

    for binding in scene.material_bindings() {
        let name = match scene.node_name(binding) {
            Ok(name) => name,
            Err(_) => continue,
        };
        if BUILTIN_BINDINGS.contains(&name.as_str()) {
            continue;
        }
        if scene.surface_shader(binding).is_none() {
            continue;
        }
        match convert_material(scene, opts, &resolver, binding) {
            Ok(outcome) if outcome.status == BindingStatus::AlreadyCanonical => {
                report.skipped.push(outcome.binding);
            }
            Ok(outcome) => report.converted.push(outcome),
            Err(err) => {
                warn!(binding = %name, %err, "binding conversion failed");
                report.failed.push(FailedBinding {
                    binding: name,
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        converted = report.converted.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "scene conversion finished"
    );
    report
}
