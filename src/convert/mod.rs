//! Material conversion engine.
//!
//! Converts imported materials to the canonical standard-surface shading
//! representation, wiring texture files found in a user-supplied directory.
//! Per binding, the sequence is: reuse existing upstream textures
//! ([`connections`]), then resolve remaining channels from disk
//! ([`resolver`] + [`network`]), then fill the gaps with neutral defaults
//! ([`defaults`]).
//!
//! Entry points: [`convert_scene`] for a whole scene, [`convert_material`]
//! for one binding.

pub mod attributes;
pub mod batch;
pub mod channel;
pub mod connections;
pub mod defaults;
pub mod material;
pub mod network;
pub mod resolver;

pub use batch::{convert_scene, ConvertReport, FailedBinding};
pub use channel::{Channel, ChannelFamily, ExtractionMode};
pub use connections::MigrationOutcome;
pub use material::{convert_material, BindingOutcome, BindingStatus, ChannelFill, ChannelSource};
pub use network::{BuiltNodes, NodeRole};
pub use resolver::TextureResolver;

/// Full-color output attribute shared by textures, intermediate nodes and
/// the canonical shader itself.
pub(crate) const OUT_COLOR: &str = "outColor";

/// Options shared by every component of one conversion run.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Component used for scalar channel connections.
    pub extraction: ExtractionMode,
}

/// Name suffixes stripped when deriving a material's base name, longest
/// first so `_SG` wins over `SG`.
const NAME_SUFFIXES: &[&str] = &["_material", "material", "_sg", "sg"];

/// Strip a trailing `SG`/`Material` style suffix from a material or binding
/// name, case-insensitively. The base is what texture file names are
/// matched against and what the canonical shader is named from.
pub fn material_base(name: &str) -> &str {
    for suffix in NAME_SUFFIXES {
        if let Some(head) = strip_suffix_ci(name, suffix) {
            return head;
        }
    }
    name
}

fn strip_suffix_ci<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if name.len() < suffix.len() {
        return None;
    }
    let split = name.len() - suffix.len();
    if !name.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}
