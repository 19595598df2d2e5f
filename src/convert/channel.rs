//! Canonical shading channels and their lookup tables.
//!
//! Each channel knows its input attribute name, the filename keywords the
//! resolver searches for, which builder family wires it, the colorspace its
//! textures are tagged with, and its neutral default when nothing feeds it.

use serde::Serialize;

use crate::scene::AttrValue;

/// Default UV-tiled texture colorspace for color data.
pub const COLORSPACE_SRGB: &str = "sRGB";

/// Colorspace for non-color data (masks, normals, height).
pub const COLORSPACE_RAW: &str = "Raw";

/// How scalar channels read a texture: which single component feeds the
/// input. One mode applies to every scalar connection in a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ExtractionMode {
    /// Use the texture's alpha output.
    #[default]
    Alpha,
    /// Use the texture's red component output.
    Red,
}

impl ExtractionMode {
    /// Texture output attribute carrying the extracted component.
    pub fn output_attr(self) -> &'static str {
        match self {
            Self::Alpha => "outAlpha",
            Self::Red => "outColorR",
        }
    }
}

/// Wiring family a channel belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelFamily {
    /// Full-color texture output feeds the input directly.
    Color,
    /// Single extracted component feeds the input directly.
    Scalar,
    /// An intermediate normal-map node sits between texture and input.
    NormalMap,
    /// An intermediate displacement node feeds the binding's port.
    Displacement,
}

/// A canonical shading channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    BaseColor,
    SpecularColor,
    SpecularRoughness,
    Metalness,
    Opacity,
    Normal,
    EmissionColor,
    Emission,
    Displacement,
}

impl Channel {
    /// Every canonical channel, in application order.
    pub const ALL: [Channel; 9] = [
        Channel::BaseColor,
        Channel::SpecularColor,
        Channel::SpecularRoughness,
        Channel::Metalness,
        Channel::Opacity,
        Channel::Normal,
        Channel::EmissionColor,
        Channel::Emission,
        Channel::Displacement,
    ];

    /// Channels the resolver searches texture directories for. Emission
    /// strength is attribute-only and never resolved from disk.
    pub const RESOLVABLE: [Channel; 8] = [
        Channel::BaseColor,
        Channel::SpecularColor,
        Channel::SpecularRoughness,
        Channel::Metalness,
        Channel::Opacity,
        Channel::Normal,
        Channel::EmissionColor,
        Channel::Displacement,
    ];

    /// Input attribute receiving this channel's value or connection.
    pub fn input_attr(self) -> &'static str {
        match self {
            Self::BaseColor => "baseColor",
            Self::SpecularColor => "specularColor",
            Self::SpecularRoughness => "specularRoughness",
            Self::Metalness => "metalness",
            Self::Opacity => "opacity",
            Self::Normal => "normalCamera",
            Self::EmissionColor => "emissionColor",
            Self::Emission => "emission",
            Self::Displacement => crate::scene::DISPLACEMENT_INPUT,
        }
    }

    /// Lower-case filename keywords identifying this channel's textures.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::BaseColor => &["basecolor", "diffuse", "albedo"],
            Self::SpecularColor => &["specularcolor", "specular"],
            Self::SpecularRoughness => &["specularroughness", "roughness"],
            Self::Metalness => &["metalness", "metallic"],
            Self::Opacity => &["opacity", "alpha"],
            Self::Normal => &["normal"],
            Self::EmissionColor => &["emission", "emissive"],
            Self::Emission => &[],
            Self::Displacement => &["height", "displace"],
        }
    }

    /// Builder family wiring this channel.
    pub fn family(self) -> ChannelFamily {
        match self {
            Self::BaseColor | Self::SpecularColor | Self::EmissionColor => ChannelFamily::Color,
            Self::SpecularRoughness | Self::Metalness | Self::Opacity | Self::Emission => {
                ChannelFamily::Scalar
            }
            Self::Normal => ChannelFamily::NormalMap,
            Self::Displacement => ChannelFamily::Displacement,
        }
    }

    /// Colorspace tag for textures feeding this channel.
    pub fn colorspace(self) -> &'static str {
        match self.family() {
            ChannelFamily::Color => COLORSPACE_SRGB,
            _ => COLORSPACE_RAW,
        }
    }

    /// Whether this channel lives on the material binding rather than the
    /// shader.
    pub fn is_binding_level(self) -> bool {
        matches!(self, Self::Displacement)
    }

    /// Neutral value assigned when the channel ends up unconnected, if the
    /// channel is defaulted at all.
    pub fn default_value(self) -> Option<AttrValue> {
        match self {
            Self::BaseColor => Some(AttrValue::Color(glam::Vec3::splat(0.5))),
            Self::SpecularRoughness => Some(AttrValue::Scalar(0.5)),
            Self::Metalness => Some(AttrValue::Scalar(0.0)),
            Self::Opacity => Some(AttrValue::Color(glam::Vec3::ONE)),
            Self::Emission => Some(AttrValue::Scalar(0.0)),
            _ => None,
        }
    }
}
