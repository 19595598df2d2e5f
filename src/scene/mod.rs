//! Scene-graph data model and capability interface.
//!
//! The conversion engine never owns a scene. It is handed a service
//! implementing [`SceneGraph`] by the caller and performs every mutation
//! through it. This module defines the handle, kind, value and plug types
//! that interface speaks, plus an in-memory implementation
//! ([`memory::MemoryScene`]) usable as a test fixture or a host-free graph.
//!
//! ## Key Concepts
//!
//! - **Node**: a typed entity in the shading graph, addressed by an opaque
//!   [`NodeId`].
//! - **Plug**: a (node, attribute) pair, the endpoint of a connection.
//! - **Binding**: the node kind that groups geometry under one effective
//!   shader; its `surfaceShader` and `displacementShader` inputs are the
//!   ports the engine rebinds.

pub mod memory;
mod traits;

pub use traits::SceneGraph;

/// Input port on a binding that selects its surface shader.
pub const SURFACE_INPUT: &str = "surfaceShader";

/// Input port on a binding that selects its displacement producer.
pub const DISPLACEMENT_INPUT: &str = "displacementShader";

/// Attribute holding the active UV set name on a mesh.
pub const UV_SET_ATTR: &str = "currentUVSet";

/// Opaque handle to a scene node. Stable for the node's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Node type tag.
///
/// Shader types produced by the import step that the engine does not model
/// are carried as [`NodeKind::Foreign`] with their host type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Canonical physically-based surface shader.
    StandardSurface,
    /// File texture node.
    Texture,
    /// 2d texture placement node driving a texture's UV attributes.
    Placement,
    /// Tangent-space normal map decode node.
    NormalMap,
    /// Displacement evaluation node.
    Displacement,
    /// Material binding grouping geometry under one shader.
    Binding,
    /// Mesh shape.
    Mesh,
    /// Any other node type, by host type name (e.g. "lambert", "phong").
    Foreign(String),
}

impl NodeKind {
    /// Create a foreign kind from a host type name.
    pub fn foreign(type_name: impl Into<String>) -> Self {
        Self::Foreign(type_name.into())
    }
}

/// Attribute value.
///
/// The engine only reads and writes scalars, 3-component colors and
/// strings; everything else a host may store is out of scope.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Single float value.
    Scalar(f32),
    /// RGB color value.
    Color(glam::Vec3),
    /// String value (file paths, colorspace tags, UV set names).
    Text(String),
}

impl AttrValue {
    /// Get as scalar if possible.
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as color if possible.
    pub fn as_color(&self) -> Option<glam::Vec3> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string if possible.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One endpoint of a connection: a named attribute on a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Plug {
    /// Owning node.
    pub node: NodeId,
    /// Attribute name on that node.
    pub attr: String,
}

impl Plug {
    /// Create a plug.
    pub fn new(node: NodeId, attr: impl Into<String>) -> Self {
        Self {
            node,
            attr: attr.into(),
        }
    }
}

impl std::fmt::Display for Plug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.node, self.attr)
    }
}
