//! The scene-graph capability trait consumed by the conversion engine.
//!
//! Hosts implement [`SceneGraph`] over their native scene service; the
//! engine takes `&mut dyn SceneGraph` and performs all mutations through
//! it, sequentially (the service is assumed single-writer).

use super::{AttrValue, NodeId, NodeKind, Plug, SURFACE_INPUT};
use crate::util::Result;

/// Minimal scene-graph service the engine requires.
pub trait SceneGraph {
    /// Create a node of the given kind. The requested name may be adjusted
    /// by the service to keep names unique; the final name is queryable via
    /// [`SceneGraph::node_name`].
    fn create_node(&mut self, kind: NodeKind, name: &str) -> Result<NodeId>;

    /// Delete a node and every connection touching it.
    fn delete_node(&mut self, node: NodeId) -> Result<()>;

    /// Rename a node.
    fn rename_node(&mut self, node: NodeId, name: &str) -> Result<()>;

    /// Get a node's kind.
    fn node_kind(&self, node: NodeId) -> Result<NodeKind>;

    /// Get a node's current name.
    fn node_name(&self, node: NodeId) -> Result<String>;

    /// Look up a node by exact name.
    fn find_node(&self, name: &str) -> Option<NodeId>;

    /// Read a named attribute value.
    fn get_attr(&self, node: NodeId, attr: &str) -> Result<AttrValue>;

    /// Write a named attribute value.
    fn set_attr(&mut self, node: NodeId, attr: &str, value: AttrValue) -> Result<()>;

    /// Connect a producer output to a consumer input, overwriting any
    /// existing producer on that input.
    fn connect(&mut self, src: Plug, dst: Plug) -> Result<()>;

    /// Remove the incoming connection on a consumer input, if any.
    fn disconnect(&mut self, dst: &Plug) -> Result<()>;

    /// The producer currently feeding a consumer input, if any.
    fn incoming(&self, dst: &Plug) -> Option<Plug>;

    /// Every connection leaving a node, as (source, destination) pairs.
    fn outgoing(&self, node: NodeId) -> Vec<(Plug, Plug)>;

    /// All material bindings in the scene, built-in defaults included.
    fn material_bindings(&self) -> Vec<NodeId>;

    /// Mesh shapes grouped under a binding.
    fn bound_meshes(&self, binding: NodeId) -> Vec<NodeId>;

    /// Active UV set name on a mesh.
    fn current_uv_set(&self, mesh: NodeId) -> Result<String>;

    /// Set the active UV set on a mesh.
    fn set_current_uv_set(&mut self, mesh: NodeId, name: &str) -> Result<()>;

    /// Shader currently driving a binding's surface output, if any.
    fn surface_shader(&self, binding: NodeId) -> Option<NodeId> {
        self.incoming(&Plug::new(binding, SURFACE_INPUT))
            .map(|src| src.node)
    }

    /// Whether a consumer input currently has a producer.
    fn has_incoming(&self, node: NodeId, attr: &str) -> bool {
        self.incoming(&Plug::new(node, attr)).is_some()
    }
}
