//! In-memory scene-graph implementation.
//!
//! A plain node store with one producer per consumer input, used as the
//! fixture for every engine test and as a standalone graph when no host
//! scene service is available. Built-in default bindings exist from
//! creation, mirroring a freshly opened host scene.

use std::collections::HashMap;

use super::{AttrValue, NodeId, NodeKind, Plug, SceneGraph, UV_SET_ATTR};
use crate::util::{Error, Result};

/// Names of the built-in bindings present in every scene.
pub const BUILTIN_BINDINGS: &[&str] = &["initialShadingGroup", "initialParticleSE"];

#[derive(Clone, Debug)]
struct NodeRecord {
    name: String,
    kind: NodeKind,
    attrs: HashMap<String, AttrValue>,
}

/// In-memory [`SceneGraph`] implementation.
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: HashMap<NodeId, NodeRecord>,
    /// Incoming edges, keyed by consumer plug. One producer per input.
    edges: HashMap<Plug, Plug>,
    /// Meshes grouped under each binding.
    members: HashMap<NodeId, Vec<NodeId>>,
    next_id: u64,
}

impl MemoryScene {
    /// Create a scene containing only the built-in default bindings.
    pub fn new() -> Self {
        let mut scene = Self::default();
        for name in BUILTIN_BINDINGS {
            scene.spawn(NodeKind::Binding, name);
        }
        scene
    }

    /// Create a material binding.
    pub fn add_binding(&mut self, name: &str) -> NodeId {
        self.spawn(NodeKind::Binding, name)
    }

    /// Create a mesh shape grouped under `binding`, with the default UV set
    /// active.
    pub fn add_mesh(&mut self, name: &str, binding: NodeId) -> NodeId {
        let mesh = self.spawn(NodeKind::Mesh, name);
        let _ = self.set_attr(mesh, UV_SET_ATTR, AttrValue::Text("map1".to_string()));
        self.members.entry(binding).or_default().push(mesh);
        mesh
    }

    /// Group an existing mesh under a binding.
    pub fn assign_mesh(&mut self, binding: NodeId, mesh: NodeId) {
        self.members.entry(binding).or_default().push(mesh);
    }

    /// Total number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of live connections.
    pub fn connection_count(&self) -> usize {
        self.edges.len()
    }

    /// All node ids of a given kind, in creation order.
    pub fn nodes_of_kind(&self, kind: &NodeKind) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, rec)| rec.kind == *kind)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    fn record(&self, node: NodeId) -> Result<&NodeRecord> {
        self.nodes
            .get(&node)
            .ok_or_else(|| Error::NodeNotFound(node.to_string()))
    }

    fn spawn(&mut self, kind: NodeKind, name: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let name = self.unique_name(name);
        self.nodes.insert(id, NodeRecord {
            name,
            kind,
            attrs: HashMap::new(),
        });
        id
    }

    fn unique_name(&self, requested: &str) -> String {
        if self.find_node(requested).is_none() {
            return requested.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{requested}{n}");
            if self.find_node(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

impl SceneGraph for MemoryScene {
    fn create_node(&mut self, kind: NodeKind, name: &str) -> Result<NodeId> {
        Ok(self.spawn(kind, name))
    }

    fn delete_node(&mut self, node: NodeId) -> Result<()> {
        if self.nodes.remove(&node).is_none() {
            return Err(Error::NodeNotFound(node.to_string()));
        }
        self.edges
            .retain(|dst, src| dst.node != node && src.node != node);
        self.members.remove(&node);
        for meshes in self.members.values_mut() {
            meshes.retain(|m| *m != node);
        }
        Ok(())
    }

    fn rename_node(&mut self, node: NodeId, name: &str) -> Result<()> {
        let name = self.unique_name(name);
        let rec = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| Error::NodeNotFound(node.to_string()))?;
        rec.name = name;
        Ok(())
    }

    fn node_kind(&self, node: NodeId) -> Result<NodeKind> {
        Ok(self.record(node)?.kind.clone())
    }

    fn node_name(&self, node: NodeId) -> Result<String> {
        Ok(self.record(node)?.name.clone())
    }

    fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, rec)| rec.name == name)
            .map(|(id, _)| *id)
    }

    fn get_attr(&self, node: NodeId, attr: &str) -> Result<AttrValue> {
        let rec = self.record(node)?;
        rec.attrs
            .get(attr)
            .cloned()
            .ok_or_else(|| Error::AttrNotFound {
                node: rec.name.clone(),
                attr: attr.to_string(),
            })
    }

    fn set_attr(&mut self, node: NodeId, attr: &str, value: AttrValue) -> Result<()> {
        let rec = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| Error::NodeNotFound(node.to_string()))?;
        rec.attrs.insert(attr.to_string(), value);
        Ok(())
    }

    fn connect(&mut self, src: Plug, dst: Plug) -> Result<()> {
        if !self.nodes.contains_key(&src.node) {
            return Err(Error::connection(format!("stale source {src}")));
        }
        if !self.nodes.contains_key(&dst.node) {
            return Err(Error::connection(format!("stale destination {dst}")));
        }
        self.edges.insert(dst, src);
        Ok(())
    }

    fn disconnect(&mut self, dst: &Plug) -> Result<()> {
        self.edges.remove(dst);
        Ok(())
    }

    fn incoming(&self, dst: &Plug) -> Option<Plug> {
        self.edges.get(dst).cloned()
    }

    fn outgoing(&self, node: NodeId) -> Vec<(Plug, Plug)> {
        let mut out: Vec<(Plug, Plug)> = self
            .edges
            .iter()
            .filter(|(_, src)| src.node == node)
            .map(|(dst, src)| (src.clone(), dst.clone()))
            .collect();
        out.sort_by(|a, b| (a.1.node, &a.1.attr).cmp(&(b.1.node, &b.1.attr)));
        out
    }

    fn material_bindings(&self) -> Vec<NodeId> {
        self.nodes_of_kind(&NodeKind::Binding)
    }

    fn bound_meshes(&self, binding: NodeId) -> Vec<NodeId> {
        self.members.get(&binding).cloned().unwrap_or_default()
    }

    fn current_uv_set(&self, mesh: NodeId) -> Result<String> {
        let value = self.get_attr(mesh, UV_SET_ATTR)?;
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| Error::TypeMismatch {
                expected: "string".to_string(),
                actual: format!("{value:?}"),
            })
    }

    fn set_current_uv_set(&mut self, mesh: NodeId, name: &str) -> Result<()> {
        self.set_attr(mesh, UV_SET_ATTR, AttrValue::Text(name.to_string()))
    }
}
