//! End-to-end conversion tests over an in-memory scene and real texture
//! directories.

use std::fs::File;
use std::path::Path;

use autoshade::convert::{connections, network};
use autoshade::prelude::*;
use autoshade::scene::{DISPLACEMENT_INPUT, SURFACE_INPUT};

fn touch(dir: &Path, name: &str) {
    File::create(dir.join(name)).expect("create test texture");
}

/// Binding + imported foreign shader wired to its surface port.
fn import_material(scene: &mut MemoryScene, name: &str) -> (NodeId, NodeId) {
    let legacy = scene
        .create_node(NodeKind::foreign("lambert"), name)
        .expect("create legacy shader");
    let binding = scene.add_binding(&format!("{name}_SG"));
    scene
        .connect(
            Plug::new(legacy, "outColor"),
            Plug::new(binding, SURFACE_INPUT),
        )
        .expect("bind legacy shader");
    (binding, legacy)
}

fn producer_file(scene: &MemoryScene, node: NodeId, attr: &str) -> Option<String> {
    let src = scene.incoming(&Plug::new(node, attr))?;
    scene
        .get_attr(src.node, "fileTextureName")
        .ok()?
        .as_text()
        .map(str::to_string)
}

#[test]
fn scenario_flat_material_with_two_textures() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");
    touch(dir.path(), "matA_roughness.png");

    let mut scene = MemoryScene::new();
    let (binding, legacy) = import_material(&mut scene, "matA");
    scene
        .set_attr(legacy, "color", AttrValue::Color(glam::Vec3::splat(0.7)))
        .unwrap();

    let report = convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    assert_eq!(report.converted.len(), 1);
    assert!(report.failed.is_empty());

    let shader = scene.find_node("matA_surface").expect("canonical shader");
    assert_eq!(scene.node_kind(shader).unwrap(), NodeKind::StandardSurface);
    assert_eq!(
        scene
            .incoming(&Plug::new(binding, SURFACE_INPUT))
            .unwrap()
            .node,
        shader
    );

    // Channels backed by files
    assert!(producer_file(&scene, shader, "baseColor")
        .unwrap()
        .ends_with("matA_basecolor.png"));
    assert!(producer_file(&scene, shader, "specularRoughness")
        .unwrap()
        .ends_with("matA_roughness.png"));

    // Everything else at defaults, unconnected
    assert!(scene.incoming(&Plug::new(shader, "metalness")).is_none());
    assert_eq!(
        scene.get_attr(shader, "metalness").unwrap().as_scalar(),
        Some(0.0)
    );
    assert_eq!(
        scene.get_attr(shader, "opacity").unwrap().as_color(),
        Some(glam::Vec3::ONE)
    );
    assert_eq!(
        scene.get_attr(shader, "emission").unwrap().as_scalar(),
        Some(0.0)
    );

    // Legacy shader had no remaining references
    assert!(scene.find_node("matA").is_none());
}

#[test]
fn conversion_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");
    touch(dir.path(), "matA_normal.png");
    touch(dir.path(), "matA_height.png");

    let mut scene = MemoryScene::new();
    import_material(&mut scene, "matA");

    let first = convert_scene(&mut scene, &ConvertOptions::default(), dir.path());
    assert_eq!(first.converted.len(), 1);

    let nodes = scene.node_count();
    let connections = scene.connection_count();

    let second = convert_scene(&mut scene, &ConvertOptions::default(), dir.path());
    assert_eq!(second.converted.len(), 0);
    assert_eq!(second.skipped.len(), 1);
    assert_eq!(scene.node_count(), nodes);
    assert_eq!(scene.connection_count(), connections);
}

#[test]
fn shared_legacy_shader_builds_no_duplicate_chains() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");

    let mut scene = MemoryScene::new();
    let (binding_a, legacy) = import_material(&mut scene, "matA");
    // Second binding driven by the same imported shader
    let binding_b = scene.add_binding("matA_extra_SG");
    scene
        .connect(
            Plug::new(legacy, "outColor"),
            Plug::new(binding_b, SURFACE_INPUT),
        )
        .unwrap();

    let report = convert_scene(&mut scene, &ConvertOptions::default(), dir.path());
    assert_eq!(report.converted.len(), 2);

    // One canonical shader serves both bindings, and only one texture chain
    let shader = scene.find_node("matA_surface").unwrap();
    assert_eq!(
        scene
            .incoming(&Plug::new(binding_a, SURFACE_INPUT))
            .unwrap()
            .node,
        shader
    );
    assert_eq!(
        scene
            .incoming(&Plug::new(binding_b, SURFACE_INPUT))
            .unwrap()
            .node,
        shader
    );
    assert_eq!(scene.nodes_of_kind(&NodeKind::Texture).len(), 1);
    // Last conversion released the legacy shader
    assert!(scene.find_node("matA").is_none());
}

#[test]
fn reuse_takes_priority_over_disk_search() {
    let dir = tempfile::tempdir().unwrap();
    // A file that would match if the engine searched
    touch(dir.path(), "matA_basecolor.png");

    let mut scene = MemoryScene::new();
    let (_, legacy) = import_material(&mut scene, "matA");
    let existing = scene.create_node(NodeKind::Texture, "importedTex").unwrap();
    scene
        .set_attr(
            existing,
            "fileTextureName",
            AttrValue::Text("/imported/wood.png".to_string()),
        )
        .unwrap();
    scene
        .connect(Plug::new(existing, "outColor"), Plug::new(legacy, "color"))
        .unwrap();

    convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    let shader = scene.find_node("matA_surface").unwrap();
    let producer = scene.incoming(&Plug::new(shader, "baseColor")).unwrap();
    assert_eq!(producer.node, existing);
    // No second texture node was created for baseColor
    assert_eq!(scene.nodes_of_kind(&NodeKind::Texture).len(), 1);
    assert_eq!(
        producer_file(&scene, shader, "baseColor").unwrap(),
        "/imported/wood.png"
    );
}

#[test]
fn defaults_only_fill_unconnected_channels() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");

    let mut scene = MemoryScene::new();
    import_material(&mut scene, "matA");

    convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    let shader = scene.find_node("matA_surface").unwrap();
    // Connected channel carries no default value
    assert!(scene.incoming(&Plug::new(shader, "baseColor")).is_some());
    assert!(scene.get_attr(shader, "baseColor").is_err());
    // Unconnected channels carry exactly the defaults
    assert!(scene
        .incoming(&Plug::new(shader, "specularRoughness"))
        .is_none());
    assert_eq!(
        scene
            .get_attr(shader, "specularRoughness")
            .unwrap()
            .as_scalar(),
        Some(0.5)
    );
}

#[test]
fn uv_assignments_survive_conversion() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");

    let mut scene = MemoryScene::new();
    let (binding, _) = import_material(&mut scene, "matA");
    let mesh = scene.add_mesh("matAShape", binding);
    scene.set_current_uv_set(mesh, "uvSet2").unwrap();

    convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    assert_eq!(scene.current_uv_set(mesh).unwrap(), "uvSet2");
}

#[test]
fn displacement_chain_lands_on_binding() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_height.exr");

    let mut scene = MemoryScene::new();
    let (binding, _) = import_material(&mut scene, "matA");

    convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    let producer = scene
        .incoming(&Plug::new(binding, DISPLACEMENT_INPUT))
        .expect("displacement port wired");
    assert_eq!(
        scene.node_kind(producer.node).unwrap(),
        NodeKind::Displacement
    );
    let shader = scene.find_node("matA_surface").unwrap();
    assert!(scene.incoming(&Plug::new(shader, "normalCamera")).is_none());
}

#[test]
fn legacy_shader_in_use_elsewhere_is_kept() {
    let dir = tempfile::tempdir().unwrap();

    let mut scene = MemoryScene::new();
    let (binding, legacy) = import_material(&mut scene, "matA");
    // Something else still consumes the legacy shader
    let other = scene.create_node(NodeKind::foreign("ramp"), "mixer").unwrap();
    scene
        .connect(Plug::new(legacy, "outColor"), Plug::new(other, "inputA"))
        .unwrap();

    let resolver = TextureResolver::new(dir.path());
    let outcome = convert_material(
        &mut scene,
        &ConvertOptions::default(),
        &resolver,
        binding,
    )
    .unwrap();

    assert!(!outcome.legacy_deleted);
    assert!(scene.find_node("matA").is_some());
}

#[test]
fn builtin_bindings_are_never_touched() {
    let dir = tempfile::tempdir().unwrap();

    let mut scene = MemoryScene::new();
    let builtin = scene.find_node("initialShadingGroup").unwrap();
    let legacy = scene
        .create_node(NodeKind::foreign("lambert"), "defaultLambert")
        .unwrap();
    scene
        .connect(
            Plug::new(legacy, "outColor"),
            Plug::new(builtin, SURFACE_INPUT),
        )
        .unwrap();

    let report = convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    assert_eq!(report.total(), 0);
    assert_eq!(
        scene
            .incoming(&Plug::new(builtin, SURFACE_INPUT))
            .unwrap()
            .node,
        legacy
    );
}

#[test]
fn second_pass_fallback_applies_per_material() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");
    touch(dir.path(), "generic_roughness.png");

    let mut scene = MemoryScene::new();
    import_material(&mut scene, "matB");

    convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    let shader = scene.find_node("matB_surface").unwrap();
    // No matB-named file: roughness falls back to the generic keyword match
    assert!(producer_file(&scene, shader, "specularRoughness")
        .unwrap()
        .ends_with("generic_roughness.png"));
    // basecolor also falls back, to the matA-named file
    assert!(producer_file(&scene, shader, "baseColor")
        .unwrap()
        .ends_with("matA_basecolor.png"));
}

/// Scene wrapper that injects failures into selected operations, simulating
/// a host service rejecting calls mid-conversion.
struct FlakyScene {
    inner: MemoryScene,
    /// Reject `create_node` for names containing this fragment.
    reject_create: Option<&'static str>,
    /// Reject the first `connect` landing on this destination attribute.
    reject_connect_once: Option<&'static str>,
    /// Reject every `disconnect`.
    reject_disconnect: bool,
}

impl FlakyScene {
    fn new(inner: MemoryScene) -> Self {
        Self {
            inner,
            reject_create: None,
            reject_connect_once: None,
            reject_disconnect: false,
        }
    }
}

impl SceneGraph for FlakyScene {
    fn create_node(&mut self, kind: NodeKind, name: &str) -> Result<NodeId> {
        if let Some(fragment) = self.reject_create {
            if name.contains(fragment) {
                return Err(Error::other(format!("service rejected node {name}")));
            }
        }
        self.inner.create_node(kind, name)
    }

    fn delete_node(&mut self, node: NodeId) -> Result<()> {
        self.inner.delete_node(node)
    }

    fn rename_node(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.inner.rename_node(node, name)
    }

    fn node_kind(&self, node: NodeId) -> Result<NodeKind> {
        self.inner.node_kind(node)
    }

    fn node_name(&self, node: NodeId) -> Result<String> {
        self.inner.node_name(node)
    }

    fn find_node(&self, name: &str) -> Option<NodeId> {
        self.inner.find_node(name)
    }

    fn get_attr(&self, node: NodeId, attr: &str) -> Result<AttrValue> {
        self.inner.get_attr(node, attr)
    }

    fn set_attr(&mut self, node: NodeId, attr: &str, value: AttrValue) -> Result<()> {
        self.inner.set_attr(node, attr, value)
    }

    fn connect(&mut self, src: Plug, dst: Plug) -> Result<()> {
        if self.reject_connect_once == Some(dst.attr.as_str()) {
            self.reject_connect_once = None;
            return Err(Error::connection(format!("service rejected link to {dst}")));
        }
        self.inner.connect(src, dst)
    }

    fn disconnect(&mut self, dst: &Plug) -> Result<()> {
        if self.reject_disconnect {
            return Err(Error::connection(format!("service kept link to {dst}")));
        }
        self.inner.disconnect(dst)
    }

    fn incoming(&self, dst: &Plug) -> Option<Plug> {
        self.inner.incoming(dst)
    }

    fn outgoing(&self, node: NodeId) -> Vec<(Plug, Plug)> {
        self.inner.outgoing(node)
    }

    fn material_bindings(&self) -> Vec<NodeId> {
        self.inner.material_bindings()
    }

    fn bound_meshes(&self, binding: NodeId) -> Vec<NodeId> {
        self.inner.bound_meshes(binding)
    }

    fn current_uv_set(&self, mesh: NodeId) -> Result<String> {
        self.inner.current_uv_set(mesh)
    }

    fn set_current_uv_set(&mut self, mesh: NodeId, name: &str) -> Result<()> {
        self.inner.set_current_uv_set(mesh, name)
    }
}

#[test]
fn one_failing_material_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");

    let mut inner = MemoryScene::new();
    import_material(&mut inner, "matA");
    import_material(&mut inner, "matB");
    let mut scene = FlakyScene::new(inner);
    // Canonical shader creation for matB will be rejected
    scene.reject_create = Some("matB_surface");

    let report = convert_scene(&mut scene, &ConvertOptions::default(), dir.path());

    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.converted[0].binding, "matA_SG");
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].binding, "matB_SG");
    assert!(report.failed[0].reason.contains("matB_surface"));

    // The successful conversion is intact
    assert!(scene.inner.find_node("matA_surface").is_some());
}

#[test]
fn failed_reconnect_falls_back_to_disk_resolution() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");

    let mut inner = MemoryScene::new();
    let (_, legacy) = import_material(&mut inner, "matA");
    let imported = inner.create_node(NodeKind::Texture, "importedTex").unwrap();
    inner
        .set_attr(
            imported,
            "fileTextureName",
            AttrValue::Text("/imported/wood.png".to_string()),
        )
        .unwrap();
    inner
        .connect(Plug::new(imported, "outColor"), Plug::new(legacy, "color"))
        .unwrap();

    let mut scene = FlakyScene::new(inner);
    // Reconnecting the imported texture onto the canonical shader fails once
    scene.reject_connect_once = Some("baseColor");

    let report = convert_scene(&mut scene, &ConvertOptions::default(), dir.path());
    assert_eq!(report.converted.len(), 1);
    assert!(report.failed.is_empty());

    // The channel ends up fed from disk instead
    let shader = scene.inner.find_node("matA_surface").unwrap();
    assert!(producer_file(&scene.inner, shader, "baseColor")
        .unwrap()
        .ends_with("matA_basecolor.png"));

    // The imported texture survives but no longer feeds anything
    let imported = scene.inner.find_node("importedTex").unwrap();
    assert!(scene.inner.outgoing(imported).is_empty());
}

#[test]
fn failed_detach_still_counts_channel_as_migrated() {
    let mut inner = MemoryScene::new();
    let (_, legacy) = import_material(&mut inner, "matA");
    let imported = inner.create_node(NodeKind::Texture, "importedTex").unwrap();
    inner
        .connect(Plug::new(imported, "outColor"), Plug::new(legacy, "color"))
        .unwrap();
    let canonical = inner
        .create_node(NodeKind::StandardSurface, "matA_surface")
        .unwrap();

    let mut scene = FlakyScene::new(inner);
    scene.reject_disconnect = true;

    let outcome = connections::migrate(&mut scene, &ConvertOptions::default(), legacy, canonical);

    assert!(outcome.contains(Channel::BaseColor));
    assert_eq!(
        scene
            .inner
            .incoming(&Plug::new(canonical, "baseColor"))
            .unwrap()
            .node,
        imported
    );
    // The stale legacy link survives the refused detach
    assert_eq!(
        scene
            .inner
            .incoming(&Plug::new(legacy, "color"))
            .unwrap()
            .node,
        imported
    );
}

#[test]
fn failed_channel_wiring_leaves_no_orphan_nodes() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "matA_basecolor.png");

    let mut inner = MemoryScene::new();
    let shader = inner
        .create_node(NodeKind::StandardSurface, "matA_surface")
        .unwrap();
    let binding = inner.add_binding("matA_SG");
    let nodes = inner.node_count();
    let links = inner.connection_count();

    let mut scene = FlakyScene::new(inner);
    scene.reject_connect_once = Some("baseColor");

    let result = network::build_channel(
        &mut scene,
        &ConvertOptions::default(),
        shader,
        binding,
        Channel::BaseColor,
        &dir.path().join("matA_basecolor.png"),
    );

    assert!(result.is_err());
    // The partially built texture chain was removed again
    assert_eq!(scene.inner.node_count(), nodes);
    assert_eq!(scene.inner.connection_count(), links);
    assert!(scene.inner.nodes_of_kind(&NodeKind::Texture).is_empty());
}
