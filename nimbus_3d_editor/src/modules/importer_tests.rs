use std::path::{Path, PathBuf};
use glam::{Quat, Vec3};
use crate::error::{Error, Result};
use crate::pipeline::{EngineContext, Module};
use crate::scene::{AABB, MaterialComponent, Scene, Transform};
use super::*;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Loader returning a two-level model: a root node translated by (0, 0, 5)
/// holding one mesh, and a child node translated by (1, 0, 0) holding two.
struct FakeLoader {
    loaded: Vec<PathBuf>,
}

impl FakeLoader {
    fn new() -> Self {
        Self { loaded: Vec::new() }
    }
}

fn cube_mesh(name: &str) -> ImportedMesh {
    ImportedMesh {
        name: name.to_string(),
        vertex_count: 24,
        index_count: 36,
        bounds: Some(AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5))),
        material: None,
    }
}

fn sample_model() -> ImportedNode {
    ImportedNode {
        name: "RootNode".to_string(),
        transform: Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
        meshes: vec![ImportedMesh {
            material: Some(MaterialComponent::new("Brick").with_texture("brick.png")),
            ..cube_mesh("Base")
        }],
        children: vec![ImportedNode {
            name: "Arm".to_string(),
            transform: Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
            meshes: vec![cube_mesh("Upper"), cube_mesh("")],
            children: Vec::new(),
        }],
    }
}

impl AssetLoader for FakeLoader {
    fn load(&mut self, path: &Path) -> Result<ImportedNode> {
        self.loaded.push(path.to_path_buf());
        if path.to_string_lossy().contains("broken") {
            return Err(Error::Io("corrupt file".to_string()));
        }
        Ok(sample_model())
    }
}

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// FILE CLASSIFICATION
// ============================================================================

#[test]
fn test_file_kind_from_extension() {
    assert_eq!(FileKind::from_path(Path::new("house.fbx")), FileKind::Model);
    assert_eq!(FileKind::from_path(Path::new("assets/house.OBJ")), FileKind::Model);
    assert_eq!(FileKind::from_path(Path::new("brick.png")), FileKind::Texture);
    assert_eq!(FileKind::from_path(Path::new("brick.JPG")), FileKind::Texture);
    assert_eq!(FileKind::from_path(Path::new("sky.dds")), FileKind::Texture);
}

#[test]
fn test_file_kind_unknown() {
    assert_eq!(FileKind::from_path(Path::new("notes.txt")), FileKind::Unknown);
    assert_eq!(FileKind::from_path(Path::new("README")), FileKind::Unknown);
    assert_eq!(FileKind::from_path(Path::new("archive.fbx.zip")), FileKind::Unknown);
}

// ============================================================================
// MODEL FLATTENING
// ============================================================================

#[test]
fn test_append_model_creates_root_and_mesh_children() {
    let mut scene = Scene::new();
    let root = append_model(&mut scene, "House", &sample_model()).unwrap();

    let object = scene.get(root).unwrap();
    assert_eq!(object.name(), "House");
    assert_eq!(object.children().len(), 3);
    assert!(object.mesh().is_none());
    assert_eq!(scene.roots(), &[root]);
    assert_eq!(sample_model().mesh_count(), 3);
}

#[test]
fn test_append_model_accumulates_node_transforms() {
    let mut scene = Scene::new();
    let root = append_model(&mut scene, "House", &sample_model()).unwrap();

    let base = scene.find_by_name("Base").unwrap();
    let upper = scene.find_by_name("Upper").unwrap();

    assert!(approx_vec(scene.get(base).unwrap().transform().position, Vec3::ZERO));
    assert!(approx_vec(scene.get(upper).unwrap().transform().position, Vec3::X));

    let world = scene.world_matrix(upper).unwrap();
    assert!(approx_vec(world.w_axis.truncate(), Vec3::new(1.0, 0.0, 5.0)));
    assert_eq!(scene.get(upper).unwrap().parent(), Some(root));
}

#[test]
fn test_append_model_unnamed_mesh_uses_node_name() {
    let mut scene = Scene::new();
    append_model(&mut scene, "House", &sample_model()).unwrap();

    let arm = scene.find_by_name("Arm").unwrap();
    let object = scene.get(arm).unwrap();
    assert_eq!(object.mesh().unwrap().vertex_count, 24);
    assert!(object.bounding_box().is_some());
}

#[test]
fn test_append_model_keeps_materials() {
    let mut scene = Scene::new();
    append_model(&mut scene, "House", &sample_model()).unwrap();

    let base = scene.find_by_name("Base").unwrap();
    let material = scene.get(base).unwrap().material().unwrap();
    assert_eq!(material.name, "Brick");
    assert_eq!(material.texture_path.as_deref(), Some("brick.png"));
}

#[test]
fn test_append_model_rotated_child() {
    let mut scene = Scene::new();
    let model = ImportedNode {
        name: "root".to_string(),
        transform: Transform::IDENTITY,
        meshes: Vec::new(),
        children: vec![ImportedNode {
            name: "spun".to_string(),
            transform: Transform::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), Vec3::ONE),
            meshes: Vec::new(),
            children: vec![ImportedNode {
                name: "leaf".to_string(),
                transform: Transform::from_position(Vec3::Z),
                meshes: vec![cube_mesh("leaf")],
                children: Vec::new(),
            }],
        }],
    };

    append_model(&mut scene, "Spun", &model).unwrap();

    let leaf = scene.find_by_name("leaf").unwrap();
    assert!(approx_vec(scene.get(leaf).unwrap().transform().position, Vec3::X));
}

// ============================================================================
// MODULE
// ============================================================================

#[test]
fn test_pre_update_drains_dropped_files() {
    let mut ctx = EngineContext::new();
    let mut module = ImporterModule::new(Box::new(FakeLoader::new()));
    ctx.requests.dropped_files = vec![
        PathBuf::from("models/House.FBX"),
        PathBuf::from("textures/brick.png"),
        PathBuf::from("notes.txt"),
    ];

    module.pre_update(&mut ctx, 0.0);

    assert!(ctx.requests.dropped_files.is_empty());
    assert_eq!(*module.stats(), ImportStats { models: 1, textures: 1, unknown: 1, failed: 0 });
    assert_eq!(module.textures(), &[PathBuf::from("textures/brick.png")]);
    assert_eq!(module.last_imported().len(), 1);
    let root = module.last_imported()[0];
    assert_eq!(ctx.scene.get(root).unwrap().name(), "House");
}

#[test]
fn test_failed_import_leaves_scene_untouched() {
    let mut ctx = EngineContext::new();
    let mut module = ImporterModule::new(Box::new(FakeLoader::new()));
    ctx.requests.dropped_files = vec![PathBuf::from("broken.obj")];

    module.pre_update(&mut ctx, 0.0);

    assert!(ctx.scene.is_empty());
    assert_eq!(module.stats().failed, 1);
    assert!(module.last_imported().is_empty());
}

#[test]
fn test_default_importer_rejects_models() {
    let mut scene = Scene::new();
    let mut module = ImporterModule::default();

    assert!(module.import_file(&mut scene, Path::new("house.fbx")).is_none());
    assert_eq!(module.stats().failed, 1);
    assert_eq!(module.name(), "Importer");
}
