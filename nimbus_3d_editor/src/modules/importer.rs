/// ImporterModule: turns dropped files into scene objects.
///
/// Files are classified by extension. Models are decoded by an
/// `AssetLoader` collaborator into an `ImportedNode` tree, which is
/// flattened into the scene: one root object named after the file, with
/// one child per mesh carrying the mesh's accumulated node transform.
/// Decoding itself is synchronous and happens within the frame.

use std::path::{Path, PathBuf};
use glam::Mat4;
use crate::error::Result;
use crate::pipeline::{EngineContext, Module, ModuleSlot, UpdateStatus};
use crate::scene::{
    AABB, Component, MaterialComponent, MeshComponent, ObjectKey, Scene, Transform,
};
use crate::{engine_bail, engine_error, engine_info, engine_warn};

const SOURCE: &str = "nimbus3d::Importer";

/// Kind of a dropped file, from its lowercased extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Texture,
    Model,
    Unknown,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") | Some("jpg") | Some("dds") => FileKind::Texture,
            Some("fbx") | Some("obj") => FileKind::Model,
            _ => FileKind::Unknown,
        }
    }
}

/// A mesh decoded by an asset loader.
#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub vertex_count: u32,
    pub index_count: u32,
    /// Local-space bounds
    pub bounds: Option<AABB>,
    pub material: Option<MaterialComponent>,
}

/// A node of a decoded model.
#[derive(Debug, Clone, Default)]
pub struct ImportedNode {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<ImportedMesh>,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    pub fn mesh_count(&self) -> usize {
        self.meshes.len() + self.children.iter().map(ImportedNode::mesh_count).sum::<usize>()
    }
}

/// Decodes model files. Format parsing lives outside the editor core.
pub trait AssetLoader {
    fn load(&mut self, path: &Path) -> Result<ImportedNode>;
}

/// Loader used when no decoder is configured: every model fails to load.
#[derive(Debug, Default)]
pub struct NoModelLoader;

impl AssetLoader for NoModelLoader {
    fn load(&mut self, path: &Path) -> Result<ImportedNode> {
        engine_bail!(Io, SOURCE, "No model loader configured for '{}'", path.display());
    }
}

/// Counters of processed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub models: usize,
    pub textures: usize,
    pub unknown: usize,
    pub failed: usize,
}

/// Append a decoded model to the scene and return its root object.
///
/// The root carries the model root's transform. Every mesh becomes a
/// child of the root whose transform is the product of the node
/// transforms below the model root.
pub fn append_model(scene: &mut Scene, name: &str, model: &ImportedNode) -> Result<ObjectKey> {
    let root = scene.create_object(name, None)?;
    if let Some(object) = scene.get_mut(root) {
        *object.transform_mut() = model.transform;
    }

    append_node_meshes(scene, root, model, Mat4::IDENTITY)?;
    for child in &model.children {
        append_node(scene, root, child, Mat4::IDENTITY)?;
    }
    Ok(root)
}

fn append_node(scene: &mut Scene, root: ObjectKey, node: &ImportedNode, parent: Mat4) -> Result<()> {
    let accumulated = parent * node.transform.local_matrix();
    append_node_meshes(scene, root, node, accumulated)?;
    for child in &node.children {
        append_node(scene, root, child, accumulated)?;
    }
    Ok(())
}

fn append_node_meshes(scene: &mut Scene, root: ObjectKey, node: &ImportedNode, matrix: Mat4) -> Result<()> {
    for mesh in &node.meshes {
        let name = if mesh.name.is_empty() { node.name.as_str() } else { mesh.name.as_str() };
        let key = scene.create_object(name, Some(root))?;
        let Some(object) = scene.get_mut(key) else {
            continue;
        };

        *object.transform_mut() = Transform::from_matrix(&matrix);
        object.set_bounding_box(mesh.bounds);
        object.add_component(Component::Mesh(MeshComponent::new(
            mesh.name.clone(),
            mesh.vertex_count,
            mesh.index_count,
        )))?;
        if let Some(material) = &mesh.material {
            object.add_component(Component::Material(material.clone()))?;
        }
    }
    Ok(())
}

pub struct ImporterModule {
    loader: Box<dyn AssetLoader>,
    stats: ImportStats,
    textures: Vec<PathBuf>,
    last_imported: Vec<ObjectKey>,
}

impl Default for ImporterModule {
    fn default() -> Self {
        Self::new(Box::new(NoModelLoader))
    }
}

impl ImporterModule {
    pub const NAME: &'static str = "Importer";

    pub fn new(loader: Box<dyn AssetLoader>) -> Self {
        Self {
            loader,
            stats: ImportStats::default(),
            textures: Vec::new(),
            last_imported: Vec::new(),
        }
    }

    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    /// Texture files seen so far, in drop order.
    pub fn textures(&self) -> &[PathBuf] {
        &self.textures
    }

    /// Root objects created during the last frame.
    pub fn last_imported(&self) -> &[ObjectKey] {
        &self.last_imported
    }

    /// Classify and import one file. Failures are logged and counted.
    pub fn import_file(&mut self, scene: &mut Scene, path: &Path) -> Option<ObjectKey> {
        match FileKind::from_path(path) {
            FileKind::Model => {
                engine_info!(SOURCE, "Importing model '{}'", path.display());
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("Imported");

                let imported = self
                    .loader
                    .load(path)
                    .and_then(|model| append_model(scene, name, &model).map(|key| (key, model.mesh_count())));
                match imported {
                    Ok((key, meshes)) => {
                        self.stats.models += 1;
                        engine_info!(SOURCE, "Imported '{}' with {} mesh(es)", name, meshes);
                        Some(key)
                    }
                    Err(err) => {
                        self.stats.failed += 1;
                        engine_error!(SOURCE, "Failed to import '{}': {}", path.display(), err);
                        None
                    }
                }
            }
            FileKind::Texture => {
                engine_info!(SOURCE, "Importing texture '{}'", path.display());
                self.stats.textures += 1;
                self.textures.push(path.to_path_buf());
                None
            }
            FileKind::Unknown => {
                engine_warn!(SOURCE, "Unknown file type '{}'", path.display());
                self.stats.unknown += 1;
                None
            }
        }
    }
}

impl Module for ImporterModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn slot(&self) -> ModuleSlot {
        ModuleSlot::Importer
    }

    fn pre_update(&mut self, ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        self.last_imported.clear();
        let dropped = std::mem::take(&mut ctx.requests.dropped_files);
        for path in &dropped {
            if let Some(key) = self.import_file(&mut ctx.scene, path) {
                self.last_imported.push(key);
            }
        }
        UpdateStatus::Continue
    }
}

#[cfg(test)]
#[path = "importer_tests.rs"]
mod tests;
