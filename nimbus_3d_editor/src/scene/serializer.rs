/// Scene documents: save and load of the object graph.
///
/// A document lists every object (parents before children) with its uid,
/// its parent's uid and one record per component, tagged by `"Type"`.
/// Loading builds a fresh graph and only swaps it in once the whole
/// document has been validated, so a bad document never leaves the live
/// scene half-loaded.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::camera::{CameraComponent, CameraRecord};
use crate::error::{Error, Result};
use crate::{engine_bail, engine_err, engine_info};
use super::bounds::AABB;
use super::components::{Component, MaterialComponent, MeshComponent, Transform};
use super::scene::Scene;

const SOURCE: &str = "nimbus3d::SceneSerializer";

/// One component, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum ComponentRecord {
    Transform(Transform),
    Camera(CameraRecord),
    Mesh(MeshComponent),
    Material(MaterialComponent),
}

/// One scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "UID")]
    pub uid: u64,
    #[serde(rename = "ParentUID", default, skip_serializing_if = "Option::is_none")]
    pub parent_uid: Option<u64>,
    #[serde(rename = "Active", default = "default_active")]
    pub active: bool,
    #[serde(rename = "BoundingBox", default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<AABB>,
    #[serde(rename = "Components", default)]
    pub components: Vec<ComponentRecord>,
}

fn default_active() -> bool {
    true
}

/// A whole scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(rename = "GameObjects")]
    pub objects: Vec<ObjectRecord>,
}

impl SceneDocument {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| engine_err!(SerializationError, SOURCE, "Malformed scene document: {}", err))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| engine_err!(SerializationError, SOURCE, "Cannot encode scene document: {}", err))
    }
}

// ===== SAVE / LOAD =====

/// Snapshot the scene into a document.
pub fn save_scene(scene: &Scene) -> SceneDocument {
    let objects = scene
        .depth_first()
        .filter_map(|key| {
            let object = scene.get(key)?;
            let parent_uid = object
                .parent()
                .and_then(|parent| scene.get(parent))
                .map(|parent| parent.uid());

            let mut components = vec![ComponentRecord::Transform(*object.transform())];
            if let Some(camera) = object.camera() {
                components.push(ComponentRecord::Camera(camera.save()));
            }
            if let Some(mesh) = object.mesh() {
                components.push(ComponentRecord::Mesh(mesh.clone()));
            }
            if let Some(material) = object.material() {
                components.push(ComponentRecord::Material(material.clone()));
            }

            Some(ObjectRecord {
                name: object.name().to_string(),
                uid: object.uid(),
                parent_uid,
                active: object.is_active(),
                bounding_box: object.bounding_box().copied(),
                components,
            })
        })
        .collect();

    SceneDocument { objects }
}

/// Replace the scene's content with the document's.
///
/// On error the scene is left exactly as it was.
pub fn load_scene(scene: &mut Scene, document: &SceneDocument) -> Result<()> {
    let rebuilt = build_scene(document).map_err(|err| match err {
        Error::SerializationError(_) => err,
        other => Error::SerializationError(other.to_string()),
    })?;

    *scene = rebuilt;
    engine_info!(SOURCE, "Loaded {} object(s)", scene.len());
    Ok(())
}

fn build_scene(document: &SceneDocument) -> Result<Scene> {
    let mut scene = Scene::new();

    // Objects first, hierarchy second: parents may appear after children.
    for record in &document.objects {
        let key = scene.create_object_with_uid(&record.name, None, record.uid)?;
        let Some(object) = scene.get_mut(key) else {
            engine_bail!(SerializationError, SOURCE, "Object '{}' vanished while loading", record.name);
        };
        object.set_active(record.active);
        object.set_bounding_box(record.bounding_box);

        for component in &record.components {
            match component {
                ComponentRecord::Transform(transform) => *object.transform_mut() = *transform,
                ComponentRecord::Camera(camera_record) => {
                    let mut camera = CameraComponent::new();
                    camera.load(camera_record)?;
                    object.add_component(Component::Camera(camera))?;
                }
                ComponentRecord::Mesh(mesh) => {
                    object.add_component(Component::Mesh(mesh.clone()))?;
                }
                ComponentRecord::Material(material) => {
                    object.add_component(Component::Material(material.clone()))?;
                }
            }
        }
    }

    for record in &document.objects {
        let Some(parent_uid) = record.parent_uid else {
            continue;
        };
        let (Some(key), Some(parent)) = (scene.find_by_uid(record.uid), scene.find_by_uid(parent_uid)) else {
            engine_bail!(SerializationError, SOURCE,
                "Object '{}' references unknown parent uid {}", record.name, parent_uid);
        };
        scene.set_parent(key, Some(parent))?;
    }

    Ok(scene)
}

// ===== STORES =====

/// Where scene documents are persisted.
pub trait SceneStore {
    fn save(&mut self, document: &SceneDocument) -> Result<()>;
    fn load(&mut self) -> Result<SceneDocument>;
}

/// JSON file on disk.
pub struct FileSceneStore {
    path: PathBuf,
}

impl FileSceneStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SceneStore for FileSceneStore {
    fn save(&mut self, document: &SceneDocument) -> Result<()> {
        let text = document.to_json_string()?;
        fs::write(&self.path, text)
            .map_err(|err| engine_err!(Io, SOURCE, "Cannot write '{}': {}", self.path.display(), err))?;
        engine_info!(SOURCE, "Saved {} object(s) to '{}'", document.objects.len(), self.path.display());
        Ok(())
    }

    fn load(&mut self) -> Result<SceneDocument> {
        let text = fs::read_to_string(&self.path)
            .map_err(|err| engine_err!(Io, SOURCE, "Cannot read '{}': {}", self.path.display(), err))?;
        SceneDocument::from_json_str(&text)
    }
}

/// In-memory JSON slot; used for play-session snapshots and tests.
#[derive(Debug, Default)]
pub struct MemorySceneStore {
    text: Option<String>,
}

impl MemorySceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved document, encoded.
    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl SceneStore for MemorySceneStore {
    fn save(&mut self, document: &SceneDocument) -> Result<()> {
        self.text = Some(document.to_json_string()?);
        Ok(())
    }

    fn load(&mut self) -> Result<SceneDocument> {
        match &self.text {
            Some(text) => SceneDocument::from_json_str(text),
            None => engine_bail!(SerializationError, SOURCE, "No scene has been saved yet"),
        }
    }
}

#[cfg(test)]
#[path = "serializer_tests.rs"]
mod tests;
