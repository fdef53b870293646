/// SceneObject: a node of the object graph.
///
/// An object owns its list of child keys; the parent link is a plain key
/// resolved through the Scene. Components are stored by kind: the
/// Transform is always present, the others are optional.

use crate::camera::CameraComponent;
use crate::error::Result;
use crate::engine_bail;
use super::bounds::AABB;
use super::components::{
    Component, ComponentMask, ComponentType,
    MaterialComponent, MeshComponent, Transform,
};
use super::scene::ObjectKey;

const SOURCE: &str = "nimbus3d::SceneObject";

#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    uid: u64,
    parent: Option<ObjectKey>,
    children: Vec<ObjectKey>,
    active: bool,
    /// Local-space bounds, `None` for non-renderable objects
    bounding_box: Option<AABB>,
    transform: Transform,
    camera: Option<CameraComponent>,
    mesh: Option<MeshComponent>,
    material: Option<MaterialComponent>,
}

impl SceneObject {
    pub(crate) fn new(name: String, uid: u64, parent: Option<ObjectKey>) -> Self {
        Self {
            name,
            uid,
            parent,
            children: Vec::new(),
            active: true,
            bounding_box: None,
            transform: Transform::default(),
            camera: None,
            mesh: None,
            material: None,
        }
    }

    // ===== IDENTITY / HIERARCHY =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Unique id, stable across save/load.
    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn parent(&self) -> Option<ObjectKey> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectKey] {
        &self.children
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<ObjectKey>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: ObjectKey) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: ObjectKey) {
        self.children.retain(|key| *key != child);
    }

    // ===== STATE =====

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn bounding_box(&self) -> Option<&AABB> {
        self.bounding_box.as_ref()
    }

    pub fn set_bounding_box(&mut self, bounding_box: Option<AABB>) {
        self.bounding_box = bounding_box;
    }

    // ===== COMPONENTS =====

    /// Capability mask of the attached components.
    pub fn capabilities(&self) -> ComponentMask {
        let mut mask = ComponentMask::TRANSFORM;
        mask.set(ComponentMask::CAMERA, self.camera.is_some());
        mask.set(ComponentMask::MESH, self.mesh.is_some());
        mask.set(ComponentMask::MATERIAL, self.material.is_some());
        mask
    }

    pub fn has(&self, component_type: ComponentType) -> bool {
        self.capabilities().contains(component_type.mask())
    }

    /// Attach a component. Fails if one of the same kind is already present.
    pub fn add_component(&mut self, component: Component) -> Result<()> {
        let component_type = component.component_type();
        if self.has(component_type) {
            engine_bail!(InvalidObject, SOURCE,
                "Object '{}' already has a {} component", self.name, component_type.name());
        }

        match component {
            Component::Transform(transform) => self.transform = transform,
            Component::Camera(camera) => self.camera = Some(camera),
            Component::Mesh(mesh) => self.mesh = Some(mesh),
            Component::Material(material) => self.material = Some(material),
        }
        Ok(())
    }

    /// Detach a component and return it. The Transform cannot be removed.
    pub fn remove_component(&mut self, component_type: ComponentType) -> Result<Component> {
        let removed = match component_type {
            ComponentType::Transform => {
                engine_bail!(InvalidObject, SOURCE,
                    "Transform of object '{}' cannot be removed", self.name);
            }
            ComponentType::Camera => self.camera.take().map(Component::Camera),
            ComponentType::Mesh => self.mesh.take().map(Component::Mesh),
            ComponentType::Material => self.material.take().map(Component::Material),
        };

        match removed {
            Some(component) => Ok(component),
            None => engine_bail!(InvalidObject, SOURCE,
                "Object '{}' has no {} component", self.name, component_type.name()),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn camera(&self) -> Option<&CameraComponent> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut CameraComponent> {
        self.camera.as_mut()
    }

    pub fn mesh(&self) -> Option<&MeshComponent> {
        self.mesh.as_ref()
    }

    pub fn mesh_mut(&mut self) -> Option<&mut MeshComponent> {
        self.mesh.as_mut()
    }

    pub fn material(&self) -> Option<&MaterialComponent> {
        self.material.as_ref()
    }

    pub fn material_mut(&mut self) -> Option<&mut MaterialComponent> {
        self.material.as_mut()
    }

    /// Active, carries a mesh, and the last culling pass kept it.
    pub fn is_render_eligible(&self) -> bool {
        self.active && self.mesh.as_ref().is_some_and(|mesh| mesh.is_render_eligible())
    }
}
