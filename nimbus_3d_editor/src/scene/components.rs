/// Components attachable to a SceneObject.
///
/// The set is closed: Transform, Camera, Mesh and Material. Every object
/// carries exactly one Transform; the other kinds are optional and at most
/// one of each may be attached.

use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use crate::camera::CameraComponent;

bitflags! {
    /// Capability tags, one bit per component kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentMask: u32 {
        const TRANSFORM = 1 << 0;
        const CAMERA    = 1 << 1;
        const MESH      = 1 << 2;
        const MATERIAL  = 1 << 3;
    }
}

/// Component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Transform,
    Camera,
    Mesh,
    Material,
}

impl ComponentType {
    pub fn mask(&self) -> ComponentMask {
        match self {
            ComponentType::Transform => ComponentMask::TRANSFORM,
            ComponentType::Camera => ComponentMask::CAMERA,
            ComponentType::Mesh => ComponentMask::MESH,
            ComponentType::Material => ComponentMask::MATERIAL,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComponentType::Transform => "Transform",
            ComponentType::Camera => "Camera",
            ComponentType::Mesh => "Mesh",
            ComponentType::Material => "Material",
        }
    }
}

// ===== TRANSFORM =====

/// Local transform relative to the parent object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(rename = "Position")]
    pub position: Vec3,
    #[serde(rename = "Rotation")]
    pub rotation: Quat,
    #[serde(rename = "Scale")]
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    /// Decompose an affine matrix. Shear is lost.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self { position, rotation, scale }
    }

    /// Scale, then rotate, then translate.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Local +Z axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +Y axis.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Apply a rotation on top of the current one (world-space).
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = (rotation * self.rotation).normalize();
    }
}

// ===== MESH =====

fn default_render() -> bool {
    true
}

/// Renderable geometry reference.
///
/// The mesh data itself belongs to the draw collaborator; the component
/// only keeps what the core needs: a name, sizes for statistics and the
/// per-frame render-eligibility flag written by the culling pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshComponent {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Vertices", default)]
    pub vertex_count: u32,
    #[serde(rename = "Indices", default)]
    pub index_count: u32,
    #[serde(skip, default = "default_render")]
    render: bool,
}

impl MeshComponent {
    pub fn new(name: impl Into<String>, vertex_count: u32, index_count: u32) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            index_count,
            render: true,
        }
    }

    /// Render eligibility for the current frame.
    pub fn is_render_eligible(&self) -> bool {
        self.render
    }

    pub fn set_render_eligible(&mut self, render: bool) {
        self.render = render;
    }
}

// ===== MATERIAL =====

fn default_color() -> Vec4 {
    Vec4::ONE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialComponent {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Texture", default, skip_serializing_if = "Option::is_none")]
    pub texture_path: Option<String>,
    #[serde(rename = "Color", default = "default_color")]
    pub color: Vec4,
}

impl MaterialComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_path: None,
            color: Vec4::ONE,
        }
    }

    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.texture_path = Some(path.into());
        self
    }
}

// ===== COMPONENT =====

/// A component value of any kind.
#[derive(Debug, Clone)]
pub enum Component {
    Transform(Transform),
    Camera(CameraComponent),
    Mesh(MeshComponent),
    Material(MaterialComponent),
}

impl Component {
    pub fn component_type(&self) -> ComponentType {
        match self {
            Component::Transform(_) => ComponentType::Transform,
            Component::Camera(_) => ComponentType::Camera,
            Component::Mesh(_) => ComponentType::Mesh,
            Component::Material(_) => ComponentType::Material,
        }
    }
}

#[cfg(test)]
#[path = "components_tests.rs"]
mod tests;
