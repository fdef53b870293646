/// CameraComponent: a frustum attached to a scene object.
///
/// The component owns exactly one Frustum. Its pose is not stored by the
/// component itself: the owner refreshes it every frame from the object's
/// world transform, so the frustum never lags behind the hierarchy.
///
/// Width and height only seed the aspect ratio (and through it the
/// horizontal field of view).

use std::fmt;
use std::str::FromStr;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::engine_bail;
use super::frustum::Frustum;

const SOURCE: &str = "nimbus3d::Camera";

/// Which viewpoint a camera provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraRole {
    /// Editor viewpoint, never affected by the game time scale
    Scene,
    /// Gameplay viewpoint, active while a play session runs
    Game,
}

impl CameraRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraRole::Scene => "Scene",
            CameraRole::Game => "Game",
        }
    }
}

impl fmt::Display for CameraRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Scene" => Ok(CameraRole::Scene),
            "Game" => Ok(CameraRole::Game),
            other => engine_bail!(InvalidParameter, SOURCE, "Unknown camera role '{}'", other),
        }
    }
}

/// Persisted form of a camera component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    #[serde(rename = "Position")]
    pub position: Vec3,
    #[serde(rename = "Front")]
    pub front: Vec3,
    #[serde(rename = "Up")]
    pub up: Vec3,
    #[serde(rename = "Near Plane")]
    pub near_plane: f32,
    #[serde(rename = "Far Plane")]
    pub far_plane: f32,
    /// Radians
    #[serde(rename = "Vertical Fov", alias = "Vertical Pov")]
    pub vertical_fov: f32,
    #[serde(rename = "Culling", default = "default_culling")]
    pub culling: bool,
}

fn default_culling() -> bool {
    true
}

/// Camera component: a frustum, a culling switch and the viewport size
/// used to seed the aspect ratio.
#[derive(Debug, Clone)]
pub struct CameraComponent {
    frustum: Frustum,
    culling: bool,
    width: f32,
    height: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            frustum: Frustum::default(),
            culling: true,
            width: 16.0,
            height: 9.0,
        }
    }
}

impl CameraComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a component around an existing frustum.
    ///
    /// Width and height follow the frustum's aspect ratio.
    pub fn with_frustum(frustum: Frustum) -> Self {
        Self {
            width: frustum.aspect_ratio(),
            height: 1.0,
            frustum,
            culling: true,
        }
    }

    // ===== GETTERS =====

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Whether the culling pass classifies objects against this camera.
    pub fn culling_enabled(&self) -> bool {
        self.culling
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.frustum.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.frustum.projection_matrix()
    }

    /// View matrix as 16 column-major floats.
    pub fn view_matrix_cols(&self) -> [f32; 16] {
        self.frustum.view_matrix().to_cols_array()
    }

    /// Projection matrix as 16 column-major floats.
    pub fn projection_matrix_cols(&self) -> [f32; 16] {
        self.frustum.projection_matrix().to_cols_array()
    }

    // ===== SETTERS =====

    pub fn set_culling(&mut self, enabled: bool) {
        self.culling = enabled;
    }

    /// Recompute the frustum planes from the owner's world pose.
    pub fn refresh(&mut self, world_position: Vec3, world_forward: Vec3, world_up: Vec3) {
        self.frustum.refresh(world_position, world_forward, world_up);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.frustum.look_at(target);
    }

    pub fn set_near(&mut self, near_plane: f32) -> Result<()> {
        self.frustum.set_near(near_plane)
    }

    pub fn set_far(&mut self, far_plane: f32) -> Result<()> {
        self.frustum.set_far(far_plane)
    }

    /// Vertical field of view in degrees.
    pub fn set_field_of_view(&mut self, vertical_degrees: f32) -> Result<()> {
        self.frustum.set_field_of_view(vertical_degrees)
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<()> {
        self.frustum.set_aspect_ratio(aspect_ratio)?;
        self.width = aspect_ratio * self.height;
        Ok(())
    }

    /// Resize the viewport. The aspect ratio becomes `width / height`.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) -> Result<()> {
        if !(width > 0.0 && height > 0.0) {
            engine_bail!(InvalidParameter, SOURCE, "Viewport size must be positive, got {}x{}", width, height);
        }
        self.frustum.set_aspect_ratio(width / height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    // ===== PERSISTENCE =====

    pub fn save(&self) -> CameraRecord {
        CameraRecord {
            position: self.frustum.position(),
            front: self.frustum.front(),
            up: self.frustum.up(),
            near_plane: self.frustum.near_plane(),
            far_plane: self.frustum.far_plane(),
            vertical_fov: self.frustum.vertical_fov(),
            culling: self.culling,
        }
    }

    /// Rebuild the frustum from a record. Invalid records leave the
    /// component untouched.
    pub fn load(&mut self, record: &CameraRecord) -> Result<()> {
        self.frustum
            .restore(
                record.position,
                record.front,
                record.up,
                record.near_plane,
                record.far_plane,
                record.vertical_fov,
            )
            .map_err(|err| Error::SerializationError(format!("Invalid camera record: {}", err)))?;
        self.culling = record.culling;
        Ok(())
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
