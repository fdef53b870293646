/// RenderView: what the draw pass consumes each frame.
///
/// Built by the renderer module after the culling pass. Contains a
/// snapshot of the active camera's matrices, the keys of render-eligible
/// objects and the outline of every other camera for debug drawing.
///
/// Ephemeral: lives for one frame.

use glam::{Mat4, Vec3};
use crate::scene::{AABB, CullStats, ObjectKey};
use super::camera::{CameraComponent, CameraRole};
use super::frustum::Frustum;

#[derive(Debug, Clone)]
pub struct RenderView {
    role: CameraRole,
    camera_position: Vec3,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    visible_objects: Vec<ObjectKey>,
    debug_lines: Vec<[Vec3; 2]>,
    stats: CullStats,
}

impl RenderView {
    /// Snapshot the camera (crate-internal: only the renderer module creates these).
    pub(crate) fn new(
        role: CameraRole,
        camera: &CameraComponent,
        visible_objects: Vec<ObjectKey>,
        stats: CullStats,
    ) -> Self {
        Self {
            role,
            camera_position: camera.frustum().position(),
            view_matrix: camera.view_matrix(),
            projection_matrix: camera.projection_matrix(),
            visible_objects,
            debug_lines: Vec::new(),
            stats,
        }
    }

    /// Append the 12 edges of a frustum to the debug lines.
    pub(crate) fn add_debug_frustum(&mut self, frustum: &Frustum) {
        self.debug_lines.extend(frustum.edges());
    }

    /// Append the 12 edges of a world-space box to the debug lines.
    pub(crate) fn add_debug_box(&mut self, aabb: &AABB) {
        let corners = aabb.corners();
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    self.debug_lines.push([corners[i], corners[i | bit]]);
                }
            }
        }
    }

    // ===== CAMERA SNAPSHOT =====

    pub fn role(&self) -> CameraRole {
        self.role
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// View matrix as 16 column-major floats (GL uniform layout).
    pub fn view_matrix_cols(&self) -> [f32; 16] {
        self.view_matrix.to_cols_array()
    }

    /// Projection matrix as 16 column-major floats (GL uniform layout).
    pub fn projection_matrix_cols(&self) -> [f32; 16] {
        self.projection_matrix.to_cols_array()
    }

    /// Raw bytes of the view matrix, ready for a uniform upload.
    pub fn view_matrix_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.view_matrix)
    }

    /// Raw bytes of the projection matrix, ready for a uniform upload.
    pub fn projection_matrix_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.projection_matrix)
    }

    // ===== VISIBILITY =====

    /// Keys of render-eligible objects, depth-first.
    pub fn visible_objects(&self) -> &[ObjectKey] {
        &self.visible_objects
    }

    pub fn visible_count(&self) -> usize {
        self.visible_objects.len()
    }

    /// Line segments outlining the non-active cameras.
    pub fn debug_lines(&self) -> &[[Vec3; 2]] {
        &self.debug_lines
    }

    pub fn stats(&self) -> &CullStats {
        &self.stats
    }
}

#[cfg(test)]
#[path = "render_view_tests.rs"]
mod tests;
