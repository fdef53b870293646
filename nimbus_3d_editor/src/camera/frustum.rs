/// Frustum: perspective view volume and its six clipping planes.
///
/// The frustum is parameterized by a pose (position, front and up axes)
/// and a perspective description (near/far distances, vertical field of
/// view, aspect ratio). The horizontal field of view is always derived:
///
/// `horizontal_fov = 2 * atan(aspect_ratio * tan(vertical_fov / 2))`
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing unit normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// Planes are rebuilt on every pose or parameter change, never lazily.

use glam::{Mat4, Vec3, Vec4};
use crate::error::Result;
use crate::engine_bail;
use crate::scene::AABB;

/// Result of a 3-way frustum/AABB classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// Every corner of the box lies outside one single plane
    Outside,
    /// Every corner of the box lies inside all six planes
    Inside,
    /// Neither of the above (conservative: may include boxes that are
    /// outside the volume as a whole)
    Intersect,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Default near plane distance
pub const DEFAULT_NEAR_PLANE: f32 = 0.2;
/// Default far plane distance
pub const DEFAULT_FAR_PLANE: f32 = 1000.0;
/// Default vertical field of view, in degrees
pub const DEFAULT_VERTICAL_FOV_DEGREES: f32 = 60.0;
/// Default aspect ratio (16:9)
pub const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;

const SOURCE: &str = "nimbus3d::Frustum";

/// Horizontal field of view (radians) from a vertical one and an aspect ratio.
pub fn horizontal_fov_from(vertical_fov: f32, aspect_ratio: f32) -> f32 {
    2.0 * (aspect_ratio * (vertical_fov * 0.5).tan()).atan()
}

/// Perspective frustum.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    near_plane: f32,
    far_plane: f32,
    /// Radians
    vertical_fov: f32,
    /// Radians, derived from vertical_fov and aspect_ratio
    horizontal_fov: f32,
    aspect_ratio: f32,
    /// left, right, bottom, top, near, far
    planes: [Vec4; 6],
}

impl Default for Frustum {
    /// Origin, looking down +Z with +Y up, 60° vertical fov, 16:9, near 0.2, far 1000.
    fn default() -> Self {
        let vertical_fov = DEFAULT_VERTICAL_FOV_DEGREES.to_radians();
        let mut frustum = Self {
            position: Vec3::ZERO,
            front: Vec3::Z,
            up: Vec3::Y,
            near_plane: DEFAULT_NEAR_PLANE,
            far_plane: DEFAULT_FAR_PLANE,
            vertical_fov,
            horizontal_fov: horizontal_fov_from(vertical_fov, DEFAULT_ASPECT_RATIO),
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            planes: [Vec4::ZERO; 6],
        };
        frustum.rebuild_planes();
        frustum
    }
}

impl Frustum {
    /// Create a frustum at the origin from perspective parameters.
    ///
    /// Rejects `near <= 0`, `far <= near`, a vertical fov outside
    /// (0°, 180°) and non-positive aspect ratios.
    pub fn perspective(
        near_plane: f32,
        far_plane: f32,
        vertical_fov_degrees: f32,
        aspect_ratio: f32,
    ) -> Result<Self> {
        Self::validate_planes(near_plane, far_plane)?;
        Self::validate_fov_degrees(vertical_fov_degrees)?;
        Self::validate_aspect(aspect_ratio)?;

        let vertical_fov = vertical_fov_degrees.to_radians();
        let mut frustum = Self {
            near_plane,
            far_plane,
            vertical_fov,
            horizontal_fov: horizontal_fov_from(vertical_fov, aspect_ratio),
            aspect_ratio,
            ..Self::default()
        };
        frustum.rebuild_planes();
        Ok(frustum)
    }

    // ===== VALIDATION =====

    fn validate_planes(near_plane: f32, far_plane: f32) -> Result<()> {
        if !near_plane.is_finite() || !far_plane.is_finite() {
            engine_bail!(InvalidParameter, SOURCE, "Plane distances must be finite (near {}, far {})", near_plane, far_plane);
        }
        if near_plane <= 0.0 {
            engine_bail!(InvalidParameter, SOURCE, "Near plane must be positive, got {}", near_plane);
        }
        if far_plane <= near_plane {
            engine_bail!(InvalidParameter, SOURCE, "Far plane ({}) must be beyond near plane ({})", far_plane, near_plane);
        }
        Ok(())
    }

    fn validate_fov_degrees(degrees: f32) -> Result<()> {
        if !(degrees > 0.0 && degrees < 180.0) {
            engine_bail!(InvalidParameter, SOURCE, "Vertical fov must be in (0, 180) degrees, got {}", degrees);
        }
        Ok(())
    }

    fn validate_aspect(aspect_ratio: f32) -> Result<()> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            engine_bail!(InvalidParameter, SOURCE, "Aspect ratio must be positive, got {}", aspect_ratio);
        }
        Ok(())
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit viewing direction.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit up axis, orthogonal to `front`.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit right axis (`front × up`).
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up)
    }

    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    /// Vertical field of view in radians.
    pub fn vertical_fov(&self) -> f32 {
        self.vertical_fov
    }

    /// Vertical field of view in degrees.
    pub fn vertical_fov_degrees(&self) -> f32 {
        self.vertical_fov.to_degrees()
    }

    /// Horizontal field of view in radians.
    pub fn horizontal_fov(&self) -> f32 {
        self.horizontal_fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Clipping planes: left, right, bottom, top, near, far.
    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// Point midway between the near and far planes on the view axis.
    pub fn center_point(&self) -> Vec3 {
        self.position + self.front * ((self.near_plane + self.far_plane) * 0.5)
    }

    // ===== SETTERS =====

    /// Recompute the pose from the owning object's world transform.
    ///
    /// `forward` and `up` are normalized and `up` is re-orthogonalized
    /// against `forward`. Degenerate axes keep the previous orientation.
    pub fn refresh(&mut self, world_position: Vec3, world_forward: Vec3, world_up: Vec3) {
        self.position = world_position;

        if let Some(front) = world_forward.try_normalize() {
            let up = (world_up - front * world_up.dot(front)).try_normalize();
            if let Some(up) = up {
                self.front = front;
                self.up = up;
            }
        }

        self.rebuild_planes();
    }

    /// Move the frustum without changing its orientation.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.rebuild_planes();
    }

    /// Re-aim the frustum at a world point, keeping the world +Y axis as up
    /// reference (falls back to the current axes when looking straight up/down).
    pub fn look_at(&mut self, target: Vec3) {
        let Some(direction) = (target - self.position).try_normalize() else {
            return;
        };
        let Some(right) = [Vec3::Y, self.up, self.front]
            .iter()
            .find_map(|axis| direction.cross(*axis).try_normalize())
        else {
            return;
        };
        let up = right.cross(direction);
        self.refresh(self.position, direction, up);
    }

    pub fn set_near(&mut self, near_plane: f32) -> Result<()> {
        Self::validate_planes(near_plane, self.far_plane)?;
        self.near_plane = near_plane;
        self.rebuild_planes();
        Ok(())
    }

    pub fn set_far(&mut self, far_plane: f32) -> Result<()> {
        Self::validate_planes(self.near_plane, far_plane)?;
        self.far_plane = far_plane;
        self.rebuild_planes();
        Ok(())
    }

    /// Set the vertical field of view in degrees. Re-derives the horizontal fov.
    pub fn set_field_of_view(&mut self, vertical_degrees: f32) -> Result<()> {
        Self::validate_fov_degrees(vertical_degrees)?;
        self.vertical_fov = vertical_degrees.to_radians();
        self.horizontal_fov = horizontal_fov_from(self.vertical_fov, self.aspect_ratio);
        self.rebuild_planes();
        Ok(())
    }

    /// Set the aspect ratio (width / height). Re-derives the horizontal fov.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<()> {
        Self::validate_aspect(aspect_ratio)?;
        self.aspect_ratio = aspect_ratio;
        self.horizontal_fov = horizontal_fov_from(self.vertical_fov, aspect_ratio);
        self.rebuild_planes();
        Ok(())
    }

    /// Restore pose and parameters from persisted values, validating first.
    pub(crate) fn restore(
        &mut self,
        position: Vec3,
        front: Vec3,
        up: Vec3,
        near_plane: f32,
        far_plane: f32,
        vertical_fov: f32,
    ) -> Result<()> {
        Self::validate_planes(near_plane, far_plane)?;
        Self::validate_fov_degrees(vertical_fov.to_degrees())?;
        let Some(front_axis) = front.try_normalize() else {
            engine_bail!(InvalidParameter, SOURCE, "Front axis must be non-zero");
        };
        if (up - front_axis * up.dot(front_axis)).try_normalize().is_none() {
            engine_bail!(InvalidParameter, SOURCE, "Up axis must be non-zero and not parallel to front");
        }

        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self.vertical_fov = vertical_fov;
        self.horizontal_fov = horizontal_fov_from(vertical_fov, self.aspect_ratio);
        self.refresh(position, front, up);
        Ok(())
    }

    // ===== MATRICES =====

    /// View matrix: right-handed, looking along `front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front, self.up)
    }

    /// OpenGL-style perspective projection (clip z in [-w, w]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.vertical_fov, self.aspect_ratio, self.near_plane, self.far_plane)
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ===== PLANES =====

    /// Rebuild the six planes from pose and perspective parameters.
    fn rebuild_planes(&mut self) {
        let front = self.front;
        let up = self.up;
        let right = self.right();
        let (sin_h, cos_h) = (self.horizontal_fov * 0.5).sin_cos();
        let (sin_v, cos_v) = (self.vertical_fov * 0.5).sin_cos();

        let through = |normal: Vec3, point: Vec3| normal.extend(-normal.dot(point));

        self.planes[PLANE_LEFT] = through(front * sin_h + right * cos_h, self.position);
        self.planes[PLANE_RIGHT] = through(front * sin_h - right * cos_h, self.position);
        self.planes[PLANE_BOTTOM] = through(front * sin_v + up * cos_v, self.position);
        self.planes[PLANE_TOP] = through(front * sin_v - up * cos_v, self.position);
        self.planes[PLANE_NEAR] = through(front, self.position + front * self.near_plane);
        self.planes[PLANE_FAR] = through(-front, self.position + front * self.far_plane);
    }

    /// Signed distance of a point to plane `index` (positive = inside).
    pub fn signed_distance(&self, index: usize, point: Vec3) -> f32 {
        self.planes[index].dot(point.extend(1.0))
    }

    /// True if the point lies inside (or on) all six planes.
    pub fn contains_point(&self, point: Vec3) -> bool {
        (0..6).all(|i| self.signed_distance(i, point) >= 0.0)
    }

    /// Classify an AABB against the frustum.
    ///
    /// For each plane all 8 corners are tested. If every corner is outside
    /// one plane the result is `Outside` (remaining planes are skipped).
    /// If all 8 corners are inside every plane the result is `Inside`,
    /// otherwise `Intersect`.
    pub fn contains_box(&self, aabb: &AABB) -> FrustumTest {
        let corners = aabb.corners();
        let mut planes_fully_in = 0;

        for plane_index in 0..6 {
            let outside = corners
                .iter()
                .filter(|corner| self.signed_distance(plane_index, **corner) < 0.0)
                .count();

            if outside == corners.len() {
                return FrustumTest::Outside;
            }
            if outside == 0 {
                planes_fully_in += 1;
            }
        }

        if planes_fully_in == 6 {
            FrustumTest::Inside
        } else {
            FrustumTest::Intersect
        }
    }

    // ===== DEBUG GEOMETRY =====

    /// The 8 corners of the view volume.
    ///
    /// Index bits: bit 0 = right side, bit 1 = top side, bit 2 = far plane.
    pub fn corner_points(&self) -> [Vec3; 8] {
        let right = self.right();
        let tan_h = (self.horizontal_fov * 0.5).tan();
        let tan_v = (self.vertical_fov * 0.5).tan();

        std::array::from_fn(|i| {
            let distance = if i & 4 != 0 { self.far_plane } else { self.near_plane };
            let x = if i & 1 != 0 { 1.0 } else { -1.0 };
            let y = if i & 2 != 0 { 1.0 } else { -1.0 };
            self.position
                + self.front * distance
                + right * (x * distance * tan_h)
                + self.up * (y * distance * tan_v)
        })
    }

    /// The 12 edges of the view volume as line segments.
    pub fn edges(&self) -> [[Vec3; 2]; 12] {
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (2, 3), (4, 5), (6, 7),
            (0, 2), (1, 3), (4, 6), (5, 7),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        let corners = self.corner_points();
        EDGES.map(|(a, b)| [corners[a], corners[b]])
    }
}

/// Extract normalized frustum planes from a view-projection matrix.
///
/// Uses the Gribb & Hartmann method for OpenGL-style clip space. The
/// result uses the same plane order and inward convention as `Frustum`.
pub fn planes_from_view_projection(vp: &Mat4) -> [Vec4; 6] {
    let m = vp.to_cols_array_2d();

    let mut planes = [
        // Left:   row3 + row0
        Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
        // Right:  row3 - row0
        Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
        // Bottom: row3 + row1
        Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
        // Top:    row3 - row1
        Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
        // Near:   row3 + row2
        Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
        // Far:    row3 - row2
        Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
    ];

    for plane in &mut planes {
        let normal_len = plane.truncate().length();
        if normal_len > 0.0 {
            *plane /= normal_len;
        }
    }

    planes
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
