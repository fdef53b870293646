//! Camera module: frustum, camera component and render view.
//!
//! The frustum owns the view volume and its containment test. The camera
//! component wraps one frustum for attachment to a scene object (or to
//! the editor viewpoint). The render view is the per-frame snapshot
//! handed to the draw pass.

mod camera;
mod frustum;
mod render_view;

pub use camera::{CameraComponent, CameraRecord, CameraRole};
pub use frustum::{
    Frustum, FrustumTest, horizontal_fov_from, planes_from_view_projection,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
    DEFAULT_NEAR_PLANE, DEFAULT_FAR_PLANE, DEFAULT_VERTICAL_FOV_DEGREES, DEFAULT_ASPECT_RATIO,
};
pub use render_view::RenderView;
