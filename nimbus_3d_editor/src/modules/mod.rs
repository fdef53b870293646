//! Built-in pipeline modules
//!
//! The editor camera, scene camera refresh, asset import and the
//! renderer front end. Platform modules (window, input, audio...) are
//! supplied by the host application.

mod camera_module;
mod importer;
mod renderer_module;
mod scene_module;

pub use camera_module::{CameraModule, CameraModuleSettings, DEFAULT_CAMERA_SPEED};
pub use importer::{
    AssetLoader, FileKind, ImportStats, ImportedMesh, ImportedNode, ImporterModule, NoModelLoader,
    append_model,
};
pub use renderer_module::{DrawPass, NoOpDrawPass, RendererModule, RendererSettings};
pub use scene_module::{
    SceneModule, SceneModuleSettings, MAIN_CAMERA_NAME, refresh_scene_cameras, spawn_camera_object,
};
