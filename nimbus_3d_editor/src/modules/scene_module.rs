/// SceneModule: keeps scene cameras attached to their objects.
///
/// Every frame the camera component of each scene object is refreshed
/// from the object's world transform: position from the translation,
/// front from the +Z axis and up from the +Y axis.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::camera::CameraComponent;
use crate::error::Result;
use crate::pipeline::{EngineContext, Module, ModuleSlot, UpdateStatus};
use crate::scene::{Component, ComponentMask, ObjectKey, Scene, Transform};
use crate::{engine_info, engine_trace, engine_warn};

const SOURCE: &str = "nimbus3d::SceneModule";

/// Name of the camera object created for empty scenes.
pub const MAIN_CAMERA_NAME: &str = "Main Camera";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneModuleSettings {
    /// Create a game camera at start when the scene has none
    #[serde(rename = "Main Camera", default = "default_main_camera")]
    pub main_camera: bool,
    #[serde(rename = "Main Camera Position", default = "default_main_camera_position")]
    pub main_camera_position: Vec3,
}

fn default_main_camera() -> bool {
    true
}

fn default_main_camera_position() -> Vec3 {
    Vec3::new(0.0, 2.0, -10.0)
}

impl Default for SceneModuleSettings {
    fn default() -> Self {
        Self {
            main_camera: default_main_camera(),
            main_camera_position: default_main_camera_position(),
        }
    }
}

#[derive(Default)]
pub struct SceneModule {
    settings: SceneModuleSettings,
}

impl SceneModule {
    pub const NAME: &'static str = "Scene";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SceneModuleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SceneModuleSettings {
        &self.settings
    }
}

/// Create a camera object at `position` looking down +Z.
pub fn spawn_camera_object(scene: &mut Scene, name: &str, position: Vec3) -> Result<ObjectKey> {
    let key = scene.create_object(name, None)?;
    if let Some(object) = scene.get_mut(key) {
        *object.transform_mut() = Transform::from_position(position);
        let mut camera = CameraComponent::new();
        camera.refresh(position, Vec3::Z, Vec3::Y);
        object.add_component(Component::Camera(camera))?;
    }
    Ok(key)
}

/// Refresh every camera component from its object's world transform.
///
/// Returns the number of cameras refreshed.
pub fn refresh_scene_cameras(scene: &mut Scene) -> usize {
    let poses: Vec<(ObjectKey, Mat4)> = scene
        .objects_with(ComponentMask::CAMERA)
        .into_iter()
        .filter_map(|key| scene.world_matrix(key).map(|world| (key, world)))
        .collect();

    for (key, world) in &poses {
        if let Some(camera) = scene.get_mut(*key).and_then(|object| object.camera_mut()) {
            camera.refresh(
                world.w_axis.truncate(),
                world.transform_vector3(Vec3::Z),
                world.transform_vector3(Vec3::Y),
            );
        }
    }
    poses.len()
}

impl Module for SceneModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn slot(&self) -> ModuleSlot {
        ModuleSlot::Scene
    }

    fn init(&mut self, _ctx: &mut EngineContext, config: Option<&Value>) -> Result<()> {
        if let Some(section) = config {
            match SceneModuleSettings::deserialize(section) {
                Ok(settings) => self.settings = settings,
                Err(err) => engine_warn!(SOURCE, "Ignoring malformed scene section: {}", err),
            }
        }
        Ok(())
    }

    fn start(&mut self, ctx: &mut EngineContext) -> Result<()> {
        if ctx.cameras.resolve_game_camera(&ctx.scene).is_some() {
            return Ok(());
        }

        if let Some(existing) = ctx.scene.objects_with(ComponentMask::CAMERA).first().copied() {
            ctx.cameras.set_game_camera(Some(existing));
        } else if self.settings.main_camera {
            let key = spawn_camera_object(&mut ctx.scene, MAIN_CAMERA_NAME, self.settings.main_camera_position)?;
            ctx.cameras.set_game_camera(Some(key));
            engine_info!(SOURCE, "Created '{}' as game camera", MAIN_CAMERA_NAME);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        let refreshed = refresh_scene_cameras(&mut ctx.scene);
        engine_trace!(SOURCE, "Refreshed {} scene camera(s)", refreshed);
        UpdateStatus::Continue
    }

    fn save_config(&self) -> Option<Value> {
        serde_json::to_value(&self.settings).ok()
    }
}

#[cfg(test)]
#[path = "scene_module_tests.rs"]
mod tests;
