/// CameraModule: drives the editor camera.
///
/// The editor camera is time-scale exempt: it receives the real delta in
/// every engine state so the viewport stays navigable while the game is
/// paused or stopped.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::camera::CameraRecord;
use crate::error::Result;
use crate::pipeline::{CameraInput, EngineContext, Module, ModuleSlot, UpdateStatus};
use crate::{engine_bail, engine_debug, engine_info, engine_warn};

const SOURCE: &str = "nimbus3d::CameraModule";

/// Default fly speed, in world units per second.
pub const DEFAULT_CAMERA_SPEED: f32 = 5.0;

/// Persisted section of the camera module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraModuleSettings {
    #[serde(rename = "Speed", default = "default_speed")]
    pub speed: f32,
    #[serde(rename = "Editor Camera", default, skip_serializing_if = "Option::is_none")]
    pub editor_camera: Option<CameraRecord>,
}

fn default_speed() -> f32 {
    DEFAULT_CAMERA_SPEED
}

impl Default for CameraModuleSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_CAMERA_SPEED,
            editor_camera: None,
        }
    }
}

pub struct CameraModule {
    speed: f32,
    /// Editor camera as of the last update, written back by `save_config`
    saved_camera: Option<CameraRecord>,
}

impl Default for CameraModule {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraModule {
    pub const NAME: &'static str = "Camera";

    pub fn new() -> Self {
        Self {
            speed: DEFAULT_CAMERA_SPEED,
            saved_camera: None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        if !(speed.is_finite() && speed >= 0.0) {
            engine_bail!(InvalidParameter, SOURCE, "Camera speed must be >= 0, got {}", speed);
        }
        self.speed = speed;
        Ok(())
    }

    /// Apply one frame of fly input to the editor camera.
    fn apply_input(&self, ctx: &mut EngineContext, input: &CameraInput, dt: f32) {
        let focus_target = input
            .focus
            .and_then(|key| ctx.scene.world_bounds(key).map(|b| b.center())
                .or_else(|| ctx.scene.world_matrix(key).map(|m| m.w_axis.truncate())));

        let camera = ctx.cameras.editor_mut();
        let frustum = camera.frustum();
        let (right, up, front) = (frustum.right(), frustum.up(), frustum.front());

        let offset = (right * input.movement.x + up * input.movement.y + front * input.movement.z)
            * self.speed
            * dt;
        let position = frustum.position() + offset;

        let rotation = Quat::from_axis_angle(Vec3::Y, input.yaw) * Quat::from_axis_angle(right, input.pitch);
        camera.refresh(position, rotation * front, rotation * up);

        if let Some(target) = focus_target {
            camera.look_at(target);
            engine_debug!(SOURCE, "Focused editor camera on {:?}", target);
        }
    }
}

impl Module for CameraModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn slot(&self) -> ModuleSlot {
        ModuleSlot::Camera
    }

    fn time_scale_exempt(&self) -> bool {
        true
    }

    fn init(&mut self, ctx: &mut EngineContext, config: Option<&Value>) -> Result<()> {
        let settings = match config {
            Some(section) => match CameraModuleSettings::deserialize(section) {
                Ok(settings) => settings,
                Err(err) => {
                    engine_warn!(SOURCE, "Ignoring malformed camera section: {}", err);
                    CameraModuleSettings::default()
                }
            },
            None => CameraModuleSettings::default(),
        };

        if self.set_speed(settings.speed).is_err() {
            engine_warn!(SOURCE, "Falling back to the default camera speed");
        }
        if let Some(record) = &settings.editor_camera {
            if let Err(err) = ctx.cameras.editor_mut().load(record) {
                engine_warn!(SOURCE, "Keeping the default editor camera: {}", err);
            }
        }
        engine_info!(SOURCE, "Editor camera ready (speed {})", self.speed);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, dt: f32) -> UpdateStatus {
        let input = std::mem::take(&mut ctx.input);
        self.apply_input(ctx, &input, dt);
        self.saved_camera = Some(ctx.cameras.editor().save());
        UpdateStatus::Continue
    }

    fn save_config(&self) -> Option<Value> {
        let settings = CameraModuleSettings {
            speed: self.speed,
            editor_camera: self.saved_camera.clone(),
        };
        serde_json::to_value(settings).ok()
    }
}

#[cfg(test)]
#[path = "camera_module_tests.rs"]
mod tests;
