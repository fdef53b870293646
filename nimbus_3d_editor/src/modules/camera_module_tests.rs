use std::f32::consts::FRAC_PI_2;
use glam::Vec3;
use serde_json::json;
use crate::pipeline::{EngineContext, Module, UpdateStatus};
use crate::scene::AABB;
use super::*;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_init_reads_speed_and_camera() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();
    let section = json!({
        "Speed": 12.0,
        "Editor Camera": {
            "Position": [1.0, 2.0, 3.0],
            "Front": [1.0, 0.0, 0.0],
            "Up": [0.0, 1.0, 0.0],
            "Near Plane": 0.5,
            "Far Plane": 200.0,
            "Vertical Fov": 1.0
        }
    });

    module.init(&mut ctx, Some(&section)).unwrap();

    assert_eq!(module.speed(), 12.0);
    let frustum = ctx.cameras.editor().frustum();
    assert!(approx_vec(frustum.position(), Vec3::new(1.0, 2.0, 3.0)));
    assert!(approx_vec(frustum.front(), Vec3::X));
    assert_eq!(frustum.far_plane(), 200.0);
}

#[test]
fn test_init_falls_back_on_bad_values() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();

    module.init(&mut ctx, Some(&json!({ "Speed": -3.0 }))).unwrap();
    assert_eq!(module.speed(), DEFAULT_CAMERA_SPEED);

    module.init(&mut ctx, Some(&json!({ "Speed": "fast" }))).unwrap();
    assert_eq!(module.speed(), DEFAULT_CAMERA_SPEED);

    module.init(&mut ctx, None).unwrap();
    assert_eq!(module.speed(), DEFAULT_CAMERA_SPEED);
}

#[test]
fn test_save_config_round_trips_editor_camera() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();
    module.set_speed(2.0).unwrap();
    ctx.cameras.editor_mut().refresh(Vec3::new(0.0, 5.0, 0.0), Vec3::Z, Vec3::Y);
    module.update(&mut ctx, 0.0);

    let section = module.save_config().unwrap();
    let mut restored_ctx = EngineContext::new();
    let mut restored = CameraModule::new();
    restored.init(&mut restored_ctx, Some(&section)).unwrap();

    assert_eq!(restored.speed(), 2.0);
    assert!(approx_vec(restored_ctx.cameras.editor().frustum().position(), Vec3::new(0.0, 5.0, 0.0)));
}

#[test]
fn test_set_speed_rejects_negative() {
    let mut module = CameraModule::new();
    assert!(module.set_speed(-1.0).is_err());
    assert!(module.set_speed(f32::NAN).is_err());
    assert_eq!(module.speed(), DEFAULT_CAMERA_SPEED);
}

// ============================================================================
// MOVEMENT
// ============================================================================

#[test]
fn test_camera_module_is_time_scale_exempt() {
    assert!(CameraModule::new().time_scale_exempt());
}

#[test]
fn test_forward_movement_scaled_by_speed_and_dt() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();
    module.set_speed(4.0).unwrap();
    ctx.input.movement = Vec3::Z;

    let status = module.update(&mut ctx, 0.5);

    assert_eq!(status, UpdateStatus::Continue);
    assert!(approx_vec(ctx.cameras.editor().frustum().position(), Vec3::new(0.0, 0.0, 2.0)));
}

#[test]
fn test_strafe_uses_camera_axes() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();
    module.set_speed(1.0).unwrap();
    let right = ctx.cameras.editor().frustum().right();
    ctx.input.movement = Vec3::new(1.0, 1.0, 0.0);

    module.update(&mut ctx, 1.0);

    assert!(approx_vec(ctx.cameras.editor().frustum().position(), right + Vec3::Y));
}

#[test]
fn test_input_is_consumed_each_frame() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();
    ctx.input.movement = Vec3::Z;

    module.update(&mut ctx, 1.0);
    let after_first = ctx.cameras.editor().frustum().position();
    module.update(&mut ctx, 1.0);

    assert_eq!(ctx.input.movement, Vec3::ZERO);
    assert_eq!(ctx.cameras.editor().frustum().position(), after_first);
}

#[test]
fn test_yaw_turns_around_world_up() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();
    ctx.input.yaw = FRAC_PI_2;

    module.update(&mut ctx, 0.016);

    let frustum = ctx.cameras.editor().frustum();
    assert!(approx_vec(frustum.front(), Vec3::X));
    assert!(approx_vec(frustum.up(), Vec3::Y));
}

#[test]
fn test_focus_aims_at_object_bounds() {
    let mut ctx = EngineContext::new();
    let mut module = CameraModule::new();
    let target = ctx.scene.create_object("target", None).unwrap();
    ctx.scene.get_mut(target).unwrap().set_bounding_box(Some(AABB::new(
        Vec3::new(9.0, -1.0, -1.0),
        Vec3::new(11.0, 1.0, 1.0),
    )));
    ctx.input.focus = Some(target);

    module.update(&mut ctx, 0.016);

    assert!(approx_vec(ctx.cameras.editor().frustum().front(), Vec3::X));
    assert!(ctx.input.focus.is_none());
}
