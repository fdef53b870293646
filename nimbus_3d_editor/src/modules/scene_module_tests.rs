use std::f32::consts::FRAC_PI_2;
use glam::{Quat, Vec3};
use serde_json::json;
use crate::camera::CameraComponent;
use crate::pipeline::{EngineContext, Module};
use crate::scene::Component;
use super::*;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// CAMERA REFRESH
// ============================================================================

#[test]
fn test_refresh_follows_world_transform() {
    let mut scene = Scene::new();
    let rig = scene.create_object("rig", None).unwrap();
    scene.get_mut(rig).unwrap().transform_mut().position = Vec3::new(10.0, 0.0, 0.0);
    let camera = spawn_camera_object(&mut scene, "cam", Vec3::new(0.0, 1.0, 0.0)).unwrap();
    scene.set_parent(camera, Some(rig)).unwrap();
    scene.get_mut(rig).unwrap().transform_mut().rotation = Quat::from_rotation_y(FRAC_PI_2);

    assert_eq!(refresh_scene_cameras(&mut scene), 1);

    let frustum = scene.get(camera).unwrap().camera().unwrap().frustum();
    assert!(approx_vec(frustum.position(), Vec3::new(10.0, 1.0, 0.0)));
    assert!(approx_vec(frustum.front(), Vec3::X));
    assert!(approx_vec(frustum.up(), Vec3::Y));
}

#[test]
fn test_refresh_ignores_scale() {
    let mut scene = Scene::new();
    let camera = spawn_camera_object(&mut scene, "cam", Vec3::ZERO).unwrap();
    scene.get_mut(camera).unwrap().transform_mut().scale = Vec3::splat(3.0);

    refresh_scene_cameras(&mut scene);

    let frustum = scene.get(camera).unwrap().camera().unwrap().frustum();
    assert!(approx_vec(frustum.front(), Vec3::Z));
    assert!((frustum.front().length() - 1.0).abs() < 1e-5);
}

#[test]
fn test_update_refreshes_moved_camera() {
    let mut ctx = EngineContext::new();
    let mut module = SceneModule::new();
    let camera = spawn_camera_object(&mut ctx.scene, "cam", Vec3::ZERO).unwrap();
    ctx.scene.get_mut(camera).unwrap().transform_mut().translate(Vec3::new(0.0, 0.0, 5.0));

    module.update(&mut ctx, 0.0);

    let frustum = ctx.scene.get(camera).unwrap().camera().unwrap().frustum();
    assert!(approx_vec(frustum.position(), Vec3::new(0.0, 0.0, 5.0)));
}

// ============================================================================
// MAIN CAMERA
// ============================================================================

#[test]
fn test_start_creates_main_camera() {
    let mut ctx = EngineContext::new();
    let mut module = SceneModule::new();
    module.init(&mut ctx, None).unwrap();

    module.start(&mut ctx).unwrap();

    let key = ctx.cameras.game_camera().unwrap();
    let object = ctx.scene.get(key).unwrap();
    assert_eq!(object.name(), MAIN_CAMERA_NAME);
    assert!(object.camera().is_some());
    assert_eq!(object.transform().position, Vec3::new(0.0, 2.0, -10.0));
}

#[test]
fn test_start_adopts_existing_camera() {
    let mut ctx = EngineContext::new();
    let existing = ctx.scene.create_object("Existing", None).unwrap();
    ctx.scene.get_mut(existing).unwrap()
        .add_component(Component::Camera(CameraComponent::new()))
        .unwrap();
    let mut module = SceneModule::new();

    module.start(&mut ctx).unwrap();

    assert_eq!(ctx.cameras.game_camera(), Some(existing));
    assert_eq!(ctx.scene.len(), 1);
}

#[test]
fn test_start_without_main_camera() {
    let mut ctx = EngineContext::new();
    let mut module = SceneModule::new();
    module.init(&mut ctx, Some(&json!({ "Main Camera": false }))).unwrap();

    module.start(&mut ctx).unwrap();

    assert!(ctx.cameras.game_camera().is_none());
    assert!(ctx.scene.is_empty());
}

#[test]
fn test_settings_round_trip_through_config() {
    let module = SceneModule::with_settings(SceneModuleSettings {
        main_camera: false,
        main_camera_position: Vec3::new(1.0, 2.0, 3.0),
    });
    let section = module.save_config().unwrap();

    let mut ctx = EngineContext::new();
    let mut restored = SceneModule::new();
    restored.init(&mut ctx, Some(&section)).unwrap();

    assert_eq!(restored.settings(), module.settings());
}
