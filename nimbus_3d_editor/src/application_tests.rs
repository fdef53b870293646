use std::path::Path;
use glam::Vec3;
use crate::camera::CameraRole;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::modules::{
    AssetLoader, ImportedMesh, ImportedNode, MAIN_CAMERA_NAME, NoModelLoader, NoOpDrawPass,
};
use crate::pipeline::{EngineContext, Module, ModuleSlot, PipelineBuilder, UpdateStatus};
use crate::scene::{AABB, MemorySceneStore, Transform};
use crate::time::EngineState;
use super::*;

// ============================================================================
// TEST HELPERS
// ============================================================================

fn default_app() -> Application {
    Application::with_default_modules(EngineConfig::default(), Box::new(NoModelLoader), Box::new(NoOpDrawPass))
        .unwrap()
}

fn started_app() -> Application {
    let mut app = default_app();
    app.init().unwrap();
    app
}

/// Returns `status` from Update once `after` frames have run.
struct ScriptedModule {
    after: u32,
    frames: u32,
    status: UpdateStatus,
}

impl Module for ScriptedModule {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn slot(&self) -> ModuleSlot {
        ModuleSlot::Console
    }

    fn update(&mut self, _ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        self.frames += 1;
        if self.frames > self.after { self.status } else { UpdateStatus::Continue }
    }
}

struct CubeLoader;

impl AssetLoader for CubeLoader {
    fn load(&mut self, _path: &Path) -> Result<ImportedNode> {
        Ok(ImportedNode {
            name: "root".to_string(),
            transform: Transform::IDENTITY,
            meshes: vec![ImportedMesh {
                name: "Cube".to_string(),
                vertex_count: 24,
                index_count: 36,
                bounds: Some(AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0))),
                material: None,
            }],
            children: Vec::new(),
        })
    }
}

// ============================================================================
// INIT
// ============================================================================

#[test]
fn test_init_applies_application_settings() {
    let mut config = EngineConfig::default();
    config.application.max_fps = 120;
    config.application.time_scale = 0.5;
    let mut app = Application::with_default_modules(config, Box::new(NoModelLoader), Box::new(NoOpDrawPass))
        .unwrap();

    app.init().unwrap();

    assert_eq!(app.context().clock.fps_cap(), 120);
    assert_eq!(app.context().clock.time_scale(), 0.5);
    assert_eq!(app.pipeline().module_names(), vec!["Camera", "Scene", "Importer", "Renderer"]);
    assert!(app.scene().find_by_name(MAIN_CAMERA_NAME).is_some());
}

#[test]
fn test_first_frame_renders_through_scene_camera() {
    let mut app = started_app();

    assert_eq!(app.update(0.016), UpdateStatus::Continue);

    let view = app.context().render_view.as_ref().unwrap();
    assert_eq!(view.role(), CameraRole::Scene);
    assert_eq!(app.state(), EngineState::Edit);
}

// ============================================================================
// PLAY SESSION
// ============================================================================

#[test]
fn test_edit_play_edit_round_trip() {
    let mut app = started_app();

    app.request_play();
    app.update(0.1);
    assert_eq!(app.state(), EngineState::Play);
    assert_eq!(app.context().clock.game().frame_count, 0);
    assert_eq!(app.active_camera_role(), CameraRole::Scene);

    app.update(0.1);
    assert_eq!(app.active_camera_role(), CameraRole::Game);
    assert_eq!(app.context().render_view.as_ref().unwrap().role(), CameraRole::Game);
    assert_eq!(app.context().clock.game().frame_count, 1);
    assert!((app.context().clock.game().time - 0.1).abs() < 1e-6);

    app.request_play();
    app.update(0.1);
    assert_eq!(app.state(), EngineState::Edit);
    assert_eq!(app.context().clock.game().frame_count, 0);
    assert_eq!(app.context().clock.game().time, 0.0);

    app.update(0.1);
    assert_eq!(app.active_camera_role(), CameraRole::Scene);
}

#[test]
fn test_leaving_play_restores_pre_play_scene() {
    let mut app = started_app();
    app.request_play();
    app.update(0.1);

    app.scene_mut().create_object("Spawned during play", None).unwrap();
    app.update(0.1);
    app.request_stop();
    app.update(0.1);

    assert!(app.scene().find_by_name("Spawned during play").is_none());
    let camera = app.scene().find_by_name(MAIN_CAMERA_NAME).unwrap();
    assert_eq!(app.context().cameras.game_camera(), Some(camera));
}

#[test]
fn test_pause_freezes_game_time() {
    let mut app = started_app();
    app.request_play();
    app.update(0.1);
    app.update(0.1);
    let game_time = app.context().clock.game().time;

    app.request_pause();
    app.update(0.1);
    app.update(0.1);
    app.update(0.1);

    assert_eq!(app.state(), EngineState::Pause);
    assert!((app.context().clock.game().time - game_time - 0.1).abs() < 1e-6);
    assert_eq!(app.context().clock.game().dt, 0.0);
    assert_eq!(app.context().clock.real().frame_count, 5);
}

#[test]
fn test_single_step_runs_one_game_frame() {
    let mut app = started_app();

    app.request_step();
    app.update(0.1);
    assert_eq!(app.state(), EngineState::SingleStep);

    app.update(0.1);
    assert_eq!(app.state(), EngineState::Pause);
    assert_eq!(app.context().clock.game().frame_count, 1);

    app.update(0.1);
    app.update(0.1);
    assert_eq!(app.context().clock.game().frame_count, 1);
    assert_eq!(app.active_camera_role(), CameraRole::Game);
}

#[test]
fn test_editor_camera_moves_while_game_is_frozen() {
    let mut app = started_app();
    app.context_mut().input.movement = Vec3::Z;

    app.update(1.0);

    let position = app.context().cameras.editor().frustum().position();
    assert!((position.z - DEFAULT_SPEED).abs() < 1e-4);
    assert_eq!(app.context().clock.game().dt, 0.0);
}

const DEFAULT_SPEED: f32 = crate::modules::DEFAULT_CAMERA_SPEED;

#[test]
fn test_negative_delta_is_clamped() {
    let mut app = started_app();
    app.request_play();
    app.update(0.1);

    app.update(-1.0);

    assert_eq!(app.context().clock.real().dt, 0.0);
    assert_eq!(app.context().clock.game().time, 0.0);
}

// ============================================================================
// CAMERA SWITCH
// ============================================================================

#[test]
fn test_camera_switch_is_consumed_once() {
    let mut app = started_app();

    app.request_camera_switch(CameraRole::Game);
    app.update(0.016);
    assert_eq!(app.active_camera_role(), CameraRole::Game);
    assert!(app.context().requests.camera_switch.is_none());

    app.request_camera_switch(CameraRole::Scene);
    app.update(0.016);
    assert_eq!(app.active_camera_role(), CameraRole::Scene);
}

// ============================================================================
// PERSISTENCE
// ============================================================================

#[test]
fn test_save_then_load_restores_scene() {
    let mut app = started_app();
    app.scene_mut().create_object("Kept", None).unwrap();
    app.request_save();
    app.update(0.016);

    app.scene_mut().create_object("Discarded", None).unwrap();
    app.request_load();
    app.update(0.016);

    assert!(app.scene().find_by_name("Kept").is_some());
    assert!(app.scene().find_by_name("Discarded").is_none());
    assert!(!app.context().requests.load);
}

#[test]
fn test_load_failure_keeps_current_scene() {
    let mut app = started_app();
    app.set_scene_store(Box::new(MemorySceneStore::new()));
    let before = app.scene().len();

    app.request_load();
    app.update(0.016);

    assert_eq!(app.scene().len(), before);
    assert!(app.scene().find_by_name(MAIN_CAMERA_NAME).is_some());
}

#[test]
fn test_scene_file_is_loaded_at_init() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("scene.json");
    let mut config = EngineConfig::default();
    config.application.scene_file = Some(scene_path.to_string_lossy().into_owned());

    let mut first = Application::with_default_modules(config.clone(), Box::new(NoModelLoader), Box::new(NoOpDrawPass))
        .unwrap();
    first.init().unwrap();
    first.scene_mut().create_object("Persisted", None).unwrap();
    first.request_save();
    first.update(0.016);
    assert!(scene_path.exists());

    let mut second = Application::with_default_modules(config, Box::new(NoModelLoader), Box::new(NoOpDrawPass))
        .unwrap();
    second.init().unwrap();

    assert!(second.scene().find_by_name("Persisted").is_some());
    assert_eq!(second.scene().objects_with(crate::scene::ComponentMask::CAMERA).len(), 1);
}

#[test]
fn test_clean_up_writes_module_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut app = Application::from_config_file(&path, Box::new(NoModelLoader), Box::new(NoOpDrawPass)).unwrap();
    app.init().unwrap();
    app.update(0.016);

    app.clean_up().unwrap();

    let saved = EngineConfig::load(&path).unwrap();
    assert!(saved.module_section("Camera").is_some());
    assert!(saved.module_section("Renderer").is_some());
    assert_eq!(saved.application, app.config().application);
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let app = Application::from_config_file(&path, Box::new(NoModelLoader), Box::new(NoOpDrawPass)).unwrap();

    assert_eq!(*app.config(), EngineConfig::default());
}

// ============================================================================
// IMPORT
// ============================================================================

#[test]
fn test_dropped_model_becomes_visible() {
    let mut app = Application::with_default_modules(EngineConfig::default(), Box::new(CubeLoader), Box::new(NoOpDrawPass))
        .unwrap();
    app.init().unwrap();
    app.drop_file("assets/Crate.fbx");
    app.context_mut().cameras.editor_mut().refresh(Vec3::new(0.0, 0.0, -10.0), Vec3::Z, Vec3::Y);

    app.update(0.016);

    let root = app.scene().find_by_name("Crate").unwrap();
    let cube = app.scene().get(root).unwrap().children()[0];
    assert_eq!(app.context().render_view.as_ref().unwrap().visible_objects(), &[cube]);
}

// ============================================================================
// FRAME LOOP
// ============================================================================

#[test]
fn test_run_stops_gracefully() {
    let pipeline = PipelineBuilder::new()
        .with_module(ScriptedModule { after: 3, frames: 0, status: UpdateStatus::Stop })
        .build()
        .unwrap();
    let mut app = Application::new(pipeline, EngineConfig::default());
    app.init().unwrap();

    assert!(app.run().is_ok());
    assert_eq!(app.context().clock.real().frame_count, 4);
    app.clean_up().unwrap();
}

#[test]
fn test_run_reports_failing_module() {
    let pipeline = PipelineBuilder::new()
        .with_module(ScriptedModule { after: 0, frames: 0, status: UpdateStatus::Error })
        .build()
        .unwrap();
    let mut app = Application::new(pipeline, EngineConfig::default());
    app.init().unwrap();

    match app.run() {
        Err(Error::ModuleFailed { module, stage }) => {
            assert_eq!(module, "Scripted");
            assert_eq!(stage, "update");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_frame_cap_reports_sleep() {
    let mut config = EngineConfig::default();
    config.application.max_fps = 1000;
    let mut app = Application::new(Pipeline::new(), config);
    app.init().unwrap();

    app.update(0.0);

    assert!(app.last_sleep().map_or(true, |sleep| sleep <= Duration::from_millis(1)));
}
