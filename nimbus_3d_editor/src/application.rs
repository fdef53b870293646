/// Application: owns the pipeline and drives frames.
///
/// A frame is split in three:
/// - `prepare_update`: advance the clock, consume the camera switch
/// - the pipeline's PreUpdate, Update and PostUpdate passes
/// - `finish_update`: close the frame (single step ends here), apply the
///   state requests raised during the frame, service save/load, pace
///
/// State requests are applied at the end of the frame that raised them,
/// so entering play saves the scene as it was before the session and
/// leaving reloads it before the next frame runs.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use crate::camera::CameraRole;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::modules::{AssetLoader, CameraModule, DrawPass, ImporterModule, RendererModule, SceneModule};
use crate::pipeline::{EngineContext, Pipeline, PipelineBuilder, UpdateStatus};
use crate::scene::{FileSceneStore, MemorySceneStore, Scene, SceneStore, load_scene, save_scene};
use crate::time::{EngineState, FrameDelta, StateRequest};
use crate::{engine_error, engine_info, engine_warn};

const SOURCE: &str = "nimbus3d::Application";

pub struct Application {
    pipeline: Pipeline,
    context: EngineContext,
    config: EngineConfig,
    /// Where the configuration is written back at clean-up
    config_path: Option<PathBuf>,
    scene_store: Box<dyn SceneStore>,
    /// Sleep applied at the end of the last frame
    last_sleep: Option<Duration>,
}

impl Application {
    /// Wrap a pipeline. The scene store is the configured scene file, or
    /// an in-memory slot when none is configured.
    pub fn new(pipeline: Pipeline, config: EngineConfig) -> Self {
        let scene_store: Box<dyn SceneStore> = match &config.application.scene_file {
            Some(path) => Box::new(FileSceneStore::new(path)),
            None => Box::new(MemorySceneStore::new()),
        };

        Self {
            pipeline,
            context: EngineContext::new(),
            config,
            config_path: None,
            scene_store,
            last_sleep: None,
        }
    }

    /// Application with the built-in camera, scene, importer and renderer modules.
    pub fn with_default_modules(
        config: EngineConfig,
        loader: Box<dyn AssetLoader>,
        draw_pass: Box<dyn DrawPass>,
    ) -> Result<Self> {
        let pipeline = PipelineBuilder::new()
            .with_module(CameraModule::new())
            .with_module(SceneModule::new())
            .with_module(ImporterModule::new(loader))
            .with_module(RendererModule::new(draw_pass))
            .build()?;
        Ok(Self::new(pipeline, config))
    }

    /// Default modules configured from a file. A missing or malformed file
    /// falls back to the default configuration; the file is rewritten at
    /// clean-up either way.
    pub fn from_config_file(
        path: impl AsRef<Path>,
        loader: Box<dyn AssetLoader>,
        draw_pass: Box<dyn DrawPass>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let config = match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                engine_warn!(SOURCE, "Using the default configuration: {}", err);
                EngineConfig::default()
            }
        };

        let mut app = Self::with_default_modules(config, loader, draw_pass)?;
        app.config_path = Some(path.to_path_buf());
        Ok(app)
    }

    pub fn set_scene_store(&mut self, store: Box<dyn SceneStore>) {
        self.scene_store = store;
    }

    // ===== ACCESSORS =====

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.context.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.context.scene
    }

    pub fn state(&self) -> EngineState {
        self.context.clock.state()
    }

    pub fn active_camera_role(&self) -> CameraRole {
        self.context.cameras.active_role()
    }

    pub fn last_sleep(&self) -> Option<Duration> {
        self.last_sleep
    }

    // ===== REQUESTS =====

    pub fn request_play(&mut self) {
        self.context.requests.state.push(StateRequest::Play);
    }

    pub fn request_pause(&mut self) {
        self.context.requests.state.push(StateRequest::Pause);
    }

    pub fn request_step(&mut self) {
        self.context.requests.state.push(StateRequest::Step);
    }

    pub fn request_stop(&mut self) {
        self.context.requests.state.push(StateRequest::Stop);
    }

    pub fn request_save(&mut self) {
        self.context.requests.save = true;
    }

    pub fn request_load(&mut self) {
        self.context.requests.load = true;
    }

    pub fn request_camera_switch(&mut self, role: CameraRole) {
        self.context.requests.camera_switch = Some(role);
    }

    /// Queue a file for the importer.
    pub fn drop_file(&mut self, path: impl Into<PathBuf>) {
        self.context.requests.dropped_files.push(path.into());
    }

    // ===== LIFECYCLE =====

    /// Apply the application settings (log level, frame cap, time scale),
    /// then Init and Start every module.
    pub fn init(&mut self) -> Result<()> {
        let settings = self.config.application.clone();
        Engine::set_min_severity(settings.log_level);
        engine_info!(SOURCE, "Starting {} ({})", settings.app_name, settings.org_name);

        self.context.clock.set_fps_cap(settings.max_fps);
        self.context.clock.set_time_scale(settings.time_scale);

        self.pipeline.init(&mut self.context, &self.config)?;

        if let Some(scene_file) = &settings.scene_file {
            if Path::new(scene_file).exists() {
                if let Err(err) = self.load_scene_now() {
                    engine_warn!(SOURCE, "Starting with an empty scene: {}", err);
                }
            }
        }

        self.pipeline.start(&mut self.context)
    }

    /// Run one frame with the measured wall-clock delta.
    pub fn update(&mut self, real_dt: f32) -> UpdateStatus {
        let started = Instant::now();

        let delta = self.prepare_update(real_dt);
        let status = self.pipeline.run_frame(&mut self.context, delta);
        self.last_sleep = self.finish_update(started.elapsed());

        if let Some(sleep) = self.last_sleep {
            thread::sleep(sleep);
        }
        status
    }

    /// Run frames until a module stops the pipeline.
    ///
    /// A graceful stop returns `Ok`; a module error is reported as
    /// `ModuleFailed` for the module that raised it.
    pub fn run(&mut self) -> Result<()> {
        let mut last = Instant::now();
        loop {
            let now = Instant::now();
            let real_dt = now.duration_since(last).as_secs_f32();
            last = now;

            match self.update(real_dt) {
                UpdateStatus::Continue => {}
                UpdateStatus::Stop => {
                    engine_info!(SOURCE, "Exit requested after {} frame(s)", self.context.clock.real().frame_count);
                    return Ok(());
                }
                UpdateStatus::Error => {
                    let module = self.pipeline.stopped_by().unwrap_or("unknown").to_string();
                    engine_error!(SOURCE, "Frame loop aborted by '{}'", module);
                    return Err(Error::ModuleFailed { module, stage: "update" });
                }
            }
        }
    }

    /// Collect and persist module configuration, then CleanUp every module.
    pub fn clean_up(&mut self) -> Result<()> {
        for (name, section) in self.pipeline.collect_configs() {
            self.config.set_module_section(&name, section);
        }
        if let Some(path) = &self.config_path {
            if let Err(err) = self.config.save(path) {
                engine_warn!(SOURCE, "Configuration not saved: {}", err);
            }
        }

        self.pipeline.clean_up(&mut self.context)?;
        engine_info!(SOURCE, "Application cleaned up");
        Ok(())
    }

    // ===== FRAME =====

    fn prepare_update(&mut self, real_dt: f32) -> FrameDelta {
        let delta = self.context.clock.advance(real_dt);

        if let Some(role) = self.context.requests.camera_switch.take() {
            self.switch_camera(role);
        }
        delta
    }

    /// Close the frame and return how long to sleep for the frame cap.
    fn finish_update(&mut self, elapsed: Duration) -> Option<Duration> {
        let sleep = self.context.clock.end_frame(elapsed);

        let requests = std::mem::take(&mut self.context.requests.state);
        for request in requests {
            let effects = self.context.clock.apply_request(request);
            if effects.request_save {
                self.context.requests.save = true;
            }
            if effects.request_load {
                self.context.requests.load = true;
            }
            if let Some(role) = effects.camera_switch {
                self.context.requests.camera_switch = Some(role);
            }
        }

        self.service_persistence();
        sleep
    }

    fn switch_camera(&mut self, role: CameraRole) {
        if role == CameraRole::Game && self.context.cameras.resolve_game_camera(&self.context.scene).is_none() {
            engine_warn!(SOURCE, "No game camera assigned, rendering through the scene camera");
        }
        if self.context.cameras.active_role() != role {
            engine_info!(SOURCE, "Active camera: {}", role);
        }
        self.context.cameras.set_active_role(role);
    }

    fn service_persistence(&mut self) {
        if std::mem::take(&mut self.context.requests.save) {
            if let Err(err) = self.save_scene_now() {
                engine_error!(SOURCE, "Scene save failed: {}", err);
            }
        }
        if std::mem::take(&mut self.context.requests.load) {
            if let Err(err) = self.load_scene_now() {
                engine_error!(SOURCE, "Scene load failed, keeping the current scene: {}", err);
            }
        }
    }

    fn save_scene_now(&mut self) -> Result<()> {
        let document = save_scene(&self.context.scene);
        self.scene_store.save(&document)?;
        engine_info!(SOURCE, "Scene saved ({} object(s))", document.objects.len());
        Ok(())
    }

    /// Replace the scene with the stored document. The game camera is
    /// re-bound by uid since object keys do not survive a reload.
    fn load_scene_now(&mut self) -> Result<()> {
        let game_camera_uid = self
            .context
            .cameras
            .game_camera()
            .and_then(|key| self.context.scene.get(key))
            .map(|object| object.uid());

        let document = self.scene_store.load()?;
        load_scene(&mut self.context.scene, &document)?;

        let rebound = game_camera_uid.and_then(|uid| self.context.scene.find_by_uid(uid));
        self.context.cameras.set_game_camera(rebound);
        self.context.render_view = None;
        engine_info!(SOURCE, "Scene loaded ({} object(s))", self.context.scene.len());
        Ok(())
    }
}

#[cfg(test)]
#[path = "application_tests.rs"]
mod tests;
