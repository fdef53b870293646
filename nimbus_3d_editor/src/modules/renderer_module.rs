/// RendererModule: culls the scene and hands a RenderView to the draw pass.
///
/// Runs last in the pipeline. Per frame:
/// - PreUpdate: make sure the game camera handle is still valid
/// - Update: run the culling pass from the active camera
/// - PostUpdate: build the RenderView and draw it

use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::camera::{CameraComponent, CameraRole, RenderView};
use crate::error::Result;
use crate::pipeline::{EngineContext, Module, ModuleSlot, UpdateStatus};
use crate::scene::{ComponentMask, CullStats, ObjectKey, Scene, run_culling_pass};
use crate::{engine_debug, engine_error, engine_info, engine_warn};

const SOURCE: &str = "nimbus3d::Renderer";

/// Draws a RenderView.
///
/// Called within PostUpdate with the scene read-only. Drawing itself
/// (GPU resources, shaders, materials) lives outside the editor core.
pub trait DrawPass {
    fn draw(&mut self, scene: &Scene, view: &RenderView) -> Result<()>;
}

/// Draw pass that does nothing.
#[derive(Debug, Default)]
pub struct NoOpDrawPass;

impl DrawPass for NoOpDrawPass {
    fn draw(&mut self, _scene: &Scene, _view: &RenderView) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererSettings {
    /// Outline the cameras that are not rendering
    #[serde(rename = "Debug Frustums", default = "default_true")]
    pub debug_frustums: bool,
    /// Outline the bounds of every visible object
    #[serde(rename = "Bounding Box", default)]
    pub bounding_boxes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            debug_frustums: true,
            bounding_boxes: false,
        }
    }
}

/// Camera snapshot taken when culling, reused to build the view.
struct CulledFrame {
    role: CameraRole,
    camera: CameraComponent,
    stats: CullStats,
}

pub struct RendererModule {
    draw_pass: Box<dyn DrawPass>,
    settings: RendererSettings,
    frame: Option<CulledFrame>,
    frames_drawn: u64,
}

impl Default for RendererModule {
    fn default() -> Self {
        Self::new(Box::new(NoOpDrawPass))
    }
}

impl RendererModule {
    pub const NAME: &'static str = "Renderer";

    pub fn new(draw_pass: Box<dyn DrawPass>) -> Self {
        Self {
            draw_pass,
            settings: RendererSettings::default(),
            frame: None,
            frames_drawn: 0,
        }
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Propagate a viewport resize to the editor camera and every scene camera.
    pub fn on_resize(&mut self, ctx: &mut EngineContext, width: u32, height: u32) -> Result<()> {
        let (width, height) = (width as f32, height as f32);
        ctx.cameras.editor_mut().set_viewport_size(width, height)?;
        for key in ctx.scene.objects_with(ComponentMask::CAMERA) {
            if let Some(camera) = ctx.scene.get_mut(key).and_then(|object| object.camera_mut()) {
                camera.set_viewport_size(width, height)?;
            }
        }
        engine_info!(SOURCE, "Viewport resized to {}x{}", width, height);
        Ok(())
    }

    /// Repair a stale or missing game camera handle.
    fn resolve_game_camera(ctx: &mut EngineContext) {
        if ctx.cameras.resolve_game_camera(&ctx.scene).is_some() {
            return;
        }
        let replacement = ctx.scene.objects_with(ComponentMask::CAMERA).first().copied();
        if ctx.cameras.game_camera().is_some() || replacement.is_some() {
            engine_debug!(SOURCE, "Game camera reassigned to {:?}", replacement);
        }
        ctx.cameras.set_game_camera(replacement);
    }

    fn build_view(&self, ctx: &EngineContext, frame: &CulledFrame) -> RenderView {
        let visible: Vec<ObjectKey> = ctx
            .scene
            .objects_with(ComponentMask::MESH)
            .into_iter()
            .filter(|key| ctx.scene.get(*key).is_some_and(|object| object.is_render_eligible()))
            .collect();

        let mut view = RenderView::new(frame.role, &frame.camera, visible, frame.stats);

        if self.settings.debug_frustums {
            let rendering_key = match frame.role {
                CameraRole::Game => ctx.cameras.game_camera(),
                CameraRole::Scene => None,
            };
            for key in ctx.scene.objects_with(ComponentMask::CAMERA) {
                if Some(key) == rendering_key {
                    continue;
                }
                if let Some(camera) = ctx.scene.get(key).and_then(|object| object.camera()) {
                    view.add_debug_frustum(camera.frustum());
                }
            }
            if frame.role == CameraRole::Game {
                view.add_debug_frustum(ctx.cameras.editor().frustum());
            }
        }

        if self.settings.bounding_boxes {
            let boxes: Vec<_> = view
                .visible_objects()
                .iter()
                .filter_map(|key| ctx.scene.world_bounds(*key))
                .collect();
            for aabb in &boxes {
                view.add_debug_box(aabb);
            }
        }

        view
    }
}

impl Module for RendererModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn slot(&self) -> ModuleSlot {
        ModuleSlot::Renderer
    }

    fn init(&mut self, _ctx: &mut EngineContext, config: Option<&Value>) -> Result<()> {
        if let Some(section) = config {
            match RendererSettings::deserialize(section) {
                Ok(settings) => self.settings = settings,
                Err(err) => engine_warn!(SOURCE, "Ignoring malformed renderer section: {}", err),
            }
        }
        Ok(())
    }

    fn start(&mut self, ctx: &mut EngineContext) -> Result<()> {
        Self::resolve_game_camera(ctx);
        engine_info!(SOURCE, "Renderer started (active camera: {})", ctx.cameras.active_role());
        Ok(())
    }

    fn pre_update(&mut self, ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        self.frame = None;
        Self::resolve_game_camera(ctx);
        UpdateStatus::Continue
    }

    fn update(&mut self, ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        let (role, camera) = ctx.cameras.active_camera(&ctx.scene);
        let camera = camera.clone();
        let stats = run_culling_pass(&mut ctx.scene, &camera);
        self.frame = Some(CulledFrame { role, camera, stats });
        UpdateStatus::Continue
    }

    fn post_update(&mut self, ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        let frame = match self.frame.take() {
            Some(frame) => frame,
            None => {
                let (role, camera) = ctx.cameras.active_camera(&ctx.scene);
                CulledFrame { role, camera: camera.clone(), stats: CullStats::default() }
            }
        };

        let view = self.build_view(ctx, &frame);
        if let Err(err) = self.draw_pass.draw(&ctx.scene, &view) {
            engine_error!(SOURCE, "Draw pass failed: {}", err);
            return UpdateStatus::Error;
        }

        self.frames_drawn += 1;
        ctx.render_view = Some(view);
        UpdateStatus::Continue
    }

    fn save_config(&self) -> Option<Value> {
        serde_json::to_value(&self.settings).ok()
    }
}

#[cfg(test)]
#[path = "renderer_module_tests.rs"]
mod tests;
