/// Module: a participant of the frame pipeline.
///
/// Lifecycle: `init` → `start` → {`pre_update`, `update`, `post_update`}* →
/// `clean_up`. The setup and teardown stages report failure through
/// `Result`; the per-frame stages return an `UpdateStatus`.

use std::fmt;
use serde_json::Value;
use crate::error::Result;
use super::context::EngineContext;

/// Outcome of a per-frame stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Continue,
    /// Graceful exit requested: the frame ends and the pipeline stops
    Stop,
    /// The module failed: the frame ends and the pipeline stops
    Error,
}

/// Position of a module in the default registration order.
///
/// The order is a dependency contract: platform services first, the
/// renderer last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleSlot {
    Window,
    FileSystem,
    Camera,
    Input,
    Audio,
    Physics,
    Geometry,
    Console,
    Scene,
    Gui,
    Importer,
    Textures,
    Renderer,
}

impl ModuleSlot {
    /// Every slot, in pipeline order.
    pub const DEFAULT_ORDER: [ModuleSlot; 13] = [
        ModuleSlot::Window,
        ModuleSlot::FileSystem,
        ModuleSlot::Camera,
        ModuleSlot::Input,
        ModuleSlot::Audio,
        ModuleSlot::Physics,
        ModuleSlot::Geometry,
        ModuleSlot::Console,
        ModuleSlot::Scene,
        ModuleSlot::Gui,
        ModuleSlot::Importer,
        ModuleSlot::Textures,
        ModuleSlot::Renderer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModuleSlot::Window => "Window",
            ModuleSlot::FileSystem => "FileSystem",
            ModuleSlot::Camera => "Camera",
            ModuleSlot::Input => "Input",
            ModuleSlot::Audio => "Audio",
            ModuleSlot::Physics => "Physics",
            ModuleSlot::Geometry => "Geometry",
            ModuleSlot::Console => "Console",
            ModuleSlot::Scene => "Scene",
            ModuleSlot::Gui => "Gui",
            ModuleSlot::Importer => "Importer",
            ModuleSlot::Textures => "Textures",
            ModuleSlot::Renderer => "Renderer",
        }
    }
}

impl fmt::Display for ModuleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pipeline participant.
///
/// Every stage has a default no-op implementation so modules only
/// override what they use.
pub trait Module {
    /// Unique name, also the key of the module's configuration section.
    fn name(&self) -> &str;

    fn slot(&self) -> ModuleSlot;

    /// Exempt modules receive the real delta whatever the engine state.
    fn time_scale_exempt(&self) -> bool {
        false
    }

    fn init(&mut self, _ctx: &mut EngineContext, _config: Option<&Value>) -> Result<()> {
        Ok(())
    }

    fn start(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    fn pre_update(&mut self, _ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        UpdateStatus::Continue
    }

    fn update(&mut self, _ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        UpdateStatus::Continue
    }

    fn post_update(&mut self, _ctx: &mut EngineContext, _dt: f32) -> UpdateStatus {
        UpdateStatus::Continue
    }

    fn clean_up(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Configuration section to persist, if the module has one.
    fn save_config(&self) -> Option<Value> {
        None
    }
}
