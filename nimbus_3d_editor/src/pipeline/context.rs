/// EngineContext: everything modules share during a frame.
///
/// Owned by the Application and lent to each module stage by mutable
/// reference. There is no global application object.

use std::path::PathBuf;
use glam::Vec3;
use crate::camera::{CameraComponent, CameraRole, RenderView};
use crate::scene::{ObjectKey, Scene};
use crate::time::{EngineClock, StateRequest};

/// The two viewpoints and which one is active.
///
/// The editor camera lives outside the object graph; the game camera is
/// a scene object carrying a CameraComponent.
#[derive(Debug, Clone)]
pub struct CameraRig {
    editor: CameraComponent,
    game_camera: Option<ObjectKey>,
    active: CameraRole,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            editor: CameraComponent::new(),
            game_camera: None,
            active: CameraRole::Scene,
        }
    }
}

impl CameraRig {
    pub fn editor(&self) -> &CameraComponent {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CameraComponent {
        &mut self.editor
    }

    pub fn game_camera(&self) -> Option<ObjectKey> {
        self.game_camera
    }

    pub fn set_game_camera(&mut self, key: Option<ObjectKey>) {
        self.game_camera = key;
    }

    pub fn active_role(&self) -> CameraRole {
        self.active
    }

    pub(crate) fn set_active_role(&mut self, role: CameraRole) {
        self.active = role;
    }

    /// The camera actually used this frame.
    ///
    /// The Game role falls back on the editor camera while no valid game
    /// camera is assigned.
    pub fn active_camera<'a>(&'a self, scene: &'a Scene) -> (CameraRole, &'a CameraComponent) {
        match self.active {
            CameraRole::Game => match self.resolve_game_camera(scene) {
                Some(camera) => (CameraRole::Game, camera),
                None => (CameraRole::Scene, &self.editor),
            },
            CameraRole::Scene => (CameraRole::Scene, &self.editor),
        }
    }

    /// The game camera's component, if the key is live and carries one.
    pub fn resolve_game_camera<'a>(&self, scene: &'a Scene) -> Option<&'a CameraComponent> {
        self.game_camera
            .and_then(|key| scene.get(key))
            .and_then(|object| object.camera())
    }
}

/// Requests raised during a frame, serviced by the application.
#[derive(Debug, Clone, Default)]
pub struct FrameRequests {
    pub save: bool,
    pub load: bool,
    pub camera_switch: Option<CameraRole>,
    /// Applied in order at the end of the frame
    pub state: Vec<StateRequest>,
    /// Files dropped on the editor, consumed by the importer
    pub dropped_files: Vec<PathBuf>,
}

/// Editor camera controls for the current frame.
#[derive(Debug, Clone, Default)]
pub struct CameraInput {
    /// Movement along the camera's right, up and front axes, in [-1, 1]
    pub movement: Vec3,
    /// Yaw and pitch, in radians
    pub yaw: f32,
    pub pitch: f32,
    /// Re-aim the editor camera at this object
    pub focus: Option<ObjectKey>,
}

/// Shared frame state.
#[derive(Default)]
pub struct EngineContext {
    pub clock: EngineClock,
    pub scene: Scene,
    pub cameras: CameraRig,
    pub requests: FrameRequests,
    pub input: CameraInput,
    /// Last view produced by the renderer
    pub render_view: Option<RenderView>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }
}
