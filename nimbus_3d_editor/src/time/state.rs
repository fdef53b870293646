/// Engine state machine.
///
/// Four states: EDIT (the editor proper, also called STOP), PLAY,
/// PAUSE and SINGLE-STEP. Transitions are pure: `transition` returns the
/// next state and the side effects the application must carry out
/// (game clock reset, camera role switch, scene save or reload).

use std::fmt;
use crate::camera::CameraRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// Editing, game time frozen
    #[default]
    Edit,
    /// Game time advancing
    Play,
    /// Play session suspended, game time frozen
    Pause,
    /// Exactly one game frame, then PAUSE
    SingleStep,
}

impl EngineState {
    /// Game time advances in this state.
    pub fn advances_game_time(&self) -> bool {
        matches!(self, EngineState::Play | EngineState::SingleStep)
    }

    /// A play session is running (playing, paused or stepping).
    pub fn in_play_session(&self) -> bool {
        !matches!(self, EngineState::Edit)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Edit => "EDIT",
            EngineState::Play => "PLAY",
            EngineState::Pause => "PAUSE",
            EngineState::SingleStep => "SINGLE-STEP",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A user request to change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRequest {
    /// Enter a play session from EDIT, leave it while PLAY, resume otherwise
    Play,
    /// Toggle between PLAY and PAUSE
    Pause,
    /// Run one game frame
    Step,
    /// Leave the play session
    Stop,
}

/// Side effects of a transition, applied by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionEffects {
    pub reset_game_time: bool,
    pub camera_switch: Option<CameraRole>,
    pub request_save: bool,
    pub request_load: bool,
}

impl TransitionEffects {
    const ENTER_SESSION: Self = Self {
        reset_game_time: true,
        camera_switch: Some(CameraRole::Game),
        request_save: true,
        request_load: false,
    };

    const LEAVE_SESSION: Self = Self {
        reset_game_time: true,
        camera_switch: Some(CameraRole::Scene),
        request_save: false,
        request_load: true,
    };

    const NONE: Self = Self {
        reset_game_time: false,
        camera_switch: None,
        request_save: false,
        request_load: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: EngineState,
    pub to: EngineState,
    pub effects: TransitionEffects,
}

/// Compute the outcome of `request` in state `from`.
pub fn transition(from: EngineState, request: StateRequest) -> Transition {
    use EngineState::*;

    let (to, effects) = match (request, from) {
        (StateRequest::Play, Edit) => (Play, TransitionEffects::ENTER_SESSION),
        (StateRequest::Play, Play) => (Edit, TransitionEffects::LEAVE_SESSION),
        (StateRequest::Play, Pause | SingleStep) => (Play, TransitionEffects::NONE),

        (StateRequest::Pause, Play | SingleStep) => (Pause, TransitionEffects::NONE),
        (StateRequest::Pause, Pause) => (Play, TransitionEffects::NONE),
        (StateRequest::Pause, Edit) => (Edit, TransitionEffects::NONE),

        (StateRequest::Step, Edit) => (SingleStep, TransitionEffects::ENTER_SESSION),
        (StateRequest::Step, _) => (SingleStep, TransitionEffects::NONE),

        (StateRequest::Stop, Edit) => (Edit, TransitionEffects::NONE),
        (StateRequest::Stop, _) => (Edit, TransitionEffects::LEAVE_SESSION),
    };

    Transition { from, to, effects }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
