//! Time module
//!
//! Real and game time domains, the engine state machine and frame pacing.

mod clock;
mod state;

pub use clock::{EngineClock, FrameDelta, GameTime, History, RealTime, HISTORY_SIZE};
pub use state::{transition, EngineState, StateRequest, Transition, TransitionEffects};
