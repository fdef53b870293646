/// Engine clock: real time and game time.
///
/// Real time always advances at wall-clock rate. Game time advances only
/// while the engine state is PLAY or SINGLE-STEP, scaled by the time
/// scale. `advance` runs at the start of every frame and `end_frame` at
/// its end.

use std::collections::VecDeque;
use std::time::Duration;
use crate::{engine_info, engine_warn};
use super::state::{transition, EngineState, StateRequest, TransitionEffects};

const SOURCE: &str = "nimbus3d::Clock";

/// Samples kept in each history.
pub const HISTORY_SIZE: usize = 100;

/// Fixed-capacity sample history; the oldest sample drops out first.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<f32>,
}

impl Default for History {
    fn default() -> Self {
        Self { samples: VecDeque::with_capacity(HISTORY_SIZE) }
    }
}

impl History {
    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == HISTORY_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f32>() / self.samples.len() as f32
        }
    }
}

/// Wall-clock time domain.
#[derive(Debug, Clone, Default)]
pub struct RealTime {
    pub dt: f32,
    pub frame_count: u64,
    /// Seconds since startup
    pub run_time: f64,
    /// Frames counted in the previous full second
    pub last_second_frames: u32,
    pub last_frame_ms: f32,
    pub fps_history: History,
    pub ms_history: History,
    frames_this_second: u32,
    second_accumulator: f32,
}

/// Scalable game time domain.
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Scaled delta of the current frame (0 while frozen)
    pub dt: f32,
    /// Seconds of game time since the play session started
    pub time: f64,
    pub frame_count: u64,
    pub time_scale: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self { dt: 0.0, time: 0.0, frame_count: 0, time_scale: 1.0 }
    }
}

/// Deltas distributed to modules for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameDelta {
    /// Unscaled wall-clock delta
    pub real: f32,
    /// Scaled game delta, 0 while PAUSE or EDIT
    pub scaled: f32,
}

impl FrameDelta {
    /// The delta a module receives: time-scale-exempt modules get real time.
    pub fn for_module(&self, time_scale_exempt: bool) -> f32 {
        if time_scale_exempt { self.real } else { self.scaled }
    }
}

/// Both time domains plus the engine state and the frame cap.
#[derive(Debug, Clone, Default)]
pub struct EngineClock {
    real: RealTime,
    game: GameTime,
    state: EngineState,
    /// Target frames per second, 0 = uncapped
    fps_cap: u32,
}

impl EngineClock {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== GETTERS =====

    pub fn real(&self) -> &RealTime {
        &self.real
    }

    pub fn game(&self) -> &GameTime {
        &self.game
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn time_scale(&self) -> f32 {
        self.game.time_scale
    }

    pub fn fps_cap(&self) -> u32 {
        self.fps_cap
    }

    /// Frame budget implied by the cap, `None` when uncapped.
    pub fn capped_frame_duration(&self) -> Option<Duration> {
        (self.fps_cap > 0).then(|| Duration::from_secs_f64(1.0 / self.fps_cap as f64))
    }

    // ===== SETTERS =====

    /// Negative or non-finite scales are clamped to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale >= 0.0 {
            self.game.time_scale = scale;
        } else {
            engine_warn!(SOURCE, "Time scale {} clamped to 0", scale);
            self.game.time_scale = 0.0;
        }
    }

    /// Cap the frame rate. 0 removes the cap.
    pub fn set_fps_cap(&mut self, fps: u32) {
        self.fps_cap = fps;
    }

    pub fn reset_game_time(&mut self) {
        self.game.dt = 0.0;
        self.game.time = 0.0;
        self.game.frame_count = 0;
    }

    /// Apply a state request and return the effects left for the caller.
    ///
    /// The game clock reset is carried out here; camera switches and
    /// save/load requests are returned untouched.
    pub fn apply_request(&mut self, request: StateRequest) -> TransitionEffects {
        let t = transition(self.state, request);
        if t.effects.reset_game_time {
            self.reset_game_time();
        }
        if t.from != t.to {
            engine_info!(SOURCE, "Engine state {} -> {}", t.from, t.to);
        }
        self.state = t.to;
        t.effects
    }

    // ===== FRAME =====

    /// Start a frame with the measured wall-clock delta.
    ///
    /// Negative or non-finite deltas are clamped to 0.
    pub fn advance(&mut self, real_dt: f32) -> FrameDelta {
        let dt = if real_dt.is_finite() && real_dt > 0.0 { real_dt } else { 0.0 };

        self.real.frame_count += 1;
        self.real.dt = dt;
        self.real.run_time += dt as f64;

        self.real.frames_this_second += 1;
        self.real.second_accumulator += dt;
        if self.real.second_accumulator >= 1.0 {
            // A long frame covers several seconds: one sample, not one per frame after it
            self.real.second_accumulator %= 1.0;
            self.real.last_second_frames = self.real.frames_this_second;
            self.real.fps_history.push(self.real.frames_this_second as f32);
            self.real.frames_this_second = 0;
        }

        let scaled = if self.state.advances_game_time() {
            let scaled = dt * self.game.time_scale;
            self.game.time += scaled as f64;
            self.game.frame_count += 1;
            scaled
        } else {
            0.0
        };
        self.game.dt = scaled;

        FrameDelta { real: dt, scaled }
    }

    /// Finish a frame that took `frame_duration` of work.
    ///
    /// Records the frame time, ends a single step, and returns how long
    /// the driver should sleep to honor the frame cap.
    pub fn end_frame(&mut self, frame_duration: Duration) -> Option<Duration> {
        self.real.last_frame_ms = frame_duration.as_secs_f32() * 1000.0;
        self.real.ms_history.push(self.real.last_frame_ms);

        if self.state == EngineState::SingleStep {
            engine_info!(SOURCE, "Engine state {} -> {}", self.state, EngineState::Pause);
            self.state = EngineState::Pause;
        }

        self.frame_sleep(frame_duration)
    }

    /// Remaining time in the frame budget, `None` when uncapped or over budget.
    pub fn frame_sleep(&self, elapsed: Duration) -> Option<Duration> {
        let budget = self.capped_frame_duration()?;
        budget.checked_sub(elapsed).filter(|remaining| !remaining.is_zero())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
