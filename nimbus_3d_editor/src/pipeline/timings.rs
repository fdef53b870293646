/// Per-module stage timings, in milliseconds.

use std::time::Duration;
use crate::time::History;

/// The per-frame stages of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PreUpdate,
    Update,
    PostUpdate,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::PreUpdate, Stage::Update, Stage::PostUpdate];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::PreUpdate => "pre_update",
            Stage::Update => "update",
            Stage::PostUpdate => "post_update",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModuleTimings {
    pre_update: History,
    update: History,
    post_update: History,
}

impl ModuleTimings {
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        let ms = elapsed.as_secs_f32() * 1000.0;
        self.history_mut(stage).push(ms);
    }

    pub fn history(&self, stage: Stage) -> &History {
        match stage {
            Stage::PreUpdate => &self.pre_update,
            Stage::Update => &self.update,
            Stage::PostUpdate => &self.post_update,
        }
    }

    fn history_mut(&mut self, stage: Stage) -> &mut History {
        match stage {
            Stage::PreUpdate => &mut self.pre_update,
            Stage::Update => &mut self.update,
            Stage::PostUpdate => &mut self.post_update,
        }
    }

    /// Sum of the latest sample of each stage.
    pub fn last_frame_ms(&self) -> f32 {
        Stage::ALL
            .iter()
            .filter_map(|stage| self.history(*stage).latest())
            .sum()
    }
}
