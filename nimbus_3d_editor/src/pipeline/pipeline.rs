/// Pipeline: ordered set of modules driven once per frame.
///
/// Modules are registered before `init`, then run in registration order
/// for `init`, `start` and the three per-frame passes, and in reverse
/// order for `clean_up`. Disabled modules are skipped by every stage
/// without changing the order of the others.

use std::time::Instant;
use serde_json::Value;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::time::FrameDelta;
use crate::{engine_bail, engine_debug, engine_error, engine_info, engine_warn};
use super::context::EngineContext;
use super::module::{Module, UpdateStatus};
use super::timings::{ModuleTimings, Stage};

const SOURCE: &str = "nimbus3d::Pipeline";

struct ModuleEntry {
    module: Box<dyn Module>,
    enabled: bool,
    timings: ModuleTimings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Registering,
    Initialized,
    Started,
    CleanedUp,
}

pub struct Pipeline {
    entries: Vec<ModuleEntry>,
    phase: Phase,
    /// Module that ended the last frame early
    stopped_by: Option<String>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            phase: Phase::Registering,
            stopped_by: None,
        }
    }

    // ===== REGISTRATION =====

    /// Append a module. Only allowed before `init`; names must be unique.
    pub fn add_module(&mut self, module: Box<dyn Module>) -> Result<()> {
        if self.phase != Phase::Registering {
            engine_bail!(InitializationFailed, SOURCE,
                "Cannot register '{}' after the pipeline was initialized", module.name());
        }
        if self.entries.iter().any(|entry| entry.module.name() == module.name()) {
            engine_bail!(InitializationFailed, SOURCE,
                "A module named '{}' is already registered", module.name());
        }

        engine_debug!(SOURCE, "Registered module '{}' ({})", module.name(), module.slot());
        self.entries.push(ModuleEntry {
            module,
            enabled: true,
            timings: ModuleTimings::default(),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in registration order.
    pub fn module_names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.module.name()).collect()
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.entry(name).map(|entry| entry.enabled)
    }

    /// Enable or disable a module; takes effect from the next stage run.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.module.name() == name) else {
            engine_bail!(InvalidParameter, SOURCE, "No module named '{}'", name);
        };
        if entry.enabled != enabled {
            entry.enabled = enabled;
            engine_info!(SOURCE, "Module '{}' {}", name, if enabled { "enabled" } else { "disabled" });
        }
        Ok(())
    }

    pub fn timings(&self, name: &str) -> Option<&ModuleTimings> {
        self.entry(name).map(|entry| &entry.timings)
    }

    /// Module that ended the last frame with `Stop` or `Error`.
    pub fn stopped_by(&self) -> Option<&str> {
        self.stopped_by.as_deref()
    }

    fn entry(&self, name: &str) -> Option<&ModuleEntry> {
        self.entries.iter().find(|entry| entry.module.name() == name)
    }

    // ===== LIFECYCLE =====

    /// Init every enabled module in order, each with its config section.
    ///
    /// The first failure aborts the remaining modules.
    pub fn init(&mut self, ctx: &mut EngineContext, config: &EngineConfig) -> Result<()> {
        if self.phase != Phase::Registering {
            engine_bail!(InitializationFailed, SOURCE, "Pipeline already initialized");
        }
        self.phase = Phase::Initialized;

        for entry in self.entries.iter_mut().filter(|entry| entry.enabled) {
            let name = entry.module.name().to_string();
            let section = config.module_section(&name);
            if let Err(err) = entry.module.init(ctx, section) {
                engine_error!(SOURCE, "Module '{}' failed to init: {}", name, err);
                return Err(Error::ModuleFailed { module: name, stage: "init" });
            }
        }
        engine_info!(SOURCE, "Initialized {} module(s)", self.entries.len());
        Ok(())
    }

    pub fn start(&mut self, ctx: &mut EngineContext) -> Result<()> {
        if self.phase != Phase::Initialized {
            engine_bail!(InitializationFailed, SOURCE, "Pipeline must be initialized before start");
        }
        self.phase = Phase::Started;

        for entry in self.entries.iter_mut().filter(|entry| entry.enabled) {
            if let Err(err) = entry.module.start(ctx) {
                let name = entry.module.name().to_string();
                engine_error!(SOURCE, "Module '{}' failed to start: {}", name, err);
                return Err(Error::ModuleFailed { module: name, stage: "start" });
            }
        }
        engine_info!(SOURCE, "Pipeline started");
        Ok(())
    }

    /// Run PreUpdate, Update then PostUpdate over the enabled modules.
    ///
    /// Each module receives the delta matching its time-scale exemption.
    /// The first non-`Continue` status ends the frame: no later module
    /// and no later pass runs.
    pub fn run_frame(&mut self, ctx: &mut EngineContext, delta: FrameDelta) -> UpdateStatus {
        self.stopped_by = None;

        for stage in Stage::ALL {
            for entry in self.entries.iter_mut().filter(|entry| entry.enabled) {
                let dt = delta.for_module(entry.module.time_scale_exempt());
                let started = Instant::now();
                let status = match stage {
                    Stage::PreUpdate => entry.module.pre_update(ctx, dt),
                    Stage::Update => entry.module.update(ctx, dt),
                    Stage::PostUpdate => entry.module.post_update(ctx, dt),
                };
                entry.timings.record(stage, started.elapsed());

                if status != UpdateStatus::Continue {
                    let name = entry.module.name().to_string();
                    match status {
                        UpdateStatus::Error => engine_error!(SOURCE, "Module '{}' failed during {}", name, stage.name()),
                        _ => engine_info!(SOURCE, "Module '{}' requested exit during {}", name, stage.name()),
                    }
                    self.stopped_by = Some(name);
                    return status;
                }
            }
        }

        UpdateStatus::Continue
    }

    /// CleanUp the enabled modules in reverse order; the first failure aborts.
    pub fn clean_up(&mut self, ctx: &mut EngineContext) -> Result<()> {
        if self.phase == Phase::CleanedUp {
            engine_warn!(SOURCE, "Pipeline already cleaned up");
            return Ok(());
        }
        self.phase = Phase::CleanedUp;

        for entry in self.entries.iter_mut().rev().filter(|entry| entry.enabled) {
            if let Err(err) = entry.module.clean_up(ctx) {
                let name = entry.module.name().to_string();
                engine_error!(SOURCE, "Module '{}' failed to clean up: {}", name, err);
                return Err(Error::ModuleFailed { module: name, stage: "clean_up" });
            }
        }
        engine_info!(SOURCE, "Pipeline cleaned up");
        Ok(())
    }

    /// Configuration sections returned by the modules, by module name.
    pub fn collect_configs(&self) -> Vec<(String, Value)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry.module.save_config().map(|section| (entry.module.name().to_string(), section))
            })
            .collect()
    }
}

/// Collects modules and sorts them into the default slot order.
///
/// Modules sharing a slot keep their insertion order.
#[derive(Default)]
pub struct PipelineBuilder {
    modules: Vec<Box<dyn Module>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn with_boxed_module(mut self, module: Box<dyn Module>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn build(mut self) -> Result<Pipeline> {
        self.modules.sort_by_key(|module| module.slot());

        let mut pipeline = Pipeline::new();
        for module in self.modules {
            pipeline.add_module(module)?;
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
