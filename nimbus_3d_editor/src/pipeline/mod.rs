//! Pipeline module
//!
//! Modules, the shared frame context and the scheduler that drives them.

mod context;
mod module;
mod pipeline;
mod timings;

pub use context::{CameraInput, CameraRig, EngineContext, FrameRequests};
pub use module::{Module, ModuleSlot, UpdateStatus};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use timings::{ModuleTimings, Stage};
