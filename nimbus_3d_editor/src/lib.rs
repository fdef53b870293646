/*!
# Nimbus 3D Editor

Frame-update core of the Nimbus3D scene editor.

This crate provides the headless heart of the editor: the object graph,
the cameras and their view frustums, the visibility culling pass, the
engine clock with its play/pause/step state machine, and the module
pipeline that drives them once per frame. Windowing, GPU drawing and
asset decoding are supplied by the host through small traits.

## Architecture

- **Application**: owns the pipeline, the frame context and the config
- **Pipeline**: ordered modules run as PreUpdate, Update, PostUpdate
- **Module**: pipeline participant (camera, scene, importer, renderer...)
- **EngineClock**: real and game time, engine state, frame pacing
- **Scene**: slot-map object graph with Transform/Camera/Mesh/Material
- **Frustum**: six-plane view volume and box classification
- **VisibilityCuller**: per-frame render eligibility from the active camera
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod application;
pub mod camera;
pub mod config;
pub mod modules;
pub mod pipeline;
pub mod scene;
pub mod time;

// Main nimbus3d namespace module
pub mod nimbus3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Application driver
    pub use crate::application::Application;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{ConsoleLogger, DefaultLogger, LogEntry, LogSeverity, Logger, CONSOLE_CAPACITY};
        // Note: engine_* macros are exported at the crate root
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Configuration sub-module
    pub mod config {
        pub use crate::config::*;
    }

    // Built-in modules
    pub mod modules {
        pub use crate::modules::*;
    }

    // Pipeline sub-module
    pub mod pipeline {
        pub use crate::pipeline::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Time sub-module
    pub mod time {
        pub use crate::time::*;
    }
}

// Re-export math library at crate root
pub use glam;
