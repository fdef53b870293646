//! Nimbus3D headless demo
//!
//! Imports a procedural city, renders a few frames from the editor camera,
//! plays, single-steps and stops a session, then prints culling statistics.

use std::path::Path;
use glam::Vec3;
use nimbus_3d_editor::nimbus3d::{Application, Result};
use nimbus_3d_editor::nimbus3d::camera::RenderView;
use nimbus_3d_editor::nimbus3d::config::EngineConfig;
use nimbus_3d_editor::nimbus3d::modules::{AssetLoader, DrawPass, ImportedMesh, ImportedNode};
use nimbus_3d_editor::nimbus3d::scene::{AABB, MaterialComponent, Scene, Transform};
use nimbus_3d_editor::{engine_error, engine_info};

const SOURCE: &str = "nimbus3d_demo";

/// Frame delta used by the demo (60 Hz).
const FRAME_DT: f32 = 1.0 / 60.0;

/// Generates a grid of buildings instead of reading the file.
struct CityLoader {
    rows: u32,
    columns: u32,
    spacing: f32,
}

impl AssetLoader for CityLoader {
    fn load(&mut self, path: &Path) -> Result<ImportedNode> {
        engine_info!(SOURCE, "Generating city for '{}'", path.display());

        let blocks = (0..self.rows)
            .map(|row| {
                let meshes = (0..self.columns)
                    .map(|column| {
                        let height = 1.0 + ((row * 7 + column * 3) % 5) as f32;
                        let offset = Vec3::new(column as f32 * self.spacing, 0.0, 0.0);
                        ImportedMesh {
                            name: format!("Building_{}_{}", row, column),
                            vertex_count: 24,
                            index_count: 36,
                            bounds: Some(AABB::new(
                                offset + Vec3::new(-1.0, 0.0, -1.0),
                                offset + Vec3::new(1.0, height, 1.0),
                            )),
                            material: Some(MaterialComponent::new("Concrete")),
                        }
                    })
                    .collect();

                ImportedNode {
                    name: format!("Block_{}", row),
                    transform: Transform::from_position(Vec3::new(0.0, 0.0, row as f32 * self.spacing)),
                    meshes,
                    children: Vec::new(),
                }
            })
            .collect();

        Ok(ImportedNode {
            name: "City".to_string(),
            transform: Transform::from_position(Vec3::new(-20.0, 0.0, 5.0)),
            meshes: Vec::new(),
            children: blocks,
        })
    }
}

/// Logs what would be drawn.
#[derive(Default)]
struct SummaryDrawPass {
    frames: u64,
}

impl DrawPass for SummaryDrawPass {
    fn draw(&mut self, _scene: &Scene, view: &RenderView) -> Result<()> {
        self.frames += 1;
        let stats = view.stats();
        engine_info!(SOURCE,
            "Frame {}: {} camera, {} visible ({} inside, {} intersecting, {} culled), {} debug lines",
            self.frames, view.role(), view.visible_count(),
            stats.inside, stats.intersecting, stats.outside, view.debug_lines().len());
        Ok(())
    }
}

fn run_frames(app: &mut Application, count: u32) {
    for _ in 0..count {
        app.update(FRAME_DT);
    }
}

fn run() -> Result<()> {
    let loader = CityLoader { rows: 8, columns: 8, spacing: 6.0 };
    let mut app = Application::with_default_modules(
        EngineConfig::default(),
        Box::new(loader),
        Box::new(SummaryDrawPass::default()),
    )?;
    app.init()?;

    app.drop_file("procedural/city.obj");
    run_frames(&mut app, 2);

    engine_info!(SOURCE, "Entering play mode");
    app.request_play();
    run_frames(&mut app, 3);

    app.request_pause();
    run_frames(&mut app, 2);
    app.request_step();
    run_frames(&mut app, 2);
    engine_info!(SOURCE, "State {} after single step, game time {:.3}s",
        app.state(), app.context().clock.game().time);

    app.request_stop();
    run_frames(&mut app, 2);

    let real = app.context().clock.real();
    engine_info!(SOURCE, "{} frames, {:.3}s of real time, {} objects in scene",
        real.frame_count, real.run_time, app.scene().len());

    app.clean_up()
}

fn main() {
    if let Err(err) = run() {
        engine_error!(SOURCE, "Demo failed: {}", err);
        std::process::exit(1);
    }
}
