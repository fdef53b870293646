/// Visibility culling strategies.
///
/// A VisibilityCuller decides, once per frame, which active mesh objects
/// are render-eligible from the active camera. The decision is written
/// into each object's MeshComponent and consumed by the draw pass.

use crate::camera::{CameraComponent, Frustum, FrustumTest};
use crate::engine_trace;
use super::components::ComponentMask;
use super::scene::{ObjectKey, Scene};

const SOURCE: &str = "nimbus3d::Culling";

/// Counters produced by one culling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Objects whose bounds were classified
    pub tested: usize,
    pub inside: usize,
    pub intersecting: usize,
    pub outside: usize,
}

impl CullStats {
    /// Objects kept by the geometric test.
    pub fn kept(&self) -> usize {
        self.inside + self.intersecting
    }
}

/// Strategy for deciding render eligibility.
///
/// `&mut self` allows stateful implementations (caching, statistics).
pub trait VisibilityCuller {
    fn cull(&mut self, scene: &mut Scene, frustum: &Frustum) -> CullStats;
}

/// Classifies world-space bounds against the frustum.
///
/// Only OUTSIDE hides an object; INSIDE and INTERSECT both keep it.
/// Mesh objects without bounds cannot be tested and stay eligible.
#[derive(Debug, Default)]
pub struct FrustumCuller;

impl FrustumCuller {
    pub fn new() -> Self {
        Self
    }
}

impl VisibilityCuller for FrustumCuller {
    fn cull(&mut self, scene: &mut Scene, frustum: &Frustum) -> CullStats {
        let mut stats = CullStats::default();

        let decisions: Vec<(ObjectKey, bool)> = active_meshes(scene)
            .into_iter()
            .map(|key| {
                let Some(bounds) = scene.world_bounds(key) else {
                    return (key, true);
                };
                stats.tested += 1;
                match frustum.contains_box(&bounds) {
                    FrustumTest::Inside => {
                        stats.inside += 1;
                        (key, true)
                    }
                    FrustumTest::Intersect => {
                        stats.intersecting += 1;
                        (key, true)
                    }
                    FrustumTest::Outside => {
                        stats.outside += 1;
                        (key, false)
                    }
                }
            })
            .collect();

        apply(scene, &decisions);
        engine_trace!(SOURCE, "Culled {} object(s): {} in, {} intersecting, {} out",
            stats.tested, stats.inside, stats.intersecting, stats.outside);
        stats
    }
}

/// Forces every active mesh object eligible, ignoring the frustum.
///
/// Used when culling is disabled on the active camera, so objects hidden
/// by an earlier pass reappear.
#[derive(Debug, Default)]
pub struct UnCuller;

impl UnCuller {
    pub fn new() -> Self {
        Self
    }
}

impl VisibilityCuller for UnCuller {
    fn cull(&mut self, scene: &mut Scene, _frustum: &Frustum) -> CullStats {
        let decisions: Vec<(ObjectKey, bool)> = active_meshes(scene)
            .into_iter()
            .map(|key| (key, true))
            .collect();
        apply(scene, &decisions);
        CullStats::default()
    }
}

/// Run the pass matching the camera's culling flag.
pub fn run_culling_pass(scene: &mut Scene, camera: &CameraComponent) -> CullStats {
    if camera.culling_enabled() {
        FrustumCuller.cull(scene, camera.frustum())
    } else {
        UnCuller.cull(scene, camera.frustum())
    }
}

fn active_meshes(scene: &Scene) -> Vec<ObjectKey> {
    scene
        .objects_with(ComponentMask::MESH)
        .into_iter()
        .filter(|key| scene.get(*key).is_some_and(|o| o.is_active()))
        .collect()
}

fn apply(scene: &mut Scene, decisions: &[(ObjectKey, bool)]) {
    for (key, render) in decisions {
        if let Some(mesh) = scene.get_mut(*key).and_then(|o| o.mesh_mut()) {
            mesh.set_render_eligible(*render);
        }
    }
}

#[cfg(test)]
#[path = "culler_tests.rs"]
mod tests;
