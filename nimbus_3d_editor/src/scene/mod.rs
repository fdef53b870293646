//! Scene module
//!
//! The spatial object graph, its components, bounding volumes,
//! visibility culling and scene documents.

mod bounds;
mod components;
mod culler;
mod scene;
mod scene_object;
mod serializer;

pub use bounds::AABB;
pub use components::{
    Component, ComponentMask, ComponentType,
    MaterialComponent, MeshComponent, Transform,
};
pub use culler::{CullStats, FrustumCuller, UnCuller, VisibilityCuller, run_culling_pass};
pub use scene::{DepthFirst, ObjectKey, Scene};
pub use scene_object::SceneObject;
pub use serializer::{
    ComponentRecord, ObjectRecord, SceneDocument,
    SceneStore, FileSceneStore, MemorySceneStore,
    save_scene, load_scene,
};
