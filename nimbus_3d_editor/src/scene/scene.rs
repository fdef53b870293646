/// Scene: the spatial object graph.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. The hierarchy
/// is expressed with keys only: a parent lists its children, a child
/// records its parent. Destroying an object destroys its whole subtree.
///
/// World transforms are never cached: `world_matrix` walks the parent
/// chain on every call.

use glam::Mat4;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use super::bounds::AABB;
use super::components::ComponentMask;
use super::scene_object::SceneObject;

const SOURCE: &str = "nimbus3d::Scene";

new_key_type! {
    /// Stable handle to a SceneObject
    pub struct ObjectKey;
}

/// Hierarchy of scene objects.
pub struct Scene {
    objects: SlotMap<ObjectKey, SceneObject>,
    /// Top-level objects, in creation order
    roots: Vec<ObjectKey>,
    /// uid -> key
    uid_index: FxHashMap<u64, ObjectKey>,
    next_uid: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            roots: Vec::new(),
            uid_index: FxHashMap::default(),
            next_uid: 1,
        }
    }

    // ===== CREATION / DESTRUCTION =====

    /// Create an object with a default Transform.
    ///
    /// `parent = None` creates a root object.
    pub fn create_object(&mut self, name: &str, parent: Option<ObjectKey>) -> Result<ObjectKey> {
        let uid = self.next_uid;
        self.create_object_with_uid(name, parent, uid)
    }

    /// Create an object with a caller-chosen uid (used when loading documents).
    pub(crate) fn create_object_with_uid(
        &mut self,
        name: &str,
        parent: Option<ObjectKey>,
        uid: u64,
    ) -> Result<ObjectKey> {
        if let Some(parent) = parent {
            if !self.objects.contains_key(parent) {
                engine_bail!(InvalidObject, SOURCE, "Cannot create '{}': parent handle is stale", name);
            }
        }
        if self.uid_index.contains_key(&uid) {
            engine_bail!(InvalidObject, SOURCE, "Cannot create '{}': uid {} already in use", name, uid);
        }
        let Some(next_uid) = uid.checked_add(1) else {
            engine_bail!(InvalidObject, SOURCE, "Cannot create '{}': uid {} is out of range", name, uid);
        };

        let key = self.objects.insert(SceneObject::new(name.to_string(), uid, parent));
        self.uid_index.insert(uid, key);
        self.next_uid = self.next_uid.max(next_uid);

        match parent.and_then(|p| self.objects.get_mut(p)) {
            Some(parent) => parent.push_child(key),
            None => self.roots.push(key),
        }

        Ok(key)
    }

    /// Destroy an object and all its descendants.
    pub fn destroy_object(&mut self, key: ObjectKey) -> Result<()> {
        let Some(parent) = self.objects.get(key).map(|o| o.parent()) else {
            engine_bail!(InvalidObject, SOURCE, "Cannot destroy: stale object handle");
        };

        self.detach(key, parent);

        let subtree: Vec<ObjectKey> = self.depth_first_from(key).collect();
        for removed in &subtree {
            if let Some(object) = self.objects.remove(*removed) {
                self.uid_index.remove(&object.uid());
            }
        }

        engine_debug!(SOURCE, "Destroyed {} object(s)", subtree.len());
        Ok(())
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.roots.clear();
        self.uid_index.clear();
    }

    // ===== HIERARCHY =====

    /// Move an object under a new parent (or to the root list).
    ///
    /// Rejects stale handles and moves that would create a cycle.
    pub fn set_parent(&mut self, key: ObjectKey, new_parent: Option<ObjectKey>) -> Result<()> {
        let Some(old_parent) = self.objects.get(key).map(|o| o.parent()) else {
            engine_bail!(InvalidObject, SOURCE, "Cannot reparent: stale object handle");
        };

        if let Some(parent) = new_parent {
            if !self.objects.contains_key(parent) {
                engine_bail!(InvalidObject, SOURCE, "Cannot reparent: stale parent handle");
            }
            if parent == key || self.is_ancestor(key, parent) {
                engine_bail!(InvalidObject, SOURCE, "Cannot reparent: would create a cycle");
            }
        }

        if old_parent == new_parent {
            return Ok(());
        }

        self.detach(key, old_parent);
        if let Some(object) = self.objects.get_mut(key) {
            object.set_parent_link(new_parent);
        }
        match new_parent.and_then(|p| self.objects.get_mut(p)) {
            Some(parent) => parent.push_child(key),
            None => self.roots.push(key),
        }
        Ok(())
    }

    /// True if `ancestor` is on the parent chain of `key`.
    pub fn is_ancestor(&self, ancestor: ObjectKey, key: ObjectKey) -> bool {
        let mut current = self.objects.get(key).and_then(|o| o.parent());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.objects.get(parent).and_then(|o| o.parent());
        }
        false
    }

    fn detach(&mut self, key: ObjectKey, parent: Option<ObjectKey>) {
        match parent.and_then(|p| self.objects.get_mut(p)) {
            Some(parent) => parent.remove_child(key),
            None => self.roots.retain(|root| *root != key),
        }
    }

    // ===== ACCESS =====

    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn roots(&self) -> &[ObjectKey] {
        &self.roots
    }

    /// Iterate over all objects in storage order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = (ObjectKey, &mut SceneObject)> {
        self.objects.iter_mut()
    }

    /// Every object, parents before children, roots in creation order.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        let mut stack: Vec<ObjectKey> = self.roots.clone();
        stack.reverse();
        DepthFirst { scene: self, stack }
    }

    /// `key` and its descendants, parents before children.
    pub fn depth_first_from(&self, key: ObjectKey) -> DepthFirst<'_> {
        let stack = if self.objects.contains_key(key) { vec![key] } else { Vec::new() };
        DepthFirst { scene: self, stack }
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectKey> {
        self.depth_first().find(|key| self.objects[*key].name() == name)
    }

    pub fn find_by_uid(&self, uid: u64) -> Option<ObjectKey> {
        self.uid_index.get(&uid).copied()
    }

    /// Objects carrying every capability in `mask`, in depth-first order.
    pub fn objects_with(&self, mask: ComponentMask) -> Vec<ObjectKey> {
        self.depth_first()
            .filter(|key| self.objects[*key].capabilities().contains(mask))
            .collect()
    }

    // ===== SPATIAL =====

    /// Local transform composed with every ancestor's, recomputed on each call.
    pub fn world_matrix(&self, key: ObjectKey) -> Option<Mat4> {
        let object = self.objects.get(key)?;
        let mut matrix = object.transform().local_matrix();
        let mut current = object.parent();

        while let Some(parent_key) = current {
            let parent = self.objects.get(parent_key)?;
            matrix = parent.transform().local_matrix() * matrix;
            current = parent.parent();
        }

        Some(matrix)
    }

    /// Local bounding box transformed into world space.
    pub fn world_bounds(&self, key: ObjectKey) -> Option<AABB> {
        let local = *self.objects.get(key)?.bounding_box()?;
        Some(local.transformed(&self.world_matrix(key)?))
    }
}

/// Depth-first iterator over object keys.
pub struct DepthFirst<'a> {
    scene: &'a Scene,
    stack: Vec<ObjectKey>,
}

impl Iterator for DepthFirst<'_> {
    type Item = ObjectKey;

    fn next(&mut self) -> Option<ObjectKey> {
        let key = self.stack.pop()?;
        if let Some(object) = self.scene.objects.get(key) {
            self.stack.extend(object.children().iter().rev().copied());
        }
        Some(key)
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
