//! Scene and undo collaborator surface
//!
//! The manipulation core does not own a scene; this module is the minimal
//! contract it consumes. Objects carry a [`CoordinateSystem`] and own their
//! children; committed transforms replace an object's frame wholesale
//! (copy-coordinates semantics). Undo integration is data-only: gestures
//! produce before/after frame pairs, and interpreting them is the caller's
//! business.

use glam::Mat4;

use crate::coords::CoordinateSystem;

/// An object in the scene: a placement frame plus owned children
#[derive(Debug, Clone, Default)]
pub struct SceneObject {
    coords: CoordinateSystem,
    children: Vec<SceneObject>,
}

impl SceneObject {
    pub fn new(coords: CoordinateSystem) -> Self {
        Self {
            coords,
            children: Vec::new(),
        }
    }

    pub fn coords(&self) -> &CoordinateSystem {
        &self.coords
    }

    pub fn coords_mut(&mut self) -> &mut CoordinateSystem {
        &mut self.coords
    }

    /// Replace the placement frame outright
    pub fn set_coords(&mut self, coords: CoordinateSystem) {
        self.coords = coords;
    }

    pub fn children(&self) -> &[SceneObject] {
        &self.children
    }

    /// Add a child, returning its index
    pub fn add_child(&mut self, child: SceneObject) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.children.get_mut(index)
    }

    /// Apply a rigid transform to every descendant, recording one
    /// before/after pair per node under `path`
    pub fn transform_children(
        &mut self,
        transform: &Mat4,
        path: &mut Vec<usize>,
        undo: &mut UndoRecord,
    ) {
        for (i, child) in self.children.iter_mut().enumerate() {
            path.push(i);
            let before = child.coords;
            child.coords.transform_coordinates(transform);
            undo.push(CoordsChange {
                path: path.clone(),
                before,
                after: child.coords,
            });
            child.transform_children(transform, path, undo);
            path.pop();
        }
    }
}

/// Top-level scene object list
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level object, returning its index
    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    pub fn object_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }
}

/// Before/after frame pair for one object, addressed by its index path from
/// the scene root
#[derive(Debug, Clone, PartialEq)]
pub struct CoordsChange {
    pub path: Vec<usize>,
    pub before: CoordinateSystem,
    pub after: CoordinateSystem,
}

/// The undoable outcome of one committed gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoRecord {
    changes: Vec<CoordsChange>,
}

impl UndoRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: CoordsChange) {
        self.changes.push(change);
    }

    pub fn changes(&self) -> &[CoordsChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
