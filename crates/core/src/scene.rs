//! Scene graph state: renderable objects, transforms, and materials.
//!
//! The graph is a flat `Vec` so iteration order is stable; picking
//! tie-breaks fall back to this order. Objects are created fully formed
//! (geometry kind, material, and bounds assigned at insertion) and never
//! destroyed during a session.

use glam::Vec3;

/// Unique identifier for a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);

/// Shape of a primitive mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveShape {
    Sphere,
    Cone,
    Cube,
}

/// What kind of geometry an object renders with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryKind {
    Primitive(PrimitiveShape),
    /// Root of the asynchronously loaded glTF model.
    LoadedModel,
    /// One extruded character of the label text. `index` is the glyph's
    /// position in the string and doubles as its horizontal layout offset.
    TextGlyph { ch: char, index: usize },
    WavePlane,
}

/// Position plus Euler rotation (radians, XYZ order), matching how the
/// demo mutates rotation axes independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// A clipping plane: geometry where `normal · p + constant < 0` is
/// discarded by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    pub normal: Vec3,
    pub constant: f32,
}

impl ClipPlane {
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }
}

/// Material state the interaction core can mutate: a flat color plus
/// per-object clip planes.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub clip_planes: Vec<ClipPlane>,
}

impl Material {
    pub fn colored(color: Vec3) -> Self {
        Self {
            color,
            clip_planes: Vec::new(),
        }
    }

    pub fn with_clip_plane(mut self, plane: ClipPlane) -> Self {
        self.clip_planes.push(plane);
        self
    }
}

/// A renderable object. Picking uses the bounding sphere
/// (`transform.position`, `bounding_radius`).
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub transform: Transform,
    pub material: Material,
    pub kind: GeometryKind,
    pub bounding_radius: f32,
}

impl SceneObject {
    pub fn is_text_glyph(&self) -> bool {
        matches!(self.kind, GeometryKind::TextGlyph { .. })
    }
}

/// Owner of all scene objects.
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    next_id: u32,
    model_root: Option<ObjectId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed object, returning its id.
    pub fn insert(
        &mut self,
        kind: GeometryKind,
        transform: Transform,
        material: Material,
        bounding_radius: f32,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject {
            id,
            transform,
            material,
            kind,
            bounding_radius,
        });
        id
    }

    /// Insert the loaded model's root object. Called once, after the
    /// asset load resolves.
    pub fn insert_model_root(
        &mut self,
        transform: Transform,
        material: Material,
        bounding_radius: f32,
    ) -> ObjectId {
        let id = self.insert(GeometryKind::LoadedModel, transform, material, bounding_radius);
        self.model_root = Some(id);
        id
    }

    /// Id of the loaded model root, if the load has resolved.
    pub fn model_root(&self) -> Option<ObjectId> {
        self.model_root
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Objects in insertion (traversal) order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(scene: &mut SceneGraph, ch: char, index: usize) -> ObjectId {
        scene.insert(
            GeometryKind::TextGlyph { ch, index },
            Transform::at(Vec3::new(index as f32, 0.0, 0.0)),
            Material::colored(Vec3::new(0.0, 1.0, 0.0)),
            0.7,
        )
    }

    #[test]
    fn insertion_order_is_stable() {
        let mut scene = SceneGraph::new();
        let a = glyph(&mut scene, 'a', 0);
        let b = glyph(&mut scene, 'b', 1);
        let ids: Vec<ObjectId> = scene.objects().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn model_root_is_absent_until_load_resolves() {
        let mut scene = SceneGraph::new();
        glyph(&mut scene, 'a', 0);
        assert_eq!(scene.model_root(), None);

        let root = scene.insert_model_root(
            Transform::at(Vec3::new(-5.0, 0.0, 0.0)),
            Material::colored(Vec3::ONE),
            2.0,
        );
        assert_eq!(scene.model_root(), Some(root));
        assert_eq!(scene.get(root).unwrap().kind, GeometryKind::LoadedModel);
    }

    #[test]
    fn get_mut_can_recolor() {
        let mut scene = SceneGraph::new();
        let id = glyph(&mut scene, 'x', 3);
        scene.get_mut(id).unwrap().material.color = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(
            scene.get(id).unwrap().material.color,
            Vec3::new(1.0, 0.0, 0.0)
        );
    }
}
