//! In-memory [`HostScene`] with call accounting.
//!
//! Flat id-keyed storage with a generation counter bumped on every
//! mutation. Backs the headless viewer and lets tests check exactly which
//! adapter calls a frame transition made.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{
    HostScene, InstancingMode, MaterialHandle, MeshHandle, ObjectHandle,
    SceneError,
};

/// Linked scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Unique object name.
    pub name: String,
    /// Backing mesh, if any.
    pub mesh: Option<MeshHandle>,
    /// Parent object, if any.
    pub parent: Option<ObjectHandle>,
    /// Child instancing mode.
    pub instancing: InstancingMode,
    /// Whether instanced children follow vertex normals.
    pub per_vertex_rotation: bool,
}

/// Mesh datablock.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    /// Mesh name (not required to be unique).
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals.
    pub normals: Vec<Vec3>,
    /// Triangles.
    pub faces: Vec<[u32; 3]>,
    /// Material slots in attachment order.
    pub materials: Vec<MaterialHandle>,
}

/// Solid material.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMaterial {
    /// Handle minted for the material.
    pub handle: MaterialHandle,
    /// Diffuse RGB.
    pub color: [f32; 3],
}

/// Number of calls made per adapter operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `create_object` calls.
    pub create_object: usize,
    /// `remove_object` calls.
    pub remove_object: usize,
    /// `create_mesh` calls.
    pub create_mesh: usize,
    /// `remove_mesh` calls.
    pub remove_mesh: usize,
    /// `get_or_create_material` calls that created a material.
    pub create_material: usize,
    /// `set_parent` calls.
    pub set_parent: usize,
}

/// Reference [`HostScene`] keeping everything in hash maps.
#[derive(Debug, Default)]
pub struct MemoryScene {
    objects: FxHashMap<u32, SceneObject>,
    object_names: FxHashMap<String, u32>,
    meshes: FxHashMap<u32, SceneMesh>,
    materials: FxHashMap<String, SceneMaterial>,
    next_id: u32,
    calls: CallCounts,
    /// Creations still allowed before reporting exhaustion.
    creation_budget: Option<usize>,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
}

impl MemoryScene {
    /// Empty scene with unlimited resources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow only `n` more object/mesh/material creations; the next one
    /// fails with [`SceneError::Exhausted`]. `None` lifts the limit.
    pub fn set_creation_budget(&mut self, n: Option<usize>) {
        self.creation_budget = n;
    }

    /// Adapter call counters.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.calls
    }

    /// Current mutation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Object by handle.
    #[must_use]
    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle.0)
    }

    /// Object by name.
    #[must_use]
    pub fn object_named(&self, name: &str) -> Option<&SceneObject> {
        self.object_names
            .get(name)
            .and_then(|id| self.objects.get(id))
    }

    /// Sorted names of all linked objects.
    #[must_use]
    pub fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.object_names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Handles of objects parented directly under `parent`.
    #[must_use]
    pub fn children_of(&self, parent: ObjectHandle) -> Vec<ObjectHandle> {
        let mut children: Vec<ObjectHandle> = self
            .objects
            .iter()
            .filter(|(_, o)| o.parent == Some(parent))
            .map(|(&id, _)| ObjectHandle(id))
            .collect();
        children.sort_by_key(|h| h.0);
        children
    }

    /// Mesh by handle.
    #[must_use]
    pub fn mesh(&self, handle: MeshHandle) -> Option<&SceneMesh> {
        self.meshes.get(&handle.0)
    }

    /// Number of live meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Material by name.
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&SceneMaterial> {
        self.materials.get(name)
    }

    // -- Mutation helpers --

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn reserve(&mut self, name: &str) -> Result<u32, SceneError> {
        if let Some(budget) = self.creation_budget.as_mut() {
            if *budget == 0 {
                return Err(SceneError::Exhausted(name.to_owned()));
            }
            *budget -= 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.invalidate();
        Ok(id)
    }

    fn object_mut(
        &mut self,
        handle: ObjectHandle,
    ) -> Result<&mut SceneObject, SceneError> {
        self.objects
            .get_mut(&handle.0)
            .ok_or(SceneError::StaleHandle("object"))
    }

    fn mesh_mut(
        &mut self,
        handle: MeshHandle,
    ) -> Result<&mut SceneMesh, SceneError> {
        self.meshes
            .get_mut(&handle.0)
            .ok_or(SceneError::StaleHandle("mesh"))
    }

    fn vertex_buffer(
        mesh: &SceneMesh,
        flat: &[f32],
    ) -> Result<Vec<Vec3>, SceneError> {
        let expected = mesh.positions.len() * 3;
        if flat.len() != expected {
            return Err(SceneError::LengthMismatch {
                expected,
                actual: flat.len(),
            });
        }
        Ok(flat
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect())
    }
}

impl HostScene for MemoryScene {
    fn create_object(
        &mut self,
        name: &str,
        mesh: Option<MeshHandle>,
    ) -> Result<ObjectHandle, SceneError> {
        self.calls.create_object += 1;
        if self.object_names.contains_key(name) {
            return Err(SceneError::NameTaken(name.to_owned()));
        }
        if let Some(m) = mesh {
            if !self.meshes.contains_key(&m.0) {
                return Err(SceneError::StaleHandle("mesh"));
            }
        }
        let id = self.reserve(name)?;
        let _ = self.objects.insert(
            id,
            SceneObject {
                name: name.to_owned(),
                mesh,
                parent: None,
                instancing: InstancingMode::None,
                per_vertex_rotation: false,
            },
        );
        let _ = self.object_names.insert(name.to_owned(), id);
        Ok(ObjectHandle(id))
    }

    fn remove_object(
        &mut self,
        object: ObjectHandle,
    ) -> Result<(), SceneError> {
        self.calls.remove_object += 1;
        let removed = self
            .objects
            .remove(&object.0)
            .ok_or(SceneError::StaleHandle("object"))?;
        let _ = self.object_names.remove(&removed.name);
        // Orphaned children fall back to the scene root.
        for child in self.objects.values_mut() {
            if child.parent == Some(object) {
                child.parent = None;
            }
        }
        self.invalidate();
        Ok(())
    }

    fn get_object(&self, name: &str) -> Option<ObjectHandle> {
        self.object_names.get(name).map(|&id| ObjectHandle(id))
    }

    fn set_parent(
        &mut self,
        child: ObjectHandle,
        parent: Option<ObjectHandle>,
    ) -> Result<(), SceneError> {
        self.calls.set_parent += 1;
        if let Some(p) = parent {
            if !self.objects.contains_key(&p.0) {
                return Err(SceneError::StaleHandle("object"));
            }
        }
        self.object_mut(child)?.parent = parent;
        self.invalidate();
        Ok(())
    }

    fn create_mesh(
        &mut self,
        name: &str,
        vertex_count: usize,
    ) -> Result<MeshHandle, SceneError> {
        self.calls.create_mesh += 1;
        let id = self.reserve(name)?;
        let _ = self.meshes.insert(
            id,
            SceneMesh {
                name: name.to_owned(),
                positions: vec![Vec3::ZERO; vertex_count],
                normals: vec![Vec3::ZERO; vertex_count],
                faces: Vec::new(),
                materials: Vec::new(),
            },
        );
        Ok(MeshHandle(id))
    }

    fn remove_mesh(&mut self, mesh: MeshHandle) -> Result<(), SceneError> {
        self.calls.remove_mesh += 1;
        let _ = self
            .meshes
            .remove(&mesh.0)
            .ok_or(SceneError::StaleHandle("mesh"))?;
        self.invalidate();
        Ok(())
    }

    fn set_vertex_positions(
        &mut self,
        mesh: MeshHandle,
        positions: &[f32],
    ) -> Result<(), SceneError> {
        let target = self.mesh_mut(mesh)?;
        target.positions = Self::vertex_buffer(target, positions)?;
        self.invalidate();
        Ok(())
    }

    fn set_vertex_normals(
        &mut self,
        mesh: MeshHandle,
        normals: &[f32],
    ) -> Result<(), SceneError> {
        let target = self.mesh_mut(mesh)?;
        target.normals = Self::vertex_buffer(target, normals)?;
        self.invalidate();
        Ok(())
    }

    fn set_faces(
        &mut self,
        mesh: MeshHandle,
        faces: &[[u32; 3]],
    ) -> Result<(), SceneError> {
        let target = self.mesh_mut(mesh)?;
        target.faces = faces.to_vec();
        self.invalidate();
        Ok(())
    }

    fn get_or_create_material(
        &mut self,
        name: &str,
        default_color: [f32; 3],
    ) -> Result<MaterialHandle, SceneError> {
        if let Some(existing) = self.materials.get(name) {
            return Ok(existing.handle);
        }
        self.calls.create_material += 1;
        let handle = MaterialHandle(self.reserve(name)?);
        let _ = self.materials.insert(
            name.to_owned(),
            SceneMaterial {
                handle,
                color: default_color,
            },
        );
        Ok(handle)
    }

    fn attach_material(
        &mut self,
        mesh: MeshHandle,
        material: MaterialHandle,
    ) -> Result<(), SceneError> {
        let target = self.mesh_mut(mesh)?;
        if !target.materials.contains(&material) {
            target.materials.push(material);
        }
        self.invalidate();
        Ok(())
    }

    fn set_instancing(
        &mut self,
        object: ObjectHandle,
        mode: InstancingMode,
        per_vertex_rotation: bool,
    ) -> Result<(), SceneError> {
        let target = self.object_mut(object)?;
        target.instancing = mode;
        target.per_vertex_rotation = per_vertex_rotation;
        self.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_are_unique() {
        let mut scene = MemoryScene::new();
        let _ = scene.create_object("a", None).unwrap();
        assert_eq!(
            scene.create_object("a", None),
            Err(SceneError::NameTaken("a".to_owned()))
        );
    }

    #[test]
    fn removing_parent_detaches_children() {
        let mut scene = MemoryScene::new();
        let parent = scene.create_object("p", None).unwrap();
        let child = scene.create_object("c", None).unwrap();
        scene.set_parent(child, Some(parent)).unwrap();
        assert_eq!(scene.children_of(parent), vec![child]);

        scene.remove_object(parent).unwrap();
        assert_eq!(scene.object(child).unwrap().parent, None);
        assert!(scene.get_object("p").is_none());
    }

    #[test]
    fn vertex_buffers_must_match_vertex_count() {
        let mut scene = MemoryScene::new();
        let mesh = scene.create_mesh("m", 2).unwrap();
        assert!(scene
            .set_vertex_positions(mesh, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .is_ok());
        assert_eq!(
            scene.set_vertex_normals(mesh, &[1.0]),
            Err(SceneError::LengthMismatch {
                expected: 6,
                actual: 1
            })
        );
        assert_eq!(
            scene.mesh(mesh).unwrap().positions[1],
            Vec3::new(4.0, 5.0, 6.0)
        );
    }

    #[test]
    fn materials_are_created_once_per_name() {
        let mut scene = MemoryScene::new();
        let a = scene.get_or_create_material("x_mat", [1.0, 0.0, 0.0]).unwrap();
        let b = scene.get_or_create_material("x_mat", [0.0, 1.0, 0.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(scene.calls().create_material, 1);
        assert_eq!(scene.material("x_mat").unwrap().color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn creation_budget_reports_exhaustion() {
        let mut scene = MemoryScene::new();
        scene.set_creation_budget(Some(1));
        assert!(scene.create_mesh("one", 0).is_ok());
        assert_eq!(
            scene.create_mesh("two", 0),
            Err(SceneError::Exhausted("two".to_owned()))
        );
        scene.set_creation_budget(None);
        assert!(scene.create_mesh("three", 0).is_ok());
    }

    #[test]
    fn mutations_bump_generation() {
        let mut scene = MemoryScene::new();
        let before = scene.generation();
        let _ = scene.create_mesh("m", 1).unwrap();
        assert!(scene.generation() > before);
    }
}
