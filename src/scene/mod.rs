//! Host scene capability: the object/mesh/material namespace that frame
//! visuals are built in.
//!
//! The visualization core never touches a global "current scene". Every
//! operation goes through a [`HostScene`] passed in by the caller, so the
//! same controller drives a real modeling host or the in-memory
//! [`MemoryScene`] used by the headless binary and the tests.
//!
//! Handles are opaque ids minted by the scene. They stay valid until the
//! matching `remove_*` call.

mod memory;
pub mod shape;

use std::fmt;

pub use memory::{
    CallCounts, MemoryScene, SceneMaterial, SceneMesh, SceneObject,
};
pub use shape::{Glyph, ShapeMesh};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Scene object handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u32);

/// Mesh datablock handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Material handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// How an object replicates its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InstancingMode {
    /// No instancing; children render once.
    #[default]
    None,
    /// One child copy at every vertex of the parent's mesh.
    OnVertices,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`HostScene`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The host could not allocate the named resource.
    Exhausted(String),
    /// A handle no longer refers to a live resource.
    StaleHandle(&'static str),
    /// Buffer length does not match the mesh's vertex count.
    LengthMismatch {
        /// Floats expected (3 per vertex).
        expected: usize,
        /// Floats supplied.
        actual: usize,
    },
    /// An object with this name already exists.
    NameTaken(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted(name) => {
                write!(f, "could not allocate '{name}'")
            }
            Self::StaleHandle(kind) => write!(f, "stale {kind} handle"),
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "vertex buffer length {actual} does not match expected \
                 {expected}"
            ),
            Self::NameTaken(name) => {
                write!(f, "object name '{name}' already in use")
            }
        }
    }
}

impl std::error::Error for SceneError {}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// Object, mesh and material operations the visualization needs from its
/// host. All calls are synchronous and either succeed or fail with a
/// [`SceneError`].
pub trait HostScene {
    /// Create and link an object, optionally backed by a mesh.
    fn create_object(
        &mut self,
        name: &str,
        mesh: Option<MeshHandle>,
    ) -> Result<ObjectHandle, SceneError>;

    /// Unlink and free an object. Its mesh is left alone.
    fn remove_object(&mut self, object: ObjectHandle)
        -> Result<(), SceneError>;

    /// Look up a linked object by name.
    fn get_object(&self, name: &str) -> Option<ObjectHandle>;

    /// Reparent `child` under `parent`, or detach it with `None`.
    fn set_parent(
        &mut self,
        child: ObjectHandle,
        parent: Option<ObjectHandle>,
    ) -> Result<(), SceneError>;

    /// Create a mesh with `vertex_count` vertices at the origin.
    fn create_mesh(
        &mut self,
        name: &str,
        vertex_count: usize,
    ) -> Result<MeshHandle, SceneError>;

    /// Free a mesh.
    fn remove_mesh(&mut self, mesh: MeshHandle) -> Result<(), SceneError>;

    /// Set vertex coordinates from a flat `[x, y, z, x, y, z, ...]` buffer.
    fn set_vertex_positions(
        &mut self,
        mesh: MeshHandle,
        positions: &[f32],
    ) -> Result<(), SceneError>;

    /// Set vertex normals from a flat `[x, y, z, ...]` buffer.
    fn set_vertex_normals(
        &mut self,
        mesh: MeshHandle,
        normals: &[f32],
    ) -> Result<(), SceneError>;

    /// Set triangle faces as vertex index triples.
    fn set_faces(
        &mut self,
        mesh: MeshHandle,
        faces: &[[u32; 3]],
    ) -> Result<(), SceneError>;

    /// Return the material called `name`, creating a solid one with
    /// `default_color` if it does not exist yet.
    fn get_or_create_material(
        &mut self,
        name: &str,
        default_color: [f32; 3],
    ) -> Result<MaterialHandle, SceneError>;

    /// Append `material` to the mesh's material slots (no-op if present).
    fn attach_material(
        &mut self,
        mesh: MeshHandle,
        material: MaterialHandle,
    ) -> Result<(), SceneError>;

    /// Configure child instancing on an object.
    fn set_instancing(
        &mut self,
        object: ObjectHandle,
        mode: InstancingMode,
        per_vertex_rotation: bool,
    ) -> Result<(), SceneError>;
}
