//! Per-species scene assets.
//!
//! Each species gets three named things in the host scene:
//!
//! - `<species>_shape`: shape template object + mesh, created once and
//!   reused for the rest of the session.
//! - `<species>_mat`: material on the template, fetched or created once.
//! - `<species>` backed by `<species>_pos`: the point cloud, rebuilt every
//!   frame with one vertex per molecule. The template is parented under it
//!   and instanced on its vertices.
//!
//! All species objects hang under one container object (default name
//! `molecules`), created lazily the first time anything is shown.
//!
//! Species names share the object namespace with the container and the
//! templates, so a frame naming a species after the container, after any
//! `*_shape` object, or after an object this cache did not create is
//! rejected before anything is built.
//!
//! Creation is all-or-nothing per species: a species enters the active
//! registry only after every scene call for it succeeded, and whatever was
//! created before a failure is removed again.

use rustc_hash::FxHashMap;

use crate::error::MolVizError;
use crate::frame::{FrameBatches, MoleculeKind, SpeciesFrameBatch};
use crate::options::MoleculeOptions;
use crate::scene::{
    HostScene, InstancingMode, MaterialHandle, MeshHandle, ObjectHandle,
    SceneError, ShapeMesh,
};

/// Reusable shape template of one species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeTemplate {
    /// `<species>_shape` object.
    pub object: ObjectHandle,
    /// `<species>_shape` mesh.
    pub mesh: MeshHandle,
    /// `<species>_mat` material.
    pub material: MaterialHandle,
}

/// A species currently shown in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesVisualAsset {
    /// Species name.
    pub species: String,
    /// Surface or volume, from this frame's records.
    pub kind: MoleculeKind,
    /// Template instanced on the point cloud.
    pub template: ShapeTemplate,
    /// `<species>` object holding the point cloud.
    pub object: ObjectHandle,
    /// `<species>_pos` mesh, replaced every frame.
    pub point_cloud: MeshHandle,
    /// Container the species object is parented under.
    pub parent: ObjectHandle,
    /// Number of molecules (point cloud vertices).
    pub count: usize,
}

/// Undo log for a half-built species.
#[derive(Default)]
struct Rollback {
    detach: Vec<ObjectHandle>,
    objects: Vec<ObjectHandle>,
    meshes: Vec<MeshHandle>,
}

impl Rollback {
    fn undo<S: HostScene + ?Sized>(self, scene: &mut S) {
        for object in self.detach {
            warn_on_err(scene.set_parent(object, None), "detach");
        }
        for object in self.objects.into_iter().rev() {
            warn_on_err(scene.remove_object(object), "remove object");
        }
        for mesh in self.meshes.into_iter().rev() {
            warn_on_err(scene.remove_mesh(mesh), "remove mesh");
        }
    }
}

fn warn_on_err(result: Result<(), SceneError>, what: &str) {
    if let Err(e) = result {
        log::warn!("{what} failed during cleanup: {e}");
    }
}

/// Suffix of shape template object and mesh names.
const SHAPE_SUFFIX: &str = "_shape";

/// Species name → template cache plus the registry of species shown in
/// the current frame.
#[derive(Debug)]
pub struct SpeciesAssetCache {
    options: MoleculeOptions,
    container_name: String,
    shape: ShapeMesh,
    templates: FxHashMap<String, ShapeTemplate>,
    active: Vec<SpeciesVisualAsset>,
    container: Option<ObjectHandle>,
    /// Species objects whose removal failed during unlink.
    leftovers: FxHashMap<String, ObjectHandle>,
}

impl SpeciesAssetCache {
    /// Empty cache building templates from `options`.
    #[must_use]
    pub fn new(options: MoleculeOptions, container_name: String) -> Self {
        let shape = ShapeMesh::build(options.glyph, options.radius);
        Self {
            options,
            container_name,
            shape,
            templates: FxHashMap::default(),
            active: Vec::new(),
            container: None,
            leftovers: FxHashMap::default(),
        }
    }

    /// Options templates are built from.
    #[must_use]
    pub fn options(&self) -> &MoleculeOptions {
        &self.options
    }

    /// Species shown right now, in load order.
    #[must_use]
    pub fn active(&self) -> &[SpeciesVisualAsset] {
        &self.active
    }

    /// Names of the species shown right now.
    pub fn active_species(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(|a| a.species.as_str())
    }

    /// Shown asset for `species`.
    #[must_use]
    pub fn asset(&self, species: &str) -> Option<&SpeciesVisualAsset> {
        self.active.iter().find(|a| a.species == species)
    }

    /// Cached template for `species`, shown or not.
    #[must_use]
    pub fn template(&self, species: &str) -> Option<&ShapeTemplate> {
        self.templates.get(species)
    }

    /// Container object, once created.
    #[must_use]
    pub fn container(&self) -> Option<ObjectHandle> {
        self.container
    }

    /// Show every species of `frame`.
    ///
    /// Expects the registry to be empty (the caller unlinks the previous
    /// frame first). Stops at the first species whose scene resources
    /// cannot be created; species committed before that stay registered
    /// so a following [`Self::unlink_all`] removes them.
    ///
    /// Name collisions are checked for every species first and fail the
    /// frame with [`MolVizError::NameCollision`] before the scene is
    /// touched.
    pub fn ensure_and_update<S: HostScene + ?Sized>(
        &mut self,
        scene: &mut S,
        frame: &FrameBatches,
    ) -> Result<(), MolVizError> {
        if frame.is_empty() {
            return Ok(());
        }
        for species in frame.species() {
            self.check_names(scene, species)?;
        }
        let container = self.ensure_container(scene)?;
        for batch in frame {
            let template = self.ensure_template(scene, &batch.species)?;
            let leftover = self.leftovers.get(&batch.species).copied();
            let asset =
                build_point_cloud(scene, batch, template, container, leftover)?;
            let _ = self.leftovers.remove(&batch.species);
            log::debug!(
                "{} {} molecules of '{}'",
                asset.count,
                batch.kind.label(),
                asset.species
            );
            self.active.push(asset);
        }
        Ok(())
    }

    /// Remove every shown species from the scene and empty the registry.
    ///
    /// Templates are detached but kept. Safe to call when nothing is shown.
    /// Scene errors are logged and skipped so the registry always ends up
    /// empty.
    pub fn unlink_all<S: HostScene + ?Sized>(&mut self, scene: &mut S) {
        for asset in self.active.drain(..) {
            warn_on_err(scene.set_parent(asset.template.object, None), "detach");
            if let Err(e) = scene.remove_object(asset.object) {
                log::warn!("remove object failed during cleanup: {e}");
                let _ = self.leftovers.insert(asset.species, asset.object);
            }
            warn_on_err(scene.remove_mesh(asset.point_cloud), "remove mesh");
        }
    }

    /// [`Self::unlink_all`], then also remove cached templates and the
    /// container so the next frame recreates everything. Materials stay in
    /// the host's name-keyed material table and are picked up again.
    pub fn delete_all<S: HostScene + ?Sized>(&mut self, scene: &mut S) {
        self.unlink_all(scene);
        for (_, object) in self.leftovers.drain() {
            warn_on_err(scene.remove_object(object), "remove object");
        }
        for (_, template) in self.templates.drain() {
            warn_on_err(scene.remove_object(template.object), "remove object");
            warn_on_err(scene.remove_mesh(template.mesh), "remove mesh");
        }
        if let Some(container) = self.container.take() {
            warn_on_err(scene.remove_object(container), "remove object");
        }
    }

    /// Reject `species` when its object name is taken by something other
    /// than this cache's own object for it.
    fn check_names<S: HostScene + ?Sized>(
        &self,
        scene: &S,
        species: &str,
    ) -> Result<(), MolVizError> {
        let collision = |object: &str| MolVizError::NameCollision {
            species: species.to_owned(),
            object: object.to_owned(),
        };
        if species == self.container_name {
            return Err(collision(&self.container_name));
        }
        if species.ends_with(SHAPE_SUFFIX) {
            return Err(collision(species));
        }
        if let Some(found) = scene.get_object(species) {
            if self.leftovers.get(species) != Some(&found) {
                return Err(collision(species));
            }
        }
        let shape_name = format!("{species}{SHAPE_SUFFIX}");
        if let Some(found) = scene.get_object(&shape_name) {
            let own = self.templates.get(species).map(|t| t.object);
            if own != Some(found) {
                return Err(collision(&shape_name));
            }
        }
        Ok(())
    }

    fn ensure_container<S: HostScene + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<ObjectHandle, SceneError> {
        let live = scene.get_object(&self.container_name);
        if let Some(handle) = live {
            self.container = Some(handle);
            return Ok(handle);
        }
        let handle = scene.create_object(&self.container_name, None)?;
        self.container = Some(handle);
        Ok(handle)
    }

    /// Cached template for `species`, or a new one. A cached template
    /// whose object vanished from the scene is rebuilt.
    fn ensure_template<S: HostScene + ?Sized>(
        &mut self,
        scene: &mut S,
        species: &str,
    ) -> Result<ShapeTemplate, SceneError> {
        let shape_name = format!("{species}{SHAPE_SUFFIX}");
        if let Some(&template) = self.templates.get(species) {
            if scene.get_object(&shape_name) == Some(template.object) {
                return Ok(template);
            }
            log::warn!("shape template '{shape_name}' went missing; rebuilding");
            let _ = self.templates.remove(species);
        }

        let color = self.options.color_for(species);
        let template = create_template(scene, species, &self.shape, color)?;
        let _ = self.templates.insert(species.to_owned(), template);
        log::debug!("created shape template '{shape_name}'");
        Ok(template)
    }
}

fn create_template<S: HostScene + ?Sized>(
    scene: &mut S,
    species: &str,
    shape: &ShapeMesh,
    color: [f32; 3],
) -> Result<ShapeTemplate, SceneError> {
    let mut undo = Rollback::default();
    let result = try_create_template(scene, species, shape, color, &mut undo);
    if result.is_err() {
        undo.undo(scene);
    }
    result
}

fn try_create_template<S: HostScene + ?Sized>(
    scene: &mut S,
    species: &str,
    shape: &ShapeMesh,
    color: [f32; 3],
    undo: &mut Rollback,
) -> Result<ShapeTemplate, SceneError> {
    let shape_name = format!("{species}{SHAPE_SUFFIX}");
    let mesh = scene.create_mesh(&shape_name, shape.vertex_count())?;
    undo.meshes.push(mesh);
    scene.set_vertex_positions(mesh, shape.flat_positions())?;
    scene.set_faces(mesh, &shape.faces)?;

    let material =
        scene.get_or_create_material(&format!("{species}_mat"), color)?;
    scene.attach_material(mesh, material)?;

    let object = scene.create_object(&shape_name, Some(mesh))?;
    Ok(ShapeTemplate {
        object,
        mesh,
        material,
    })
}

fn build_point_cloud<S: HostScene + ?Sized>(
    scene: &mut S,
    batch: &SpeciesFrameBatch,
    template: ShapeTemplate,
    container: ObjectHandle,
    leftover: Option<ObjectHandle>,
) -> Result<SpeciesVisualAsset, SceneError> {
    let mut undo = Rollback::default();
    let result = try_build_point_cloud(
        scene, batch, template, container, leftover, &mut undo,
    );
    if result.is_err() {
        undo.undo(scene);
    }
    result
}

fn try_build_point_cloud<S: HostScene + ?Sized>(
    scene: &mut S,
    batch: &SpeciesFrameBatch,
    template: ShapeTemplate,
    container: ObjectHandle,
    leftover: Option<ObjectHandle>,
    undo: &mut Rollback,
) -> Result<SpeciesVisualAsset, SceneError> {
    let name = batch.species.as_str();

    // Our own object from an unlink that could not remove it.
    if let Some(stale) = leftover {
        if scene.get_object(name) == Some(stale) {
            scene.remove_object(stale)?;
        }
    }

    let mesh = scene.create_mesh(&format!("{name}_pos"), batch.len())?;
    undo.meshes.push(mesh);
    scene.set_vertex_positions(mesh, batch.flat_positions())?;
    scene.set_vertex_normals(mesh, batch.flat_orientations())?;

    let object = scene.create_object(name, Some(mesh))?;
    undo.objects.push(object);

    scene.set_parent(template.object, Some(object))?;
    undo.detach.push(template.object);
    scene.set_instancing(object, InstancingMode::OnVertices, true)?;
    scene.set_parent(object, Some(container))?;

    Ok(SpeciesVisualAsset {
        species: name.to_owned(),
        kind: batch.kind,
        template,
        object,
        point_cloud: mesh,
        parent: container,
        count: batch.len(),
    })
}
