//! Frame visualization: per-species scene assets and the controller that
//! swaps them as the frame index moves.
//!
//! Each species gets a shape template (`<species>_shape`, created once and
//! kept across frames) and, per shown frame, a point-cloud object
//! (`<species>`) whose vertices carry the molecule positions and whose
//! normals carry the orientations. The template is parented under the
//! point cloud with per-vertex instancing so the host draws one glyph per
//! molecule. All point clouds hang under a single container object.

pub mod assets;
pub mod controller;

pub use assets::{ShapeTemplate, SpeciesAssetCache, SpeciesVisualAsset};
pub use controller::{FrameChange, FrameController, Transition};
