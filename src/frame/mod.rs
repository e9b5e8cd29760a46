//! Per-frame molecule data: the records a frame file holds, their per-species
//! grouping, and the ordered set of frame files in a directory.
//!
//! A frame file is plain text, one molecule per line:
//!
//! ```text
//! <species> <px> <py> <pz> <ox> <oy> <oz>
//! ```
//!
//! Records are grouped into one [`SpeciesFrameBatch`] per species, in order
//! of first appearance. See [`parser`] for the reading rules and
//! [`discovery`] for how frame files are found and ordered.

pub mod discovery;
pub mod parser;

pub use discovery::{discover, resolve_directory, FileIndex};
use glam::Vec3;
pub use parser::{parse_frame, read_frame};
use rustc_hash::FxHashMap;

/// Whether a species lives on a surface or diffuses through a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoleculeKind {
    /// Surface-bound ("2D"); the stored orientation is meaningful.
    Surface,
    /// Free in volume ("3D"); orientation is cosmetic jitter.
    Volume,
}

impl MoleculeKind {
    /// Classify from a species' first orientation vector: exactly zero
    /// means surface-bound, anything else is volume.
    #[must_use]
    pub fn classify(orientation: Vec3) -> Self {
        if orientation == Vec3::ZERO {
            Self::Surface
        } else {
            Self::Volume
        }
    }

    /// Short label as shown in molecule listings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Surface => "2D",
            Self::Volume => "3D",
        }
    }
}

/// One parsed line of a frame file.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRecord {
    /// Species name (first token).
    pub species: String,
    /// Position triple.
    pub position: Vec3,
    /// Orientation triple as written in the file.
    pub orientation: Vec3,
}

/// Every record of one species in one frame, in file order.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesFrameBatch {
    /// Species name.
    pub species: String,
    /// Classification taken from the first record.
    pub kind: MoleculeKind,
    /// Positions, one per record.
    pub positions: Vec<Vec3>,
    /// Orientations, one per record. For volume species these are the
    /// synthesized jitter, not the file values.
    pub orientations: Vec<Vec3>,
}

impl SpeciesFrameBatch {
    /// Number of molecules of this species in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the batch has no molecules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions flattened to `[x, y, z, ...]`.
    #[must_use]
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Orientations flattened to `[x, y, z, ...]`.
    #[must_use]
    pub fn flat_orientations(&self) -> &[f32] {
        bytemuck::cast_slice(&self.orientations)
    }
}

/// All species batches of one frame, keyed by name, in first-occurrence
/// order.
#[derive(Clone, Debug, Default)]
pub struct FrameBatches {
    batches: Vec<SpeciesFrameBatch>,
    index: FxHashMap<String, usize>,
}

impl FrameBatches {
    /// Empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, creating the species batch on first sight.
    ///
    /// `jitter` supplies the substitute orientation for volume species.
    pub fn push(
        &mut self,
        record: FrameRecord,
        jitter: impl FnOnce() -> Vec3,
    ) {
        let idx = match self.index.get(&record.species) {
            Some(&idx) => idx,
            None => {
                let idx = self.batches.len();
                self.batches.push(SpeciesFrameBatch {
                    species: record.species.clone(),
                    kind: MoleculeKind::classify(record.orientation),
                    positions: Vec::new(),
                    orientations: Vec::new(),
                });
                let _ = self.index.insert(record.species, idx);
                idx
            }
        };
        let batch = &mut self.batches[idx];
        let orientation = match batch.kind {
            MoleculeKind::Surface => record.orientation,
            MoleculeKind::Volume => jitter(),
        };
        batch.positions.push(record.position);
        batch.orientations.push(orientation);
    }

    /// Batch for `species`, if present in this frame.
    #[must_use]
    pub fn get(&self, species: &str) -> Option<&SpeciesFrameBatch> {
        self.index.get(species).map(|&i| &self.batches[i])
    }

    /// Batches in first-occurrence order.
    pub fn iter(&self) -> std::slice::Iter<'_, SpeciesFrameBatch> {
        self.batches.iter()
    }

    /// Species names in first-occurrence order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.batches.iter().map(|b| b.species.as_str())
    }

    /// Number of distinct species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether the frame has no molecules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Total molecule count over all species.
    #[must_use]
    pub fn molecule_count(&self) -> usize {
        self.batches.iter().map(SpeciesFrameBatch::len).sum()
    }
}

impl<'a> IntoIterator for &'a FrameBatches {
    type Item = &'a SpeciesFrameBatch;
    type IntoIter = std::slice::Iter<'a, SpeciesFrameBatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
