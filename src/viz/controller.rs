//! Frame visualization controller.
//!
//! Owns the [`FileIndex`], the species assets, and the host scene, and
//! turns index changes (explicit seeks, next/previous steps, host
//! timeline notifications) into unlink-then-load transitions.
//!
//! A transition to the index that is already loaded is a no-op, and that
//! check is the first thing every transition does. Host frame
//! notifications go further: once the pointer has been moved to a frame,
//! re-announcing that frame does nothing even if it failed to load or was
//! hidden. An explicit [`FrameController::seek`] retries it.
//!
//! Frames that fail to load do not stop playback: the index pointer still
//! moves to the bad frame, nothing is shown for it, and the next step
//! carries on from there.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::assets::{SpeciesAssetCache, SpeciesVisualAsset};
use crate::error::MolVizError;
use crate::frame::{discover, read_frame, FileIndex};
use crate::options::Options;
use crate::scene::HostScene;

/// Outcome of an index change request.
#[derive(Debug)]
pub enum Transition {
    /// No frame files are known.
    NoFrames,
    /// The target was already loaded; nothing happened.
    Unchanged(usize),
    /// The index moved but visualization is disabled.
    Hidden(usize),
    /// The frame at `index` is shown.
    Loaded {
        /// New current index.
        index: usize,
        /// Number of species shown.
        species: usize,
    },
    /// The index moved to `index` but the frame could not be shown.
    Failed {
        /// New current index.
        index: usize,
        /// Why the frame is not shown.
        error: MolVizError,
    },
}

impl Transition {
    /// Index the pointer is at after the transition.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::NoFrames => None,
            Self::Unchanged(i) | Self::Hidden(i) => Some(*i),
            Self::Loaded { index, .. } | Self::Failed { index, .. } => {
                Some(*index)
            }
        }
    }

    /// Whether a frame was freshly loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Response to a host timeline frame change.
#[derive(Debug)]
pub struct FrameChange {
    /// What the controller did.
    pub transition: Transition,
    /// Where the host should write a rendered still, when render-and-save
    /// is on and the frame actually changed. The controller itself never
    /// renders.
    pub render_request: Option<PathBuf>,
}

/// Drives per-frame molecule visuals in a [`HostScene`].
pub struct FrameController<S: HostScene> {
    scene: S,
    options: Options,
    index: FileIndex,
    assets: SpeciesAssetCache,
    loaded: Option<usize>,
    /// Index the last transition moved the pointer to, shown or not.
    visited: Option<usize>,
    file_name: Option<String>,
    rng: StdRng,
}

impl<S: HostScene> FrameController<S> {
    /// Controller over `scene` with OS-seeded orientation jitter.
    pub fn new(scene: S, options: Options) -> Self {
        Self::with_rng(scene, options, StdRng::from_os_rng())
    }

    /// Controller whose volume-molecule jitter is reproducible.
    pub fn with_seed(scene: S, options: Options, seed: u64) -> Self {
        Self::with_rng(scene, options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(scene: S, options: Options, rng: StdRng) -> Self {
        let assets = SpeciesAssetCache::new(
            options.molecules.clone(),
            options.playback.container_name.clone(),
        );
        Self {
            scene,
            options,
            index: FileIndex::default(),
            assets,
            loaded: None,
            visited: None,
            file_name: None,
            rng,
        }
    }

    // -- Accessors --

    /// The host scene.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable host scene access for callers that share it.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Give the scene back.
    #[must_use]
    pub fn into_scene(self) -> S {
        self.scene
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Frame files and playback window.
    #[must_use]
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Index of the frame whose visuals are shown, if any.
    #[must_use]
    pub fn loaded_index(&self) -> Option<usize> {
        self.loaded
    }

    /// Name of the file the index pointer is at, once it has moved there.
    #[must_use]
    pub fn current_file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Species shown right now.
    #[must_use]
    pub fn active_species(&self) -> Vec<&str> {
        self.assets.active_species().collect()
    }

    /// Shown asset for `species`.
    #[must_use]
    pub fn asset(&self, species: &str) -> Option<&SpeciesVisualAsset> {
        self.assets.asset(species)
    }

    /// Species asset cache.
    #[must_use]
    pub fn assets(&self) -> &SpeciesAssetCache {
        &self.assets
    }

    /// Whether frames are shown when the index moves.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.options.playback.enabled
    }

    // -- File set --

    /// Scan `path` (a directory, or a file inside one) for frame files.
    ///
    /// Scan failures are returned and leave the controller untouched. On
    /// success the previous visuals are unlinked and the index is reset to
    /// the full range at frame 0; no frame is loaded yet.
    pub fn set_directory(&mut self, path: &Path) -> Result<(), MolVizError> {
        let index = discover(path)?;
        self.unlink_all();
        self.index = index;
        self.file_name = None;
        Ok(())
    }

    /// Narrow the playback window and re-clamp the current index. A shown
    /// frame that falls outside the new window is replaced; otherwise only
    /// the pointer and the published file name move.
    pub fn set_range(
        &mut self,
        start: usize,
        stop: usize,
    ) -> Result<Transition, MolVizError> {
        let previous = self.index.current();
        self.index.set_range(start, stop)?;
        let current = self.index.current();
        if self.loaded.is_some_and(|l| l != current) {
            return Ok(self.seek(current as i64));
        }
        if current != previous {
            self.visited = None;
            self.file_name = self.index.name(current).map(str::to_owned);
        }
        Ok(Transition::Unchanged(current))
    }

    /// Set the signed next/previous step.
    pub fn set_step(&mut self, step: i64) -> Result<(), MolVizError> {
        self.index.set_step(step)
    }

    // -- Transitions --

    /// Move to frame `target`, clamped into the playback window.
    pub fn seek(&mut self, target: i64) -> Transition {
        let Some(i) = self.index.clamp(target) else {
            return Transition::NoFrames;
        };
        if self.loaded == Some(i) {
            log::debug!("frame {i} already loaded");
            return Transition::Unchanged(i);
        }

        self.unlink_all();
        let _ = self.index.set_current(i as i64);
        self.visited = Some(i);
        self.file_name = self.index.name(i).map(str::to_owned);

        if !self.options.playback.enabled {
            return Transition::Hidden(i);
        }

        match self.load(i) {
            Ok(species) => Transition::Loaded { index: i, species },
            Err(error) => {
                log::error!("frame {i} not shown: {error}");
                Transition::Failed { index: i, error }
            }
        }
    }

    /// Move one step forward (by the configured step).
    pub fn step_next(&mut self) -> Transition {
        self.step(self.index.step())
    }

    /// Move one step backward (by the configured step).
    pub fn step_prev(&mut self) -> Transition {
        self.step(self.index.step().saturating_neg())
    }

    /// Move `delta` frames from the current index, clamped.
    pub fn step(&mut self, delta: i64) -> Transition {
        match self.index.offset(delta) {
            Some(target) => self.seek(target as i64),
            None => Transition::NoFrames,
        }
    }

    /// Host timeline moved to `frame`.
    ///
    /// Same as [`Self::seek`], except that a frame the pointer was already
    /// moved to is not retried. When render-and-save is on and the frame
    /// changed, the response also carries the still's output path.
    pub fn on_frame_changed(&mut self, frame: i64) -> FrameChange {
        if let Some(i) = self.index.clamp(frame) {
            if self.visited == Some(i) {
                log::debug!("frame {i} already visited");
                return FrameChange {
                    transition: Transition::Unchanged(i),
                    render_request: None,
                };
            }
        }
        let transition = self.seek(frame);
        let changed = !matches!(
            transition,
            Transition::Unchanged(_) | Transition::NoFrames
        );
        let render_request = (changed && self.options.playback.render_and_save)
            .then(|| self.options.playback.render_path(frame));
        FrameChange {
            transition,
            render_request,
        }
    }

    /// Remove all shown species. Idempotent.
    pub fn unlink_all(&mut self) {
        self.assets.unlink_all(&mut self.scene);
        self.loaded = None;
        self.visited = None;
    }

    /// Remove everything this controller created, templates included.
    pub fn delete_all(&mut self) {
        self.assets.delete_all(&mut self.scene);
        self.loaded = None;
        self.visited = None;
    }

    /// Turn visualization on or off. Off unlinks everything; on shows the
    /// frame at the current index again.
    pub fn set_enabled(&mut self, enabled: bool) -> Transition {
        self.options.playback.enabled = enabled;
        if enabled {
            self.seek(self.index.current() as i64)
        } else {
            self.unlink_all();
            self.index
                .clamp(self.index.current() as i64)
                .map_or(Transition::NoFrames, Transition::Hidden)
        }
    }

    /// Replace the options. Changed molecule options rebuild every
    /// template; a shown frame is reloaded with them.
    pub fn set_options(&mut self, options: Options) -> Transition {
        let rebuild = options.molecules != self.options.molecules
            || options.playback.container_name
                != self.options.playback.container_name;
        let toggled = options.playback.enabled != self.options.playback.enabled;
        let enabled = options.playback.enabled;
        let was_loaded = self.loaded.is_some();

        if rebuild {
            self.delete_all();
            self.assets = SpeciesAssetCache::new(
                options.molecules.clone(),
                options.playback.container_name.clone(),
            );
        }
        self.options = options;

        if toggled {
            return self.set_enabled(enabled);
        }
        if rebuild && was_loaded {
            return self.seek(self.index.current() as i64);
        }
        self.loaded
            .map_or(Transition::NoFrames, Transition::Unchanged)
    }

    /// Parse frame `i` and show it. Returns the number of species shown.
    ///
    /// Expects the registry to be empty. On a scene failure the species
    /// already shown for this frame are unlinked again, so a failed load
    /// shows nothing.
    fn load(&mut self, i: usize) -> Result<usize, MolVizError> {
        let path = self
            .index
            .path(i)
            .ok_or_else(|| MolVizError::NotFound(self.index.dir().to_path_buf()))?;
        let frame = read_frame(&path, &mut self.rng)?;

        if let Err(e) = self.assets.ensure_and_update(&mut self.scene, &frame) {
            self.assets.unlink_all(&mut self.scene);
            return Err(e);
        }

        self.loaded = Some(i);
        log::info!(
            "frame {i} ({}): {} molecules in {} species",
            path.display(),
            frame.molecule_count(),
            frame.len()
        );
        Ok(frame.len())
    }
}
