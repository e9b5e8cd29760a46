// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Frame-by-frame molecule visualization for reaction-diffusion simulation
//! output.
//!
//! A simulation writes one plain-text file per time step listing every
//! molecule's species, position and orientation. This crate scans a
//! directory of such files, parses the frame under the current index, and
//! builds one instanced point cloud per species in a host 3D scene,
//! replacing the previous frame's visuals as the index moves.
//!
//! # Key entry points
//!
//! - [`viz::FrameController`] - owns the frame index and drives transitions
//! - [`scene::HostScene`] - the object/mesh/material capability the host
//!   provides; [`scene::MemoryScene`] is an in-memory implementation
//! - [`frame`] - frame file parsing and directory discovery
//! - [`options::Options`] - glyph, colors and playback configuration
//! - [`region::SurfaceRegions`] - named face sets on surface meshes
//!
//! # Frame transitions
//!
//! Every transition unlinks the visuals of the shown frame, then parses
//! and builds the new one. Shape templates survive transitions so each
//! species' glyph mesh and material are created once. Seeking to the frame
//! that is already shown does nothing at all.

pub mod error;
pub mod frame;
pub mod options;
pub mod region;
pub mod scene;
pub mod viz;

#[cfg(test)]
mod test_util;
