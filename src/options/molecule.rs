use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::Glyph;

/// Default shape-template radius in scene units.
pub const DEFAULT_GLYPH_RADIUS: f32 = 0.01;

/// Default material color (pure red).
pub const DEFAULT_MOLECULE_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Molecules", inline)]
#[serde(default)]
/// Shape template and material options for molecule species.
pub struct MoleculeOptions {
    /// Primitive instanced at each molecule position.
    #[schemars(title = "Molecule Shape")]
    pub glyph: Glyph,
    /// Shape template radius.
    #[schemars(title = "Shape Radius", range(min = 0.001, max = 1.0), extend("step" = 0.001))]
    pub radius: f32,
    /// Material color for species without an override.
    #[schemars(skip)]
    pub default_color: [f32; 3],
    /// Per-species RGB overrides keyed by species name.
    #[schemars(skip)]
    pub colors: HashMap<String, [f32; 3]>,
}

impl Default for MoleculeOptions {
    fn default() -> Self {
        Self {
            glyph: Glyph::default(),
            radius: DEFAULT_GLYPH_RADIUS,
            default_color: DEFAULT_MOLECULE_COLOR,
            colors: HashMap::new(),
        }
    }
}

impl MoleculeOptions {
    /// Material color for `species`. Falls back to the default color.
    #[must_use]
    pub fn color_for(&self, species: &str) -> [f32; 3] {
        self.colors
            .get(species)
            .copied()
            .unwrap_or(self.default_color)
    }
}
