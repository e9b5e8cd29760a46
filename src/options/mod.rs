//! Visualization options with TOML preset support.
//!
//! Molecule appearance (glyph, radius, colors) and playback behaviour
//! (visibility toggle, render-on-frame-change, container name) live here.
//! Options serialize to/from TOML; partial files fill the rest with
//! defaults.

mod molecule;
mod playback;

use std::path::Path;

pub use molecule::MoleculeOptions;
pub use playback::PlaybackOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MolVizError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[playback]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Molecule glyph and material options.
    pub molecules: MoleculeOptions,
    /// Frame playback options.
    pub playback: PlaybackOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MolVizError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MolVizError::from_io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, MolVizError> {
        toml::from_str(content)
            .map_err(|e| MolVizError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MolVizError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolVizError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MolVizError::from_io(parent, e))?;
        }
        std::fs::write(path, content).map_err(|e| MolVizError::from_io(path, e))
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Glyph;
    use crate::test_util::TempDir;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[molecules]
glyph = "cube"

[molecules.colors]
ca = [0.0, 1.0, 0.0]
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.molecules.glyph, Glyph::Cube);
        assert_eq!(opts.molecules.color_for("ca"), [0.0, 1.0, 0.0]);
        // Everything else should be default
        assert_eq!(opts.molecules.radius, 0.01);
        assert_eq!(opts.molecules.color_for("other"), [1.0, 0.0, 0.0]);
        assert!(opts.playback.enabled);
        assert_eq!(opts.playback.container_name, "molecules");
    }

    #[test]
    fn bad_toml_is_options_parse_error() {
        assert!(matches!(
            Options::from_toml("[molecules]\nradius = \"big\""),
            Err(MolVizError::OptionsParse(_))
        ));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = TempDir::new("presets");
        let mut opts = Options::default();
        opts.playback.render_and_save = true;
        opts.save(&dir.path().join("presets/render.toml")).unwrap();
        dir.write("presets/notes.txt", "");

        let loaded = Options::load(&dir.path().join("presets/render.toml"))
            .unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(
            Options::list_presets(&dir.path().join("presets")),
            vec!["render".to_owned()]
        );
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("molecules"));
        assert!(props.contains_key("playback"));

        let playback = &props["playback"]["properties"];
        assert!(playback.get("enabled").is_some());
        assert!(playback.get("render_and_save").is_some());
        // Internal naming is not exposed to the UI
        assert!(playback.get("container_name").is_none());
    }
}
