use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Playback", inline)]
#[serde(default)]
/// Frame playback behaviour.
pub struct PlaybackOptions {
    /// Show molecules. Disable for faster timeline previews.
    #[schemars(title = "Enable Molecule Visualization")]
    pub enabled: bool,
    /// Ask the host to render a still on every timeline frame change.
    #[schemars(title = "Render & Save Images")]
    pub render_and_save: bool,
    /// Output path for rendered stills. `{frame}` is replaced by the
    /// frame number zero-padded to five digits.
    #[schemars(title = "Render Path")]
    pub render_path_pattern: String,
    /// Name of the top-level object all species hang under.
    #[schemars(skip)]
    pub container_name: String,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            render_and_save: false,
            render_path_pattern: "//stores_on/frames/frame_{frame}.png"
                .to_owned(),
            container_name: "molecules".to_owned(),
        }
    }
}

impl PlaybackOptions {
    /// Render output path for `frame`.
    #[must_use]
    pub fn render_path(&self, frame: i64) -> PathBuf {
        PathBuf::from(
            self.render_path_pattern
                .replace("{frame}", &format!("{frame:05}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_path_pads_frame_number() {
        let opts = PlaybackOptions::default();
        assert_eq!(
            opts.render_path(42),
            PathBuf::from("//stores_on/frames/frame_00042.png")
        );
    }
}
