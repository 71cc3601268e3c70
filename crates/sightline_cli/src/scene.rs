//! Scene files for `sightline stack`
//!
//! A scene is a JSON array of overlays in registration order:
//!
//! ```json
//! [
//!   { "id": "title", "frame": [0, 0, 120, 20] },
//!   { "id": "body", "frame": [0, 10, 120, 20], "manual_offset": [0, 4] },
//!   { "id": "pinned", "frame": [0, 0, 80, 20], "auto_positioning": false }
//! ]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sightline_core::{OverlayConfig, Rect, Vec2};
use sightline_overlay::OverlayPositionCoordinator;
use std::fs;
use std::path::Path;

/// One overlay as described in a scene file
#[derive(Debug, Deserialize)]
pub struct SceneOverlay {
    pub id: String,
    /// `[x, y, width, height]`
    pub frame: [f32; 4],
    #[serde(default = "default_auto_positioning")]
    pub auto_positioning: bool,
    /// `[dx, dy]`
    #[serde(default)]
    pub manual_offset: [f32; 2],
}

fn default_auto_positioning() -> bool {
    true
}

impl SceneOverlay {
    fn frame(&self) -> Rect {
        let [x, y, width, height] = self.frame;
        Rect::new(x, y, width, height)
    }
}

/// Stacking result for one overlay
#[derive(Debug, Serialize)]
pub struct StackedOverlay {
    pub id: String,
    pub offset: f32,
    pub exempt: bool,
    pub resolved_frame: Rect,
}

/// Read a scene file
pub fn load_scene(path: &Path) -> Result<Vec<SceneOverlay>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let scene = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scene {}", path.display()))?;
    Ok(scene)
}

/// Register every overlay in order and collect the final offsets
pub fn stack(scene: &[SceneOverlay], config: &OverlayConfig) -> Vec<StackedOverlay> {
    let mut coordinator = OverlayPositionCoordinator::from_config(config);
    let automatic = config.positioning.is_automatic();

    for overlay in scene {
        coordinator.register_or_update(
            overlay.id.as_str(),
            overlay.frame(),
            automatic && overlay.auto_positioning,
            Vec2::from(overlay.manual_offset),
        );
    }

    coordinator
        .overlay_ids()
        .map(|id| StackedOverlay {
            id: id.to_string(),
            offset: coordinator.current_offset(id.as_str()),
            exempt: coordinator.is_exempt(id.as_str()),
            resolved_frame: coordinator
                .resolved_frame(id.as_str())
                .unwrap_or(Rect::ZERO),
        })
        .collect()
}
