//! Sightline configuration
//!
//! Overlay behavior (drag, persistence, stacking) and grid defaults are passed
//! explicitly to the components that need them instead of being read from an
//! ambient environment.
//!
//! Configuration can be loaded from a `sightline.toml` file:
//!
//! ```toml
//! [overlay]
//! positioning = "automatic"
//! spacing = 8.0
//! drag_enabled = true
//!
//! [overlay.persistence]
//! namespace = "myapp.debug"
//!
//! [grid]
//! square_size = 16.0
//! fit = "exact"
//! ```
//!
//! Every field has a default, so partial files are valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SightlineError};

/// Vertical gap kept between stacked overlays
pub const DEFAULT_SPACING: f32 = 8.0;

/// Namespace used for persisted overlay offsets when none is configured
pub const DEFAULT_NAMESPACE: &str = "sightline.overlay";

// =============================================================================
// Top-level configuration
// =============================================================================

/// Complete Sightline configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightlineConfig {
    pub overlay: OverlayConfig,
    pub grid: GridConfig,
}

impl SightlineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SightlineError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// =============================================================================
// Overlay configuration
// =============================================================================

/// How overlays react to collisions with earlier overlays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositioningMode {
    /// Stack below earlier overlays when they collide
    #[default]
    Automatic,
    /// Stay at the natural (plus manual) position and ignore collisions
    Manual,
}

impl PositioningMode {
    pub fn is_automatic(&self) -> bool {
        matches!(self, PositioningMode::Automatic)
    }
}

/// Where dragged overlay offsets are remembered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Key prefix; entries are stored as `<namespace>.<identifier>`
    pub namespace: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl PersistenceConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

/// Behavior shared by all label overlays of one coordinator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Collision handling policy
    pub positioning: PositioningMode,
    /// Gap between an overlay and the one it is stacked below
    pub spacing: f32,
    /// Whether overlays can be dragged by the user
    pub drag_enabled: bool,
    /// Persist dragged offsets; `None` keeps them for the session only
    pub persistence: Option<PersistenceConfig>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl OverlayConfig {
    /// Automatic stacking, draggable, nothing persisted.
    pub fn standard() -> Self {
        Self {
            positioning: PositioningMode::Automatic,
            spacing: DEFAULT_SPACING,
            drag_enabled: true,
            persistence: None,
        }
    }

    /// Labels that never move: no stacking, no dragging.
    pub fn static_labels() -> Self {
        Self {
            positioning: PositioningMode::Manual,
            spacing: DEFAULT_SPACING,
            drag_enabled: false,
            persistence: None,
        }
    }

    /// Set the positioning mode.
    pub fn with_positioning(mut self, positioning: PositioningMode) -> Self {
        self.positioning = positioning;
        self
    }

    /// Set the stacking gap.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Enable or disable dragging.
    pub fn with_drag(mut self, enabled: bool) -> Self {
        self.drag_enabled = enabled;
        self
    }

    /// Persist dragged offsets under `namespace`.
    pub fn with_persistence(mut self, namespace: impl Into<String>) -> Self {
        self.persistence = Some(PersistenceConfig::new(namespace));
        self
    }
}

// =============================================================================
// Grid configuration
// =============================================================================

/// Grid fit policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Perfect tiling with no remainder
    #[default]
    Exact,
    /// Keep close to the requested square size and center the grid
    Preferred,
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMode::Exact => write!(f, "exact"),
            FitMode::Preferred => write!(f, "preferred"),
        }
    }
}

impl FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(FitMode::Exact),
            "preferred" => Ok(FitMode::Preferred),
            other => Err(format!(
                "Invalid fit mode '{}'. Valid modes: exact, preferred",
                other
            )),
        }
    }
}

/// Defaults for the alignment grid overlay
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Requested cell size; `None` lets the grid pick the largest perfect square
    pub square_size: Option<f32>,
    pub fit: FitMode,
}

impl GridConfig {
    pub fn with_square_size(mut self, size: f32) -> Self {
        self.square_size = Some(size);
        self
    }

    pub fn with_fit(mut self, fit: FitMode) -> Self {
        self.fit = fit;
        self
    }
}
