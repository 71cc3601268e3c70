//! Sightline Core
//!
//! Foundational types for the Sightline UI debugging toolkit:
//!
//! - **Geometry**: points, sizes, rects, vectors and edge insets in the host's
//!   shared coordinate space
//! - **Stores**: string-keyed persistence for dragged overlay offsets
//! - **Configuration**: explicit overlay and grid settings, loadable from TOML
//!
//! The overlay coordinator lives in `sightline_overlay`, the grid calculator in
//! `sightline_grid`.

pub mod config;
pub mod error;
pub mod geometry;
pub mod store;

pub use config::{
    FitMode, GridConfig, OverlayConfig, PersistenceConfig, PositioningMode, SightlineConfig,
    DEFAULT_NAMESPACE, DEFAULT_SPACING,
};
pub use error::{Result, SightlineError};
pub use geometry::{EdgeInsets, Point, Rect, Size, Vec2};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
