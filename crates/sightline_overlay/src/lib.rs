//! Sightline Overlays
//!
//! Framework-independent state behind Sightline's debug overlays:
//!
//! - **Coordinator**: stacks colliding label overlays by registration order
//! - **Drag**: manual offsets from drag gestures
//! - **Persistence**: dragged offsets remembered in a key-value store
//! - **Tracked overlays**: per-view glue between host events and the coordinator
//! - **Render tracking**: re-render vs re-initialization counters
//! - **Bounds**: frame, safe-area and coordinate readouts
//!
//! # Example
//!
//! ```rust
//! use sightline_core::{OverlayConfig, Rect, Vec2};
//! use sightline_overlay::{DragPhase, OverlayPositionCoordinator, TrackedOverlay};
//!
//! let config = OverlayConfig::standard();
//! let mut coordinator = OverlayPositionCoordinator::from_config(&config);
//!
//! let mut title = TrackedOverlay::new("title", "Title", &config);
//! let mut body = TrackedOverlay::new("body", "Body", &config);
//!
//! let frame = Rect::new(0.0, 0.0, 120.0, 20.0);
//! title.frame_changed(&mut coordinator, frame);
//! assert_eq!(body.frame_changed(&mut coordinator, frame), 28.0);
//!
//! // Dragging "body" sideways takes it out of the stack
//! body.drag(&mut coordinator, DragPhase::Ended(Vec2::new(200.0, 0.0)));
//! assert_eq!(body.placement(), Vec2::new(200.0, 0.0));
//! ```

pub mod bounds;
pub mod coordinator;
pub mod drag;
pub mod persistence;
pub mod render;
pub mod shared;
pub mod tracked;

pub use bounds::BoundsReport;
pub use coordinator::{OverlayId, OverlayPositionCoordinator, SubscriptionId};
pub use drag::{DragPhase, DragTracker};
pub use persistence::{sanitize_identifier, OffsetPersistence};
pub use render::{RenderKind, RenderStats, RenderTracker};
pub use shared::SharedOverlayCoordinator;
pub use tracked::TrackedOverlay;
