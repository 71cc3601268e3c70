//! Sightline Grid
//!
//! Square-grid tiling for alignment overlays. The grid renderer calls
//! [`compute_grid`] whenever its container changes size and draws the lines
//! reported by the resulting [`GridMetrics`].
//!
//! # Example
//!
//! ```rust
//! use sightline_grid::{compute_grid, FitMode};
//!
//! let grid = compute_grid(240.0, 180.0, None, FitMode::Exact).unwrap();
//! assert_eq!(grid.square_size, 60.0);
//! assert_eq!((grid.columns, grid.rows), (4, 3));
//! ```

pub mod fit;
pub mod metrics;

pub use fit::{compute_grid, compute_grid_with, gcd, FIT_TOLERANCE, PRECISION_SCALE};
pub use metrics::GridMetrics;
pub use sightline_core::FitMode;
