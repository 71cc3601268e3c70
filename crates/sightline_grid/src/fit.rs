//! Square-grid fitting
//!
//! Two policies are supported:
//!
//! - **Exact**: cells tile the container with no remainder. Without a
//!   requested size the largest such square is used, found through the GCD of
//!   both dimensions at 0.001 precision. With a requested size, that size is
//!   used when it already divides both dimensions, otherwise the closest
//!   gapless square not larger than the request is searched for.
//! - **Preferred**: the requested size is rounded to whole column and row
//!   counts, shrunk just enough to fit, and the grid is centered.

use sightline_core::{FitMode, GridConfig, Point, Size};

use crate::metrics::GridMetrics;

/// Dimensions are scaled by this factor before taking their GCD
pub const PRECISION_SCALE: f64 = 1000.0;

/// Maximum distance from a whole count for a size to "divide evenly"
pub const FIT_TOLERANCE: f32 = 0.01;

/// Greatest common divisor of the absolute values of `a` and `b`
///
/// `gcd(a, 0) == |a|`.
pub fn gcd(a: i64, b: i64) -> u64 {
    gcd_u64(a.unsigned_abs(), b.unsigned_abs())
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Compute a square-grid tiling for a `width` x `height` container
///
/// Returns `None` when either dimension is not a positive finite number; the
/// caller has nothing to draw in that case. A requested size that is not a
/// positive finite number is treated as absent. Preferred fit without a
/// requested size falls back to the exact GCD tiling.
///
/// Exact fit with a requested size smaller than the GCD square does not stop
/// at the GCD tiling: it subdivides the GCD square into the largest gapless
/// cells not larger than the request (`100 x 100` at `8` gives `6.25`).
///
/// In the tolerance branch the requested size is kept as is, so the content
/// may overshoot the container by up to `FIT_TOLERANCE` cells per axis.
pub fn compute_grid(
    width: f32,
    height: f32,
    requested_square_size: Option<f32>,
    fit_mode: FitMode,
) -> Option<GridMetrics> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return None;
    }

    let requested = requested_square_size.filter(|s| s.is_finite() && *s > 0.0);
    let container = Size::new(width, height);

    let metrics = match (fit_mode, requested) {
        (FitMode::Preferred, Some(size)) => Some(preferred_fit(container, size)),
        (_, Some(size)) => exact_fit_with_size(container, size),
        (_, None) => GcdTiling::new(container).map(|base| base.metrics()),
    };

    if let Some(m) = &metrics {
        tracing::trace!(
            "grid {}x{} ({}): {} x {} cells of {}",
            width,
            height,
            m.fit_mode,
            m.columns,
            m.rows,
            m.square_size
        );
    }

    metrics
}

/// Compute a tiling from the grid section of the configuration
pub fn compute_grid_with(container: Size, config: &GridConfig) -> Option<GridMetrics> {
    compute_grid(container.width, container.height, config.square_size, config.fit)
}

// =============================================================================
// Preferred fit
// =============================================================================

fn preferred_fit(container: Size, requested: f32) -> GridMetrics {
    let columns = (container.width / requested).round().max(1.0) as u32;
    let rows = (container.height / requested).round().max(1.0) as u32;

    let square_size = (container.width / columns as f32).min(container.height / rows as f32);
    let content_size = Size::new(
        (square_size * columns as f32).min(container.width),
        (square_size * rows as f32).min(container.height),
    );
    let origin_offset = Point::new(
        ((container.width - content_size.width) / 2.0).max(0.0),
        ((container.height - content_size.height) / 2.0).max(0.0),
    );

    GridMetrics {
        square_size,
        columns,
        rows,
        origin_offset,
        content_size,
        fit_mode: FitMode::Preferred,
        container_size: container,
    }
}

// =============================================================================
// Exact fit
// =============================================================================

/// Largest gapless square, in precision units
struct GcdTiling {
    container: Size,
    /// GCD of the scaled dimensions
    unit: u64,
    columns: u64,
    rows: u64,
}

impl GcdTiling {
    fn new(container: Size) -> Option<Self> {
        let scaled_width = scale(container.width);
        let scaled_height = scale(container.height);
        if scaled_width == 0 || scaled_height == 0 {
            return None;
        }

        let unit = gcd_u64(scaled_width, scaled_height);
        Some(Self {
            container,
            unit,
            columns: scaled_width / unit,
            rows: scaled_height / unit,
        })
    }

    fn square_size(&self) -> f32 {
        (self.unit as f64 / PRECISION_SCALE) as f32
    }

    fn metrics(&self) -> GridMetrics {
        exact_metrics(self.container, self.square_size(), self.columns, self.rows)
    }

    /// Largest multiple of the base square not exceeding `requested` whose
    /// multiplier divides both counts
    fn largest_multiple(&self, requested: f32) -> Option<GridMetrics> {
        // A multiplier has to divide both counts, so it is bounded by their GCD
        let max_multiple = (f64::from(requested) * PRECISION_SCALE / self.unit as f64)
            .floor() as u64;
        let max_multiple = max_multiple.min(gcd_u64(self.columns, self.rows));

        (1..=max_multiple)
            .rev()
            .find(|m| self.columns % m == 0 && self.rows % m == 0)
            .map(|m| {
                let square = (self.unit * m) as f64 / PRECISION_SCALE;
                exact_metrics(
                    self.container,
                    square as f32,
                    self.columns / m,
                    self.rows / m,
                )
            })
    }

    /// Largest square not exceeding `requested` obtained by splitting the base
    /// square into `k` x `k` cells, with `k` a divisor of the scaled GCD
    fn largest_subdivision(&self, requested: f32) -> Option<GridMetrics> {
        let min_split = (self.unit as f64 / (f64::from(requested) * PRECISION_SCALE)).ceil() as u64;
        let split = smallest_divisor_at_least(self.unit, min_split.max(1))?;

        let square = (self.unit / split) as f64 / PRECISION_SCALE;
        Some(exact_metrics(
            self.container,
            square as f32,
            self.columns * split,
            self.rows * split,
        ))
    }
}

fn exact_fit_with_size(container: Size, requested: f32) -> Option<GridMetrics> {
    let across = container.width / requested;
    let down = container.height / requested;
    let columns = across.round();
    let rows = down.round();

    if columns >= 1.0
        && rows >= 1.0
        && (across - columns).abs() <= FIT_TOLERANCE
        && (down - rows).abs() <= FIT_TOLERANCE
    {
        return Some(exact_metrics(
            container,
            requested,
            columns as u64,
            rows as u64,
        ));
    }

    let base = GcdTiling::new(container)?;
    base.largest_multiple(requested)
        .or_else(|| base.largest_subdivision(requested))
        .or_else(|| Some(base.metrics()))
}

fn exact_metrics(container: Size, square_size: f32, columns: u64, rows: u64) -> GridMetrics {
    let columns = u32::try_from(columns).unwrap_or(u32::MAX);
    let rows = u32::try_from(rows).unwrap_or(u32::MAX);

    GridMetrics {
        square_size,
        columns,
        rows,
        origin_offset: Point::ZERO,
        content_size: Size::new(square_size * columns as f32, square_size * rows as f32),
        fit_mode: FitMode::Exact,
        container_size: container,
    }
}

fn scale(value: f32) -> u64 {
    (f64::from(value) * PRECISION_SCALE).round() as u64
}

/// Smallest divisor of `n` that is `>= floor`
fn smallest_divisor_at_least(n: u64, floor: u64) -> Option<u64> {
    if floor > n {
        return None;
    }

    let mut best: Option<u64> = None;
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            for candidate in [d, n / d] {
                if candidate >= floor && best.map_or(true, |b| candidate < b) {
                    best = Some(candidate);
                }
            }
        }
        d += 1;
    }
    best
}
