//! Overlay stacking coordinator
//!
//! Label overlays that are displayed at the same time tend to pile on top of
//! each other. The coordinator keeps a registry of every overlay's frame and
//! pushes colliding overlays down so that they stack instead of overlapping.
//!
//! # Rules
//!
//! - **Registration order is priority**: an overlay is only ever displaced by
//!   overlays registered before it. The first overlay never moves.
//! - **Vertical only**: offsets move overlays down; x is never adjusted.
//! - **Manual offsets are kept**: a dragged overlay collides at its dragged
//!   position; the stacking offset is added on top.
//! - **Exempt overlays** (auto-positioning disabled) stay at offset zero and
//!   are not obstacles for anyone else.
//! - **Single pass**: each overlay is checked once against every earlier
//!   overlay. A shift caused by a later obstacle is not re-checked against the
//!   obstacles already passed.
//!
//! # Example
//!
//! ```rust
//! use sightline_core::{Rect, Vec2};
//! use sightline_overlay::OverlayPositionCoordinator;
//!
//! let mut coordinator = OverlayPositionCoordinator::new();
//! let frame = Rect::new(0.0, 0.0, 100.0, 20.0);
//!
//! assert_eq!(coordinator.register_or_update("title", frame, true, Vec2::ZERO), 0.0);
//! // Same frame, registered later: pushed below "title" plus 8 points of spacing
//! assert_eq!(coordinator.register_or_update("subtitle", frame, true, Vec2::ZERO), 28.0);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sightline_core::{OverlayConfig, Rect, Vec2, DEFAULT_SPACING};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of one logical overlay
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for OverlayId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverlayId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OverlayId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&OverlayId> for OverlayId {
    fn from(id: &OverlayId) -> Self {
        id.clone()
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle returned by [`OverlayPositionCoordinator::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type RevisionCallback = Box<dyn Fn(u64) + Send + Sync>;

/// Stored state of one overlay
#[derive(Clone, Copy, Debug)]
struct OverlayEntry {
    frame: Rect,
    manual_offset: Vec2,
    /// Auto-positioning disabled
    exempt: bool,
    order: u64,
    /// Last computed stacking offset
    offset: f32,
}

impl OverlayEntry {
    /// Frame moved by the manual offset, before stacking
    fn base_rect(&self) -> Rect {
        self.frame.translate(self.manual_offset)
    }
}

/// Registry of overlay frames that resolves vertical stacking offsets
pub struct OverlayPositionCoordinator {
    /// Kept in registration order
    overlays: IndexMap<OverlayId, OverlayEntry>,
    next_order: u64,
    spacing: f32,
    revision: u64,
    subscribers: Vec<(SubscriptionId, RevisionCallback)>,
    next_subscription: u64,
}

impl Default for OverlayPositionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OverlayPositionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayPositionCoordinator")
            .field("overlays", &self.overlays)
            .field("spacing", &self.spacing)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl OverlayPositionCoordinator {
    /// Create a coordinator with the default 8 point spacing
    pub fn new() -> Self {
        Self::with_spacing(DEFAULT_SPACING)
    }

    /// Create a coordinator that keeps `spacing` between stacked overlays
    pub fn with_spacing(spacing: f32) -> Self {
        Self {
            overlays: IndexMap::new(),
            next_order: 0,
            spacing,
            revision: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::with_spacing(config.spacing)
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Insert or update an overlay and return its vertical stacking offset
    ///
    /// A new `id` is appended to the priority order; an existing one keeps its
    /// place. With `auto_positioning` disabled the overlay is marked exempt and
    /// `0.0` is returned without touching the other overlays. Otherwise every
    /// overlay's offset is recomputed.
    pub fn register_or_update(
        &mut self,
        id: impl Into<OverlayId>,
        frame: Rect,
        auto_positioning: bool,
        manual_offset: Vec2,
    ) -> f32 {
        let next_order = &mut self.next_order;
        let entry = self.overlays.entry(id.into());
        let index = entry.index();
        let overlay = entry.or_insert_with(|| {
            let order = *next_order;
            *next_order += 1;
            OverlayEntry {
                frame,
                manual_offset,
                exempt: !auto_positioning,
                order,
                offset: 0.0,
            }
        });

        overlay.frame = frame;
        overlay.manual_offset = manual_offset;
        overlay.exempt = !auto_positioning;

        if !auto_positioning {
            overlay.offset = 0.0;
            return 0.0;
        }

        self.recompute();
        self.overlays
            .get_index(index)
            .map_or(0.0, |(_, overlay)| overlay.offset)
    }

    /// Remove an overlay and restack the remaining ones
    ///
    /// Unknown ids are ignored.
    pub fn deregister(&mut self, id: &str) {
        if self.overlays.shift_remove(id).is_some() {
            tracing::debug!("Deregistered overlay {}", id);
            self.recompute();
        }
    }

    /// Last computed offset of `id`; `0.0` for exempt or unknown overlays
    pub fn current_offset(&self, id: &str) -> f32 {
        self.overlays.get(id).map_or(0.0, |overlay| overlay.offset)
    }

    /// Frame of `id` after manual and stacking offsets
    pub fn resolved_frame(&self, id: &str) -> Option<Rect> {
        self.overlays
            .get(id)
            .map(|overlay| overlay.base_rect().offset(0.0, overlay.offset))
    }

    /// Position of `id` in the priority order (lower moves less)
    pub fn registration_order(&self, id: &str) -> Option<u64> {
        self.overlays.get(id).map(|overlay| overlay.order)
    }

    pub fn is_exempt(&self, id: &str) -> bool {
        self.overlays.get(id).is_some_and(|overlay| overlay.exempt)
    }

    /// Registered ids, highest priority first
    pub fn overlay_ids(&self) -> impl Iterator<Item = &OverlayId> {
        self.overlays.keys()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.overlays.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Drop every overlay
    pub fn clear(&mut self) {
        self.overlays.clear();
        self.bump_revision();
    }

    /// Incremented after every recomputation; re-read offsets when it changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Call `callback` with the new revision after every recomputation
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn recompute(&mut self) {
        let spacing = self.spacing;
        let mut resolved: Vec<Rect> = Vec::with_capacity(self.overlays.len());

        for (id, overlay) in self.overlays.iter_mut() {
            if overlay.exempt {
                overlay.offset = 0.0;
                continue;
            }

            let base = overlay.base_rect();
            let mut offset = 0.0f32;
            for obstacle in &resolved {
                if base.offset(0.0, offset).intersects(obstacle) {
                    let required = obstacle.max_y() - base.min_y() + spacing;
                    offset = offset.max(required);
                }
            }

            if offset != overlay.offset {
                tracing::trace!("Overlay {} offset {} -> {}", id, overlay.offset, offset);
            }
            overlay.offset = offset;
            resolved.push(base.offset(0.0, offset));
        }

        self.bump_revision();
    }

    fn bump_revision(&mut self) {
        self.revision += 1;
        for (_, callback) in &self.subscribers {
            callback(self.revision);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn rect(y: f32) -> Rect {
        Rect::new(0.0, y, 100.0, 20.0)
    }

    fn assert_no_overlap(coordinator: &OverlayPositionCoordinator) {
        let frames: Vec<(OverlayId, Rect)> = coordinator
            .overlay_ids()
            .filter(|id| !coordinator.is_exempt(id.as_str()))
            .map(|id| (id.clone(), coordinator.resolved_frame(id.as_str()).unwrap()))
            .collect();
        for (i, (a_id, a)) in frames.iter().enumerate() {
            for (b_id, b) in &frames[i + 1..] {
                assert!(!a.intersects(b), "{} overlaps {}", a_id, b_id);
            }
        }
    }

    #[test]
    fn test_first_overlay_never_moves() {
        let mut c = OverlayPositionCoordinator::new();
        assert_eq!(c.register_or_update("a", rect(0.0), true, Vec2::ZERO), 0.0);
        assert_eq!(c.current_offset("a"), 0.0);
    }

    #[test]
    fn test_identical_frames_stack() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        assert_eq!(c.register_or_update("b", rect(0.0), true, Vec2::ZERO), 28.0);
        assert_eq!(c.register_or_update("c", rect(0.0), true, Vec2::ZERO), 56.0);
        assert_eq!(c.resolved_frame("c"), Some(rect(56.0)));
        assert_no_overlap(&c);
    }

    #[test]
    fn test_no_overlap_for_many_overlays() {
        let mut c = OverlayPositionCoordinator::new();
        for i in 0..12 {
            let frame = Rect::new((i % 3) as f32 * 30.0, (i % 4) as f32 * 7.0, 80.0, 18.0);
            c.register_or_update(format!("overlay-{i}"), frame, true, Vec2::ZERO);
        }
        assert_no_overlap(&c);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        assert_eq!(c.register_or_update("b", rect(20.0), true, Vec2::ZERO), 0.0);

        let beside = Rect::new(100.0, 0.0, 50.0, 20.0);
        assert_eq!(c.register_or_update("c", beside, true, Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_offsets_are_vertical_only() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", Rect::new(0.0, 0.0, 100.0, 20.0), true, Vec2::ZERO);
        c.register_or_update("b", Rect::new(50.0, 10.0, 100.0, 20.0), true, Vec2::ZERO);

        let b = c.resolved_frame("b").unwrap();
        assert_eq!(b.x(), 50.0);
        // a's bottom (20) - b's top (10) + spacing
        assert_eq!(c.current_offset("b"), 18.0);
        assert_eq!(b.y(), 28.0);
    }

    #[test]
    fn test_priority_stability() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        c.register_or_update("b", rect(5.0), true, Vec2::ZERO);

        // Updating in reverse order does not change the priority
        c.register_or_update("b", rect(0.0), true, Vec2::ZERO);
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);

        assert_eq!(c.current_offset("a"), 0.0);
        assert_eq!(c.current_offset("b"), 28.0);
        assert_eq!(c.registration_order("a"), Some(0));
        assert_eq!(c.registration_order("b"), Some(1));
    }

    #[test]
    fn test_manual_offset_moves_collision_box() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);

        // Dragged far enough away: no collision, no stacking
        assert_eq!(
            c.register_or_update("b", rect(0.0), true, Vec2::new(0.0, 100.0)),
            0.0
        );
        assert_eq!(c.resolved_frame("b"), Some(rect(100.0)));

        // Dragged partially onto "a": stacked relative to the dragged position
        assert_eq!(
            c.register_or_update("b", rect(0.0), true, Vec2::new(0.0, 10.0)),
            18.0
        );
        assert_eq!(c.resolved_frame("b"), Some(rect(28.0)));
    }

    #[test]
    fn test_exemption_transparency() {
        let mut c = OverlayPositionCoordinator::new();
        let revision = c.revision();
        assert_eq!(c.register_or_update("pinned", rect(0.0), false, Vec2::ZERO), 0.0);
        assert_eq!(c.revision(), revision);
        assert!(c.is_exempt("pinned"));

        // The exempt overlay is not an obstacle
        assert_eq!(c.register_or_update("b", rect(0.0), true, Vec2::ZERO), 0.0);
        assert_eq!(c.current_offset("pinned"), 0.0);
    }

    #[test]
    fn test_becoming_exempt_resets_offset() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        assert_eq!(c.register_or_update("b", rect(0.0), true, Vec2::ZERO), 28.0);

        assert_eq!(c.register_or_update("b", rect(0.0), false, Vec2::ZERO), 0.0);
        assert_eq!(c.current_offset("b"), 0.0);

        // Re-enabled: stacks again in its original slot
        assert_eq!(c.register_or_update("b", rect(0.0), true, Vec2::ZERO), 28.0);
    }

    #[test]
    fn test_deregistration_cleanup() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        c.register_or_update("b", rect(0.0), true, Vec2::ZERO);
        c.register_or_update("c", rect(0.0), true, Vec2::ZERO);
        assert_eq!(c.current_offset("c"), 56.0);

        c.deregister("b");
        assert_eq!(c.current_offset("b"), 0.0);
        assert!(!c.contains("b"));
        assert!(c.overlay_ids().all(|id| id.as_str() != "b"));
        assert_eq!(c.current_offset("c"), 28.0);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_deregister_unknown_is_noop() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        let revision = c.revision();
        c.deregister("missing");
        assert_eq!(c.revision(), revision);
        assert_eq!(c.current_offset("missing"), 0.0);
    }

    #[test]
    fn test_reregistered_id_goes_to_the_back() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        c.register_or_update("b", rect(0.0), true, Vec2::ZERO);
        c.deregister("a");
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);

        assert_eq!(c.current_offset("b"), 0.0);
        assert_eq!(c.current_offset("a"), 28.0);
        let ids: Vec<&str> = c.overlay_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_idempotence() {
        let mut c = OverlayPositionCoordinator::new();
        let frames = [rect(0.0), rect(4.0), Rect::new(40.0, 12.0, 60.0, 30.0)];

        let run = |c: &mut OverlayPositionCoordinator| -> Vec<f32> {
            frames
                .iter()
                .enumerate()
                .map(|(i, f)| c.register_or_update(format!("o{i}"), *f, true, Vec2::ZERO))
                .collect()
        };

        run(&mut c);
        let first: Vec<f32> = (0..3).map(|i| c.current_offset(&format!("o{i}"))).collect();
        run(&mut c);
        let second: Vec<f32> = (0..3).map(|i| c.current_offset(&format!("o{i}"))).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_size_frames_do_not_collide() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        assert_eq!(
            c.register_or_update("empty", Rect::new(10.0, 10.0, 0.0, 0.0), true, Vec2::ZERO),
            0.0
        );
    }

    #[test]
    fn test_negative_height_frame_collides() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        // Spans y 0..20 measured upward from its origin
        let flipped = Rect::new(0.0, 20.0, 100.0, -20.0);
        assert_eq!(c.register_or_update("b", flipped, true, Vec2::ZERO), 28.0);
        assert_no_overlap(&c);
    }

    #[test]
    fn test_custom_spacing() {
        let mut c = OverlayPositionCoordinator::with_spacing(2.0);
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        assert_eq!(c.register_or_update("b", rect(0.0), true, Vec2::ZERO), 22.0);

        let from_config =
            OverlayPositionCoordinator::from_config(&OverlayConfig::standard().with_spacing(3.0));
        assert_eq!(from_config.spacing(), 3.0);
    }

    #[test]
    fn test_single_pass_can_leave_residual_overlap() {
        // "a" sits low, "b" at the top. "c" is tall: it clears "a" on its own
        // check, then gets pushed below "b" and into "a". The pass does not go
        // back to re-check "a".
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", Rect::new(0.0, 40.0, 100.0, 10.0), true, Vec2::ZERO);
        c.register_or_update("b", Rect::new(0.0, 0.0, 100.0, 10.0), true, Vec2::ZERO);
        let offset = c.register_or_update("c", Rect::new(0.0, 0.0, 100.0, 30.0), true, Vec2::ZERO);

        assert_eq!(offset, 18.0);
        let a = c.resolved_frame("a").unwrap();
        let resolved_c = c.resolved_frame("c").unwrap();
        assert!(resolved_c.intersects(&a));
        assert!(!resolved_c.intersects(&c.resolved_frame("b").unwrap()));
    }

    #[test]
    fn test_revision_and_subscribers() {
        let mut c = OverlayPositionCoordinator::new();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = seen.clone();
        let sub = c.subscribe(move |revision| {
            seen_clone.store(revision, Ordering::SeqCst);
        });

        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        assert_eq!(c.revision(), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        c.register_or_update("b", rect(0.0), true, Vec2::ZERO);
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        assert!(c.unsubscribe(sub));
        assert!(!c.unsubscribe(sub));
        c.deregister("a");
        assert_eq!(c.revision(), 3);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear() {
        let mut c = OverlayPositionCoordinator::new();
        c.register_or_update("a", rect(0.0), true, Vec2::ZERO);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.resolved_frame("a"), None);
        // Order keeps increasing after a clear
        c.register_or_update("b", rect(0.0), true, Vec2::ZERO);
        assert_eq!(c.registration_order("b"), Some(1));
    }
}
