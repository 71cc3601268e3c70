//! Drag tracking for movable overlays
//!
//! The host's gesture recognizer reports translations measured from the start
//! of the gesture. While a gesture is active its translation is added to the
//! committed offset; when it ends the translation is folded into the committed
//! offset and the gesture state is dropped.

use sightline_core::Vec2;

/// Gesture update delivered by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPhase {
    /// Gesture in progress; translation since the gesture started
    Changed(Vec2),
    /// Gesture finished with this final translation
    Ended(Vec2),
    /// Gesture abandoned by the host; behaves like `Ended(Vec2::ZERO)`
    Cancelled,
}

/// Manual offset of one overlay plus the gesture currently moving it
#[derive(Clone, Debug, PartialEq)]
pub struct DragTracker {
    committed: Vec2,
    active: Option<Vec2>,
    enabled: bool,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DragTracker {
    /// Create a tracker; a disabled tracker ignores every gesture
    pub fn new(enabled: bool) -> Self {
        Self {
            committed: Vec2::ZERO,
            active: None,
            enabled,
        }
    }

    /// Start from a previously committed (for example persisted) offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.committed = offset;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Offset as of the last finished gesture
    pub fn committed_offset(&self) -> Vec2 {
        self.committed
    }

    /// Offset to display right now, including an active gesture
    pub fn effective_offset(&self) -> Vec2 {
        self.committed + self.active.unwrap_or(Vec2::ZERO)
    }

    /// Replace the committed offset and drop any active gesture
    pub fn set_committed(&mut self, offset: Vec2) {
        self.committed = offset;
        self.active = None;
    }

    /// Apply a gesture update
    ///
    /// Returns the new committed offset when the gesture finished (ended or
    /// cancelled); that is the value to persist. Returns `None` while the
    /// gesture is still running or when dragging is disabled.
    pub fn apply(&mut self, phase: DragPhase) -> Option<Vec2> {
        if !self.enabled {
            return None;
        }

        match phase {
            DragPhase::Changed(translation) => {
                self.active = Some(translation);
                None
            }
            DragPhase::Ended(translation) => {
                self.active = None;
                self.committed += translation;
                Some(self.committed)
            }
            DragPhase::Cancelled => {
                self.active = None;
                Some(self.committed)
            }
        }
    }

    /// Forget both the committed offset and any active gesture
    pub fn reset(&mut self) {
        self.committed = Vec2::ZERO;
        self.active = None;
    }
}
