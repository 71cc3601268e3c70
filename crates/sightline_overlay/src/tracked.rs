//! Per-overlay glue between host events and the coordinator
//!
//! A view that shows a label overlay forwards three things to its
//! [`TrackedOverlay`]: frame changes, drag gestures, and its own removal. The
//! tracked overlay keeps the manual offset, persists it when a drag finishes,
//! and re-registers with the coordinator so stacking follows the label.

use sightline_core::{KeyValueStore, OverlayConfig, PersistenceConfig, Rect, Vec2};
use std::sync::Arc;

use crate::coordinator::{OverlayId, OverlayPositionCoordinator};
use crate::drag::{DragPhase, DragTracker};
use crate::persistence::OffsetPersistence;

/// One label overlay as seen by its view
#[derive(Debug)]
pub struct TrackedOverlay {
    id: OverlayId,
    label: String,
    /// Overrides the label as the persistence identifier
    persistence_key: Option<String>,
    auto_positioning: bool,
    drag: DragTracker,
    persistence_config: Option<PersistenceConfig>,
    persistence: Option<OffsetPersistence>,
    frame: Option<Rect>,
    stacking_offset: f32,
}

impl TrackedOverlay {
    pub fn new(id: impl Into<OverlayId>, label: impl Into<String>, config: &OverlayConfig) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            persistence_key: None,
            auto_positioning: config.positioning.is_automatic(),
            drag: DragTracker::new(config.drag_enabled),
            persistence_config: config.persistence.clone(),
            persistence: None,
            frame: None,
            stacking_offset: 0.0,
        }
    }

    /// Persist offsets in `store` when the configuration enables persistence
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        match &self.persistence_config {
            Some(config) => {
                self.persistence = Some(OffsetPersistence::from_config(config, store));
            }
            None => {
                tracing::debug!("Persistence disabled for overlay {}; store ignored", self.id);
            }
        }
        self
    }

    /// Persist through an explicit persistence handle, regardless of config
    pub fn with_persistence(mut self, persistence: OffsetPersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Store the offset under `key` instead of the label
    pub fn with_persistence_key(mut self, key: impl Into<String>) -> Self {
        self.persistence_key = Some(key.into());
        self
    }

    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Identifier the persisted offset is stored under (before sanitizing)
    pub fn persistence_identifier(&self) -> &str {
        self.persistence_key.as_deref().unwrap_or(&self.label)
    }

    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    /// Load the persisted manual offset, if persistence is enabled
    pub fn restore(&mut self) -> Vec2 {
        if let Some(persistence) = &self.persistence {
            let offset = persistence.load(self.persistence_identifier());
            self.drag.set_committed(offset);
        }
        self.drag.committed_offset()
    }

    /// The host reported a new frame for this overlay
    pub fn frame_changed(
        &mut self,
        coordinator: &mut OverlayPositionCoordinator,
        frame: Rect,
    ) -> f32 {
        self.frame = Some(frame);
        self.register(coordinator)
    }

    /// The host reported a drag gesture update
    ///
    /// Finished gestures are persisted. Without a known frame the overlay is
    /// not registered yet and only the manual offset changes.
    pub fn drag(
        &mut self,
        coordinator: &mut OverlayPositionCoordinator,
        phase: DragPhase,
    ) -> f32 {
        if let Some(committed) = self.drag.apply(phase) {
            if let Some(persistence) = &self.persistence {
                persistence.save(self.persistence_identifier(), committed);
            }
        }
        self.register(coordinator)
    }

    /// Re-read the stacking offset after the coordinator's revision changed
    pub fn refresh(&mut self, coordinator: &OverlayPositionCoordinator) -> f32 {
        self.stacking_offset = coordinator.current_offset(self.id.as_str());
        self.stacking_offset
    }

    /// Enable or disable collision stacking for this overlay
    pub fn set_auto_positioning(
        &mut self,
        coordinator: &mut OverlayPositionCoordinator,
        enabled: bool,
    ) -> f32 {
        self.auto_positioning = enabled;
        self.register(coordinator)
    }

    /// Forget the manual offset, in memory and in the store
    pub fn reset_position(&mut self, coordinator: &mut OverlayPositionCoordinator) -> f32 {
        self.drag.reset();
        if let Some(persistence) = &self.persistence {
            persistence.clear(self.persistence_identifier());
        }
        self.register(coordinator)
    }

    pub fn manual_offset(&self) -> Vec2 {
        self.drag.effective_offset()
    }

    pub fn stacking_offset(&self) -> f32 {
        self.stacking_offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Total displacement to apply to the label: manual plus stacking
    pub fn placement(&self) -> Vec2 {
        self.manual_offset() + Vec2::new(0.0, self.stacking_offset)
    }

    /// The view went away
    pub fn detach(&mut self, coordinator: &mut OverlayPositionCoordinator) {
        coordinator.deregister(self.id.as_str());
        self.frame = None;
        self.stacking_offset = 0.0;
    }

    fn register(&mut self, coordinator: &mut OverlayPositionCoordinator) -> f32 {
        if let Some(frame) = self.frame {
            self.stacking_offset = coordinator.register_or_update(
                &self.id,
                frame,
                self.auto_positioning,
                self.drag.effective_offset(),
            );
        }
        self.stacking_offset
    }
}
