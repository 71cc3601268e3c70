//! Thread-safe coordinator handle
//!
//! The coordinator itself assumes a single writer on the UI thread. Hosts that
//! deliver geometry or gesture events from several threads share one
//! coordinator through this wrapper instead.

use parking_lot::RwLock;
use sightline_core::{OverlayConfig, Rect, Vec2};
use std::sync::Arc;

use crate::coordinator::{OverlayId, OverlayPositionCoordinator, SubscriptionId};

/// Cloneable, lock-guarded [`OverlayPositionCoordinator`]
#[derive(Clone, Debug, Default)]
pub struct SharedOverlayCoordinator {
    inner: Arc<RwLock<OverlayPositionCoordinator>>,
}

impl SharedOverlayCoordinator {
    pub fn new(coordinator: OverlayPositionCoordinator) -> Self {
        Self {
            inner: Arc::new(RwLock::new(coordinator)),
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(OverlayPositionCoordinator::from_config(config))
    }

    pub fn register_or_update(
        &self,
        id: impl Into<OverlayId>,
        frame: Rect,
        auto_positioning: bool,
        manual_offset: Vec2,
    ) -> f32 {
        self.inner
            .write()
            .register_or_update(id, frame, auto_positioning, manual_offset)
    }

    pub fn deregister(&self, id: &str) {
        self.inner.write().deregister(id);
    }

    pub fn current_offset(&self, id: &str) -> f32 {
        self.inner.read().current_offset(id)
    }

    pub fn resolved_frame(&self, id: &str) -> Option<Rect> {
        self.inner.read().resolved_frame(id)
    }

    pub fn revision(&self) -> u64 {
        self.inner.read().revision()
    }

    /// Subscribe to revision changes
    ///
    /// The callback runs while the write lock is held and must not call back
    /// into this handle.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.inner.write().subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.write().unsubscribe(id)
    }

    /// Ids in registration order
    pub fn overlay_ids(&self) -> Vec<OverlayId> {
        self.inner.read().overlay_ids().cloned().collect()
    }

    /// Run `f` with shared access to the coordinator
    pub fn read<R>(&self, f: impl FnOnce(&OverlayPositionCoordinator) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the coordinator
    pub fn update<R>(&self, f: impl FnOnce(&mut OverlayPositionCoordinator) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_across_threads() {
        let shared = SharedOverlayCoordinator::default();
        shared.register_or_update("first", Rect::new(0.0, 0.0, 50.0, 10.0), true, Vec2::ZERO);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.register_or_update(
                        format!("worker-{i}"),
                        Rect::new(0.0, 0.0, 50.0, 10.0),
                        true,
                        Vec2::ZERO,
                    );
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.current_offset("first"), 0.0);
        assert_eq!(shared.overlay_ids().len(), 5);

        // Whatever the arrival order, the stack is contiguous
        let mut offsets: Vec<f32> = shared
            .overlay_ids()
            .iter()
            .map(|id| shared.current_offset(id.as_str()))
            .collect();
        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(offsets, vec![0.0, 18.0, 36.0, 54.0, 72.0]);
    }

    #[test]
    fn test_read_and_update() {
        let shared = SharedOverlayCoordinator::from_config(&OverlayConfig::standard());
        shared.update(|c| {
            c.register_or_update("a", Rect::new(0.0, 0.0, 10.0, 10.0), true, Vec2::ZERO);
        });
        assert!(shared.read(|c| c.contains("a")));
        shared.deregister("a");
        assert_eq!(shared.revision(), 2);
        assert_eq!(shared.resolved_frame("a"), None);
    }
}
