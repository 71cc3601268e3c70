//! Re-render vs re-initialization tracking
//!
//! Retained-mode frameworks re-run a view's body often, but only rebuild its
//! state storage when the view's identity changes. The render badge shows
//! which of the two happened; this module keeps the counts behind it.
//!
//! The host passes an instance token with every render: any value that stays
//! the same for as long as the view keeps its state (a state-storage
//! generation, an allocation id). A changed token means the view was
//! re-initialized.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// What happened on one render pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    /// First render of a new instance
    Initialized,
    /// Body re-evaluated for an existing instance
    Rerendered,
}

/// Counters for one view
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Number of instances created
    pub init_count: u64,
    /// Number of render passes, including the initial one of each instance
    pub render_count: u64,
    pub last_kind: Option<RenderKind>,
    #[serde(skip)]
    instance: Option<u64>,
}

impl RenderStats {
    /// Render passes that did not create a new instance
    pub fn rerender_count(&self) -> u64 {
        self.render_count - self.init_count
    }
}

/// Render counters keyed by view
#[derive(Debug, Default)]
pub struct RenderTracker {
    views: FxHashMap<String, RenderStats>,
}

impl RenderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a render pass of `key` for the given instance token
    pub fn record(&mut self, key: &str, instance: u64) -> RenderKind {
        let stats = self.views.entry(key.to_string()).or_default();

        let kind = if stats.instance == Some(instance) {
            RenderKind::Rerendered
        } else {
            if stats.instance.is_some() {
                tracing::debug!("View {} re-initialized (instance {})", key, instance);
            }
            stats.instance = Some(instance);
            stats.init_count += 1;
            RenderKind::Initialized
        };

        stats.render_count += 1;
        stats.last_kind = Some(kind);
        kind
    }

    pub fn stats(&self, key: &str) -> Option<&RenderStats> {
        self.views.get(key)
    }

    /// Forget the counters of one view
    pub fn reset(&mut self, key: &str) {
        self.views.remove(key);
    }

    pub fn clear(&mut self) {
        self.views.clear();
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenderStats)> {
        self.views.iter().map(|(key, stats)| (key.as_str(), stats))
    }
}
