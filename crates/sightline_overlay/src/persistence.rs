//! Persisted manual offsets
//!
//! A dragged overlay's offset is stored under `<namespace>.<identifier>` as a
//! two-element array `[dx, dy]`. The identifier is the overlay's label (or a
//! caller-supplied key) with every run of non-alphanumeric characters replaced
//! by a single underscore, so `"Safe Area: top"` becomes `"Safe_Area_top"`.
//!
//! Anything unreadable in the store is treated as "no offset".

use serde_json::{json, Value};
use sightline_core::{KeyValueStore, PersistenceConfig, Vec2};
use std::fmt;
use std::sync::Arc;

/// Collapse every run of non-alphanumeric characters into one underscore
pub fn sanitize_identifier(identifier: &str) -> String {
    let mut sanitized = String::with_capacity(identifier.len());
    let mut in_run = false;

    for ch in identifier.chars() {
        if ch.is_alphanumeric() {
            sanitized.push(ch);
            in_run = false;
        } else if !in_run {
            sanitized.push('_');
            in_run = true;
        }
    }

    sanitized
}

/// Reads and writes manual offsets in a [`KeyValueStore`]
#[derive(Clone)]
pub struct OffsetPersistence {
    namespace: String,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for OffsetPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetPersistence")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl OffsetPersistence {
    pub fn new(namespace: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            namespace: namespace.into(),
            store,
        }
    }

    pub fn from_config(config: &PersistenceConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(config.namespace.clone(), store)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Store key for an overlay identifier
    pub fn key_for(&self, identifier: &str) -> String {
        format!("{}.{}", self.namespace, sanitize_identifier(identifier))
    }

    /// Load the offset stored for `identifier`
    ///
    /// Missing or malformed entries yield [`Vec2::ZERO`].
    pub fn load(&self, identifier: &str) -> Vec2 {
        let key = self.key_for(identifier);
        match self.store.get(&key) {
            None => Vec2::ZERO,
            Some(value) => decode_offset(&value).unwrap_or_else(|| {
                tracing::warn!("Ignoring malformed offset stored under {}: {}", key, value);
                Vec2::ZERO
            }),
        }
    }

    /// Store the offset for `identifier`
    pub fn save(&self, identifier: &str, offset: Vec2) {
        let key = self.key_for(identifier);
        tracing::debug!("Persisting offset ({}, {}) under {}", offset.x, offset.y, key);
        self.store.set(&key, json!([offset.x, offset.y]));
    }

    /// Forget the offset stored for `identifier`
    pub fn clear(&self, identifier: &str) {
        self.store.remove(&self.key_for(identifier));
    }
}

fn decode_offset(value: &Value) -> Option<Vec2> {
    let [dx, dy] = value.as_array()?.as_slice() else {
        return None;
    };
    let dx = dx.as_f64()? as f32;
    let dy = dy.as_f64()? as f32;
    (dx.is_finite() && dy.is_finite()).then(|| Vec2::new(dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_core::MemoryStore;

    fn persistence() -> (Arc<MemoryStore>, OffsetPersistence) {
        let store = Arc::new(MemoryStore::new());
        let persistence = OffsetPersistence::new("debug.labels", store.clone());
        (store, persistence)
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("title"), "title");
        assert_eq!(sanitize_identifier("Safe Area: top"), "Safe_Area_top");
        assert_eq!(sanitize_identifier("  a--b  "), "_a_b_");
        assert_eq!(sanitize_identifier("Größe 2"), "Größe_2");
        assert_eq!(sanitize_identifier(""), "");
    }

    #[test]
    fn test_key_for() {
        let (_, p) = persistence();
        assert_eq!(p.key_for("Frame (body)"), "debug.labels.Frame_body_");
    }

    #[test]
    fn test_round_trip() {
        let (store, p) = persistence();
        p.save("Header", Vec2::new(12.5, -3.0));
        assert_eq!(
            store.get("debug.labels.Header"),
            Some(json!([12.5, -3.0]))
        );
        assert_eq!(p.load("Header"), Vec2::new(12.5, -3.0));
    }

    #[test]
    fn test_missing_is_zero() {
        let (_, p) = persistence();
        assert_eq!(p.load("nothing"), Vec2::ZERO);
    }

    #[test]
    fn test_malformed_is_zero() {
        let (store, p) = persistence();
        for value in [
            json!("12,4"),
            json!([1.0]),
            json!([1.0, 2.0, 3.0]),
            json!(["a", "b"]),
            json!({"dx": 1.0, "dy": 2.0}),
            json!(null),
        ] {
            store.set("debug.labels.bad", value);
            assert_eq!(p.load("bad"), Vec2::ZERO);
        }
    }

    #[test]
    fn test_integer_values_are_accepted() {
        let (store, p) = persistence();
        store.set("debug.labels.ints", json!([3, -4]));
        assert_eq!(p.load("ints"), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_clear() {
        let (store, p) = persistence();
        p.save("x", Vec2::new(1.0, 1.0));
        p.clear("x");
        assert!(!store.contains("debug.labels.x"));
        assert_eq!(p.load("x"), Vec2::ZERO);
    }

    #[test]
    fn test_from_config() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let p = OffsetPersistence::from_config(&PersistenceConfig::default(), store);
        assert_eq!(p.namespace(), sightline_core::DEFAULT_NAMESPACE);
    }
}
