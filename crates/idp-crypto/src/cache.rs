//! Process-wide holder for assembled key material.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::keys::KeyMaterial;

/// Holds at most one [`KeyMaterial`], assembled on first use.
///
/// Readers share an `Arc`; invalidation only affects later lookups.
#[derive(Debug, Default)]
pub struct KeyMaterialCache {
    slot: RwLock<Option<Arc<KeyMaterial>>>,
}

impl KeyMaterialCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached material, if any.
    #[must_use]
    pub fn get(&self) -> Option<Arc<KeyMaterial>> {
        self.slot.read().clone()
    }

    /// Returns the cached material, running `init` to fill an empty slot.
    ///
    /// `init` runs at most once per empty slot, even under contention. A
    /// failed `init` leaves the slot empty.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `init`.
    pub fn get_or_try_insert_with<E, F>(&self, init: F) -> Result<Arc<KeyMaterial>, E>
    where
        F: FnOnce() -> Result<KeyMaterial, E>,
    {
        if let Some(material) = self.get() {
            return Ok(material);
        }

        let mut slot = self.slot.write();
        if let Some(material) = slot.as_ref() {
            return Ok(Arc::clone(material));
        }

        let material = Arc::new(init()?);
        *slot = Some(Arc::clone(&material));
        tracing::debug!("key material cached");
        Ok(material)
    }

    /// Replaces the cached material.
    pub fn insert(&self, material: KeyMaterial) -> Arc<KeyMaterial> {
        let material = Arc::new(material);
        *self.slot.write() = Some(Arc::clone(&material));
        material
    }

    /// Drops the cached material. Returns whether anything was cached.
    pub fn invalidate(&self) -> bool {
        self.slot.write().take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_init_leaves_cache_empty() {
        let cache = KeyMaterialCache::new();
        let result: Result<_, &str> = cache.get_or_try_insert_with(|| Err("no key"));
        assert_eq!(result.unwrap_err(), "no key");
        assert!(cache.get().is_none());
        assert!(!cache.invalidate());
    }
}
