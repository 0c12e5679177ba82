//! Shared schema cache
//!
//! Read-many, write-once per identifier. Each identifier owns a slot guarded
//! by its own mutex; the first caller to lock an empty slot performs the load
//! while later callers for the same identifier wait on the slot and then
//! observe the stored model. Loads of different identifiers never block one
//! another. A failed load removes its slot again unless another caller has
//! filled or replaced it meanwhile, so unknown identifiers leave no trace.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use super::errors::SchemaResult;
use super::model::SchemaModel;

type Slot = Arc<Mutex<Option<Arc<SchemaModel>>>>;

#[derive(Debug, Default)]
pub struct SchemaCache {
    slots: RwLock<HashMap<String, Slot>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached model for `id`, if one was loaded.
    pub fn get(&self, id: &str) -> Option<Arc<SchemaModel>> {
        let slot = {
            let slots = self.slots.read().unwrap_or_else(|p| p.into_inner());
            slots.get(id).cloned()?
        };
        let guard = slot.lock().unwrap_or_else(|p| p.into_inner());
        guard.clone()
    }

    /// Stores `model` under `id`, replacing any previous entry.
    pub fn insert(&self, id: impl Into<String>, model: Arc<SchemaModel>) {
        let slot = self.slot(id.into());
        let mut guard = slot.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(model);
    }

    /// Returns the cached model or runs `load` exactly once per identifier
    /// among concurrent callers.
    pub fn get_or_load<F>(&self, id: &str, load: F) -> SchemaResult<Arc<SchemaModel>>
    where
        F: FnOnce() -> SchemaResult<SchemaModel>,
    {
        let slot = self.slot(id.to_string());
        let mut guard = slot.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(model) = guard.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = match load() {
            Ok(model) => Arc::new(model),
            Err(e) => {
                drop(guard);
                self.evict_empty(id, slot);
                return Err(e);
            }
        };
        *guard = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Number of identifiers with a loaded model.
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(|p| p.into_inner());
        slots
            .values()
            .filter(|slot| slot.lock().unwrap_or_else(|p| p.into_inner()).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes `id` if it still maps to `slot`, nobody else holds the slot
    /// and it holds no model. Waiters keep the slot alive for their own load.
    fn evict_empty(&self, id: &str, slot: Slot) {
        let mut slots = self.slots.write().unwrap_or_else(|p| p.into_inner());
        let stale = slots.get(id).is_some_and(|current| {
            Arc::ptr_eq(current, &slot)
                && Arc::strong_count(current) == 2
                && current.lock().unwrap_or_else(|p| p.into_inner()).is_none()
        });
        if stale {
            slots.remove(id);
        }
        // Dropped under the write lock: a concurrent failed load must see the count fall.
        drop(slot);
    }

    fn slot(&self, id: String) -> Slot {
        {
            let slots = self.slots.read().unwrap_or_else(|p| p.into_inner());
            if let Some(slot) = slots.get(&id) {
                return Arc::clone(slot);
            }
        }
        let mut slots = self.slots.write().unwrap_or_else(|p| p.into_inner());
        Arc::clone(slots.entry(id).or_default())
    }
}
