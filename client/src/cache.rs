use std::sync::{Arc, RwLock};

use crate::Record;

/// Shared copy of the content listing. Handed to [`crate::Client`]
/// explicitly; mutations through the client invalidate it.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    inner: Arc<RwLock<Option<Arc<Vec<Record>>>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<Vec<Record>>> {
        self.inner
            .read()
            .expect("RWLock should never be poisoned")
            .clone()
    }

    pub fn set(&self, records: Vec<Record>) {
        *self.inner.write().expect("RWLock should never be poisoned") =
            Some(Arc::new(records));
    }

    pub fn invalidate(&self) {
        *self.inner.write().expect("RWLock should never be poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_get_invalidate() {
        let cache = ContentCache::new();
        assert!(cache.get().is_none());
        cache.set(vec![Record(json!({"id": "dark"}))]);
        assert_eq!(cache.get().unwrap().len(), 1);
        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
