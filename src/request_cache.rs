use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
struct Value<T> {
    value: Arc<T>,
    expires: DateTime<Utc>,
}

/// TTL cache for computed responses, keyed by request parameters.
#[derive(Debug, Clone)]
pub struct RequestCache<T> {
    map: Arc<RwLock<HashMap<String, Value<T>>>>,
    timeout: Duration,
}

impl<T> Default for RequestCache<T> {
    fn default() -> Self {
        Self {
            timeout: Duration::minutes(1),
            map: Arc::<RwLock<HashMap<String, Value<T>>>>::default(),
        }
    }
}

impl<T> RequestCache<T> {
    pub fn new(timeout: Duration) -> RequestCache<T> {
        RequestCache {
            timeout,
            ..Default::default()
        }
    }

    pub fn get<S>(&self, key: S) -> Option<Arc<T>>
    where
        S: Into<String>,
    {
        let key: String = key.into();
        if let Some(v) = self
            .map
            .read()
            .expect("RWLock should never be poisoned")
            .get(&key)
        {
            if v.expires >= Utc::now() {
                return Some(v.value.clone());
            }
        }
        None
    }

    pub fn insert<S>(&self, key: S, value: T)
    where
        S: Into<String>,
    {
        self.insert_with_timeout(key, value, self.timeout);
    }

    pub fn insert_with_timeout<S>(&self, key: S, value: T, timeout: Duration)
    where
        S: Into<String>,
    {
        let value = Value {
            value: Arc::new(value),
            expires: Utc::now() + timeout,
        };
        self.map
            .write()
            .expect("RWLock should never be poisoned")
            .insert(key.into(), value);
    }

    pub fn invalidate<S>(&self, key: S)
    where
        S: Into<String>,
    {
        self.map
            .write()
            .expect("RWLock should never be poisoned")
            .remove(&key.into());
    }

    pub fn invalidate_all(&self) {
        self.map
            .write()
            .expect("RWLock should never be poisoned")
            .clear()
    }

    pub fn invalidate_expired(&self) {
        let mut map = self.map.write().expect("RWLock should never be poisoned");
        let now = Utc::now();
        map.retain(|_, v| v.expires > now);
    }
}
