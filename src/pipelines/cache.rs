use crate::error::Result;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait ModelOptions {
    fn cache_key(&self) -> String;
}

// Cache stores STRONG references: a model is deserialized at most once per
// process and stays resident for the process lifetime.
type CacheStorage = HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>;

pub struct ModelCache {
    cache: Mutex<CacheStorage>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());

        {
            let cache = self.cache.lock().unwrap();
            if let Some(boxed) = cache.get(&cache_key) {
                if let Some(model) = boxed.downcast_ref::<Arc<M>>() {
                    return Ok(model.clone());
                }
            }
        }

        let model = Arc::new(loader()?);

        let mut cache = self.cache.lock().unwrap();
        cache.insert(cache_key, Box::new(model.clone()));

        Ok(model)
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        let mut cache = self.cache.lock().unwrap();
        cache.clear();
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        let cache = self.cache.lock().unwrap();
        cache.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        let cache = self.cache.lock().unwrap();
        cache.is_empty()
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestModel {
        id: String,
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let cache = ModelCache::new();
        let model1 = cache
            .get_or_create::<TestModel, _>("test", || {
                Ok(TestModel {
                    id: "original".into(),
                })
            })
            .unwrap();
        let model2 = cache
            .get_or_create::<TestModel, _>("test", || Ok(TestModel { id: "new".into() }))
            .unwrap();
        assert_eq!(model1.id, model2.id);
        assert!(Arc::ptr_eq(&model1, &model2));
    }

    #[test]
    fn test_cached_entry_survives_dropped_handles() {
        let cache = ModelCache::new();
        {
            let _ = cache
                .get_or_create::<TestModel, _>("test", || Ok(TestModel { id: "first".into() }))
                .unwrap();
        }
        let model = cache
            .get_or_create::<TestModel, _>("test", || {
                Ok(TestModel {
                    id: "reloaded".into(),
                })
            })
            .unwrap();
        assert_eq!(model.id, "first");
    }

    #[test]
    fn test_cache_clear() {
        let cache = ModelCache::new();
        struct A;
        let _ = cache.get_or_create::<A, _>("k", || Ok(A)).unwrap();
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_different_keys_independent() {
        let cache = ModelCache::new();

        let model1 = cache
            .get_or_create::<TestModel, _>("key1", || Ok(TestModel { id: "first".into() }))
            .unwrap();

        let model2 = cache
            .get_or_create::<TestModel, _>("key2", || {
                Ok(TestModel {
                    id: "second".into(),
                })
            })
            .unwrap();

        assert_eq!(model1.id, "first");
        assert_eq!(model2.id, "second");
        assert_eq!(cache.len(), 2);
    }
}
