//! Per-compilation memo table for derived SQL fragments.

use std::collections::HashMap;

use crate::error::PolysqlResult;

/// Memoizes expensive derived values within one compilation pass.
///
/// Keys are the `serde_json` serialization of their ordered parts, so
/// `["a", "bc"]` and `["ab", "c"]` never collide and part order is
/// significant. One instance per compilation; never share across
/// concurrent compilations.
#[derive(Debug, Default)]
pub struct QueryCache<V> {
    store: HashMap<String, V>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    /// Return the cached value for `key_parts`, computing and storing it
    /// on first use.
    pub fn cache<F>(&mut self, key_parts: &[&str], f: F) -> PolysqlResult<V>
    where
        F: FnOnce() -> PolysqlResult<V>,
    {
        let key = Self::cache_key(key_parts);
        if let Some(value) = self.store.get(&key) {
            return Ok(value.clone());
        }
        let value = f()?;
        self.store.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn cache_key(parts: &[&str]) -> String {
        serde_json::to_string(parts).unwrap_or_else(|_| parts.join("\u{1f}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computes_once_per_key() {
        let mut cache: QueryCache<String> = QueryCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let value = cache
                .cache(&["buildSqlAndParams", "q1"], || {
                    calls += 1;
                    Ok("SELECT 1".to_string())
                })
                .unwrap();
            assert_eq!(value, "SELECT 1");
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_parts_are_order_sensitive() {
        let mut cache: QueryCache<i32> = QueryCache::new();
        cache.cache(&["a", "b"], || Ok(1)).unwrap();
        let second = cache.cache(&["b", "a"], || Ok(2)).unwrap();
        assert_eq!(second, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_part_boundaries_do_not_collide() {
        let mut cache: QueryCache<i32> = QueryCache::new();
        cache.cache(&["a", "bc"], || Ok(1)).unwrap();
        let other = cache.cache(&["ab", "c"], || Ok(2)).unwrap();
        assert_eq!(other, 2);
    }

    #[test]
    fn test_error_is_not_cached() {
        let mut cache: QueryCache<i32> = QueryCache::new();
        let err = cache.cache(&["k"], || {
            Err(crate::error::PolysqlError::programming("boom"))
        });
        assert!(err.is_err());
        let ok = cache.cache(&["k"], || Ok(7)).unwrap();
        assert_eq!(ok, 7);
    }
}
