//! Index List Module
//!
//! Per-kind ordered list of the cache keys that currently have records,
//! stored alongside the records themselves.
//!
//! The store has no prefix enumeration the cache relies on for bulk
//! operations, so these lists are the cache's own secondary index.

use tracing::warn;

use crate::cache::{CacheKey, ContentKind};
use crate::error::{CacheError, Result};
use crate::storage::KeyValueStore;

// == All ==
/// Returns the keys registered for `kind`, oldest registration first.
///
/// A list that no longer parses is treated as empty; the records it
/// pointed at become orphans that `stats` still counts.
pub fn all<S>(store: &S, kind: ContentKind) -> Result<Vec<CacheKey>>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(kind.index_key())? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&raw) {
        Ok(keys) => Ok(keys),
        Err(e) => {
            warn!("Ignoring unreadable {} index list: {}", kind.label(), e);
            Ok(Vec::new())
        }
    }
}

// == Register ==
/// Appends `key` unless already present.
///
/// Returns true when the list changed.
pub fn register<S>(store: &mut S, kind: ContentKind, key: &CacheKey) -> Result<bool>
where
    S: KeyValueStore + ?Sized,
{
    let mut keys = all(store, kind)?;
    if keys.contains(key) {
        return Ok(false);
    }

    keys.push(key.clone());
    replace(store, kind, &keys)?;
    Ok(true)
}

// == Unregister ==
/// Drops `key` from the list, if present.
pub fn unregister<S>(store: &mut S, kind: ContentKind, key: &CacheKey) -> Result<bool>
where
    S: KeyValueStore + ?Sized,
{
    let mut keys = all(store, kind)?;
    let before = keys.len();
    keys.retain(|k| k != key);

    if keys.len() == before {
        return Ok(false);
    }

    replace(store, kind, &keys)?;
    Ok(true)
}

// == Replace ==
/// Overwrites the whole list, used to persist a sweep's survivors.
pub fn replace<S>(store: &mut S, kind: ContentKind, keys: &[CacheKey]) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(keys).map_err(CacheError::Serialize)?;
    store.set(kind.index_key(), raw)?;
    Ok(())
}

// == Clear ==
/// Removes the list record entirely.
pub fn clear<S>(store: &mut S, kind: ContentKind) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    store.remove(kind.index_key())?;
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn key(topic: &str) -> CacheKey {
        CacheKey::derive("u", "sia", 7, topic)
    }

    #[test]
    fn test_missing_list_is_empty() {
        let store = MemoryStore::new();
        assert!(all(&store, ContentKind::Story).unwrap().is_empty());
    }

    #[test]
    fn test_register_preserves_order() {
        let mut store = MemoryStore::new();

        register(&mut store, ContentKind::Story, &key("a")).unwrap();
        register(&mut store, ContentKind::Story, &key("b")).unwrap();
        register(&mut store, ContentKind::Story, &key("c")).unwrap();

        assert_eq!(
            all(&store, ContentKind::Story).unwrap(),
            vec![key("a"), key("b"), key("c")]
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut store = MemoryStore::new();

        assert!(register(&mut store, ContentKind::Image, &key("a")).unwrap());
        assert!(!register(&mut store, ContentKind::Image, &key("a")).unwrap());

        assert_eq!(all(&store, ContentKind::Image).unwrap().len(), 1);
    }

    #[test]
    fn test_lists_are_per_kind() {
        let mut store = MemoryStore::new();
        register(&mut store, ContentKind::Story, &key("a")).unwrap();

        assert!(all(&store, ContentKind::Image).unwrap().is_empty());
        assert_eq!(
            store.get("story_cache_list").unwrap().as_deref(),
            Some("[\"u_sia_7_a\"]")
        );
    }

    #[test]
    fn test_unregister() {
        let mut store = MemoryStore::new();
        register(&mut store, ContentKind::Story, &key("a")).unwrap();
        register(&mut store, ContentKind::Story, &key("b")).unwrap();

        assert!(unregister(&mut store, ContentKind::Story, &key("a")).unwrap());
        assert!(!unregister(&mut store, ContentKind::Story, &key("zzz")).unwrap());
        assert_eq!(all(&store, ContentKind::Story).unwrap(), vec![key("b")]);
    }

    #[test]
    fn test_replace_and_clear() {
        let mut store = MemoryStore::new();
        register(&mut store, ContentKind::Story, &key("a")).unwrap();

        replace(&mut store, ContentKind::Story, &[key("x"), key("y")]).unwrap();
        assert_eq!(all(&store, ContentKind::Story).unwrap(), vec![key("x"), key("y")]);

        clear(&mut store, ContentKind::Story).unwrap();
        assert!(store.get("story_cache_list").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_list_reads_as_empty_and_is_rebuilt() {
        let mut store = MemoryStore::new();
        store.set("story_cache_list", "not json".to_string()).unwrap();

        assert!(all(&store, ContentKind::Story).unwrap().is_empty());

        register(&mut store, ContentKind::Story, &key("a")).unwrap();
        assert_eq!(all(&store, ContentKind::Story).unwrap(), vec![key("a")]);
    }
}
