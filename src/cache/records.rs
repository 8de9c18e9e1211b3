//! Entry Store Module
//!
//! Reads and writes single cached records under their derived key.

use tracing::debug;

use crate::cache::{CacheKey, CachedEntry};
use crate::error::{CacheError, Result};
use crate::storage::KeyValueStore;

// == Record ==
/// Outcome of reading one record.
#[derive(Debug)]
pub enum Record<E> {
    Present(E),
    Absent,
    /// A payload exists but does not parse as `E`, or names another key
    Corrupt(CacheError),
}

// == Read ==
/// Reads the record for `key`, distinguishing absent from corrupt.
///
/// Only backend failures are returned as errors.
pub fn read<E, S>(store: &S, key: &CacheKey) -> Result<Record<E>>
where
    E: CachedEntry,
    S: KeyValueStore + ?Sized,
{
    let storage_key = E::KIND.record_key(key);

    let Some(raw) = store.get(&storage_key)? else {
        return Ok(Record::Absent);
    };

    match serde_json::from_str::<E>(&raw) {
        Ok(entry) if entry.cache_key() != key => Ok(Record::Corrupt(CacheError::KeyMismatch {
            key: storage_key,
            found: entry.cache_key().clone(),
        })),
        Ok(entry) => Ok(Record::Present(entry)),
        Err(source) => Ok(Record::Corrupt(CacheError::Parse {
            key: storage_key,
            source,
        })),
    }
}

// == Get ==
/// Returns the entry for `key`, treating corrupt payloads as a miss.
pub fn get<E, S>(store: &S, key: &CacheKey) -> Result<Option<E>>
where
    E: CachedEntry,
    S: KeyValueStore + ?Sized,
{
    match read(store, key)? {
        Record::Present(entry) => Ok(Some(entry)),
        Record::Absent => Ok(None),
        Record::Corrupt(err) => {
            debug!("Treating unreadable {} record as a miss: {}", E::KIND.label(), err);
            Ok(None)
        }
    }
}

// == Put ==
/// Serializes `entry` and overwrites whatever was stored under `key`.
pub fn put<E, S>(store: &mut S, key: &CacheKey, entry: &E) -> Result<()>
where
    E: CachedEntry,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(entry).map_err(CacheError::Serialize)?;
    store.set(&E::KIND.record_key(key), raw)?;
    Ok(())
}

// == Delete ==
/// Removes the record for `key`; absent records are not an error.
pub fn delete<E, S>(store: &mut S, key: &CacheKey) -> Result<()>
where
    E: CachedEntry,
    S: KeyValueStore + ?Sized,
{
    store.remove(&E::KIND.record_key(key))?;
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedImageEntry;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn image(key: &CacheKey) -> CachedImageEntry {
        CachedImageEntry {
            url: "https://img.example/forest.png".to_string(),
            prompt: "A forest".to_string(),
            created_at: Utc::now(),
            cache_key: key.clone(),
        }
    }

    #[test]
    fn test_put_then_get() {
        let mut store = MemoryStore::new();
        let key = CacheKey::derive("u", "sia", 7, "Plants");
        let entry = image(&key);

        put(&mut store, &key, &entry).unwrap();
        let loaded: Option<CachedImageEntry> = get(&store, &key).unwrap();

        assert_eq!(loaded, Some(entry));
        assert!(store.get("image_cache_u_sia_7_plants").unwrap().is_some());
    }

    #[test]
    fn test_get_absent() {
        let store = MemoryStore::new();
        let key = CacheKey::derive("u", "sia", 7, "Plants");

        let loaded: Option<CachedImageEntry> = get(&store, &key).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_payload_is_a_miss() {
        let mut store = MemoryStore::new();
        let key = CacheKey::derive("u", "sia", 7, "Plants");
        store
            .set(&format!("image_cache_{}", key), "{broken".to_string())
            .unwrap();

        let loaded: Option<CachedImageEntry> = get(&store, &key).unwrap();
        assert!(loaded.is_none());

        let record: Record<CachedImageEntry> = read(&store, &key).unwrap();
        assert!(matches!(record, Record::Corrupt(CacheError::Parse { .. })));
    }

    #[test]
    fn test_record_under_foreign_key_is_corrupt() {
        let mut store = MemoryStore::new();
        let key = CacheKey::derive("u", "sia", 7, "Plants");
        let other = CacheKey::derive("u", "raghav", 7, "Plants");
        put(&mut store, &key, &image(&other)).unwrap();

        let loaded: Option<CachedImageEntry> = get(&store, &key).unwrap();
        assert!(loaded.is_none());

        let record: Record<CachedImageEntry> = read(&store, &key).unwrap();
        match record {
            Record::Corrupt(CacheError::KeyMismatch { key: stored, found }) => {
                assert_eq!(stored, "image_cache_u_sia_7_plants");
                assert_eq!(found, other);
            }
            unexpected => panic!("expected key mismatch, got {:?}", unexpected),
        }
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = MemoryStore::new();
        let key = CacheKey::derive("u", "sia", 7, "Plants");

        put(&mut store, &key, &image(&key)).unwrap();
        let mut second = image(&key);
        second.url = "https://img.example/garden.png".to_string();
        put(&mut store, &key, &second).unwrap();

        let loaded: Option<CachedImageEntry> = get(&store, &key).unwrap();
        assert_eq!(loaded.unwrap().url, "https://img.example/garden.png");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = MemoryStore::new();
        let key = CacheKey::derive("u", "sia", 7, "Plants");

        put(&mut store, &key, &image(&key)).unwrap();
        delete::<CachedImageEntry, _>(&mut store, &key).unwrap();
        delete::<CachedImageEntry, _>(&mut store, &key).unwrap();

        assert!(store.is_empty());
    }
}
