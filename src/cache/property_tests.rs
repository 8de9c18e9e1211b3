//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key derivation, expiry and index maintenance
//! over arbitrary fingerprints and operation sequences.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use crate::cache::{
    index, records, CacheKey, CachedImageEntry, CachedStoryEntry, ContentCache, ContentKind,
    Fingerprint, StoryDraft,
};
use crate::clock::{Clock, ManualClock};
use crate::storage::{KeyValueStore, MemoryStore};

// == Test Configuration ==
fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn new_cache() -> ContentCache<MemoryStore, ManualClock> {
    ContentCache::with_clock(MemoryStore::new(), ManualClock::new(epoch()))
}

// == Strategies ==
fn owner_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,16}"
}

fn character_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("sia".to_string()), Just("raghav".to_string())]
}

/// Topic words, rendered with arbitrary whitespace runs and casing.
fn topic_words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 1..5)
}

fn render_topic(words: &[String], separators: &[&str], upper: bool) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push_str(separators[i % separators.len()]);
        }
        out.push_str(&if upper { word.to_uppercase() } else { word.clone() });
    }
    out
}

fn fingerprint_strategy() -> impl Strategy<Value = Fingerprint> {
    (owner_strategy(), character_strategy(), 4u32..12, topic_words_strategy())
        .prop_map(|(owner, character, age, words)| {
            Fingerprint::new(owner, character, age, words.join(" "))
        })
}

fn draft(created_at: DateTime<Utc>) -> StoryDraft {
    StoryDraft {
        id: "story_prop".to_string(),
        title: "A title".to_string(),
        content: "Some text".to_string(),
        science_topic: "Topic".to_string(),
        story_number: 1,
        questions: Vec::new(),
        created_at,
    }
}

/// Operations applied against the cache in sequence.
#[derive(Debug, Clone)]
enum CacheOp {
    StoreStory { fp: usize },
    StoreImage { fp: usize },
    Advance { minutes: i64 },
    Lookup { fp: usize },
    DropRecord { fp: usize },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0usize..6).prop_map(|fp| CacheOp::StoreStory { fp }),
        (0usize..6).prop_map(|fp| CacheOp::StoreImage { fp }),
        (1i64..4000).prop_map(|minutes| CacheOp::Advance { minutes }),
        (0usize..6).prop_map(|fp| CacheOp::Lookup { fp }),
        (0usize..6).prop_map(|fp| CacheOp::DropRecord { fp }),
    ]
}

fn pool_fp(i: usize) -> Fingerprint {
    Fingerprint::new("owner", "sia", 7, format!("topic {}", i))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Topics differing only in whitespace runs and case derive the same key
    #[test]
    fn prop_key_normalization(
        owner in owner_strategy(),
        character in character_strategy(),
        age in 4u32..12,
        words in topic_words_strategy(),
    ) {
        let plain = render_topic(&words, &[" "], false);
        let noisy = render_topic(&words, &["  ", "\t", " \n "], true);

        let a = CacheKey::derive(&owner, &character, age, &plain);
        let b = CacheKey::derive(&owner, &character, age, &noisy);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, CacheKey::derive(&owner, &character, age, &plain));
    }

    // A story stored within its TTL reads back field-for-field
    #[test]
    fn prop_story_roundtrip_within_ttl(fp in fingerprint_strategy(), age_ms in 0i64..=86_400_000) {
        let mut cache = new_cache();
        let story = draft(epoch() - Duration::milliseconds(age_ms));

        cache.store_story(&fp, story.clone());
        let hit = cache.lookup_story(&fp);

        prop_assert!(hit.is_some());
        let hit = hit.unwrap();
        prop_assert_eq!(hit.story, story);
        prop_assert_eq!(hit.cache_key, fp.key());
    }

    // Any story older than 24h is a miss and is gone from the store
    #[test]
    fn prop_story_expired_past_ttl(fp in fingerprint_strategy(), extra_ms in 1i64..1_000_000_000) {
        let mut cache = new_cache();
        let created_at = epoch() - Duration::hours(24) - Duration::milliseconds(extra_ms);
        cache.store_story(&fp, draft(created_at));

        prop_assert!(cache.lookup_story(&fp).is_none());
        let record: Option<CachedStoryEntry> = records::get(cache.store(), &fp.key()).unwrap();
        prop_assert!(record.is_none());
    }

    // Stories and images never answer for each other
    #[test]
    fn prop_kind_isolation(fp in fingerprint_strategy()) {
        let mut cache = new_cache();

        cache.store_story(&fp, draft(epoch()));
        prop_assert!(cache.lookup_image(&fp).is_none());

        let mut other = new_cache();
        other.store_image(&fp, "https://img/x.png", "prompt");
        prop_assert!(other.lookup_story(&fp).is_none());
        prop_assert!(other.lookup_image(&fp).is_some());
    }

    // After a sweep every indexed key has a live record, and no expired
    // record remains in the store
    #[test]
    fn prop_index_consistent_after_sweep(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut cache = new_cache();

        for op in ops {
            match op {
                CacheOp::StoreStory { fp } => {
                    let now = cache.clock().now();
                    cache.store_story(&pool_fp(fp), draft(now));
                }
                CacheOp::StoreImage { fp } => {
                    cache.store_image(&pool_fp(fp), "https://img/p.png", "p")
                }
                CacheOp::Advance { minutes } => cache.clock().advance(Duration::minutes(minutes)),
                CacheOp::Lookup { fp } => {
                    let _ = cache.lookup_story(&pool_fp(fp));
                    let _ = cache.lookup_image(&pool_fp(fp));
                }
                CacheOp::DropRecord { fp } => {
                    let key = ContentKind::Story.record_key(&pool_fp(fp).key());
                    cache.store_mut().remove(&key).unwrap();
                }
            }
        }

        cache.clear_expired();

        let now = cache.clock().now();
        let policy = *cache.policy();

        for key in index::all(cache.store(), ContentKind::Story).unwrap() {
            let entry: Option<CachedStoryEntry> = records::get(cache.store(), &key).unwrap();
            prop_assert!(entry.is_some(), "dangling story key {}", key);
            let created_at = entry.unwrap().story.created_at;
            prop_assert!(!policy.is_expired(ContentKind::Story, created_at, now));
        }
        for key in index::all(cache.store(), ContentKind::Image).unwrap() {
            let entry: Option<CachedImageEntry> = records::get(cache.store(), &key).unwrap();
            prop_assert!(entry.is_some(), "dangling image key {}", key);
            prop_assert!(!policy.is_expired(ContentKind::Image, entry.unwrap().created_at, now));
        }

        for i in 0..6 {
            let key = pool_fp(i).key();
            if let Some(story) = records::get::<CachedStoryEntry, _>(cache.store(), &key).unwrap() {
                prop_assert!(!policy.is_expired(ContentKind::Story, story.story.created_at, now));
            }
            if let Some(image) = records::get::<CachedImageEntry, _>(cache.store(), &key).unwrap() {
                prop_assert!(!policy.is_expired(ContentKind::Image, image.created_at, now));
            }
        }
    }

    // Clearing twice leaves the same empty store and the second pass clears nothing
    #[test]
    fn prop_clear_all_idempotent(fps in prop::collection::vec(fingerprint_strategy(), 0..10)) {
        let mut cache = new_cache();
        for fp in &fps {
            cache.store_story(fp, draft(epoch()));
            cache.store_image(fp, "https://img/c.png", "p");
        }

        cache.clear_all();
        let after_first = cache.store().keys().unwrap();

        prop_assert_eq!(cache.clear_all(), 0);
        prop_assert_eq!(cache.store().keys().unwrap(), after_first.clone());
        prop_assert!(after_first.is_empty());
        prop_assert_eq!(cache.stats().total_entries(), 0);
    }
}
