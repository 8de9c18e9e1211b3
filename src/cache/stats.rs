//! Cache Statistics Module
//!
//! Snapshot of what the cache currently holds: entry counts, approximate
//! storage footprint and the age range of stored records.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

const KB: f64 = 1024.0;
const MB: usize = 1024 * 1024;

// == Entry Timestamp ==
/// Oldest/newest marker reported by stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTimestamp {
    At(DateTime<Utc>),
    /// No parsed record carried a timestamp
    None,
    /// The scan itself failed
    Error,
}

impl fmt::Display for EntryTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryTimestamp::At(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            EntryTimestamp::None => f.write_str("None"),
            EntryTimestamp::Error => f.write_str("Error"),
        }
    }
}

impl Serialize for EntryTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// == Cache Health ==
/// Coarse fill level shown by the cache manager panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHealth {
    Empty,
    Healthy,
    Moderate,
    Crowded,
}

// == Cache Stats ==
/// Point-in-time cache statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Keys in the story index list
    pub total_stories: usize,
    /// Keys in the image index list
    pub total_images: usize,
    /// Bytes of every record under a cache prefix, orphans included
    pub total_bytes: usize,
    /// `total_bytes` rendered in KB or MB
    pub cache_size: String,
    pub oldest_entry: EntryTimestamp,
    pub newest_entry: EntryTimestamp,
}

impl CacheStats {
    // == Error Sentinel ==
    /// Stats reported when the store could not be scanned.
    pub fn error() -> Self {
        Self {
            total_stories: 0,
            total_images: 0,
            total_bytes: 0,
            cache_size: "0 KB".to_string(),
            oldest_entry: EntryTimestamp::Error,
            newest_entry: EntryTimestamp::Error,
        }
    }

    pub fn total_entries(&self) -> usize {
        self.total_stories + self.total_images
    }

    // == Health ==
    pub fn health(&self) -> CacheHealth {
        match self.total_entries() {
            0 => CacheHealth::Empty,
            n if n < 20 => CacheHealth::Healthy,
            n if n < 50 => CacheHealth::Moderate,
            _ => CacheHealth::Crowded,
        }
    }
}

// == Size Label ==
/// Renders a byte count with two decimals, in MB once above 1 MB.
pub fn format_size(bytes: usize) -> String {
    if bytes > MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2} KB", bytes as f64 / KB)
    }
}

#[derive(Deserialize)]
struct Stamp {
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

// == Scan Accumulator ==
/// Folds raw records into size and age-range totals.
#[derive(Debug, Default)]
pub(crate) struct ScanAccumulator {
    total_bytes: usize,
    oldest: Option<DateTime<Utc>>,
    newest: Option<DateTime<Utc>>,
}

impl ScanAccumulator {
    /// Counts `raw` towards the size; records without a readable
    /// `createdAt` do not affect the age range.
    pub(crate) fn observe(&mut self, raw: &str) {
        self.total_bytes += raw.len();

        if let Ok(Stamp { created_at }) = serde_json::from_str::<Stamp>(raw) {
            self.oldest = Some(self.oldest.map_or(created_at, |o| o.min(created_at)));
            self.newest = Some(self.newest.map_or(created_at, |n| n.max(created_at)));
        }
    }

    pub(crate) fn finish(self, total_stories: usize, total_images: usize) -> CacheStats {
        let stamp = |at: Option<DateTime<Utc>>| at.map_or(EntryTimestamp::None, EntryTimestamp::At);

        CacheStats {
            total_stories,
            total_images,
            total_bytes: self.total_bytes,
            cache_size: format_size(self.total_bytes),
            oldest_entry: stamp(self.oldest),
            newest_entry: stamp(self.newest),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size(0), "0.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(MB), "1024.00 KB");
    }

    #[test]
    fn test_format_size_switches_to_mb_above_one_mb() {
        assert_eq!(format_size(MB + 1), "1.00 MB");
        assert_eq!(format_size(5 * MB / 2), "2.50 MB");
    }

    #[test]
    fn test_error_sentinel() {
        let stats = CacheStats::error();
        assert_eq!(stats.total_entries(), 0);
        assert_eq!(stats.cache_size, "0 KB");
        assert_eq!(stats.oldest_entry.to_string(), "Error");
        assert_eq!(stats.newest_entry.to_string(), "Error");
    }

    #[test]
    fn test_accumulator_tracks_range_and_skips_unstamped() {
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let mut acc = ScanAccumulator::default();
        acc.observe(&format!(r#"{{"createdAt":"{}"}}"#, late.to_rfc3339()));
        acc.observe(r#"["a_key"]"#);
        acc.observe("garbage");
        acc.observe(&format!(r#"{{"createdAt":"{}"}}"#, early.to_rfc3339()));

        let stats = acc.finish(1, 1);
        assert_eq!(stats.oldest_entry, EntryTimestamp::At(early));
        assert_eq!(stats.newest_entry, EntryTimestamp::At(late));
        assert!(stats.total_bytes > 0);
    }

    #[test]
    fn test_empty_scan_reports_none() {
        let stats = ScanAccumulator::default().finish(0, 0);
        assert_eq!(stats.oldest_entry, EntryTimestamp::None);
        assert_eq!(stats.cache_size, "0.00 KB");
    }

    #[test]
    fn test_health_thresholds() {
        let mut stats = ScanAccumulator::default().finish(0, 0);
        assert_eq!(stats.health(), CacheHealth::Empty);

        stats.total_stories = 19;
        assert_eq!(stats.health(), CacheHealth::Healthy);

        stats.total_images = 1;
        assert_eq!(stats.health(), CacheHealth::Moderate);

        stats.total_stories = 49;
        assert_eq!(stats.health(), CacheHealth::Crowded);
    }

    #[test]
    fn test_timestamp_display() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(EntryTimestamp::At(at).to_string(), "2024-03-01T08:00:00.000Z");
        assert_eq!(EntryTimestamp::None.to_string(), "None");
    }
}
