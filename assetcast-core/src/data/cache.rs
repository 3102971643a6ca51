//! CSV disk cache keyed by (symbol, start, end, frequency).
//!
//! Layout: `{cache_dir}/{symbol}_{start}_to_{end}_{frequency}.csv`
//!
//! Properties:
//! - the key tuple maps to the locator by direct concatenation, so distinct
//!   keys always map to distinct files;
//! - writes are whole-entry and atomic (write to .tmp, rename into place),
//!   so a reader can never observe a half-written entry;
//! - entries are append-only artifacts — never mutated, no TTL; a stale
//!   range is removed out-of-band;
//! - artifacts are plain tables with the canonical columns, validated on
//!   load before anything trusts them.
//!
//! The cache never fetches. On a miss the caller fetches through the source
//! adapter and calls `put`.

use super::provider::DataError;
use crate::domain::{Frequency, PriceRecord, CANONICAL_COLUMNS};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Identity of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub frequency: Frequency,
}

impl CacheKey {
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
            frequency,
        }
    }

    /// Stable, collision-free file name for this key.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_to_{}_{}.csv",
            self.symbol, self.start, self.end, self.frequency
        )
    }
}

/// The disk cache.
pub struct CsvCache {
    cache_dir: PathBuf,
}

impl CsvCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    /// Load the entry for a key. `Ok(None)` is a miss; a present but
    /// unreadable or foreign-schema file is an error, never silently used.
    pub fn get(&self, key: &CacheKey) -> Result<Option<Vec<PriceRecord>>, DataError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| DataError::Cache(format!("open {}: {e}", path.display())))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::Cache(format!("read header of {}: {e}", path.display())))?;
        if !headers.iter().eq(CANONICAL_COLUMNS) {
            return Err(DataError::Cache(format!(
                "unexpected columns in {}: expected {:?}",
                path.display(),
                CANONICAL_COLUMNS
            )));
        }

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: PriceRecord =
                row.map_err(|e| DataError::Cache(format!("read row of {}: {e}", path.display())))?;
            records.push(record);
        }
        Ok(Some(records))
    }

    /// Create the entry for a key. The write is whole-entry and atomic.
    pub fn put(&self, key: &CacheKey, records: &[PriceRecord]) -> Result<(), DataError> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| DataError::Cache(format!("create cache dir: {e}")))?;

        let path = self.entry_path(key);
        let tmp_path = path.with_extension("csv.tmp");

        let mut writer = csv::Writer::from_path(&tmp_path)
            .map_err(|e| DataError::Cache(format!("create {}: {e}", tmp_path.display())))?;
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| DataError::Cache(format!("write row: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| DataError::Cache(format!("flush: {e}")))?;
        drop(writer);

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::Cache(format!("atomic rename failed: {e}"))
        })?;
        Ok(())
    }

    /// Enumerate cached entries (for the CLI status command).
    pub fn status(&self) -> Result<Vec<CacheEntryStatus>, DataError> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let dir = fs::read_dir(&self.cache_dir)
            .map_err(|e| DataError::Cache(format!("read cache dir: {e}")))?;
        for entry in dir {
            let entry = entry.map_err(|e| DataError::Cache(format!("dir entry: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let rows = count_rows(&path)?;
            entries.push(CacheEntryStatus {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                rows,
            });
        }
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }
}

fn count_rows(path: &Path) -> Result<usize, DataError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DataError::Cache(format!("open {}: {e}", path.display())))?;
    let mut rows = 0;
    for record in reader.records() {
        record.map_err(|e| DataError::Cache(format!("read {}: {e}", path.display())))?;
        rows += 1;
    }
    Ok(rows)
}

/// One row of `cache status` output.
#[derive(Debug, Clone)]
pub struct CacheEntryStatus {
    pub file_name: String,
    pub rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_cache_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("assetcast_cache_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_key() -> CacheKey {
        CacheKey::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            Frequency::Daily,
        )
    }

    fn sample_records() -> Vec<PriceRecord> {
        (0..3)
            .map(|i| PriceRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 2 + i)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open: 100.0 + i as f64,
                high: 102.0 + i as f64,
                low: 99.0 + i as f64,
                close: 101.0 + i as f64,
                volume: 1000.0,
                asset: "AAPL".into(),
            })
            .collect()
    }

    #[test]
    fn put_then_get_roundtrip() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(&dir);

        cache.put(&sample_key(), &sample_records()).unwrap();
        let loaded = cache.get(&sample_key()).unwrap().unwrap();

        assert_eq!(loaded, sample_records());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn get_before_put_is_a_miss() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(&dir);
        assert!(cache.get(&sample_key()).unwrap().is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn nan_open_survives_the_roundtrip() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(&dir);

        let mut records = sample_records();
        records[0].open = f64::NAN;
        cache.put(&sample_key(), &records).unwrap();
        let loaded = cache.get(&sample_key()).unwrap().unwrap();

        assert!(loaded[0].open.is_nan());
        assert_eq!(loaded[1..], records[1..]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn distinct_keys_map_to_distinct_locators() {
        let base = sample_key();
        let mut other_symbol = base.clone();
        other_symbol.symbol = "MSFT".into();
        let mut other_freq = base.clone();
        other_freq.frequency = Frequency::Minutes(5);
        let mut other_end = base.clone();
        other_end.end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let names = [
            base.file_name(),
            other_symbol.file_name(),
            other_freq.file_name(),
            other_end.file_name(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn foreign_schema_file_is_an_error_not_data() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(&dir);
        let key = sample_key();

        fs::write(dir.join(key.file_name()), "a,b,c\n1,2,3\n").unwrap();
        let err = cache.get(&key).unwrap_err();
        assert!(matches!(err, DataError::Cache(_)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(&dir);
        cache.put(&sample_key(), &sample_records()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn status_lists_entries_with_row_counts() {
        let dir = temp_cache_dir();
        let cache = CsvCache::new(&dir);
        cache.put(&sample_key(), &sample_records()).unwrap();

        let status = cache.status().unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].file_name, sample_key().file_name());
        assert_eq!(status[0].rows, 3);
        let _ = fs::remove_dir_all(&dir);
    }
}
