//! Daily completion statistics.
//!
//! The whole history is one JSON object under [`STATS_KEY`]:
//!
//! ```text
//! { "2024-3-5": { "count": 3, "workTime": 75 }, ... }
//! ```
//!
//! Entries are created on the first completion of a day and never removed
//! here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::day_key::DayKey;
use crate::error::PersistenceError;
use crate::storage::KeyValueStore;

/// Storage key holding the day map.
pub const STATS_KEY: &str = "pomodoro_stats";

/// Aggregate for one calendar day (or a sum of days).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayStats {
    pub count: u64,
    #[serde(rename = "workTime")]
    pub work_minutes: u64,
}

/// What a status line shows: today plus the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub day_key: DayKey,
    pub today: DayStats,
    pub session_focus_count: u64,
}

type DayMap = BTreeMap<String, DayStats>;

/// Reads and updates the persisted day map through a [`KeyValueStore`].
#[derive(Debug)]
pub struct StatisticsStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StatisticsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add one completed focus interval of `focus_minutes` to `day`.
    ///
    /// Returns the day's updated aggregate.
    pub fn record_completion(
        &self,
        day: &DayKey,
        focus_minutes: u32,
    ) -> Result<DayStats, PersistenceError> {
        let mut days = self.load()?;
        let entry = days.entry(day.as_str().to_string()).or_default();
        entry.count += 1;
        entry.work_minutes += u64::from(focus_minutes);
        let updated = *entry;
        self.save(&days)?;
        Ok(updated)
    }

    /// Aggregate for `day`, zero if nothing was recorded.
    pub fn today_stats(&self, day: &DayKey) -> Result<DayStats, PersistenceError> {
        Ok(self.load()?.get(day.as_str()).copied().unwrap_or_default())
    }

    /// Every recorded day in calendar order. Keys that are not dates sort last.
    pub fn all_days(&self) -> Result<Vec<(DayKey, DayStats)>, PersistenceError> {
        let mut days: Vec<_> = self
            .load()?
            .into_iter()
            .map(|(key, stats)| (DayKey::from_stored(key), stats))
            .collect();
        days.sort_by_cached_key(|(key, _)| {
            let date = key.date();
            (date.is_none(), date, key.as_str().to_string())
        });
        Ok(days)
    }

    /// Sum over all recorded days.
    pub fn totals(&self) -> Result<DayStats, PersistenceError> {
        Ok(self
            .load()?
            .values()
            .fold(DayStats::default(), |acc, d| DayStats {
                count: acc.count + d.count,
                work_minutes: acc.work_minutes + d.work_minutes,
            }))
    }

    fn load(&self) -> Result<DayMap, PersistenceError> {
        match self.store.get_item(STATS_KEY)? {
            None | Some(Value::Null) => Ok(DayMap::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| PersistenceError::Corrupt {
                key: STATS_KEY.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn save(&self, days: &DayMap) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(days).map_err(|e| PersistenceError::Corrupt {
            key: STATS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set_item(STATS_KEY, &value)
    }
}
