//! Statistics for completed focus intervals.
//!
//! Daily aggregates are persisted through [`StatisticsStore`]; the
//! per-process session count comes from the engine.

mod day_key;
mod store;

pub use day_key::{local_today, DayKey};
pub use store::{DayStats, StatisticsStore, StatsSummary, STATS_KEY};
