//! # focuscycle Core Library
//!
//! Core logic for a focus/break cycle timer meant to be embedded in a host
//! application. The host supplies the tick source, notifications, sound and
//! durable storage; this crate owns the state machine and the statistics.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a countdown state machine advanced by `tick()` while
//!   its tick source is armed. Commands return [`Event`]s instead of doing I/O.
//! - **Statistics**: per-day completion counts persisted as one JSON map
//!   through a [`KeyValueStore`].
//! - **Controller**: routes engine events to logging, storage, notifier and
//!   audio, swallowing (and logging) collaborator failures.
//! - **Storage**: SQLite key-value store and TOML configuration.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`StatisticsStore`]: Daily aggregates
//! - [`Controller`]: Engine plus collaborators
//! - [`Config`]: Application configuration management

pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod stats;
pub mod storage;
pub mod timer;

pub use controller::Controller;
pub use error::{ConfigError, CoreError, PersistenceError};
pub use events::Event;
pub use host::{AudioCue, Notifier, NullNotifier, SilentAudio};
pub use stats::{DayKey, DayStats, StatisticsStore, StatsSummary};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use timer::{
    IntervalTicker, ManualTicker, TickSource, TimerConfig, TimerEngine, TimerMode, TimerState,
};
