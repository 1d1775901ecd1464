use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::DayKey;
use crate::timer::{TimerMode, TimerState};

/// Every state change in the engine produces an Event.
/// The controller turns them into log lines, statistics writes,
/// notifications and sounds; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerTick {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// A focus interval finished and should be added to the day's statistics.
    FocusRecorded {
        day_key: DayKey,
        focus_minutes: u32,
        at: DateTime<Utc>,
    },
    /// A system-level alert should be shown.
    Notify {
        title: String,
        message: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: TimerMode,
        /// Human-readable mode name.
        label: String,
        remaining_secs: u64,
        /// `MM:SS` rendering of `remaining_secs`.
        display: String,
        completed_focus_count: u64,
        session_focus_count: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Wire name of the variant, as written to the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::TimerTick { .. } => "TimerTick",
            Event::ModeChanged { .. } => "ModeChanged",
            Event::TimerCompleted { .. } => "TimerCompleted",
            Event::FocusRecorded { .. } => "FocusRecorded",
            Event::Notify { .. } => "Notify",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
