use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Upper bound for a custom interval, in minutes.
pub const MAX_CUSTOM_MINUTES: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Which kind of interval the countdown is measuring.
///
/// Serialized names match the keys used by earlier releases
/// (`pomodoro`, `shortBreak`, `longBreak`, `custom`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerMode {
    #[serde(rename = "pomodoro")]
    Focus,
    #[serde(rename = "shortBreak")]
    ShortBreak,
    #[serde(rename = "longBreak")]
    LongBreak,
    #[serde(rename = "custom")]
    Custom,
}

impl TimerMode {
    /// Human-readable name for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
            TimerMode::Custom => "Custom",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimerMode::Focus => "pomodoro",
            TimerMode::ShortBreak => "shortBreak",
            TimerMode::LongBreak => "longBreak",
            TimerMode::Custom => "custom",
        };
        f.write_str(s)
    }
}

impl FromStr for TimerMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" | "pomodoro" | "work" => Ok(TimerMode::Focus),
            "short" | "short-break" | "shortbreak" | "short_break" => Ok(TimerMode::ShortBreak),
            "long" | "long-break" | "longbreak" | "long_break" => Ok(TimerMode::LongBreak),
            "custom" => Ok(TimerMode::Custom),
            other => Err(CoreError::invalid_input(
                "mode",
                format!("unknown timer mode '{other}'"),
            )),
        }
    }
}

/// Interval lengths driving the engine. All values are whole minutes.
///
/// Only constructible through [`TimerConfig::new`]; deserialization goes
/// through the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimerConfig")]
pub struct TimerConfig {
    focus_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
    long_break_interval: u32,
}

#[derive(Deserialize)]
struct RawTimerConfig {
    focus_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
    long_break_interval: u32,
}

impl TryFrom<RawTimerConfig> for TimerConfig {
    type Error = CoreError;

    fn try_from(raw: RawTimerConfig) -> Result<Self> {
        Self::new(
            raw.focus_minutes,
            raw.short_break_minutes,
            raw.long_break_minutes,
            raw.long_break_interval,
        )
    }
}

impl TimerConfig {
    /// Build a config, rejecting zero values.
    pub fn new(
        focus_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        long_break_interval: u32,
    ) -> Result<Self> {
        for (field, value) in [
            ("focus_minutes", focus_minutes),
            ("short_break_minutes", short_break_minutes),
            ("long_break_minutes", long_break_minutes),
            ("long_break_interval", long_break_interval),
        ] {
            if value == 0 {
                return Err(CoreError::invalid_input(field, "must be a positive integer"));
            }
        }
        Ok(Self {
            focus_minutes,
            short_break_minutes,
            long_break_minutes,
            long_break_interval,
        })
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }

    /// Every n-th completed focus interval in a session is followed by a long break.
    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval
    }

    /// Countdown length for `mode`, or `None` for [`TimerMode::Custom`],
    /// whose length is set explicitly.
    pub fn duration_secs(&self, mode: TimerMode) -> Option<u64> {
        let minutes = match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
            TimerMode::Custom => return None,
        };
        Some(u64::from(minutes).saturating_mul(60))
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
        }
    }
}

/// Validate a custom interval length.
pub fn validate_custom_minutes(minutes: u32) -> Result<u32> {
    if minutes == 0 || minutes > MAX_CUSTOM_MINUTES {
        return Err(CoreError::invalid_input(
            "custom_minutes",
            format!("must be between 1 and {MAX_CUSTOM_MINUTES}, got {minutes}"),
        ));
    }
    Ok(minutes)
}

/// Parse free-form user text into a custom interval length.
///
/// Only a plain integer (surrounding whitespace allowed) is accepted.
pub fn parse_custom_minutes(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    let minutes = trimmed.parse::<u32>().map_err(|_| {
        CoreError::invalid_input("custom_minutes", format!("'{trimmed}' is not a whole number"))
    })?;
    validate_custom_minutes(minutes)
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
