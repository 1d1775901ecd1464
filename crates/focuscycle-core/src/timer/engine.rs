//! Timer engine implementation.
//!
//! The engine is a countdown state machine advanced one second per `tick()`.
//! It does not use internal threads or perform I/O: it arms and disarms an
//! injected [`TickSource`] and returns the [`Event`]s each command produced.
//! The caller (usually [`crate::Controller`]) acts on those events.
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Paused --start--> Running --pause--> Paused
//! any --reset | set_mode | set_custom_duration--> Idle
//! Running --tick reaching zero--> Idle (mode auto-advanced, not started)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default());
//! engine.start();
//! // Once per second while engine.ticker().is_armed():
//! let events = engine.tick();
//! ```

use chrono::{NaiveDate, Utc};

use super::mode::{format_time, validate_custom_minutes, TimerConfig, TimerMode, TimerState};
use super::ticker::{ManualTicker, TickSource};
use crate::error::Result;
use crate::events::Event;
use crate::stats::{local_today, DayKey};

pub const NOTIFY_TITLE: &str = "Focus Timer";
pub const FOCUS_COMPLETE_MESSAGE: &str = "Focus session complete! Time for a break.";
pub const BREAK_COMPLETE_MESSAGE: &str = "Break is over! Back to focus.";

/// Core timer engine.
///
/// Owns its counters; one instance lives for the whole process.
#[derive(Debug)]
pub struct TimerEngine<T: TickSource = ManualTicker> {
    config: TimerConfig,
    ticker: T,
    state: TimerState,
    mode: TimerMode,
    remaining_secs: u64,
    /// Last custom length, restored by `reset()` while in Custom mode.
    custom_secs: Option<u64>,
    completed_focus_count: u64,
    session_focus_count: u64,
    calendar: fn() -> NaiveDate,
}

impl TimerEngine<ManualTicker> {
    /// Engine driven by synthetic ticks.
    pub fn new(config: TimerConfig) -> Self {
        Self::with_ticker(config, ManualTicker::new())
    }
}

impl<T: TickSource> TimerEngine<T> {
    /// Create an engine in Focus mode, `Idle`, with a full focus interval loaded.
    pub fn with_ticker(config: TimerConfig, mut ticker: T) -> Self {
        ticker.disarm();
        let remaining_secs = config.duration_secs(TimerMode::Focus).unwrap_or(0);
        Self {
            config,
            ticker,
            state: TimerState::Idle,
            mode: TimerMode::Focus,
            remaining_secs,
            custom_secs: None,
            completed_focus_count: 0,
            session_focus_count: 0,
            calendar: local_today,
        }
    }

    /// Replace the date source used to stamp completed focus intervals.
    pub fn with_calendar(mut self, calendar: fn() -> NaiveDate) -> Self {
        self.calendar = calendar;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn completed_focus_count(&self) -> u64 {
        self.completed_focus_count
    }

    pub fn session_focus_count(&self) -> u64 {
        self.session_focus_count
    }

    /// Day key for "today" according to the engine's calendar.
    pub fn today(&self) -> DayKey {
        DayKey::from_date((self.calendar)())
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            mode: self.mode,
            label: self.mode.label().to_string(),
            remaining_secs: self.remaining_secs,
            display: format_time(self.remaining_secs),
            completed_focus_count: self.completed_focus_count,
            session_focus_count: self.session_focus_count,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state == TimerState::Running {
            return None;
        }
        self.state = TimerState::Running;
        self.ticker.arm();
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        self.ticker.disarm();
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and reload the full interval for the current mode.
    pub fn reset(&mut self) -> Event {
        self.stop();
        self.remaining_secs = self.duration_for(self.mode);
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance the countdown by one second.
    ///
    /// No-op unless Running. The tick that reaches zero also completes the
    /// interval, so an N-second interval completes on the N-th tick.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            events.push(Event::TimerTick {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            });
        }
        if self.remaining_secs == 0 {
            events.extend(self.complete());
        }
        events
    }

    pub fn set_mode(&mut self, mode: TimerMode) -> Event {
        self.stop();
        self.mode = mode;
        self.remaining_secs = self.duration_for(mode);
        Event::ModeChanged {
            mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Switch to Custom mode with an explicit length in minutes, `1..=120`.
    ///
    /// On error nothing changes.
    pub fn set_custom_duration(&mut self, minutes: u32) -> Result<Event> {
        let minutes = validate_custom_minutes(minutes)?;
        self.custom_secs = Some(u64::from(minutes) * 60);
        Ok(self.set_mode(TimerMode::Custom))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn stop(&mut self) {
        self.ticker.disarm();
        self.state = TimerState::Idle;
    }

    fn duration_for(&self, mode: TimerMode) -> u64 {
        self.config
            .duration_secs(mode)
            .or(self.custom_secs)
            .unwrap_or(self.remaining_secs)
    }

    fn complete(&mut self) -> Vec<Event> {
        // Going Idle first makes any stray tick after this a no-op.
        self.stop();
        let finished = self.mode;
        let mut events = vec![Event::TimerCompleted {
            mode: finished,
            at: Utc::now(),
        }];

        if finished == TimerMode::Focus {
            self.completed_focus_count += 1;
            self.session_focus_count += 1;
            events.push(Event::FocusRecorded {
                day_key: self.today(),
                focus_minutes: self.config.focus_minutes(),
                at: Utc::now(),
            });
            events.push(notify(FOCUS_COMPLETE_MESSAGE));
            let next = if self.session_focus_count % u64::from(self.config.long_break_interval()) == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
            events.push(self.set_mode(next));
        } else {
            events.push(notify(BREAK_COMPLETE_MESSAGE));
            events.push(self.set_mode(TimerMode::Focus));
        }
        events
    }
}

fn notify(message: &str) -> Event {
    Event::Notify {
        title: NOTIFY_TITLE.to_string(),
        message: message.to_string(),
        at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn engine() -> TimerEngine {
        TimerEngine::new(TimerConfig::default()).with_calendar(fixed_day)
    }

    fn run_to_completion(engine: &mut TimerEngine) -> Vec<Event> {
        engine.start();
        let mut all = Vec::new();
        while engine.state() == TimerState::Running {
            all.extend(engine.tick());
        }
        all
    }

    #[test]
    fn new_engine_is_idle_focus_with_full_interval() {
        let e = engine();
        assert_eq!(e.state(), TimerState::Idle);
        assert_eq!(e.mode(), TimerMode::Focus);
        assert_eq!(e.remaining_secs(), 1500);
        assert!(!e.ticker().is_armed());
    }

    #[test]
    fn start_pause_start() {
        let mut e = engine();
        assert!(e.start().is_some());
        assert_eq!(e.state(), TimerState::Running);
        assert!(e.ticker().is_armed());

        assert!(e.pause().is_some());
        assert_eq!(e.state(), TimerState::Paused);
        assert!(!e.ticker().is_armed());

        assert!(e.start().is_some());
        assert_eq!(e.state(), TimerState::Running);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut e = engine();
        e.start();
        assert!(e.start().is_none());
        assert_eq!(e.ticker().arm_count(), 1);
    }

    #[test]
    fn pause_twice_equals_pause_once() {
        let mut e = engine();
        e.start();
        e.tick();
        assert!(e.pause().is_some());
        let after_first = (e.state(), e.remaining_secs(), e.ticker().is_armed());
        assert!(e.pause().is_none());
        assert_eq!(after_first, (e.state(), e.remaining_secs(), e.ticker().is_armed()));
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let mut e = engine();
        assert!(e.pause().is_none());
        assert_eq!(e.state(), TimerState::Idle);
    }

    #[test]
    fn tick_when_not_running_does_nothing() {
        let mut e = engine();
        assert!(e.tick().is_empty());
        e.start();
        e.pause();
        assert!(e.tick().is_empty());
        assert_eq!(e.remaining_secs(), 1500);
    }

    #[test]
    fn tick_decrements_and_reports() {
        let mut e = engine();
        e.start();
        let events = e.tick();
        assert_eq!(e.remaining_secs(), 1499);
        assert!(matches!(events.as_slice(), [Event::TimerTick { remaining_secs: 1499, .. }]));
    }

    #[test]
    fn reset_reloads_interval_and_stops() {
        let mut e = engine();
        e.start();
        for _ in 0..10 {
            e.tick();
        }
        let ev = e.reset();
        assert!(matches!(ev, Event::TimerReset { remaining_secs: 1500, .. }));
        assert_eq!(e.state(), TimerState::Idle);
        assert!(!e.ticker().is_armed());
    }

    #[test]
    fn focus_completes_on_the_last_tick() {
        let mut e = engine();
        e.start();
        for _ in 0..1499 {
            e.tick();
        }
        assert_eq!(e.completed_focus_count(), 0);
        let events = e.tick();
        assert!(events.iter().any(|ev| matches!(ev, Event::TimerCompleted { mode: TimerMode::Focus, .. })));
        assert_eq!(e.completed_focus_count(), 1);
        assert_eq!(e.session_focus_count(), 1);
        assert_eq!(e.mode(), TimerMode::ShortBreak);
        assert_eq!(e.remaining_secs(), 300);
        assert_eq!(e.state(), TimerState::Idle);
        assert!(!e.ticker().is_armed());
    }

    #[test]
    fn focus_completion_requests_stats_and_notification() {
        let mut e = engine();
        let events = run_to_completion(&mut e);
        let kinds: Vec<_> = events
            .iter()
            .filter(|ev| !matches!(ev, Event::TimerTick { .. }))
            .map(Event::kind)
            .collect();
        assert_eq!(kinds, ["TimerCompleted", "FocusRecorded", "Notify", "ModeChanged"]);

        let recorded = events.iter().find_map(|ev| match ev {
            Event::FocusRecorded { day_key, focus_minutes, .. } => Some((day_key.clone(), *focus_minutes)),
            _ => None,
        });
        assert_eq!(recorded, Some((DayKey::from_date(fixed_day()), 25)));
    }

    #[test]
    fn tick_after_completion_does_not_double_count() {
        let mut e = engine();
        run_to_completion(&mut e);
        assert!(e.tick().is_empty());
        assert!(e.tick().is_empty());
        assert_eq!(e.completed_focus_count(), 1);
    }

    #[test]
    fn break_completion_returns_to_focus_without_counting() {
        let mut e = engine();
        e.set_mode(TimerMode::ShortBreak);
        let events = run_to_completion(&mut e);
        assert_eq!(e.mode(), TimerMode::Focus);
        assert_eq!(e.remaining_secs(), 1500);
        assert_eq!(e.completed_focus_count(), 0);
        assert!(events.iter().any(|ev| matches!(
            ev,
            Event::Notify { message, .. } if message == BREAK_COMPLETE_MESSAGE
        )));
        assert!(!events.iter().any(|ev| matches!(ev, Event::FocusRecorded { .. })));
    }

    #[test]
    fn every_fourth_focus_earns_a_long_break() {
        let mut e = engine();
        let mut breaks = Vec::new();
        for _ in 0..8 {
            e.set_mode(TimerMode::Focus);
            run_to_completion(&mut e);
            breaks.push(e.mode());
        }
        use TimerMode::{LongBreak as L, ShortBreak as S};
        assert_eq!(breaks, [S, S, S, L, S, S, S, L]);
    }

    #[test]
    fn long_break_interval_of_one_always_long() {
        let cfg = TimerConfig::new(1, 1, 2, 1).unwrap();
        let mut e = TimerEngine::new(cfg);
        run_to_completion(&mut e);
        assert_eq!(e.mode(), TimerMode::LongBreak);
        assert_eq!(e.remaining_secs(), 120);
    }

    #[test]
    fn set_mode_stops_running_timer() {
        let mut e = engine();
        e.start();
        e.tick();
        let ev = e.set_mode(TimerMode::LongBreak);
        assert!(matches!(ev, Event::ModeChanged { mode: TimerMode::LongBreak, remaining_secs: 900, .. }));
        assert_eq!(e.state(), TimerState::Idle);
        assert!(!e.ticker().is_armed());
    }

    #[test]
    fn custom_duration_sets_mode_and_length() {
        let mut e = engine();
        e.start();
        let ev = e.set_custom_duration(45).unwrap();
        assert!(matches!(ev, Event::ModeChanged { mode: TimerMode::Custom, remaining_secs: 2700, .. }));
        assert_eq!(e.state(), TimerState::Idle);
    }

    #[test]
    fn invalid_custom_duration_leaves_engine_unchanged() {
        let mut e = engine();
        e.set_mode(TimerMode::ShortBreak);
        e.start();
        e.tick();
        for bad in [0, 121, 500] {
            assert!(e.set_custom_duration(bad).unwrap_err().is_invalid_input());
        }
        assert_eq!(e.mode(), TimerMode::ShortBreak);
        assert_eq!(e.remaining_secs(), 299);
        assert_eq!(e.state(), TimerState::Running);
    }

    #[test]
    fn reset_in_custom_mode_restores_custom_length() {
        let mut e = engine();
        e.set_custom_duration(10).unwrap();
        e.start();
        for _ in 0..30 {
            e.tick();
        }
        e.reset();
        assert_eq!(e.mode(), TimerMode::Custom);
        assert_eq!(e.remaining_secs(), 600);
    }

    #[test]
    fn custom_completion_returns_to_focus() {
        let mut e = engine();
        e.set_custom_duration(1).unwrap();
        run_to_completion(&mut e);
        assert_eq!(e.mode(), TimerMode::Focus);
        assert_eq!(e.completed_focus_count(), 0);
    }

    #[test]
    fn snapshot_reports_display_time() {
        let e = engine();
        match e.snapshot() {
            Event::StateSnapshot { state, label, display, remaining_secs, .. } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(label, "Focus");
                assert_eq!(remaining_secs, 1500);
                assert_eq!(display, "25:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
