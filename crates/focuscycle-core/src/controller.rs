//! Wires engine events to the host.
//!
//! Every command forwards to the [`TimerEngine`] and then dispatches the
//! produced events: log lines, the completion sound, statistics writes and
//! notifications. Persistence and notification failures are logged and
//! swallowed so the countdown never stalls on them.

use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::host::{AudioCue, Notifier, NullNotifier, SilentAudio};
use crate::stats::{DayStats, StatisticsStore, StatsSummary};
use crate::storage::KeyValueStore;
use crate::timer::{
    parse_custom_minutes, TickSource, TimerEngine, TimerMode, MAX_CUSTOM_MINUTES, NOTIFY_TITLE,
};

/// One engine, its statistics and the host collaborators.
pub struct Controller<T: TickSource, S: KeyValueStore> {
    engine: TimerEngine<T>,
    stats: StatisticsStore<S>,
    notifier: Box<dyn Notifier>,
    audio: Box<dyn AudioCue>,
}

impl<T: TickSource, S: KeyValueStore> Controller<T, S> {
    pub fn new(engine: TimerEngine<T>, stats: StatisticsStore<S>) -> Self {
        Self {
            engine,
            stats,
            notifier: Box::new(NullNotifier),
            audio: Box::new(SilentAudio),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioCue>) -> Self {
        self.audio = audio;
        self
    }

    pub fn engine(&self) -> &TimerEngine<T> {
        &self.engine
    }

    pub fn statistics(&self) -> &StatisticsStore<S> {
        &self.stats
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        self.engine.ticker_mut()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        let events = self.engine.start().into_iter().collect();
        self.dispatch(events)
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let events = self.engine.pause().into_iter().collect();
        self.dispatch(events)
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let events = vec![self.engine.reset()];
        self.dispatch(events)
    }

    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.engine.tick();
        self.dispatch(events)
    }

    pub fn set_mode(&mut self, mode: TimerMode) -> Vec<Event> {
        let events = vec![self.engine.set_mode(mode)];
        self.dispatch(events)
    }

    /// Switch to a custom interval. Invalid lengths are reported to the
    /// user through the notifier and returned as `InvalidInput`.
    pub fn set_custom_duration(&mut self, minutes: u32) -> Result<Vec<Event>> {
        match self.engine.set_custom_duration(minutes) {
            Ok(event) => Ok(self.dispatch(vec![event])),
            Err(e) => Err(self.reject_custom(e)),
        }
    }

    /// Like [`Self::set_custom_duration`], from raw user text.
    pub fn set_custom_duration_input(&mut self, input: &str) -> Result<Vec<Event>> {
        match parse_custom_minutes(input) {
            Ok(minutes) => self.set_custom_duration(minutes),
            Err(e) => Err(self.reject_custom(e)),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    /// Today's aggregate and the session count. A failed read shows zeros.
    pub fn summary(&self) -> StatsSummary {
        let day_key = self.engine.today();
        let today = self.stats.today_stats(&day_key).unwrap_or_else(|e| {
            warn!(error = %e, day_key = %day_key, "failed to read today's statistics");
            DayStats::default()
        });
        StatsSummary {
            day_key,
            today,
            session_focus_count: self.engine.session_focus_count(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reject_custom(&self, err: CoreError) -> CoreError {
        warn!(error = %err, "rejected custom duration");
        let message = format!("Please enter a number between 1 and {MAX_CUSTOM_MINUTES}");
        if let Err(e) = self.notifier.notify(&message, NOTIFY_TITLE) {
            warn!(error = %e, "notification failed");
        }
        err
    }

    fn dispatch(&self, events: Vec<Event>) -> Vec<Event> {
        for event in &events {
            self.handle(event);
        }
        events
    }

    fn handle(&self, event: &Event) {
        match event {
            Event::TimerStarted {
                mode,
                remaining_secs,
                ..
            } => info!(mode = %mode, remaining_secs, "timer started"),
            Event::TimerPaused { remaining_secs, .. } => {
                info!(remaining_secs, "timer paused")
            }
            Event::TimerReset {
                mode,
                remaining_secs,
                ..
            } => info!(mode = %mode, remaining_secs, "timer reset"),
            Event::TimerTick { remaining_secs, .. } => debug!(remaining_secs, "tick"),
            Event::ModeChanged {
                mode,
                remaining_secs,
                ..
            } => info!(mode = %mode, remaining_secs, "mode changed"),
            Event::TimerCompleted { mode, .. } => {
                info!(mode = %mode, "interval completed");
                self.audio.play_completion();
            }
            Event::FocusRecorded {
                day_key,
                focus_minutes,
                ..
            } => match self.stats.record_completion(day_key, *focus_minutes) {
                Ok(day) => info!(
                    day_key = %day_key,
                    count = day.count,
                    work_minutes = day.work_minutes,
                    "focus interval recorded"
                ),
                Err(e) => warn!(
                    error = %e,
                    day_key = %day_key,
                    "failed to record focus statistics"
                ),
            },
            Event::Notify { title, message, .. } => {
                if let Err(e) = self.notifier.notify(message, title) {
                    warn!(error = %e, "notification failed");
                }
            }
            Event::StateSnapshot { .. } => {}
        }
    }
}
