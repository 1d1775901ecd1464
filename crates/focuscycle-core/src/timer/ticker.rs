//! Tick sources.
//!
//! The engine arms its tick source on `start()` and disarms it on pause,
//! reset, mode change and completion. Hosts drive `tick()` whenever the
//! source fires; tests use [`ManualTicker`] and call `tick()` directly.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Periodic trigger the engine can arm and disarm.
pub trait TickSource {
    fn arm(&mut self);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

/// Synthetic tick source. Only tracks whether it is armed.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    armed: bool,
    arm_count: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the source went from disarmed to armed.
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }
}

impl TickSource for ManualTicker {
    fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.arm_count += 1;
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Wall-clock tick source backed by a tokio interval.
///
/// Must be armed from inside a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalTicker {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Resolves on the next period while armed; pends forever while disarmed.
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` arm.
    pub async fn ticked(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self) {
        if self.interval.is_some() {
            return;
        }
        // First tick fires one full period after arming.
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}
