//! Host-provided side effects.
//!
//! The core never talks to the desktop directly. Hosts plug in a
//! [`Notifier`] for system alerts and an [`AudioCue`] for the completion
//! sound; both are best-effort.

use crate::error::CoreError;

/// Shows a system-level alert.
pub trait Notifier {
    fn notify(&self, message: &str, title: &str) -> Result<(), CoreError>;
}

/// Plays the completion sound. Fire-and-forget.
pub trait AudioCue {
    fn play_completion(&self);
}

/// Notifier that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str, _title: &str) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Audio cue that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioCue for SilentAudio {
    fn play_completion(&self) {}
}
