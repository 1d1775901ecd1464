//! Desktop side effects for the CLI host.

use std::io::Write;
use std::process::{Command, Stdio};

use focuscycle_core::{AudioCue, CoreError, Notifier};

/// How alerts reach the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    /// Linux notify-send
    NotifySend,
    /// macOS osascript
    Osascript,
    /// Plain line on stderr
    Stderr,
}

impl Backend {
    fn detect() -> Self {
        if cfg!(target_os = "macos") {
            return Self::Osascript;
        }
        if cfg!(target_os = "linux") && command_exists("notify-send") {
            return Self::NotifySend;
        }
        Self::Stderr
    }
}

fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// System notifications via the best available backend, probed once.
#[derive(Debug)]
pub struct DesktopNotifier {
    backend: Backend,
}

impl DesktopNotifier {
    pub fn detect() -> Self {
        let backend = Backend::detect();
        tracing::debug!(?backend, "notification backend selected");
        Self { backend }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str, title: &str) -> Result<(), CoreError> {
        let mut cmd = match self.backend {
            Backend::NotifySend => {
                let mut cmd = Command::new("notify-send");
                cmd.args([title, message]);
                cmd
            }
            Backend::Osascript => {
                let script = format!(
                    r#"display notification "{}" with title "{}""#,
                    message.replace('"', r#"\""#),
                    title.replace('"', r#"\""#)
                );
                let mut cmd = Command::new("osascript");
                cmd.args(["-e", &script]);
                cmd
            }
            Backend::Stderr => {
                eprintln!("[{title}] {message}");
                return Ok(());
            }
        };
        spawn_detached(&mut cmd, self.backend)
    }
}

/// Launch `cmd` without waiting for it. The exit status is collected on a
/// helper thread and only logged.
fn spawn_detached(cmd: &mut Command, backend: Backend) -> Result<(), CoreError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| CoreError::Notify(format!("{backend:?} failed to start: {e}")))?;
    std::thread::spawn(move || match child.wait() {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!(?backend, %status, "notification command failed"),
        Err(e) => tracing::warn!(?backend, error = %e, "notification command lost"),
    });
    Ok(())
}

/// Rings the terminal bell on completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play_completion(&self) {
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn command_lookup_uses_path() {
        assert!(!command_exists("focuscycle-no-such-binary"));
        #[cfg(unix)]
        assert!(command_exists("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn slow_notification_commands_do_not_block() {
        let started = Instant::now();
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 3"]);
        spawn_detached(&mut cmd, Backend::NotifySend).unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn missing_command_is_a_notify_error() {
        let mut cmd = Command::new("focuscycle-no-such-binary");
        let err = spawn_detached(&mut cmd, Backend::NotifySend).unwrap_err();
        assert!(matches!(err, CoreError::Notify(_)));
    }
}
