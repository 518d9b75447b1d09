//! Phase-boundary alerts: a desktop notification and a three-note chime.
//!
//! Both are best effort. A missing notification daemon or a closed
//! terminal is logged and otherwise ignored; the timer never hears about it.

use std::io::Write;
use std::time::Duration;

use notify_rust::{Notification, Timeout};
use pomotick_core::storage::NotificationsConfig;
use pomotick_core::{Durations, Phase, TimerObserver};

/// One note of the alert chime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub onset_ms: u64,
    pub duration_ms: u64,
}

const fn tone(frequency_hz: u32, onset_ms: u64, duration_ms: u64) -> Tone {
    Tone {
        frequency_hz,
        onset_ms,
        duration_ms,
    }
}

/// Falling notes announce a break, rising notes announce work.
pub fn chime(next: Phase) -> [Tone; 3] {
    match next {
        Phase::Break => [tone(880, 0, 300), tone(660, 300, 300), tone(440, 600, 500)],
        Phase::Work => [tone(440, 0, 300), tone(660, 300, 300), tone(880, 600, 500)],
    }
}

/// Run `f` on a named background thread that nobody joins.
fn spawn_detached(name: &str, f: impl FnOnce() + Send + 'static) {
    if let Err(e) = std::thread::Builder::new().name(name.into()).spawn(f) {
        tracing::warn!(error = %e, thread = name, "could not spawn alert thread");
    }
}

/// Renders each tone as a terminal bell at its onset, off the caller's thread.
fn ring(tones: [Tone; 3]) {
    spawn_detached("pomotick-chime", move || {
        let mut elapsed = 0;
        for t in tones {
            std::thread::sleep(Duration::from_millis(t.onset_ms - elapsed));
            elapsed = t.onset_ms;
            tracing::debug!(frequency_hz = t.frequency_hz, duration_ms = t.duration_ms, "chime note");
            let mut out = std::io::stdout();
            if let Err(e) = out.write_all(b"\x07").and_then(|()| out.flush()) {
                tracing::warn!(error = %e, "alert tone failed");
                return;
            }
        }
    });
}

/// Shows a desktop notification without waiting on the notification daemon.
fn show_notification(title: String, body: String, timeout_ms: u32) {
    spawn_detached("pomotick-notify", move || {
        let shown = Notification::new()
            .summary(&title)
            .body(&body)
            .appname("pomotick")
            .timeout(Timeout::Milliseconds(timeout_ms))
            .show();
        if let Err(e) = shown {
            tracing::warn!(error = %e, %title, "desktop notification failed");
        }
    });
}

/// "25 minutes", "1 minute", "90 seconds".
fn length_noun(secs: u64) -> String {
    let (n, unit) = if secs % 60 == 0 { (secs / 60, "minute") } else { (secs, "second") };
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// "5-minute", "90-second".
fn length_adjective(secs: u64) -> String {
    if secs % 60 == 0 {
        format!("{}-minute", secs / 60)
    } else {
        format!("{secs}-second")
    }
}

/// Notification title and body for the end of `ended`.
pub fn message(ended: Phase, durations: &Durations) -> (String, String) {
    match ended {
        Phase::Work => (
            "🍅 Break time!".to_string(),
            format!("Take a {} break.", length_adjective(durations.break_secs())),
        ),
        Phase::Break => (
            "💪 Back to work!".to_string(),
            format!("Focus for {}!", length_noun(durations.work_secs())),
        ),
    }
}

pub struct Notifier {
    durations: Durations,
    desktop: bool,
    sound: bool,
    timeout_ms: u32,
}

impl Notifier {
    pub fn new(durations: Durations, config: &NotificationsConfig) -> Self {
        Self {
            durations,
            desktop: config.enabled,
            sound: config.sound,
            timeout_ms: config.timeout_ms,
        }
    }
}

impl TimerObserver for Notifier {
    fn on_phase_complete(&mut self, ended: Phase) {
        if self.sound {
            ring(chime(ended.next()));
        }
        if self.desktop {
            let (title, body) = message(ended, &self.durations);
            show_notification(title, body, self.timeout_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_follows_configured_lengths() {
        let d = Durations::default();
        assert_eq!(
            message(Phase::Work, &d),
            ("🍅 Break time!".to_string(), "Take a 5-minute break.".to_string())
        );
        assert_eq!(
            message(Phase::Break, &d),
            ("💪 Back to work!".to_string(), "Focus for 25 minutes!".to_string())
        );

        let short = Durations::new(60, 90).unwrap();
        assert_eq!(message(Phase::Work, &short).1, "Take a 90-second break.");
        assert_eq!(message(Phase::Break, &short).1, "Focus for 1 minute!");
    }

    #[test]
    fn chime_direction_depends_on_next_phase() {
        let falling: Vec<u32> = chime(Phase::Break).iter().map(|t| t.frequency_hz).collect();
        let rising: Vec<u32> = chime(Phase::Work).iter().map(|t| t.frequency_hz).collect();
        assert_eq!(falling, vec![880, 660, 440]);
        assert_eq!(rising, vec![440, 660, 880]);
    }

    #[test]
    fn chime_onsets_are_ordered() {
        for phase in [Phase::Work, Phase::Break] {
            let tones = chime(phase);
            assert!(tones.windows(2).all(|w| w[0].onset_ms + w[0].duration_ms <= w[1].onset_ms));
        }
    }

    #[test]
    fn detached_work_does_not_block_the_caller() {
        let (release, blocked) = std::sync::mpsc::channel::<()>();
        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let begun = std::time::Instant::now();

        spawn_detached("pomotick-test", move || {
            let _ = blocked.recv();
            let _ = done_tx.send(());
        });

        assert!(begun.elapsed() < Duration::from_secs(1));
        assert!(done_rx.try_recv().is_err());
        drop(release);
        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn completion_callback_returns_without_waiting_on_alerts() {
        let config = NotificationsConfig {
            enabled: false,
            sound: true,
            timeout_ms: 1000,
        };
        let mut notifier = Notifier::new(Durations::default(), &config);
        let begun = std::time::Instant::now();
        notifier.on_phase_complete(Phase::Work);
        // The chime alone spans 600 ms of onsets.
        assert!(begun.elapsed() < Duration::from_millis(300));
    }
}
