//! Terminal rendering: a status line redrawn in place and the window title.

use std::io::Write;

use pomotick_core::Snapshot;

const APP_NAME: &str = "pomotick";
const BAR_WIDTH: usize = 20;

/// `25:00 - Work - pomotick`, as shown in the window title.
pub fn window_title(snap: &Snapshot) -> String {
    format!("{} - {} - {APP_NAME}", snap.clock(), snap.phase)
}

pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).floor() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

pub fn status_line(snap: &Snapshot) -> String {
    format!(
        "{}  {}  {:>3.0}%  session {}  ({})",
        window_title(snap),
        progress_bar(snap.elapsed_fraction, BAR_WIDTH),
        snap.progress_pct().floor(),
        snap.completed_work_sessions,
        if snap.running { "running" } else { "paused" },
    )
}

pub struct Terminal<W: Write> {
    out: W,
}

impl Terminal<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Redraw the status line in place and update the window title.
    pub fn draw(&mut self, snap: &Snapshot) {
        let result = write!(
            self.out,
            "\x1b]0;{}\x07\r\x1b[2K{}",
            window_title(snap),
            status_line(snap)
        )
        .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to draw status line");
        }
    }

    /// Print a message on its own line, below the status line.
    pub fn announce(&mut self, message: &str) {
        if let Err(e) = write!(self.out, "\r\x1b[2K{message}\n").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "failed to print message");
        }
    }

    /// Final redraw, leaving the cursor on a fresh line.
    pub fn finish(&mut self, snap: &Snapshot) {
        self.draw(snap);
        if let Err(e) = writeln!(self.out).and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "failed to finish output");
        }
    }
}
