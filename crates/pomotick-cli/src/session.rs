//! Interactive terminal session.
//!
//! This is the host side of the timer: it owns the [`PhaseTimer`], feeds
//! it one tick per second from a tokio interval while it runs, maps
//! keyboard input to commands and wires up the notification and history
//! collaborators. The tick branch of the select loop is guarded on
//! `is_running()`, so once the timer goes idle no further tick reaches it.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use pomotick_core::storage::NotificationsConfig;
use pomotick_core::{Database, Durations, Phase, PhaseTimer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;
use tokio::time::MissedTickBehavior;

use crate::history::HistoryRecorder;
use crate::notify::Notifier;
use crate::render::Terminal;

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct SessionOptions {
    pub durations: Durations,
    pub auto_resume: bool,
    /// `None` disables desktop notifications and the alert tone.
    pub notifications: Option<NotificationsConfig>,
    pub record_history: bool,
}

/// A line of keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Toggle,
    Reset,
    Quit,
    Yes,
    No,
    Unknown(String),
}

impl Key {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "" | "space" | "s" | "p" => Key::Toggle,
            "r" | "reset" => Key::Reset,
            "q" | "quit" | "exit" => Key::Quit,
            "y" | "yes" => Key::Yes,
            "n" | "no" => Key::No,
            other => Key::Unknown(other.to_string()),
        }
    }
}

/// What the host does with a key, given whether it is waiting for the
/// user to confirm the next phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Reset,
    Decline,
    Quit,
    Ignore,
}

pub fn action_for(key: &Key, running: bool, awaiting_confirmation: bool) -> Action {
    match key {
        Key::Toggle | Key::Yes if awaiting_confirmation => Action::Start,
        Key::No if awaiting_confirmation => Action::Decline,
        Key::Toggle if running => Action::Pause,
        Key::Toggle => Action::Start,
        Key::Reset => Action::Reset,
        Key::Quit => Action::Quit,
        Key::Yes | Key::No | Key::Unknown(_) => Action::Ignore,
    }
}

fn confirmation_prompt(next: Phase) -> String {
    format!("{next} is about to start. Continue? [Y/n]")
}

pub fn run(options: SessionOptions) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut timer = build_timer(&options);
    let mut term = Terminal::stdout();
    let input = BufReader::new(tokio::io::stdin());
    block_on_detached(
        runtime,
        drive(
            &mut timer,
            options.auto_resume,
            input,
            &mut term,
            tokio::signal::ctrl_c(),
        ),
    )
}

/// Run `future` to completion, then shut the runtime down without waiting
/// on blocking tasks. The stdin reader sits in a read that cannot be
/// cancelled, so a plain drop would hang until the next line arrives.
fn block_on_detached<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}

fn build_timer(options: &SessionOptions) -> PhaseTimer {
    let mut timer = PhaseTimer::new(options.durations);

    if let Some(notifications) = &options.notifications {
        timer.subscribe(Box::new(Notifier::new(options.durations, notifications)));
    }

    if options.record_history {
        match Database::open() {
            Ok(db) => timer.subscribe(Box::new(HistoryRecorder::new(db, options.durations))),
            Err(e) => tracing::warn!(error = %e, "session history disabled"),
        }
    }

    timer
}

/// Host loop. Returns on a quit key, when `shutdown` resolves, or once
/// input is exhausted and the timer has gone idle.
async fn drive<R, W, S>(
    timer: &mut PhaseTimer,
    auto_resume: bool,
    input: R,
    term: &mut Terminal<W>,
    shutdown: S,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future,
{
    let mut ticker = tokio::time::interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = input.lines();
    let mut input_open = true;
    let mut awaiting_confirmation = false;

    tokio::pin!(shutdown);

    let durations = timer.durations();
    tracing::info!(
        work_secs = durations.work_secs(),
        break_secs = durations.break_secs(),
        auto_resume,
        "session started"
    );
    term.announce("Enter: start/pause   r: reset   q: quit");
    term.draw(&timer.snapshot());

    loop {
        tokio::select! {
            _ = ticker.tick(), if timer.is_running() => {
                let before = timer.phase();
                let Some(snap) = timer.tick() else { continue };
                term.draw(&snap);
                if snap.phase != before {
                    if auto_resume {
                        start(timer, &mut ticker);
                        term.draw(&timer.snapshot());
                    } else {
                        awaiting_confirmation = true;
                        term.announce(&confirmation_prompt(snap.phase));
                    }
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    if !timer.is_running() {
                        break;
                    }
                    continue;
                };
                let action = action_for(&Key::parse(&line), timer.is_running(), awaiting_confirmation);
                tracing::debug!(?action, awaiting_confirmation, "key");
                awaiting_confirmation = false;
                match action {
                    Action::Start => start(timer, &mut ticker),
                    Action::Pause => {
                        timer.pause();
                    }
                    Action::Reset => {
                        timer.reset();
                    }
                    Action::Decline => term.announce("Staying idle. Press Enter when ready."),
                    Action::Quit => break,
                    Action::Ignore => {}
                }
                term.draw(&timer.snapshot());
            }
            _ = &mut shutdown => break,
        }

        if !input_open && !timer.is_running() {
            break;
        }
    }

    timer.pause();
    let snap = timer.snapshot();
    term.finish(&snap);
    tracing::info!(
        sessions = snap.completed_work_sessions,
        phase = %snap.phase,
        "session ended"
    );
    Ok(())
}

/// Start the timer and realign the interval so the first tick lands one
/// full period after the start.
fn start(timer: &mut PhaseTimer, ticker: &mut tokio::time::Interval) {
    if timer.start().is_some() {
        ticker.reset();
    }
}
