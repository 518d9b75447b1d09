use std::io::Write;

use clap::{Args, Subcommand};
use pomotick_core::{Config, Durations, Event, PhaseTimer, TimerObserver};

use crate::session::{self, SessionOptions};

#[derive(Args, Debug, Clone, Default)]
pub struct DurationArgs {
    /// Work phase length (e.g. "25m", "90s", "1h30m"; bare numbers are minutes).
    /// Overrides config if provided.
    #[arg(short, long, value_parser = parse_duration_secs)]
    pub work: Option<u64>,
    /// Break phase length. Overrides config if provided.
    #[arg(short = 'b', long = "break", value_parser = parse_duration_secs)]
    pub break_: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub durations: DurationArgs,
    /// Start the next phase without asking for confirmation
    #[arg(long)]
    pub auto_resume: bool,
    /// Disable desktop notifications and the alert tone
    #[arg(long)]
    pub no_notify: bool,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub durations: DurationArgs,
    /// Number of one-second ticks to deliver
    #[arg(long)]
    pub ticks: u64,
    /// Start the next phase as soon as the current one ends
    #[arg(long)]
    pub auto_resume: bool,
}

#[derive(Subcommand, Debug)]
pub enum TimerAction {
    /// Run an interactive work/break session in the terminal
    Run(RunArgs),
    /// Deliver ticks instantly and print every event as JSON
    Simulate(SimulateArgs),
    /// Print the initial timer state as JSON
    Status {
        #[command(flatten)]
        durations: DurationArgs,
    },
}

/// Parse "25m", "1h30m", "90s", "0.5m" or a bare number of minutes into
/// whole seconds.
pub fn parse_duration_secs(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total_secs = 0.0;
    let mut current_num = String::new();

    for ch in s.chars() {
        let unit_secs = match ch {
            '0'..='9' | '.' => {
                current_num.push(ch);
                continue;
            }
            'h' => 3600.0,
            'm' => 60.0,
            's' => 1.0,
            _ => return Err(format!("unexpected '{ch}' in duration")),
        };
        let value: f64 = current_num
            .parse()
            .map_err(|_| format!("missing number before '{ch}'"))?;
        total_secs += value * unit_secs;
        current_num.clear();
    }

    if !current_num.is_empty() {
        let minutes: f64 = current_num
            .parse()
            .map_err(|_| format!("invalid number '{current_num}'"))?;
        total_secs += minutes * 60.0;
    }

    let secs = total_secs.round();
    if secs >= 1.0 {
        Ok(secs as u64)
    } else {
        Err("Invalid duration. Use: 25m, 1h30m, 90s, 0.5m (at least one second)".to_string())
    }
}

fn resolve_durations(config: &Config, args: &DurationArgs) -> Result<Durations, Box<dyn std::error::Error>> {
    let configured = config.durations()?;
    let durations = Durations::new(
        args.work.unwrap_or(configured.work_secs()),
        args.break_.unwrap_or(configured.break_secs()),
    )?;
    Ok(durations)
}

/// Writes each event as one line of JSON.
pub struct EventPrinter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> EventPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> TimerObserver for EventPrinter<W> {
    fn on_event(&mut self, event: &Event) {
        let result = serde_json::to_string(event)
            .map_err(std::io::Error::from)
            .and_then(|line| writeln!(self.out, "{line}"));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to print event");
        }
    }
}

/// Drive `timer` through `ticks` ticks without waiting.
///
/// The timer is started once up front. When a phase ends it stays idle,
/// and the remaining ticks are ignored, unless `auto_resume` is set.
pub fn simulate(timer: &mut PhaseTimer, ticks: u64, auto_resume: bool) {
    timer.start();
    for _ in 0..ticks {
        if !timer.is_running() && auto_resume {
            timer.start();
        }
        timer.tick();
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        TimerAction::Run(args) => {
            let durations = resolve_durations(&config, &args.durations)?;
            let notifications = (!args.no_notify).then(|| config.notifications.clone());
            session::run(SessionOptions {
                durations,
                auto_resume: args.auto_resume || config.auto_resume,
                notifications,
                record_history: true,
            })?;
        }
        TimerAction::Simulate(args) => {
            let durations = resolve_durations(&config, &args.durations)?;
            let mut timer = PhaseTimer::new(durations);
            timer.subscribe(Box::new(EventPrinter::new(std::io::stdout())));
            simulate(&mut timer, args.ticks, args.auto_resume);
            println!("{}", serde_json::to_string(&timer.snapshot())?);
        }
        TimerAction::Status { durations } => {
            let durations = resolve_durations(&config, &durations)?;
            let timer = PhaseTimer::new(durations);
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotick_core::Phase;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn parses_duration_units() {
        assert_eq!(parse_duration_secs("25m"), Ok(1500));
        assert_eq!(parse_duration_secs("90s"), Ok(90));
        assert_eq!(parse_duration_secs("1h30m"), Ok(5400));
        assert_eq!(parse_duration_secs("0.5m"), Ok(30));
        assert_eq!(parse_duration_secs("5"), Ok(300));
        assert_eq!(parse_duration_secs(" 2M "), Ok(120));
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(parse_duration_secs("").is_err());
        assert!(parse_duration_secs("0m").is_err());
        assert!(parse_duration_secs("0.001s").is_err());
        assert!(parse_duration_secs("m").is_err());
        assert!(parse_duration_secs("10x").is_err());
    }

    #[test]
    fn flags_override_config() {
        let config = Config::default();
        let args = DurationArgs {
            work: Some(60),
            break_: None,
        };
        let d = resolve_durations(&config, &args).unwrap();
        assert_eq!(d.work_secs(), 60);
        assert_eq!(d.break_secs(), 300);
    }

    #[test]
    fn simulate_stops_at_phase_end_without_auto_resume() {
        let mut timer = PhaseTimer::new(Durations::new(3, 2).unwrap());
        simulate(&mut timer, 10, false);
        assert_eq!(timer.phase(), Phase::Break);
        assert_eq!(timer.remaining_secs(), 2);
        assert!(!timer.is_running());
    }

    #[test]
    fn simulate_cycles_with_auto_resume() {
        let mut timer = PhaseTimer::new(Durations::new(3, 2).unwrap());
        simulate(&mut timer, 6, true);
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.remaining_secs(), 2);
        assert_eq!(timer.completed_work_sessions(), 2);
        assert!(timer.is_running());
    }

    #[test]
    fn printer_writes_one_json_line_per_event() {
        let buf = SharedBuf::default();
        let mut timer = PhaseTimer::new(Durations::new(1, 1).unwrap());
        timer.subscribe(Box::new(EventPrinter::new(buf.clone())));
        simulate(&mut timer, 1, false);

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let types: Vec<String> = out
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            types,
            vec!["running_changed", "tick", "running_changed", "phase_completed", "phase_changed"]
        );
    }
}
