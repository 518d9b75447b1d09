use clap::Subcommand;
use pomotick_core::storage::Database;

#[derive(Subcommand, Debug)]
pub enum StatsAction {
    /// Today's completed phases
    Today,
    /// All-time completed phases
    All,
    /// Completed work sessions per day, newest first
    Daily {
        /// Number of days to show
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Today => {
            let stats = db.stats_today()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::All => {
            let stats = db.stats_all()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Daily { days } => {
            let counts = db.daily_work_sessions(days)?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
    }
    Ok(())
}
