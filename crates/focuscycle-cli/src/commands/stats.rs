use clap::Subcommand;
use focuscycle_core::{Database, DayKey, DayStats, StatisticsStore};
use serde_json::json;

#[derive(Subcommand)]
pub enum StatsAction {
    /// One day's stats (today by default)
    Today {
        /// Day as YYYY-M-D
        #[arg(long)]
        date: Option<String>,
    },
    /// Every recorded day
    All,
    /// Sum over every recorded day
    Total,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let stats = StatisticsStore::new(Database::open()?);

    match action {
        StatsAction::Today { date } => {
            let day = match date {
                Some(text) => DayKey::parse(&text)?,
                None => DayKey::today(),
            };
            let today = stats.today_stats(&day)?;
            println!("{}", serde_json::to_string_pretty(&report(day.as_str(), &today))?);
        }
        StatsAction::All => {
            let days: Vec<_> = stats
                .all_days()?
                .iter()
                .map(|(day, s)| report(day.as_str(), s))
                .collect();
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
        StatsAction::Total => {
            let total = stats.totals()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "count": total.count,
                    "work_minutes": total.work_minutes,
                }))?
            );
        }
    }
    Ok(())
}

fn report(day: &str, stats: &DayStats) -> serde_json::Value {
    json!({
        "day": day,
        "count": stats.count,
        "work_minutes": stats.work_minutes,
    })
}
