use clap::Subcommand;
use focuscycle_core::{Config, TimerConfig, TimerMode};
use serde_json::{json, Value};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted key (e.g. "schedule.focus_duration", "notifications.sound")
        key: String,
    },
    /// Change one setting; interval lengths and the cadence must stay positive
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Print all settings and the intervals they produce
    List,
    /// Restore the default schedule and notification settings
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or_else(|| unknown_key(&config, &key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            if !config.keys().contains(&key) {
                return Err(unknown_key(&config, &key).into());
            }
            config.set(&key, &value)?;
            let report = json!({
                "key": key,
                "value": config.get(&key),
                "effective": effective(&config),
            });
            println!("{}", serde_json::to_string(&report)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&overview(&config)?)?);
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&overview(&config)?)?);
        }
    }
    Ok(())
}

/// Sections as stored plus the engine's view of the schedule.
fn overview(config: &Config) -> Result<Value, serde_json::Error> {
    let mut view = serde_json::to_value(config)?;
    if let Some(obj) = view.as_object_mut() {
        obj.insert("effective".to_string(), effective(config));
    }
    Ok(view)
}

/// Interval lengths in seconds, or the validation error for a hand-edited
/// file the engine would refuse.
fn effective(config: &Config) -> Value {
    match config.timer_config() {
        Ok(timer) => durations(&timer),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn durations(timer: &TimerConfig) -> Value {
    json!({
        "focus_secs": timer.duration_secs(TimerMode::Focus),
        "short_break_secs": timer.duration_secs(TimerMode::ShortBreak),
        "long_break_secs": timer.duration_secs(TimerMode::LongBreak),
        "long_break_every": timer.long_break_interval(),
    })
}

fn unknown_key(config: &Config, key: &str) -> String {
    format!(
        "unknown key '{key}' (expected one of: {})",
        config.keys().join(", ")
    )
}
