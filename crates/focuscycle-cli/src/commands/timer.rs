use std::time::Duration;

use clap::Subcommand;
use focuscycle_core::{
    AudioCue, Config, Controller, Database, Event, IntervalTicker, Notifier, NullNotifier,
    SilentAudio, StatisticsStore, TimerEngine, TimerMode, TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::host::{DesktopNotifier, TerminalBell};

type CliController = Controller<IntervalTicker, Database>;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground.
    ///
    /// Reads commands from stdin: start, pause, reset, focus, short, long,
    /// custom <minutes>, status, stats, quit.
    Run {
        /// Interval to load first (focus, short-break, long-break)
        #[arg(long, default_value = "focus")]
        mode: String,
        /// Custom interval length in minutes (1-120); overrides --mode
        #[arg(long)]
        minutes: Option<String>,
        /// Start counting immediately
        #[arg(long)]
        autostart: bool,
        /// Auto-start every interval and exit after this many focus completions
        #[arg(long)]
        cycles: Option<u64>,
        /// Tick period in milliseconds
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        tick_ms: u64,
    },
    /// Print the state a fresh timer starts in, with today's statistics
    Status,
}

struct RunOptions {
    mode: String,
    minutes: Option<String>,
    autostart: bool,
    cycles: Option<u64>,
    tick: Duration,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            mode,
            minutes,
            autostart,
            cycles,
            tick_ms,
        } => {
            let opts = RunOptions {
                mode,
                minutes,
                autostart,
                cycles,
                tick: Duration::from_millis(tick_ms),
            };
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(run_loop(opts))
        }
        TimerAction::Status => {
            let controller = build_controller(IntervalTicker::default())?;
            emit_one(&controller.snapshot())?;
            println!("{}", serde_json::to_string(&controller.summary())?);
            Ok(())
        }
    }
}

fn build_controller(ticker: IntervalTicker) -> Result<CliController, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = TimerEngine::with_ticker(config.timer_config()?, ticker);
    let stats = StatisticsStore::new(Database::open()?);

    let notifier: Box<dyn Notifier> = if config.notifications.enabled {
        Box::new(DesktopNotifier::detect())
    } else {
        Box::new(NullNotifier)
    };
    let audio: Box<dyn AudioCue> = if config.notifications.sound {
        Box::new(TerminalBell)
    } else {
        Box::new(SilentAudio)
    };

    Ok(Controller::new(engine, stats)
        .with_notifier(notifier)
        .with_audio(audio))
}

async fn run_loop(opts: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = build_controller(IntervalTicker::new(opts.tick))?;

    match &opts.minutes {
        Some(text) => emit(&controller.set_custom_duration_input(text)?)?,
        None => {
            let mode = opts.mode.parse::<TimerMode>()?;
            emit(&controller.set_mode(mode))?;
        }
    }
    if opts.autostart || opts.cycles.is_some() {
        emit(&controller.start())?;
    }

    let target = opts.cycles;
    info!(
        tick_ms = opts.tick.as_millis() as u64,
        cycles = ?target,
        "countdown loop started"
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let focus_done = controller.engine().session_focus_count();
        if target.is_some_and(|n| focus_done >= n) {
            break;
        }
        // Nothing left that could restart the countdown.
        if !stdin_open && controller.engine().state() != TimerState::Running {
            break;
        }

        tokio::select! {
            _ = controller.ticker_mut().ticked() => {
                let events = controller.tick();
                emit(&events)?;
                let completed = events.iter().any(|e| matches!(e, Event::TimerCompleted { .. }));
                let more = target.is_some_and(|n| controller.engine().session_focus_count() < n);
                if completed && more {
                    emit(&controller.start())?;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if let Flow::Quit = handle_command(&mut controller, &line)? {
                            break;
                        }
                    }
                    None => stdin_open = false,
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    emit_one(&controller.snapshot())?;
    println!("{}", serde_json::to_string(&controller.summary())?);
    Ok(())
}

fn handle_command(
    controller: &mut CliController,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Flow::Continue);
    };

    match command.to_ascii_lowercase().as_str() {
        "start" | "s" => emit(&controller.start())?,
        "pause" | "p" => emit(&controller.pause())?,
        "reset" | "r" => emit(&controller.reset())?,
        "focus" | "short" | "long" => {
            let mode = command.parse::<TimerMode>()?;
            emit(&controller.set_mode(mode))?;
        }
        "custom" | "c" => {
            let arg = words.next().unwrap_or_default();
            match controller.set_custom_duration_input(arg) {
                Ok(events) => emit(&events)?,
                Err(e) => eprintln!("error: {e}"),
            }
        }
        "status" => emit_one(&controller.snapshot())?,
        "stats" => println!("{}", serde_json::to_string(&controller.summary())?),
        "quit" | "q" | "exit" => return Ok(Flow::Quit),
        other => eprintln!("unknown command: {other}"),
    }
    Ok(Flow::Continue)
}

fn emit(events: &[Event]) -> Result<(), serde_json::Error> {
    for event in events {
        emit_one(event)?;
    }
    Ok(())
}

fn emit_one(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
