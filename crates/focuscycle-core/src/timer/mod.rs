mod engine;
mod mode;
mod ticker;

pub use engine::{TimerEngine, BREAK_COMPLETE_MESSAGE, FOCUS_COMPLETE_MESSAGE, NOTIFY_TITLE};
pub use mode::{
    format_time, parse_custom_minutes, validate_custom_minutes, TimerConfig, TimerMode,
    TimerState, MAX_CUSTOM_MINUTES,
};
pub use ticker::{IntervalTicker, ManualTicker, TickSource};
