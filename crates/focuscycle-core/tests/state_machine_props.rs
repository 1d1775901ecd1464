//! Property tests for the timer state machine.

use focuscycle_core::timer::{ManualTicker, TickSource};
use focuscycle_core::{TimerConfig, TimerEngine, TimerMode, TimerState};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Reset,
    Tick(u16),
    SetMode(TimerMode),
    Custom(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Pause),
        Just(Op::Reset),
        (0u16..200).prop_map(Op::Tick),
        prop_oneof![
            Just(TimerMode::Focus),
            Just(TimerMode::ShortBreak),
            Just(TimerMode::LongBreak),
            Just(TimerMode::Custom),
        ]
        .prop_map(Op::SetMode),
        (0u32..150).prop_map(Op::Custom),
    ]
}

fn apply(engine: &mut TimerEngine<ManualTicker>, op: &Op) {
    match op {
        Op::Start => {
            engine.start();
        }
        Op::Pause => {
            engine.pause();
        }
        Op::Reset => {
            engine.reset();
        }
        Op::Tick(n) => {
            for _ in 0..*n {
                engine.tick();
            }
        }
        Op::SetMode(mode) => {
            engine.set_mode(*mode);
        }
        Op::Custom(minutes) => {
            let _ = engine.set_custom_duration(*minutes);
        }
    }
}

proptest! {
    #[test]
    fn ticker_armed_iff_running(ops in prop::collection::vec(op(), 0..60)) {
        let config = TimerConfig::new(2, 1, 2, 3).unwrap();
        let mut engine = TimerEngine::new(config);
        for op in &ops {
            apply(&mut engine, op);
            prop_assert_eq!(
                engine.ticker().is_armed(),
                engine.state() == TimerState::Running
            );
        }
    }

    #[test]
    fn remaining_never_exceeds_interval_and_counts_match(
        ops in prop::collection::vec(op(), 0..60)
    ) {
        let config = TimerConfig::new(2, 1, 2, 3).unwrap();
        let mut engine = TimerEngine::new(config);
        for op in &ops {
            apply(&mut engine, op);
            prop_assert!(engine.remaining_secs() <= 120 * 60);
            prop_assert_eq!(engine.completed_focus_count(), engine.session_focus_count());
        }
    }

    #[test]
    fn double_pause_equals_single_pause(ops in prop::collection::vec(op(), 0..30)) {
        let mut once = TimerEngine::new(TimerConfig::default());
        let mut twice = TimerEngine::new(TimerConfig::default());
        for op in &ops {
            apply(&mut once, op);
            apply(&mut twice, op);
        }
        once.pause();
        twice.pause();
        twice.pause();
        prop_assert_eq!(once.state(), twice.state());
        prop_assert_eq!(once.mode(), twice.mode());
        prop_assert_eq!(once.remaining_secs(), twice.remaining_secs());
        prop_assert_eq!(once.ticker().is_armed(), twice.ticker().is_armed());
    }

    #[test]
    fn out_of_range_custom_is_rejected_without_side_effects(
        ops in prop::collection::vec(op(), 0..20),
        bad in prop_oneof![Just(0u32), 121u32..10_000],
    ) {
        let mut engine = TimerEngine::new(TimerConfig::default());
        for op in &ops {
            apply(&mut engine, op);
        }
        let before = (engine.state(), engine.mode(), engine.remaining_secs());
        prop_assert!(engine.set_custom_duration(bad).is_err());
        prop_assert_eq!(before, (engine.state(), engine.mode(), engine.remaining_secs()));
    }
}
