use std::{cell::Cell, rc::Rc};

use chrono::NaiveDate;
use studio_core::{
    bus::EventBus,
    clock::TimePeriod,
    command::PlayerCommand,
    config::EngineConfig,
    endgame::EndCheck,
    engine::{StepOutcome, StudioEngine},
    error::StudioError,
    event::{BusEvent, TOPIC_GAME_ENDED, TOPIC_RUNWAY, TOPIC_TIME_ADVANCED},
    state::{AlertKind, AlertPriority, EndingType},
};

fn new_engine() -> StudioEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    StudioEngine::new_game("Last Reel Pictures", EngineConfig::default(), EventBus::shared(), 11)
        .expect("new game")
}

fn counter(bus: &EventBus, topic: &str) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    bus.subscribe(topic, move |_| {
        c.set(c.get() + 1);
        Ok(())
    });
    count
}

#[test]
fn negative_cash_is_bankruptcy() {
    let mut engine = new_engine();
    engine.state_mut().cash = -1.0;
    let ending = Rc::new(Cell::new(None));
    let e = Rc::clone(&ending);
    engine.bus().subscribe(TOPIC_GAME_ENDED, move |event| {
        if let BusEvent::GameEnded { ending, .. } = event {
            e.set(Some(*ending));
        }
        Ok(())
    });

    let outcome = engine.advance_time(TimePeriod::Week);

    assert!(engine.state().game_ended());
    assert_eq!(engine.state().ending_type(), Some(EndingType::Bankruptcy));
    assert_eq!(ending.get(), Some(EndingType::Bankruptcy));
    match outcome {
        StepOutcome::Advanced(report) => {
            assert_eq!(report.end_check, EndCheck::Ended { ending: EndingType::Bankruptcy });
        }
        StepOutcome::AlreadyEnded => panic!("the ending step itself still advances"),
    }
}

#[test]
fn zero_cash_is_not_bankruptcy() {
    let mut engine = new_engine();
    engine.state_mut().cash = 0.0;
    engine.advance_time(TimePeriod::Week);
    assert!(!engine.state().game_ended());
}

#[test]
fn ended_game_ignores_further_advances() {
    let mut engine = new_engine();
    engine.state_mut().cash = -1.0;
    engine.advance_time(TimePeriod::Week);
    let frozen = engine.state().clone();

    let ticks = counter(engine.bus(), TOPIC_TIME_ADVANCED);
    let endings = counter(engine.bus(), TOPIC_GAME_ENDED);
    for period in [TimePeriod::Week, TimePeriod::Month, TimePeriod::Week] {
        assert_eq!(engine.advance_time(period), StepOutcome::AlreadyEnded);
    }

    assert_eq!(engine.state(), &frozen);
    assert_eq!(ticks.get(), 0);
    assert_eq!(endings.get(), 0, "game:ended fires once");
}

#[test]
fn ended_game_rejects_new_business() {
    let mut engine = new_engine();
    engine.state_mut().cash = -1.0;
    engine.advance_time(TimePeriod::Week);

    let err = engine
        .apply_command(PlayerCommand::TakeLoan { amount: 10_000.0 })
        .expect_err("loan after the end");
    assert!(matches!(err, StudioError::GameEnded(_)));
    // Advancing is still accepted and is a no-op.
    assert!(engine.apply_command(PlayerCommand::AdvanceTime { period: TimePeriod::Week }).is_ok());
}

#[test]
fn reaching_the_end_year_is_survival() {
    let mut engine = new_engine();
    {
        let state = engine.state_mut();
        state.current_date = NaiveDate::from_ymd_opt(2009, 12, 28).expect("valid date");
        state.game_year = 2009;
        state.game_week = 4_000;
    }

    engine.advance_time(TimePeriod::Week);

    let state = engine.state();
    assert_eq!(state.game_year, 2010);
    assert_eq!(state.ending_type(), Some(EndingType::Survived));
    assert!(state.cash >= 0.0);
}

#[test]
fn short_runway_raises_a_critical_alert() {
    let mut engine = new_engine();
    // One month of 40k burn brings cash to 75k: 7 weeks of runway.
    engine.state_mut().cash = 115_000.0;
    let runway = Rc::new(Cell::new(None));
    let r = Rc::clone(&runway);
    engine.bus().subscribe(TOPIC_RUNWAY, move |event| {
        if let BusEvent::RunwayAlert { weeks, priority } = event {
            r.set(Some((*weeks, *priority)));
        }
        Ok(())
    });

    engine.advance_time(TimePeriod::Month);

    assert_eq!(engine.state().cash, 75_000.0);
    assert_eq!(runway.get(), Some((7, AlertPriority::Critical)));
    assert!(engine
        .state()
        .alerts
        .iter()
        .any(|a| a.kind == AlertKind::Runway && a.priority == AlertPriority::Critical));
    assert!(!engine.state().game_ended());
}

#[test]
fn moderate_runway_raises_a_high_alert() {
    let mut engine = new_engine();
    // 160k - 40k = 120k: 12 weeks, inside the warning band.
    engine.state_mut().cash = 160_000.0;
    let runway = Rc::new(Cell::new(None));
    let r = Rc::clone(&runway);
    engine.bus().subscribe(TOPIC_RUNWAY, move |event| {
        if let BusEvent::RunwayAlert { weeks, priority } = event {
            r.set(Some((*weeks, *priority)));
        }
        Ok(())
    });

    engine.advance_time(TimePeriod::Month);

    assert_eq!(runway.get(), Some((12, AlertPriority::High)));
}
