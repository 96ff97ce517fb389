//! Subsystem fan-out: hook order, failure isolation, the weekly random
//! event roll, and the calendar gates on awards, television and historical
//! milestones.

use std::{any::Any, cell::RefCell, rc::Rc};

use anyhow::anyhow;
use chrono::NaiveDate;
use studio_core::{
    bus::EventBus,
    clock::TimePeriod,
    config::EngineConfig,
    engine::StudioEngine,
    error::HookResult,
    event::{
        BusEvent, Notification, TvEvent, TOPIC_AWARDS, TOPIC_MILESTONE, TOPIC_MONTH_PROCESSED,
        TOPIC_RANDOM_EVENT, TOPIC_TV_EVENT, TOPIC_WEEK_PROCESSED,
    },
    rng::{SubsystemRng, SubsystemSlot},
    state::{AlertKind, Film, GameState},
    subsystem::StudioSubsystem,
    types::EntityId,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Records every hook it receives, tagged with its own name.
struct Recorder {
    tag: &'static str,
    log: Log,
    fail: bool,
    /// Whether this recorder handles a random event when offered one.
    claims_events: bool,
}

impl Recorder {
    fn note(&self, hook: &str) -> HookResult {
        self.log.borrow_mut().push(format!("{}:{hook}", self.tag));
        if self.fail {
            return Err(anyhow!("{} refuses {hook}", self.tag));
        }
        Ok(())
    }
}

impl StudioSubsystem for Recorder {
    fn name(&self) -> &'static str { self.tag }
    fn slot(&self) -> SubsystemSlot { SubsystemSlot::Rivals }

    fn process_weekly_production(&mut self, _: &mut GameState, _: &mut SubsystemRng) -> HookResult {
        self.note("production")
    }
    fn process_weekly_box_office(&mut self, _: &mut GameState, _: &mut SubsystemRng) -> HookResult {
        self.note("box_office")
    }
    fn generate_random_event(&mut self, _: &mut GameState, _: &EntityId, _: &mut SubsystemRng) -> HookResult<bool> {
        self.note("random_event").map(|_| self.claims_events)
    }
    fn process_weekly_rival_updates(&mut self, _: &mut GameState, _: &mut SubsystemRng) -> HookResult {
        self.note("rivals")
    }
    fn check_achievements(&mut self, _: &mut GameState) -> HookResult {
        self.note("achievements")
    }
    fn generate_monthly_scripts(&mut self, _: &GameState, _: &mut SubsystemRng) -> HookResult<Vec<studio_core::state::Script>> {
        self.note("scripts").map(|_| Vec::new())
    }
    fn check_for_events(&mut self, _: &mut GameState) -> HookResult {
        self.note("history")
    }
    fn process_monthly_loans(&mut self, _: &mut GameState) -> HookResult {
        self.note("loans")
    }
    fn should_trigger_oscars(&self, _: &GameState) -> bool {
        true
    }
    fn trigger_oscar_ceremony(&mut self, _: &mut GameState, _: &mut SubsystemRng) -> HookResult {
        self.note("oscars")
    }
    fn check_for_tv_events(&mut self, _: &mut GameState, _: &mut SubsystemRng) -> HookResult<Option<TvEvent>> {
        self.note("tv")?;
        Ok(Some(TvEvent {
            headline:         "Television sets sell out".into(),
            description:      "Audiences stay home on Saturday night.".into(),
            reputation_delta: -3,
        }))
    }
    fn check_victory_conditions(&mut self, _: &mut GameState) -> HookResult {
        self.note("victory")
    }

    fn as_any(&self) -> &dyn Any { self }
}

fn engine_with(recorders: &[(&'static str, bool)]) -> (StudioEngine, Log) {
    let claims: Vec<_> = recorders.iter().map(|&(tag, fail)| (tag, fail, false)).collect();
    engine_with_chance(EngineConfig::default().random_event_chance, &claims)
}

/// Recorders are `(tag, fail, claims_events)`.
fn engine_with_chance(chance: f64, recorders: &[(&'static str, bool, bool)]) -> (StudioEngine, Log) {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = EngineConfig { random_event_chance: chance, ..EngineConfig::default() };
    let state = GameState::new("Hook Pictures", &config);
    let mut engine = StudioEngine::new("fan-out-test".into(), config, state, EventBus::shared(), 5);
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    for &(tag, fail, claims_events) in recorders {
        engine.register(Box::new(Recorder { tag, log: Rc::clone(&log), fail, claims_events }));
    }
    (engine, log)
}

fn shoot(engine: &mut StudioEngine, title: &str) -> EntityId {
    let film = Film::new(title, "western", 60_000.0, 6, 55);
    let id = film.id.clone();
    engine.state_mut().active_films.push(film);
    id
}

fn place(engine: &mut StudioEngine, y: i32, m: u32, d: u32, week: u64) {
    let state = engine.state_mut();
    state.current_date = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
    state.game_year = y;
    state.game_week = week;
}

fn topics(bus: &EventBus, names: &[&str]) -> Log {
    let seen: Log = Rc::new(RefCell::new(Vec::new()));
    for name in names {
        let seen = Rc::clone(&seen);
        bus.subscribe(name, move |event| {
            seen.borrow_mut().push(event.topic().to_string());
            Ok(())
        });
    }
    seen
}

#[test]
fn weekly_hooks_run_in_fixed_order() {
    let (mut engine, log) = engine_with(&[("a", false), ("b", false)]);
    engine.advance_time(TimePeriod::Week);

    assert_eq!(
        *log.borrow(),
        vec![
            "a:production", "b:production",
            "a:box_office", "b:box_office",
            "a:rivals", "b:rivals",
            "a:achievements", "b:achievements",
        ]
    );
}

#[test]
fn first_subsystem_to_handle_the_event_wins() {
    let (mut engine, log) = engine_with_chance(1.0, &[("a", false, true), ("b", false, true)]);
    let film_id = shoot(&mut engine, "Dust on the Range");
    let applied = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&applied);
    engine.bus().subscribe(TOPIC_RANDOM_EVENT, move |event| {
        if let BusEvent::RandomEventApplied { film_id, week } = event {
            seen.borrow_mut().push((film_id.clone(), *week));
        }
        Ok(())
    });

    engine.advance_time(TimePeriod::Week);

    assert_eq!(
        *log.borrow(),
        vec![
            "a:production", "b:production",
            "a:box_office", "b:box_office",
            "a:random_event",
            "a:rivals", "b:rivals",
            "a:achievements", "b:achievements",
        ]
    );
    assert_eq!(*applied.borrow(), vec![(film_id, 2)]);
}

#[test]
fn unhandled_event_is_offered_to_the_next_subsystem() {
    let (mut engine, log) = engine_with_chance(
        1.0,
        &[("passes", false, false), ("broken", true, true), ("takes", false, true), ("late", false, true)],
    );
    shoot(&mut engine, "Midnight Stage");
    let applied = topics(engine.bus(), &[TOPIC_RANDOM_EVENT]);

    engine.advance_time(TimePeriod::Week);

    let offered: Vec<_> = log.borrow().iter().filter(|e| e.ends_with(":random_event")).cloned().collect();
    assert_eq!(offered, vec!["passes:random_event", "broken:random_event", "takes:random_event"]);
    assert_eq!(applied.borrow().len(), 1);
}

#[test]
fn zero_chance_never_offers_an_event() {
    let (mut engine, log) = engine_with_chance(0.0, &[("a", false, true)]);
    shoot(&mut engine, "Quiet on the Set");
    let applied = topics(engine.bus(), &[TOPIC_RANDOM_EVENT]);

    for _ in 0..20 {
        engine.advance_time(TimePeriod::Week);
    }

    assert!(log.borrow().iter().all(|e| e != "a:random_event"));
    assert!(applied.borrow().is_empty());
}

#[test]
fn no_active_films_means_no_event() {
    let (mut engine, log) = engine_with_chance(1.0, &[("a", false, true)]);
    let applied = topics(engine.bus(), &[TOPIC_RANDOM_EVENT]);

    engine.advance_time(TimePeriod::Week);

    assert!(!log.borrow().contains(&"a:random_event".to_string()));
    assert!(applied.borrow().is_empty());
}

#[test]
fn month_step_runs_monthly_hooks_only() {
    let (mut engine, log) = engine_with(&[("a", false)]);
    let seen = topics(engine.bus(), &[TOPIC_WEEK_PROCESSED, TOPIC_MONTH_PROCESSED]);

    engine.advance_time(TimePeriod::Month);

    // February 1933: no awards, no television.
    assert_eq!(
        *log.borrow(),
        vec!["a:scripts", "a:history", "a:loans", "a:achievements", "a:victory"]
    );
    assert_eq!(*seen.borrow(), vec![TOPIC_MONTH_PROCESSED]);
}

#[test]
fn week_crossing_a_month_runs_both_fan_outs() {
    let (mut engine, log) = engine_with(&[("a", false)]);
    place(&mut engine, 1933, 1, 29, 4);
    let seen = topics(engine.bus(), &[TOPIC_WEEK_PROCESSED, TOPIC_MONTH_PROCESSED]);

    engine.advance_time(TimePeriod::Week);

    let log = log.borrow();
    assert_eq!(log.first().map(String::as_str), Some("a:production"));
    assert_eq!(log.last().map(String::as_str), Some("a:victory"));
    assert_eq!(*seen.borrow(), vec![TOPIC_WEEK_PROCESSED, TOPIC_MONTH_PROCESSED]);
}

#[test]
fn failing_hook_does_not_stop_the_step() {
    let (mut engine, log) = engine_with(&[("broken", true), ("healthy", false)]);

    engine.advance_time(TimePeriod::Week);

    let log = log.borrow();
    assert!(log.contains(&"broken:production".to_string()));
    assert!(log.contains(&"healthy:production".to_string()));
    assert!(log.contains(&"healthy:achievements".to_string()));
    assert_eq!(engine.state().game_week, 2);
}

#[test]
fn awards_only_in_march_from_first_awards_year() {
    let (mut engine, log) = engine_with(&[("a", false)]);
    let ceremonies = topics(engine.bus(), &[TOPIC_AWARDS]);

    // February 1933 → March 1933: before the first ceremony year.
    place(&mut engine, 1933, 2, 5, 6);
    engine.advance_time(TimePeriod::Month);
    assert!(!log.borrow().contains(&"a:oscars".to_string()));

    // February 1934 → March 1934.
    place(&mut engine, 1934, 2, 5, 58);
    engine.advance_time(TimePeriod::Month);
    assert!(log.borrow().contains(&"a:oscars".to_string()));
    assert_eq!(ceremonies.borrow().len(), 1);

    // April is not awards season.
    log.borrow_mut().clear();
    engine.advance_time(TimePeriod::Month);
    assert!(!log.borrow().contains(&"a:oscars".to_string()));
}

#[test]
fn television_window_is_1950_to_1970() {
    let (mut engine, log) = engine_with(&[("a", false)]);
    let tv = topics(engine.bus(), &[TOPIC_TV_EVENT]);

    place(&mut engine, 1949, 5, 1, 800);
    engine.advance_time(TimePeriod::Month);
    assert!(tv.borrow().is_empty());

    place(&mut engine, 1950, 5, 1, 850);
    engine.advance_time(TimePeriod::Month);
    assert_eq!(tv.borrow().len(), 1);
    assert!(log.borrow().contains(&"a:tv".to_string()));
    assert_eq!(engine.state().reputation(), 47);
    assert!(engine.state().alerts.iter().any(|a| a.kind == AlertKind::Television));

    place(&mut engine, 1971, 5, 1, 1_900);
    engine.advance_time(TimePeriod::Month);
    assert_eq!(tv.borrow().len(), 1);
}

#[test]
fn milestone_fires_on_its_exact_date() {
    let (mut engine, _log) = engine_with(&[]);
    let keys = Rc::new(RefCell::new(Vec::new()));
    let k = Rc::clone(&keys);
    engine.bus().subscribe(TOPIC_MILESTONE, move |event| {
        if let BusEvent::MilestoneReached { key, .. } = event {
            k.borrow_mut().push(key.clone());
        }
        Ok(())
    });

    place(&mut engine, 1941, 11, 30, 460);
    engine.advance_time(TimePeriod::Week);

    assert_eq!(*keys.borrow(), vec!["pearl_harbor".to_string()]);
    assert_eq!(engine.state().milestones_seen.len(), 1);
    assert!(engine.state().alerts.iter().any(|a| a.kind == AlertKind::History));
}

#[test]
fn month_off_the_milestone_date_skips_it() {
    let (mut engine, _log) = engine_with(&[]);
    place(&mut engine, 1941, 11, 8, 457);
    engine.advance_time(TimePeriod::Month);
    assert_eq!(engine.state().current_date, NaiveDate::from_ymd_opt(1941, 12, 8).expect("valid date"));
    assert!(engine.state().milestones_seen.is_empty());
}

#[test]
fn monthly_processing_queues_a_newspaper() {
    let (mut engine, _log) = engine_with(&[]);
    engine.advance_time(TimePeriod::Month);
    let notes = engine.drain_notifications();
    assert!(matches!(
        notes.as_slice(),
        [Notification::Newspaper { year: 1933, .. }]
    ));
    assert!(engine.drain_notifications().is_empty());
}

#[test]
fn subsystems_are_found_by_type() {
    let (engine, _log) = engine_with(&[("a", false)]);
    assert_eq!(engine.subsystem::<Recorder>().map(|r| r.tag), Some("a"));
}
