//! The time engine: the heart of the studio simulation.
//!
//! advance_time() SEQUENCE (fixed, documented, never reordered):
//!   1. Terminal guard: an ended game is a no-op.
//!   2. Clock: move the date, week counter and year.
//!   3. Ledger: charge monthly burn if a month boundary was crossed.
//!   4. Era: detect an era transition if the year changed.
//!   5. Fan-out: weekly hooks (week steps), then monthly hooks
//!      (month steps, or week steps that crossed a month boundary).
//!   6. Publish time:advanced and state:changed.
//!   7. End conditions: bankruptcy, survival, runway alerts.
//!
//! WEEKLY FAN-OUT (per subsystem, in registration order):
//!   production → box office → random event roll → rivals
//!   → achievements → week:processed
//!
//! MONTHLY FAN-OUT:
//!   newspaper (queued) → scripts → historical milestones → loans
//!   → awards (March) → achievements → TV (1950–1970) → victory
//!   → years_survived → month:processed
//!
//! RULES:
//!   - A hook that returns Err is logged; the fan-out continues.
//!   - All randomness flows through the RngBank.
//!   - Every outward notification goes through the bus or the
//!     notification queue. The engine never blocks on either.

use std::{any::Any, collections::VecDeque, rc::Rc};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    awards_subsystem::AwardsSubsystem,
    box_office_subsystem::BoxOfficeSubsystem,
    bus::EventBus,
    clock::{self, ClockStep, TimePeriod},
    command::PlayerCommand,
    config::EngineConfig,
    endgame::{self, EndCheck},
    era::{self, EraTransition},
    error::{HookResult, StudioError, StudioResult},
    event::{BusEvent, Notification, TOPIC_STATE_CHANGED},
    history,
    ledger,
    loan_subsystem::LoanSubsystem,
    production_subsystem::ProductionSubsystem,
    random_event_subsystem::RandomEventSubsystem,
    rng::{RngBank, SubsystemSlot},
    scenario_subsystem::ScenarioSubsystem,
    script_subsystem::ScriptSubsystem,
    snapshot::SaveGame,
    state::{AlertKind, AlertPriority, EndingType, Film, GameState, Loan},
    subsystem::StudioSubsystem,
    types::{new_entity_id, EntityId, RunId},
};

/// What a call to advance_time() did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Advanced(StepReport),
    /// The game had already ended; nothing changed.
    AlreadyEnded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub period:          TimePeriod,
    pub date:            NaiveDate,
    pub month_processed: bool,
    pub era_transition:  Option<EraTransition>,
    pub end_check:       EndCheck,
}

pub struct StudioEngine {
    pub run_id:    RunId,
    config:        EngineConfig,
    state:         GameState,
    bus:           Rc<EventBus>,
    rng_bank:      RngBank,
    subsystems:    Vec<Box<dyn StudioSubsystem>>,
    notifications: VecDeque<Notification>,
}

impl StudioEngine {
    pub fn new(run_id: RunId, config: EngineConfig, state: GameState, bus: Rc<EventBus>, seed: u64) -> Self {
        Self {
            run_id,
            config,
            state,
            bus,
            rng_bank:      RngBank::new(seed),
            subsystems:    Vec::new(),
            notifications: VecDeque::new(),
        }
    }

    /// Build a fully wired engine with all built-in subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(run_id: RunId, config: EngineConfig, state: GameState, bus: Rc<EventBus>, seed: u64) -> Self {
        let mut engine = StudioEngine::new(run_id, config, state, bus, seed);

        // Registration order is hook order within each fan-out step.
        engine.register(Box::new(ProductionSubsystem::new()));
        engine.register(Box::new(BoxOfficeSubsystem::new()));
        engine.register(Box::new(RandomEventSubsystem::new()));
        engine.register(Box::new(ScriptSubsystem::new()));
        engine.register(Box::new(LoanSubsystem::new()));
        engine.register(Box::new(AwardsSubsystem::new()));
        engine.register(Box::new(ScenarioSubsystem::new()));
        engine
    }

    /// Start a new game with default state for `config`.
    pub fn new_game(studio_name: &str, config: EngineConfig, bus: Rc<EventBus>, seed: u64) -> StudioResult<Self> {
        config.validate()?;
        let run_id = format!("run-{}", new_entity_id());
        let state = GameState::new(studio_name, &config);
        Ok(Self::build(run_id, config, state, bus, seed))
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, subsystem: Box<dyn StudioSubsystem>) {
        log::debug!("registered subsystem '{}'", subsystem.name());
        self.subsystems.push(subsystem);
    }

    // ── Accessors ─────────────────────────────────

    /// The live game state. Always reflects the latest step.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Find a registered subsystem by concrete type.
    /// Used by tests and tooling.
    pub fn subsystem<T: Any>(&self) -> Option<&T> {
        self.subsystems
            .iter()
            .find_map(|sub| sub.as_any().downcast_ref::<T>())
    }

    /// Take every queued presentation notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // ── Narrow mutators for collaborators ─────────

    pub fn add_cash(&mut self, amount: f64) {
        self.state.add_cash(amount);
    }

    pub fn spend_cash(&mut self, amount: f64) -> bool {
        self.state.spend_cash(amount)
    }

    pub fn add_alert(&mut self, kind: AlertKind, priority: AlertPriority, message: impl Into<String>) -> EntityId {
        self.state.add_alert(kind, priority, message)
    }

    // ── Save / load ───────────────────────────────

    pub fn save_game(&self) -> SaveGame {
        SaveGame::capture(&self.run_id, self.seed(), &self.state)
    }

    /// Replace the game state wholesale. Derived fields are recomputed
    /// rather than trusted from the save.
    pub fn load_state(&mut self, mut state: GameState) {
        state.game_year = state.current_date.year();
        state.stats.years_survived =
            clock::years_since_epoch(state.current_date, self.config.start_year());
        // Deserialization bypasses the clamp.
        let reputation = state.reputation();
        state.set_reputation(reputation);
        self.state = state;
        self.notifications.clear();
        log::info!("loaded state at week {} ({})", self.state.game_week, self.state.current_date);
        self.publish_state_changed();
    }

    // ── Commands ──────────────────────────────────

    pub fn apply_command(&mut self, command: PlayerCommand) -> StudioResult<()> {
        let ended = self.state.game_ended();
        match command {
            PlayerCommand::AdvanceTime { period } => {
                self.advance_time(period);
                Ok(())
            }
            PlayerCommand::DismissAlert { alert_id } => {
                if self.state.dismiss_alert(&alert_id) {
                    Ok(())
                } else {
                    Err(StudioError::NotFound { kind: "alert", id: alert_id })
                }
            }
            cmd if ended => Err(StudioError::GameEnded(cmd.name().to_string())),
            PlayerCommand::GreenlightScript { script_id } => self.greenlight(&script_id),
            PlayerCommand::TakeLoan { amount } => self.take_loan(amount),
        }
    }

    fn greenlight(&mut self, script_id: &str) -> StudioResult<()> {
        let index = self
            .state
            .available_scripts
            .iter()
            .position(|s| s.id == script_id)
            .ok_or_else(|| StudioError::NotFound { kind: "script", id: script_id.to_string() })?;
        let script = self.state.available_scripts.remove(index);
        let film = Film::new(
            script.title.clone(),
            script.genre,
            script.budget_estimate,
            script.shoot_weeks,
            script.quality,
        );
        self.state.add_alert(
            AlertKind::Production,
            AlertPriority::Low,
            format!("'{}' enters development", script.title),
        );
        self.state.active_films.push(film);
        Ok(())
    }

    fn take_loan(&mut self, amount: f64) -> StudioResult<()> {
        if !(amount > 0.0 && amount.is_finite()) {
            return Err(anyhow::anyhow!("loan amount must be positive, got {amount}").into());
        }
        self.state.loans.push(Loan {
            id:            new_entity_id(),
            principal:     amount,
            monthly_rate:  LoanSubsystem::DEFAULT_MONTHLY_RATE,
            taken_on:      self.state.current_date,
            interest_paid: 0.0,
        });
        self.state.add_cash(amount);
        Ok(())
    }

    // ── Time ──────────────────────────────────────

    /// String entry point. Unknown periods are rejected without touching
    /// state or publishing anything.
    pub fn advance(&mut self, period: &str) -> StudioResult<StepOutcome> {
        let period: TimePeriod = period.parse()?;
        Ok(self.advance_time(period))
    }

    /// Advance the simulation by one week or one month.
    pub fn advance_time(&mut self, period: TimePeriod) -> StepOutcome {
        if self.state.game_ended() {
            log::debug!("advance_time({period}) ignored: game has ended");
            return StepOutcome::AlreadyEnded;
        }

        let old_year = self.state.game_year;
        let step = clock::step(
            self.state.current_date,
            self.state.game_week,
            period,
            self.config.weeks_per_month,
        );
        self.apply_clock_step(&step);

        log::debug!(
            "week={} date={} period={period} month_crossed={} cash={:.0}",
            self.state.game_week, self.state.current_date, step.month_crossed, self.state.cash
        );

        if step.month_crossed {
            self.apply_monthly_expenses();
        }

        let era_transition = if step.year_crossed {
            self.check_era_transition(old_year)
        } else {
            None
        };

        match period {
            TimePeriod::Week => {
                self.process_weekly_events();
                if step.month_crossed {
                    self.process_monthly_events();
                }
            }
            TimePeriod::Month => self.process_monthly_events(),
        }

        self.bus.publish(&BusEvent::TimeAdvanced {
            period,
            date: self.state.current_date,
            week: self.state.game_week,
            year: self.state.game_year,
        });
        self.publish_state_changed();

        let end_check = self.check_end_conditions();

        StepOutcome::Advanced(StepReport {
            period,
            date: self.state.current_date,
            month_processed: step.month_crossed,
            era_transition,
            end_check,
        })
    }

    fn apply_clock_step(&mut self, step: &ClockStep) {
        self.state.current_date = step.date_after;
        self.state.game_week = step.week_after;
        self.state.game_year = step.date_after.year();
        self.state.stats.weeks_played += step.period.weeks(self.config.weeks_per_month);
    }

    fn apply_monthly_expenses(&mut self) {
        let report = ledger::apply_monthly_expenses(&mut self.state, &self.config);
        self.bus.publish(&BusEvent::ExpensesApplied {
            week:       self.state.game_week,
            amount:     report.amount,
            cash_after: report.cash_after,
        });
    }

    fn check_era_transition(&mut self, old_year: i32) -> Option<EraTransition> {
        let transition = era::detect_transition(old_year, self.state.game_year)?;
        log::info!(
            "era change in {}: {:?} -> {:?}",
            transition.year, transition.old_era, transition.new_era
        );
        self.notifications.push_back(Notification::EraIntro(transition.clone()));
        self.bus.publish(&BusEvent::EraChanged(transition.clone()));
        Some(transition)
    }

    fn process_weekly_events(&mut self) {
        let week = self.state.game_week;
        let bank = self.rng_bank;
        let state = &mut self.state;

        // 1. Production
        for sub in self.subsystems.iter_mut() {
            let mut rng = bank.for_subsystem_at_week(sub.slot(), week);
            let result = sub.process_weekly_production(state, &mut rng);
            hook_result(sub.name(), "process_weekly_production", result);
        }

        // 2. Box office
        for sub in self.subsystems.iter_mut() {
            let mut rng = bank.for_subsystem_at_week(sub.slot(), week);
            let result = sub.process_weekly_box_office(state, &mut rng);
            hook_result(sub.name(), "process_weekly_box_office", result);
        }

        // 3. Random event: one trial, one film, first subsystem that handles it.
        let mut roll = bank.for_subsystem_at_week(SubsystemSlot::Engine, week);
        if roll.chance(self.config.random_event_chance) {
            if let Some(index) = roll.pick_index(state.active_films.len()) {
                let film_id = state.active_films[index].id.clone();
                for sub in self.subsystems.iter_mut() {
                    let mut rng = bank.for_subsystem_at_week(sub.slot(), week);
                    let result = sub.generate_random_event(state, &film_id, &mut rng);
                    if hook_result(sub.name(), "generate_random_event", result).unwrap_or(false) {
                        self.bus.publish(&BusEvent::RandomEventApplied { film_id, week });
                        break;
                    }
                }
            }
        }

        // 4. Rivals
        for sub in self.subsystems.iter_mut() {
            let mut rng = bank.for_subsystem_at_week(sub.slot(), week);
            let result = sub.process_weekly_rival_updates(state, &mut rng);
            hook_result(sub.name(), "process_weekly_rival_updates", result);
        }

        // 5. Achievements
        for sub in self.subsystems.iter_mut() {
            let result = sub.check_achievements(state);
            hook_result(sub.name(), "check_achievements", result);
        }

        // 6. Done
        self.bus.publish(&BusEvent::WeekProcessed { week, date: state.current_date });
    }

    fn process_monthly_events(&mut self) {
        let week = self.state.game_week;
        let bank = self.rng_bank;
        let config = &self.config;
        let state = &mut self.state;
        let date = state.current_date;
        let year = state.game_year;

        // 1. Newspaper: queued for the presentation layer, never awaited.
        self.notifications.push_back(Notification::Newspaper { date, year });

        // 2. Scripts
        let mut generated = 0;
        for sub in self.subsystems.iter_mut() {
            let mut rng = bank.for_subsystem_at_week(sub.slot(), week);
            let result = sub.generate_monthly_scripts(state, &mut rng);
            if let Some(scripts) = hook_result(sub.name(), "generate_monthly_scripts", result) {
                generated += scripts.len();
                state.available_scripts.extend(scripts);
            }
        }
        if generated > 0 {
            state.add_alert(
                AlertKind::Scripts,
                AlertPriority::Low,
                format!("{generated} new script(s) are available"),
            );
            self.bus.publish(&BusEvent::ScriptsGenerated { count: generated });
        }

        // 3. Historical milestones
        if let Some(milestone) = history::milestone_on(date) {
            history::record_milestone(state, milestone);
            self.bus.publish(&BusEvent::MilestoneReached {
                key:   milestone.key.to_string(),
                title: milestone.title.to_string(),
                date,
            });
        }
        for sub in self.subsystems.iter_mut() {
            let result = sub.check_for_events(state);
            hook_result(sub.name(), "check_for_events", result);
        }

        // 4. Loans
        for sub in self.subsystems.iter_mut() {
            let result = sub.process_monthly_loans(state);
            hook_result(sub.name(), "process_monthly_loans", result);
        }

        // 5. Awards: March, from the first awards year on.
        if date.month() == 3 && year >= config.first_awards_year {
            let mut held = false;
            for sub in self.subsystems.iter_mut() {
                if !sub.should_trigger_oscars(state) {
                    continue;
                }
                let mut rng = bank.for_subsystem_at_week(sub.slot(), week);
                let result = sub.trigger_oscar_ceremony(state, &mut rng);
                held |= hook_result(sub.name(), "trigger_oscar_ceremony", result).is_some();
            }
            if held {
                self.bus.publish(&BusEvent::AwardsCeremony { year });
            }
        }

        // 6. Achievements, again, so monthly steps trigger them promptly.
        for sub in self.subsystems.iter_mut() {
            let result = sub.check_achievements(state);
            hook_result(sub.name(), "check_achievements", result);
        }

        // 7. Television competition window
        let (tv_from, tv_to) = config.tv_window;
        if (tv_from..=tv_to).contains(&year) {
            for sub in self.subsystems.iter_mut() {
                let mut rng = bank.for_subsystem_at_week(sub.slot(), week);
                let result = sub.check_for_tv_events(state, &mut rng);
                if let Some(Some(event)) = hook_result(sub.name(), "check_for_tv_events", result) {
                    state.adjust_reputation(event.reputation_delta);
                    state.add_alert(
                        AlertKind::Television,
                        AlertPriority::Medium,
                        format!("{}: {}", event.headline, event.description),
                    );
                    self.bus.publish(&BusEvent::TvEventOccurred(event));
                }
            }
        }

        // 8. Victory
        for sub in self.subsystems.iter_mut() {
            let result = sub.check_victory_conditions(state);
            hook_result(sub.name(), "check_victory_conditions", result);
        }

        // 9. Derived stats
        state.stats.years_survived = clock::years_since_epoch(date, config.start_year());

        // 10. Done
        self.bus.publish(&BusEvent::MonthProcessed { date, year });
    }

    fn check_end_conditions(&mut self) -> EndCheck {
        let check = endgame::check_end_conditions(&mut self.state, &self.config);
        match check {
            EndCheck::Ended { ending } => self.publish_game_ended(ending),
            EndCheck::Running { runway_weeks, alert: Some(priority) } => {
                self.bus.publish(&BusEvent::RunwayAlert { weeks: runway_weeks, priority });
            }
            EndCheck::Running { alert: None, .. } => {}
        }
        check
    }

    /// The payload is a full copy of the state; skip it when nobody listens.
    fn publish_state_changed(&self) {
        if self.bus.count_subscribers(Some(TOPIC_STATE_CHANGED)) == 0 {
            return;
        }
        self.bus.publish(&BusEvent::StateChanged { state: Box::new(self.state.clone()) });
    }

    fn publish_game_ended(&self, ending: EndingType) {
        self.bus.publish(&BusEvent::GameEnded {
            ending,
            stats: self.state.stats.clone(),
            cash:  self.state.cash,
        });
    }
}

/// Log a failed hook and swallow the error.
fn hook_result<T>(subsystem: &str, hook: &str, result: HookResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("subsystem '{subsystem}' hook {hook} failed: {e:#}");
            None
        }
    }
}
