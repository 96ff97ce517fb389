//! Production subsystem: moves films through their production phases.
//!
//! Each week, every active film counts down its current phase:
//!   Development → Production → PostProduction → InTheaters
//! Shooting weeks charge the film's weekly cost. During wartime
//! rationing, shooting costs more.
//!
//! Films leave the active list in BoxOfficeSubsystem, when their
//! theatrical run ends.

use crate::{
    era::{era_for_year, era_info},
    error::HookResult,
    rng::{SubsystemRng, SubsystemSlot},
    state::{AlertKind, AlertPriority, Film, FilmStatus, GameState},
    subsystem::StudioSubsystem,
};

/// Shooting cost multiplier while film stock is rationed.
pub const RATIONING_COST_MULT: f64 = 1.15;

#[derive(Debug, Default)]
pub struct ProductionSubsystem {
    pub films_released: u32,
}

impl ProductionSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn cost_multiplier(year: i32) -> f64 {
        let rationed = era_for_year(year)
            .map(|key| era_info(key).rules.wartime_rationing)
            .unwrap_or(false);
        if rationed { RATIONING_COST_MULT } else { 1.0 }
    }
}

/// Advance one film by one week. Returns the cost incurred and whether
/// the film was released this week.
fn advance_film(film: &mut Film, cost_mult: f64) -> (f64, bool) {
    let mut cost = 0.0;
    if film.status == FilmStatus::Production {
        cost = film.weekly_production_cost() * cost_mult;
    }
    if matches!(film.status, FilmStatus::InTheaters | FilmStatus::Completed) {
        return (0.0, false);
    }

    film.weeks_remaining = film.weeks_remaining.saturating_sub(1);
    if film.weeks_remaining > 0 {
        return (cost, false);
    }

    match film.status {
        FilmStatus::Development => {
            film.status = FilmStatus::Production;
            film.weeks_remaining = film.shoot_weeks;
            (cost, false)
        }
        FilmStatus::Production => {
            film.status = FilmStatus::PostProduction;
            film.weeks_remaining = Film::POST_PRODUCTION_WEEKS;
            (cost, false)
        }
        FilmStatus::PostProduction => {
            film.status = FilmStatus::InTheaters;
            (cost, true)
        }
        FilmStatus::InTheaters | FilmStatus::Completed => (cost, false),
    }
}

impl StudioSubsystem for ProductionSubsystem {
    fn name(&self) -> &'static str { "production" }

    fn slot(&self) -> SubsystemSlot { SubsystemSlot::Production }

    fn process_weekly_production(&mut self, state: &mut GameState, _rng: &mut SubsystemRng) -> HookResult {
        let cost_mult = Self::cost_multiplier(state.game_year);
        let today = state.current_date;
        let mut total_cost = 0.0;
        let mut released = Vec::new();

        for film in state.active_films.iter_mut() {
            let (cost, was_released) = advance_film(film, cost_mult);
            total_cost += cost;
            if was_released {
                film.release_date = Some(today);
                released.push(film.title.clone());
            }
        }

        state.charge(total_cost);
        for title in released {
            self.films_released += 1;
            state.stats.films_released += 1;
            state.add_alert(AlertKind::Production, AlertPriority::Medium, format!("'{title}' opens in theaters"));
        }

        log::debug!("week={} production: cost={total_cost:.0}", state.game_week);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, rng::RngBank};

    #[test]
    fn film_walks_through_every_phase() {
        let mut state = GameState::new("Phase Pictures", &EngineConfig::default());
        state.active_films.push(Film::new("Test Reel", "drama", 40_000.0, 2, 50));
        let mut sub = ProductionSubsystem::new();
        let mut rng = RngBank::new(1).for_subsystem_at_week(SubsystemSlot::Production, 1);

        let weeks = Film::DEVELOPMENT_WEEKS + 2 + Film::POST_PRODUCTION_WEEKS;
        for _ in 0..weeks {
            sub.process_weekly_production(&mut state, &mut rng).unwrap();
        }

        let film = &state.active_films[0];
        assert_eq!(film.status, FilmStatus::InTheaters);
        assert_eq!(film.release_date, Some(state.current_date));
        assert_eq!(state.stats.films_released, 1);
        // Two shooting weeks at 20k each, 1933 has no rationing.
        assert_eq!(state.total_expenses, 40_000.0);
    }

    #[test]
    fn rationing_raises_shooting_cost() {
        assert_eq!(ProductionSubsystem::cost_multiplier(1943), RATIONING_COST_MULT);
        assert_eq!(ProductionSubsystem::cost_multiplier(1939), 1.0);
    }
}
