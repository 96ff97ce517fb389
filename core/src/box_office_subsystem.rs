//! Box office subsystem: weekly theatrical grosses.
//!
//! A film in theaters earns an opening week set by budget, quality and
//! studio reputation, then decays geometrically. The run ends after
//! MAX_RUN_WEEKS or when the weekly gross falls below MIN_WEEKLY_GROSS,
//! and the film moves to the completed list.
//!
//! Depends on: ProductionSubsystem releasing films into InTheaters.

use crate::{
    era::{era_for_year, era_info, scaling_for_year},
    error::HookResult,
    rng::{SubsystemRng, SubsystemSlot},
    state::{AlertKind, AlertPriority, Film, FilmStatus, GameState},
    subsystem::StudioSubsystem,
};

pub const WEEKLY_DECAY: f64 = 0.75;
pub const MAX_RUN_WEEKS: u32 = 12;
pub const MIN_WEEKLY_GROSS: f64 = 500.0;
/// Audience lost to television while it competes with theaters.
pub const TV_ATTENDANCE_MULT: f64 = 0.85;

#[derive(Debug, Default)]
pub struct BoxOfficeSubsystem {
    pub lifetime_gross: f64,
}

impl BoxOfficeSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening-week gross before noise.
    pub fn opening_gross(film: &Film, reputation: i32, year: i32) -> f64 {
        let quality_factor = 0.2 + f64::from(film.quality) / 100.0 * 0.4;
        let reputation_factor = 1.0 + f64::from(reputation - 50) / 200.0;
        let tv = era_for_year(year)
            .map(|key| era_info(key).rules.tv_competition)
            .unwrap_or(false);
        let tv_factor = if tv { TV_ATTENDANCE_MULT } else { 1.0 };
        film.budget * quality_factor * reputation_factor * tv_factor
            * scaling_for_year(year).marketing_mult.max(1.0).sqrt()
    }
}

impl StudioSubsystem for BoxOfficeSubsystem {
    fn name(&self) -> &'static str { "box_office" }

    fn slot(&self) -> SubsystemSlot { SubsystemSlot::BoxOffice }

    fn process_weekly_box_office(&mut self, state: &mut GameState, rng: &mut SubsystemRng) -> HookResult {
        let reputation = state.reputation();
        let year = state.game_year;
        let mut week_gross = 0.0;
        let mut closing = Vec::new();

        for film in state.active_films.iter_mut().filter(|f| f.status == FilmStatus::InTheaters) {
            let noise = 0.9 + rng.next_f64() * 0.2;
            let gross = (Self::opening_gross(film, reputation, year)
                * WEEKLY_DECAY.powi(film.weeks_in_release as i32)
                * noise)
                .floor();
            film.box_office_total += gross;
            film.weeks_in_release += 1;
            week_gross += gross;

            if film.weeks_in_release >= MAX_RUN_WEEKS || gross < MIN_WEEKLY_GROSS {
                closing.push((film.id.clone(), film.title.clone(), film.box_office_total, film.budget));
            }
        }

        if week_gross > 0.0 {
            state.add_cash(week_gross);
            self.lifetime_gross += week_gross;
        }

        for (id, title, total, budget) in closing {
            if !state.complete_film(&id) {
                continue;
            }
            let (delta, verdict) = if total >= budget * 1.5 {
                (2, "a hit")
            } else if total < budget * 0.5 {
                (-2, "a flop")
            } else {
                (0, "done")
            };
            state.adjust_reputation(delta);
            state.add_alert(
                AlertKind::Production,
                AlertPriority::Medium,
                format!("'{title}' closes with ${total:.0}: {verdict}"),
            );
        }

        log::debug!("week={} box office: gross={week_gross:.0}", state.game_week);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, rng::RngBank};

    fn released_film() -> Film {
        let mut film = Film::new("Opening Night", "musical", 100_000.0, 6, 80);
        film.status = FilmStatus::InTheaters;
        film
    }

    #[test]
    fn run_ends_and_film_completes() {
        let mut state = GameState::new("Gross Pictures", &EngineConfig::default());
        state.active_films.push(released_film());
        let mut sub = BoxOfficeSubsystem::new();

        for week in 0..MAX_RUN_WEEKS as u64 {
            let mut rng = RngBank::new(5).for_subsystem_at_week(SubsystemSlot::BoxOffice, week);
            sub.process_weekly_box_office(&mut state, &mut rng).unwrap();
        }

        assert!(state.active_films.is_empty());
        assert_eq!(state.completed_films.len(), 1);
        assert!(state.completed_films[0].box_office_total > 0.0);
        assert_eq!(state.total_revenue, sub.lifetime_gross);
    }

    #[test]
    fn films_not_in_theaters_earn_nothing() {
        let mut state = GameState::new("Quiet Pictures", &EngineConfig::default());
        state.active_films.push(Film::new("Still Shooting", "drama", 100_000.0, 6, 80));
        let mut sub = BoxOfficeSubsystem::new();
        let mut rng = RngBank::new(5).for_subsystem_at_week(SubsystemSlot::BoxOffice, 1);

        sub.process_weekly_box_office(&mut state, &mut rng).unwrap();
        assert_eq!(state.total_revenue, 0.0);
        assert_eq!(state.active_films.len(), 1);
    }

    #[test]
    fn television_era_depresses_openings() {
        let film = released_film();
        let before_tv = BoxOfficeSubsystem::opening_gross(&film, 50, 1949);
        let with_tv = BoxOfficeSubsystem::opening_gross(&film, 50, 1950);
        // 1950 has higher marketing scaling but loses 15% to television.
        let expected = before_tv / 1.1_f64.sqrt() * 1.3_f64.sqrt() * TV_ATTENDANCE_MULT;
        assert!((with_tv - expected).abs() < 1e-6);
    }
}
