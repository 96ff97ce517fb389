//! Awards subsystem: the annual Academy Awards ceremony.
//!
//! The engine only consults this in March from the first awards year on.
//! A ceremony is held when the studio released at least one film the
//! previous year; the best of those wins if its quality clears the bar.

use chrono::Datelike;

use crate::{
    error::HookResult,
    rng::{SubsystemRng, SubsystemSlot},
    state::{AlertKind, AlertPriority, Film, GameState},
    subsystem::StudioSubsystem,
};

pub const WINNING_QUALITY: i32 = 75;
pub const WIN_REPUTATION_BONUS: i32 = 5;

/// The once-per-year guard lives on `GameState::last_awards_year` so it
/// survives save and load.
#[derive(Debug, Default)]
pub struct AwardsSubsystem {
    pub ceremonies_held: u32,
}

impl AwardsSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn eligible(state: &GameState) -> impl Iterator<Item = &Film> {
        let year = state.game_year - 1;
        state
            .active_films
            .iter()
            .chain(state.completed_films.iter())
            .filter(move |f| f.release_date.is_some_and(|d| d.year() == year))
    }
}

impl StudioSubsystem for AwardsSubsystem {
    fn name(&self) -> &'static str { "awards" }

    fn slot(&self) -> SubsystemSlot { SubsystemSlot::Awards }

    fn should_trigger_oscars(&self, state: &GameState) -> bool {
        state.last_awards_year != Some(state.game_year) && Self::eligible(state).next().is_some()
    }

    fn trigger_oscar_ceremony(&mut self, state: &mut GameState, _rng: &mut SubsystemRng) -> HookResult {
        state.last_awards_year = Some(state.game_year);
        self.ceremonies_held += 1;
        let best = Self::eligible(state)
            .max_by_key(|f| f.quality)
            .map(|f| (f.title.clone(), f.quality));

        match best {
            Some((title, quality)) if quality >= WINNING_QUALITY => {
                state.stats.oscars_won += 1;
                state.adjust_reputation(WIN_REPUTATION_BONUS);
                state.add_alert(
                    AlertKind::Awards,
                    AlertPriority::High,
                    format!("'{title}' wins Best Picture!"),
                );
            }
            Some((title, _)) => {
                state.add_alert(
                    AlertKind::Awards,
                    AlertPriority::Low,
                    format!("'{title}' goes home empty-handed from the Academy Awards"),
                );
            }
            None => {}
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, rng::RngBank, state::FilmStatus};
    use chrono::NaiveDate;

    #[test]
    fn best_film_of_last_year_wins() {
        let mut state = GameState::new("Award Pictures", &EngineConfig::default());
        state.game_year = 1935;
        let mut film = Film::new("Grand Hotel Express", "drama", 200_000.0, 8, 90);
        film.status = FilmStatus::Completed;
        film.release_date = NaiveDate::from_ymd_opt(1934, 9, 1);
        state.completed_films.push(film);

        let mut sub = AwardsSubsystem::new();
        assert!(sub.should_trigger_oscars(&state));
        let mut rng = RngBank::new(1).for_subsystem_at_week(SubsystemSlot::Awards, 100);
        sub.trigger_oscar_ceremony(&mut state, &mut rng).unwrap();

        assert_eq!(state.stats.oscars_won, 1);
        assert_eq!(state.reputation(), 55);
        assert_eq!(state.last_awards_year, Some(1935));
        assert!(!sub.should_trigger_oscars(&state), "one ceremony per year");
    }

    #[test]
    fn guard_is_read_from_state_not_subsystem() {
        let mut state = GameState::new("Award Pictures", &EngineConfig::default());
        state.game_year = 1935;
        let mut film = Film::new("Second Feature", "comedy", 80_000.0, 6, 90);
        film.status = FilmStatus::Completed;
        film.release_date = NaiveDate::from_ymd_opt(1934, 5, 1);
        state.completed_films.push(film);
        state.last_awards_year = Some(1935);

        // A fresh subsystem, as after loading a save.
        assert!(!AwardsSubsystem::new().should_trigger_oscars(&state));
    }

    #[test]
    fn no_releases_no_ceremony() {
        let state = GameState::new("Award Pictures", &EngineConfig::default());
        assert!(!AwardsSubsystem::new().should_trigger_oscars(&state));
    }
}
