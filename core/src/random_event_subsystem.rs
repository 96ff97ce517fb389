//! Random production incidents.
//!
//! The engine rolls once per week and, on success, hands one active film
//! to generate_random_event(). This subsystem picks an incident that fits
//! the film's phase and the era's rules and applies it.

use crate::{
    era::{era_for_year, era_info, EraRules},
    error::HookResult,
    name_generator::NameGenerator,
    rng::{SubsystemRng, SubsystemSlot},
    state::{AlertKind, AlertPriority, FilmStatus, GameState},
    subsystem::StudioSubsystem,
    types::EntityId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incident {
    StarIllness,
    SetFire,
    RavePreview,
    CensorObjection,
    StockShortage,
    GossipScandal,
}

impl Incident {
    /// Incidents that can happen to a film in `status` under `rules`.
    pub fn candidates(status: FilmStatus, rules: EraRules) -> Vec<Incident> {
        let mut out = vec![Incident::GossipScandal];
        match status {
            FilmStatus::Development | FilmStatus::Production => {
                out.push(Incident::StarIllness);
                out.push(Incident::SetFire);
                if rules.production_code {
                    out.push(Incident::CensorObjection);
                }
                if rules.wartime_rationing {
                    out.push(Incident::StockShortage);
                }
            }
            FilmStatus::PostProduction => out.push(Incident::RavePreview),
            FilmStatus::InTheaters | FilmStatus::Completed => {}
        }
        out
    }
}

#[derive(Debug, Default)]
pub struct RandomEventSubsystem {
    pub history: Vec<(EntityId, Incident)>,
}

impl RandomEventSubsystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StudioSubsystem for RandomEventSubsystem {
    fn name(&self) -> &'static str { "random_events" }

    fn slot(&self) -> SubsystemSlot { SubsystemSlot::RandomEvents }

    fn generate_random_event(
        &mut self,
        state: &mut GameState,
        film_id: &EntityId,
        rng: &mut SubsystemRng,
    ) -> HookResult<bool> {
        let rules = era_for_year(state.game_year)
            .map(|key| era_info(key).rules)
            .unwrap_or(EraRules { production_code: false, wartime_rationing: false, tv_competition: false });
        let person = NameGenerator::generate_full_name(rng);

        let film = state
            .film_mut(film_id)
            .ok_or_else(|| anyhow::anyhow!("film {film_id} is not active"))?;
        let candidates = Incident::candidates(film.status, rules);
        let Some(index) = rng.pick_index(candidates.len()) else {
            return Ok(false);
        };
        let incident = candidates[index];
        let title = film.title.clone();

        let mut cost = 0.0;
        let mut reputation_delta = 0;
        let description = match incident {
            Incident::StarIllness => {
                film.weeks_remaining += 2;
                format!("{person} falls ill; '{title}' loses two weeks")
            }
            Incident::SetFire => {
                cost = (film.budget * 0.05).floor();
                format!("Fire on the set of '{title}' costs ${cost:.0}")
            }
            Incident::RavePreview => {
                film.quality = (film.quality + 8).min(100);
                format!("Preview audiences rave about '{title}'")
            }
            Incident::CensorObjection => {
                film.quality = (film.quality - 6).max(0);
                reputation_delta = -1;
                format!("The censors demand cuts to '{title}'")
            }
            Incident::StockShortage => {
                cost = (film.budget * 0.03).floor();
                format!("Film stock shortage delays '{title}' (${cost:.0})")
            }
            Incident::GossipScandal => {
                reputation_delta = -2;
                format!("Gossip columns link {person} of '{title}' to a scandal")
            }
        };
        film.incidents.push(description.clone());

        state.charge(cost);
        state.adjust_reputation(reputation_delta);
        state.add_alert(AlertKind::Incident, AlertPriority::Medium, description);
        self.history.push((film_id.clone(), incident));
        log::debug!("week={} incident {incident:?} on {film_id}", state.game_week);
        Ok(true)
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, rng::RngBank, state::Film};

    #[test]
    fn censorship_only_under_the_code() {
        let pre_code = era_info(crate::era::EraKey::PreCode).rules;
        let golden = era_info(crate::era::EraKey::GoldenAge).rules;
        assert!(!Incident::candidates(FilmStatus::Production, pre_code).contains(&Incident::CensorObjection));
        assert!(Incident::candidates(FilmStatus::Production, golden).contains(&Incident::CensorObjection));
    }

    #[test]
    fn applies_one_incident_to_the_given_film() {
        let mut state = GameState::new("Incident Pictures", &EngineConfig::default());
        let film = Film::new("Trouble Ahead", "crime", 100_000.0, 6, 50);
        let id = film.id.clone();
        state.active_films.push(film);
        let mut sub = RandomEventSubsystem::new();
        let mut rng = RngBank::new(3).for_subsystem_at_week(SubsystemSlot::RandomEvents, 4);

        assert!(sub.generate_random_event(&mut state, &id, &mut rng).unwrap());
        assert_eq!(sub.history.len(), 1);
        assert_eq!(state.active_films[0].incidents.len(), 1);
        assert_eq!(state.alerts.len(), 1);
    }

    #[test]
    fn unknown_film_is_an_error() {
        let mut state = GameState::new("Incident Pictures", &EngineConfig::default());
        let mut sub = RandomEventSubsystem::new();
        let mut rng = RngBank::new(3).for_subsystem_at_week(SubsystemSlot::RandomEvents, 4);
        assert!(sub.generate_random_event(&mut state, &"missing".to_string(), &mut rng).is_err());
    }
}
