//! Script market: new scripts arrive every month.
//!
//! Genres follow the era (war pictures in wartime, science fiction from
//! the fifties). Budgets are drawn from the lower half of the era's
//! budget range. While the Production Code is enforced, crime and horror
//! scripts may carry censor risk.

use crate::{
    era::{era_for_year, era_info, scaling_for_year, EraKey},
    error::HookResult,
    name_generator::NameGenerator,
    rng::{SubsystemRng, SubsystemSlot},
    state::{GameState, Script},
    subsystem::StudioSubsystem,
    types::new_entity_id,
};

pub const MAX_SCRIPTS_PER_MONTH: u64 = 2;
/// Unread scripts beyond this are not topped up.
pub const MAX_AVAILABLE_SCRIPTS: usize = 12;

fn genres_for(era: Option<EraKey>) -> &'static [&'static str] {
    match era {
        Some(EraKey::PreCode) => &["crime", "horror", "musical", "comedy", "drama"],
        Some(EraKey::GoldenAge) => &["western", "musical", "comedy", "drama", "horror"],
        Some(EraKey::WarYears) => &["war", "musical", "drama", "comedy"],
        Some(EraKey::PostWar) => &["crime", "drama", "western", "war"],
        Some(EraKey::TvThreat) => &["western", "sci-fi", "musical", "drama", "horror"],
        _ => &["drama", "comedy", "crime", "sci-fi", "horror", "western"],
    }
}

#[derive(Debug, Default)]
pub struct ScriptSubsystem {
    pub scripts_generated: u64,
}

impl ScriptSubsystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StudioSubsystem for ScriptSubsystem {
    fn name(&self) -> &'static str { "scripts" }

    fn slot(&self) -> SubsystemSlot { SubsystemSlot::Scripts }

    fn generate_monthly_scripts(&mut self, state: &GameState, rng: &mut SubsystemRng) -> HookResult<Vec<Script>> {
        if state.available_scripts.len() >= MAX_AVAILABLE_SCRIPTS {
            return Ok(Vec::new());
        }

        let era = era_for_year(state.game_year);
        let code_enforced = era
            .map(|key| era_info(key).rules.production_code)
            .unwrap_or(false);
        let (budget_lo, budget_hi) = scaling_for_year(state.game_year).budget_range;
        let genres = genres_for(era);
        let count = rng.next_u64_below(MAX_SCRIPTS_PER_MONTH + 1);

        let scripts: Vec<Script> = (0..count)
            .map(|_| {
                let genre = genres[rng.next_u64_below(genres.len() as u64) as usize];
                let budget = budget_lo + rng.next_f64() * (budget_hi - budget_lo) * 0.5;
                Script {
                    id:              new_entity_id(),
                    title:           NameGenerator::generate_title(rng, genre),
                    genre:           genre.to_string(),
                    budget_estimate: budget.floor(),
                    shoot_weeks:     rng.range_i32(4, 10) as u32,
                    quality:         rng.range_i32(30, 85),
                    censor_risk:     code_enforced
                        && matches!(genre, "crime" | "horror")
                        && rng.chance(0.5),
                }
            })
            .collect();

        self.scripts_generated += scripts.len() as u64;
        Ok(scripts)
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
