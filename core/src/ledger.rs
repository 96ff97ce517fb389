//! Monthly burn: the studio's fixed and variable running costs.
//!
//! Burn = (stages × stage cost + overhead + contract base
//!         + Σ contract salaries + lot maintenance + tech maintenance)
//!        × era monthly_burn_mult, floored to whole dollars.
//!
//! The engine guarantees apply_monthly_expenses() runs once per month
//! boundary crossing; this module does not track that itself.

use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    era::scaling_for_year,
    state::{AlertKind, AlertPriority, GameState},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BurnBreakdown {
    pub sound_stages:         f64,
    pub overhead:             f64,
    pub contract_base:        f64,
    pub contract_salaries:    f64,
    pub lot_maintenance:      f64,
    pub tech_maintenance:     f64,
    pub era_multiplier:       f64,
}

impl BurnBreakdown {
    pub fn unscaled_total(&self) -> f64 {
        self.sound_stages
            + self.overhead
            + self.contract_base
            + self.contract_salaries
            + self.lot_maintenance
            + self.tech_maintenance
    }

    /// Scaled, floored, never negative.
    pub fn total(&self) -> f64 {
        (self.unscaled_total() * self.era_multiplier).floor().max(0.0)
    }
}

/// Itemise this month's burn without touching state.
pub fn burn_breakdown(state: &GameState, config: &EngineConfig) -> BurnBreakdown {
    BurnBreakdown {
        sound_stages:      f64::from(state.sound_stages) * config.burn.sound_stage_cost,
        overhead:          config.burn.overhead,
        contract_base:     config.burn.contract_player_base,
        contract_salaries: state.contract_players.iter().map(|p| p.monthly_salary).sum(),
        lot_maintenance:   state.studio_lot.total_maintenance(),
        tech_maintenance:  state.technologies.iter().map(|t| t.monthly_maintenance).sum(),
        era_multiplier:    scaling_for_year(state.game_year).monthly_burn_mult,
    }
}

/// Compute the monthly burn and cache it in `state.monthly_burn`.
pub fn compute_monthly_burn(state: &mut GameState, config: &EngineConfig) -> f64 {
    let burn = burn_breakdown(state, config).total();
    state.monthly_burn = burn;
    burn
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseReport {
    pub amount:     f64,
    pub cash_after: f64,
}

/// Charge one month of burn against cash and queue an alert.
pub fn apply_monthly_expenses(state: &mut GameState, config: &EngineConfig) -> ExpenseReport {
    let amount = compute_monthly_burn(state, config);
    state.charge(amount);

    state.add_alert(
        AlertKind::Finance,
        AlertPriority::Low,
        format!("Monthly operating costs: ${amount:.0}"),
    );
    log::debug!(
        "week={} expenses: burn={amount:.0} cash={:.0}",
        state.game_week, state.cash
    );

    ExpenseReport { amount, cash_after: state.cash }
}
