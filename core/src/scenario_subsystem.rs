//! Scenario mode: a cash target to reach before a deadline.
//!
//! Victory is recorded on the scenario and announced once. It does not
//! end the game; the studio keeps running until bankruptcy or the end year.

use crate::{
    error::HookResult,
    rng::SubsystemSlot,
    state::{AlertKind, AlertPriority, GameState},
    subsystem::StudioSubsystem,
};

#[derive(Debug, Default)]
pub struct ScenarioSubsystem;

impl ScenarioSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl StudioSubsystem for ScenarioSubsystem {
    fn name(&self) -> &'static str { "scenario" }

    fn slot(&self) -> SubsystemSlot { SubsystemSlot::Scenario }

    fn check_victory_conditions(&mut self, state: &mut GameState) -> HookResult {
        let today = state.current_date;
        let cash = state.cash;
        let Some(scenario) = state.scenario.as_mut() else {
            return Ok(());
        };
        if scenario.achieved || today > scenario.deadline || cash < scenario.target_cash {
            return Ok(());
        }

        scenario.achieved = true;
        let message = format!("Scenario '{}' complete: ${cash:.0} in the bank", scenario.name);
        state.add_alert(AlertKind::General, AlertPriority::High, message);
        log::info!("scenario achieved on {today}");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
