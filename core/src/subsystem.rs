//! Subsystem trait and registry.
//!
//! RULE: Every collaborator implements StudioSubsystem.
//! Every hook has a no-op default, so a subsystem overrides only the
//! hooks it cares about; an unimplemented hook is simply absent.
//! The engine calls each hook on every registered subsystem in
//! registration order. Hook order is fixed and documented in engine.rs.
//!
//! Hooks receive the live GameState by mutable borrow for the duration of
//! the call. A hook that returns Err is logged by the engine and the
//! step continues with the next subsystem.

use std::any::Any;

use crate::{
    error::HookResult,
    event::TvEvent,
    rng::{SubsystemRng, SubsystemSlot},
    state::{GameState, Script},
    types::EntityId,
};

#[allow(unused_variables)]
pub trait StudioSubsystem {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// RNG stream this subsystem draws from.
    fn slot(&self) -> SubsystemSlot;

    // ── Weekly hooks ───────────────────────────────

    fn process_weekly_production(&mut self, state: &mut GameState, rng: &mut SubsystemRng) -> HookResult {
        Ok(())
    }

    fn process_weekly_box_office(&mut self, state: &mut GameState, rng: &mut SubsystemRng) -> HookResult {
        Ok(())
    }

    /// Apply one random event to `film_id`. Returns true if this subsystem
    /// handled it; the engine stops offering the event once one does.
    fn generate_random_event(
        &mut self,
        state: &mut GameState,
        film_id: &EntityId,
        rng: &mut SubsystemRng,
    ) -> HookResult<bool> {
        Ok(false)
    }

    fn process_weekly_rival_updates(&mut self, state: &mut GameState, rng: &mut SubsystemRng) -> HookResult {
        Ok(())
    }

    /// Called from both the weekly and the monthly fan-out.
    fn check_achievements(&mut self, state: &mut GameState) -> HookResult {
        Ok(())
    }

    // ── Monthly hooks ──────────────────────────────

    /// New scripts to append to `state.available_scripts`.
    fn generate_monthly_scripts(&mut self, state: &GameState, rng: &mut SubsystemRng) -> HookResult<Vec<Script>> {
        Ok(Vec::new())
    }

    /// Extra historical checks beyond the built-in milestone table.
    fn check_for_events(&mut self, state: &mut GameState) -> HookResult {
        Ok(())
    }

    fn process_monthly_loans(&mut self, state: &mut GameState) -> HookResult {
        Ok(())
    }

    fn should_trigger_oscars(&self, state: &GameState) -> bool {
        false
    }

    fn trigger_oscar_ceremony(&mut self, state: &mut GameState, rng: &mut SubsystemRng) -> HookResult {
        Ok(())
    }

    fn check_for_tv_events(&mut self, state: &mut GameState, rng: &mut SubsystemRng) -> HookResult<Option<TvEvent>> {
        Ok(None)
    }

    fn check_victory_conditions(&mut self, state: &mut GameState) -> HookResult {
        Ok(())
    }

    /// For downcasting in tests and tooling only.
    /// Production sim code never uses this.
    fn as_any(&self) -> &dyn Any;
}
