//! Shared primitive types used across the entire simulation.

/// A simulation week counter. Week 1 is the first week of a new game.
pub type Week = u64;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Generate a fresh entity identifier.
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}
