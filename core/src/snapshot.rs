//! Save games: full game state to/from JSON.
//!
//! A save captures everything needed to resume a session: the state
//! aggregate plus the run's seed, so the RNG streams continue where they
//! left off. Loading replaces the engine's state wholesale.

use serde::{Deserialize, Serialize};

use crate::{
    error::StudioResult,
    state::GameState,
    types::{RunId, Week},
};

/// Bumped whenever GameState changes shape incompatibly.
pub const SAVE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveGame {
    pub format_version: u32,
    pub run_id:         RunId,
    pub seed:           u64,
    pub week:           Week,
    pub state:          GameState,
}

impl SaveGame {
    pub fn capture(run_id: &str, seed: u64, state: &GameState) -> Self {
        Self {
            format_version: SAVE_FORMAT_VERSION,
            run_id:         run_id.to_string(),
            seed,
            week:           state.game_week,
            state:          state.clone(),
        }
    }

    pub fn to_json(&self) -> StudioResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> StudioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
