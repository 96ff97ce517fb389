use serde::{Deserialize, Serialize};

use crate::{clock::TimePeriod, types::EntityId};

/// All player-issued commands.
/// Variants added per feature, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Clock control ─────────────────────────────
    AdvanceTime { period: TimePeriod },

    // ── Alerts ────────────────────────────────────
    DismissAlert { alert_id: EntityId },

    // ── Production ────────────────────────────────
    GreenlightScript { script_id: EntityId },

    // ── Finance ───────────────────────────────────
    TakeLoan { amount: f64 },
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AdvanceTime { .. }      => "advance_time",
            Self::DismissAlert { .. }     => "dismiss_alert",
            Self::GreenlightScript { .. } => "greenlight_script",
            Self::TakeLoan { .. }         => "take_loan",
        }
    }
}
