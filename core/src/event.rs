//! Bus payloads: everything the engine tells the outside world.
//!
//! RULE: Every published payload is a BusEvent variant. The topic string
//! is derived from the variant, never passed separately, so a topic and
//! its payload shape cannot drift apart.
//! Variants are added as features land: never removed or reordered.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    clock::TimePeriod,
    era::EraTransition,
    state::{AlertPriority, EndingType, GameState, GameStats},
    types::{EntityId, RunId, Week},
};

pub const TOPIC_TIME_ADVANCED:   &str = "time:advanced";
pub const TOPIC_STATE_CHANGED:   &str = "state:changed";
pub const TOPIC_WEEK_PROCESSED:  &str = "week:processed";
pub const TOPIC_MONTH_PROCESSED: &str = "month:processed";
pub const TOPIC_ERA_CHANGED:     &str = "era:changed";
pub const TOPIC_GAME_ENDED:      &str = "game:ended";
pub const TOPIC_EXPENSES:        &str = "finance:expenses";
pub const TOPIC_RUNWAY:          &str = "finance:runway";
pub const TOPIC_MILESTONE:       &str = "history:milestone";
pub const TOPIC_RANDOM_EVENT:    &str = "film:random_event";
pub const TOPIC_SCRIPTS:         &str = "scripts:generated";
pub const TOPIC_AWARDS:          &str = "awards:ceremony";
pub const TOPIC_TV_EVENT:        &str = "tv:event";

/// A television-competition event raised by a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvEvent {
    pub headline:         String,
    pub description:      String,
    pub reputation_delta: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusEvent {
    // ── Engine events ──────────────────────────────
    TimeAdvanced {
        period: TimePeriod,
        date:   NaiveDate,
        week:   Week,
        year:   i32,
    },
    StateChanged {
        state: Box<GameState>,
    },
    WeekProcessed {
        week: Week,
        date: NaiveDate,
    },
    MonthProcessed {
        date: NaiveDate,
        year: i32,
    },
    EraChanged(EraTransition),
    /// `ending` is the ending type. It cannot be called `type` here because
    /// that key already holds the variant tag.
    GameEnded {
        ending: EndingType,
        stats:  GameStats,
        cash:   f64,
    },

    // ── Finance events ─────────────────────────────
    ExpensesApplied {
        week:       Week,
        amount:     f64,
        cash_after: f64,
    },
    RunwayAlert {
        weeks:    i64,
        priority: AlertPriority,
    },

    // ── Monthly fan-out events ─────────────────────
    MilestoneReached {
        key:   String,
        title: String,
        date:  NaiveDate,
    },
    ScriptsGenerated {
        count: usize,
    },
    AwardsCeremony {
        year: i32,
    },
    TvEventOccurred(TvEvent),

    // ── Weekly fan-out events ──────────────────────
    RandomEventApplied {
        film_id: EntityId,
        week:    Week,
    },

    // ── Collaborator-defined topics ────────────────
    Custom {
        topic:   String,
        payload: serde_json::Value,
    },
}

impl BusEvent {
    /// The topic this payload is delivered on.
    pub fn topic(&self) -> &str {
        match self {
            Self::TimeAdvanced { .. }       => TOPIC_TIME_ADVANCED,
            Self::StateChanged { .. }       => TOPIC_STATE_CHANGED,
            Self::WeekProcessed { .. }      => TOPIC_WEEK_PROCESSED,
            Self::MonthProcessed { .. }     => TOPIC_MONTH_PROCESSED,
            Self::EraChanged(_)             => TOPIC_ERA_CHANGED,
            Self::GameEnded { .. }          => TOPIC_GAME_ENDED,
            Self::ExpensesApplied { .. }    => TOPIC_EXPENSES,
            Self::RunwayAlert { .. }        => TOPIC_RUNWAY,
            Self::MilestoneReached { .. }   => TOPIC_MILESTONE,
            Self::ScriptsGenerated { .. }   => TOPIC_SCRIPTS,
            Self::AwardsCeremony { .. }     => TOPIC_AWARDS,
            Self::TvEventOccurred(_)        => TOPIC_TV_EVENT,
            Self::RandomEventApplied { .. } => TOPIC_RANDOM_EVENT,
            Self::Custom { topic, .. }      => topic,
        }
    }
}

/// Deferred presentation work queued by the engine and drained by the UI.
/// The engine never waits on these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Newspaper { date: NaiveDate, year: i32 },
    EraIntro(EraTransition),
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:      Option<i64>,
    pub run_id:  RunId,
    pub week:    Week,
    pub topic:   String,
    pub payload: String, // JSON-serialized BusEvent
}
