//! Historical milestones: fixed real-world dates that shape the industry.
//!
//! Matching is by exact (year, month, day). A step that jumps over a
//! milestone date without landing on it does not trigger it; coarse month
//! steps can therefore miss milestones.

use chrono::{Datelike, NaiveDate};

use crate::state::{AlertKind, AlertPriority, GameState, MilestoneRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalMilestone {
    pub key:         &'static str,
    pub title:       &'static str,
    pub description: &'static str,
    pub year:        i32,
    pub month:       u32,
    pub day:         u32,
}

impl HistoricalMilestone {
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month && date.day() == self.day
    }
}

pub static MILESTONES: [HistoricalMilestone; 5] = [
    HistoricalMilestone {
        key: "hays_code_enforced",
        title: "Production Code Enforced",
        description: "The Production Code Administration now reviews every script. Racy pictures will be cut or refused.",
        year: 1934, month: 7, day: 1,
    },
    HistoricalMilestone {
        key: "technicolor_available",
        title: "Three-Strip Technicolor",
        description: "Full-color photography is available to studios willing to pay for it.",
        year: 1937, month: 6, day: 1,
    },
    HistoricalMilestone {
        key: "pearl_harbor",
        title: "Pearl Harbor Attacked",
        description: "America enters the war. Expect rationing, patriotic pictures and departing stars.",
        year: 1941, month: 12, day: 7,
    },
    HistoricalMilestone {
        key: "huac_hearings",
        title: "HUAC Hearings Begin",
        description: "Congress investigates Hollywood. Careers are at stake.",
        year: 1947, month: 10, day: 20,
    },
    HistoricalMilestone {
        key: "paramount_decree",
        title: "The Paramount Decree",
        description: "The Supreme Court orders studios to sell their theater chains.",
        year: 1948, month: 5, day: 3,
    },
];

pub fn milestone_on(date: NaiveDate) -> Option<&'static HistoricalMilestone> {
    MILESTONES.iter().find(|m| m.falls_on(date))
}

/// Queue the milestone's alert and record it on the state.
pub fn record_milestone(state: &mut GameState, milestone: &HistoricalMilestone) -> MilestoneRecord {
    state.add_alert(
        AlertKind::History,
        AlertPriority::High,
        format!("{}: {}", milestone.title, milestone.description),
    );
    let record = MilestoneRecord {
        key:  milestone.key.to_string(),
        date: state.current_date,
    };
    state.milestones_seen.push(record.clone());
    log::info!("milestone {} on {}", milestone.key, state.current_date);
    record
}
