//! End-of-step evaluation: bankruptcy, survival, and cash runway.
//!
//! Checked in priority order after every advance:
//!   1. cash < 0                 → bankruptcy (terminal)
//!   2. game_year >= end_year    → survived   (terminal)
//!   3. otherwise                → runway alert tiers

use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    state::{AlertKind, AlertPriority, EndingType, GameState},
};

/// Runway reported when burn is zero or negative.
pub const RUNWAY_UNLIMITED: i64 = 999;

/// Whole weeks of operation left at the current burn.
pub fn runway_weeks(cash: f64, monthly_burn: f64, weeks_per_month: u32) -> i64 {
    if monthly_burn <= 0.0 || weeks_per_month == 0 {
        return RUNWAY_UNLIMITED;
    }
    let weekly_burn = monthly_burn / f64::from(weeks_per_month);
    (cash / weekly_burn).floor() as i64
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EndCheck {
    Ended { ending: EndingType },
    Running { runway_weeks: i64, alert: Option<AlertPriority> },
}

pub fn check_end_conditions(state: &mut GameState, config: &EngineConfig) -> EndCheck {
    if state.cash < 0.0 {
        state.end_game(EndingType::Bankruptcy);
        log::info!("studio bankrupt on {} (cash {:.0})", state.current_date, state.cash);
        return EndCheck::Ended { ending: EndingType::Bankruptcy };
    }

    if state.game_year >= config.end_year {
        state.end_game(EndingType::Survived);
        log::info!("studio survived to {}", state.game_year);
        return EndCheck::Ended { ending: EndingType::Survived };
    }

    let weeks = runway_weeks(state.cash, state.monthly_burn, config.weeks_per_month);
    let alert = if weeks <= config.runway.danger_weeks && weeks > 0 {
        raise_runway_alert(
            state,
            AlertPriority::Critical,
            format!("Cash runs out in {weeks} weeks at the current burn rate"),
        );
        Some(AlertPriority::Critical)
    } else if weeks <= config.runway.warning_weeks {
        raise_runway_alert(
            state,
            AlertPriority::High,
            format!("Cash runway is down to {weeks} weeks"),
        );
        Some(AlertPriority::High)
    } else {
        None
    };

    EndCheck::Running { runway_weeks: weeks, alert }
}

/// One live runway alert per tier. While the studio stays in the same
/// band the existing alert is refreshed instead of stacking a new one.
fn raise_runway_alert(state: &mut GameState, priority: AlertPriority, message: String) {
    let (week, date) = (state.game_week, state.current_date);
    let latest = state
        .alerts
        .iter_mut()
        .rev()
        .find(|a| a.kind == AlertKind::Runway);
    match latest {
        Some(alert) if alert.priority == priority => {
            alert.message = message;
            alert.week = week;
            alert.date = date;
        }
        _ => {
            state.add_alert(AlertKind::Runway, priority, message);
        }
    }
}
