//! The game-state aggregate.
//!
//! RULE: One GameState per session. It is created at new-game time,
//! mutated in place by the engine and its subsystems, and replaced
//! wholesale on load. Invariants enforced here:
//!   - reputation is clamped to [0, 100] on every mutation
//!   - total_expenses / total_revenue never decrease
//!   - a film lives in exactly one of active_films / completed_films
//!   - game_ended never goes back to false; ending_type is set once

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    types::{new_entity_id, EntityId, Week},
};

pub const REPUTATION_MIN: i32 = 0;
pub const REPUTATION_MAX: i32 = 100;

// ── Films ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilmStatus {
    Development,
    Production,
    PostProduction,
    InTheaters,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Film {
    pub id:               EntityId,
    pub title:            String,
    pub genre:            String,
    pub budget:           f64,
    pub status:           FilmStatus,
    /// Weeks left in the current phase.
    pub weeks_remaining:  u32,
    /// Shooting length, used when the film enters production.
    pub shoot_weeks:      u32,
    /// 0–100.
    pub quality:          i32,
    pub weeks_in_release: u32,
    pub release_date:     Option<NaiveDate>,
    pub box_office_total: f64,
    /// Incidents that happened to this film, newest last.
    pub incidents:        Vec<String>,
}

impl Film {
    pub const DEVELOPMENT_WEEKS:     u32 = 2;
    pub const POST_PRODUCTION_WEEKS: u32 = 3;

    pub fn new(title: impl Into<String>, genre: impl Into<String>, budget: f64, shoot_weeks: u32, quality: i32) -> Self {
        Self {
            id:               new_entity_id(),
            title:            title.into(),
            genre:            genre.into(),
            budget,
            status:           FilmStatus::Development,
            weeks_remaining:  Self::DEVELOPMENT_WEEKS,
            shoot_weeks:      shoot_weeks.max(1),
            quality:          quality.clamp(0, 100),
            weeks_in_release: 0,
            release_date:     None,
            box_office_total: 0.0,
            incidents:        Vec::new(),
        }
    }

    /// Spend per shooting week.
    pub fn weekly_production_cost(&self) -> f64 {
        self.budget / f64::from(self.shoot_weeks.max(1))
    }
}

// ── Studio assets consulted by the ledger ─────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractPlayer {
    pub id:             EntityId,
    pub name:           String,
    pub monthly_salary: f64,
    pub weeks_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Technology {
    pub id:                  String,
    pub name:                String,
    pub adopted_year:        i32,
    pub monthly_maintenance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub id:                  String,
    pub name:                String,
    pub monthly_maintenance: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudioLot {
    pub facilities: Vec<Facility>,
}

impl StudioLot {
    pub fn total_maintenance(&self) -> f64 {
        self.facilities.iter().map(|f| f.monthly_maintenance).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Franchise {
    pub id:    EntityId,
    pub name:  String,
    pub films: Vec<EntityId>,
}

// ── Scripts, loans, alerts ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Script {
    pub id:              EntityId,
    pub title:           String,
    pub genre:           String,
    pub budget_estimate: f64,
    pub shoot_weeks:     u32,
    pub quality:         i32,
    /// Likely to draw objections while the Production Code is enforced.
    pub censor_risk:     bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub id:           EntityId,
    pub principal:    f64,
    pub monthly_rate: f64,
    pub taken_on:     NaiveDate,
    pub interest_paid: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Finance,
    Runway,
    Production,
    Scripts,
    History,
    Awards,
    Television,
    Incident,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id:       EntityId,
    pub kind:     AlertKind,
    pub priority: AlertPriority,
    pub message:  String,
    pub week:     Week,
    pub date:     NaiveDate,
}

// ── End state and stats ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndingType {
    Bankruptcy,
    Survived,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameStats {
    /// Derived from the calendar every month; never authoritative.
    pub years_survived: f64,
    pub films_released: u32,
    pub weeks_played:   Week,
    pub oscars_won:     u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MilestoneRecord {
    pub key:  String,
    pub date: NaiveDate,
}

/// Optional scenario goal checked by victory-condition collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name:        String,
    pub target_cash: f64,
    pub deadline:    NaiveDate,
    pub achieved:    bool,
}

// ── The aggregate ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub studio_name:       String,
    pub current_date:      NaiveDate,
    pub game_week:         Week,
    pub game_year:         i32,
    pub cash:              f64,
    pub monthly_burn:      f64,
    pub total_expenses:    f64,
    pub total_revenue:     f64,
    reputation:            i32,
    pub sound_stages:      u32,
    pub active_films:      Vec<Film>,
    pub completed_films:   Vec<Film>,
    pub contract_players:  Vec<ContractPlayer>,
    pub technologies:      Vec<Technology>,
    pub studio_lot:        StudioLot,
    pub franchises:        Vec<Franchise>,
    pub available_scripts: Vec<Script>,
    pub loans:             Vec<Loan>,
    pub alerts:            Vec<Alert>,
    pub milestones_seen:   Vec<MilestoneRecord>,
    pub scenario:          Option<Scenario>,
    /// Year of the most recent awards ceremony. Saved so a reload never
    /// holds a second ceremony in the same year.
    #[serde(default)]
    pub last_awards_year:  Option<i32>,
    game_ended:            bool,
    ending_type:           Option<EndingType>,
    pub stats:             GameStats,
}

impl GameState {
    /// A fresh studio at the configured start date, week 1.
    pub fn new(studio_name: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            studio_name:       studio_name.into(),
            current_date:      config.start_date,
            game_week:         1,
            game_year:         config.start_date.year(),
            cash:              config.starting_cash,
            monthly_burn:      0.0,
            total_expenses:    0.0,
            total_revenue:     0.0,
            reputation:        config.starting_reputation.clamp(REPUTATION_MIN, REPUTATION_MAX),
            sound_stages:      config.starting_stages,
            active_films:      Vec::new(),
            completed_films:   Vec::new(),
            contract_players:  Vec::new(),
            technologies:      Vec::new(),
            studio_lot:        StudioLot::default(),
            franchises:        Vec::new(),
            available_scripts: Vec::new(),
            loans:             Vec::new(),
            alerts:            Vec::new(),
            milestones_seen:   Vec::new(),
            scenario:          None,
            last_awards_year:  None,
            game_ended:        false,
            ending_type:       None,
            stats:             GameStats::default(),
        }
    }

    // ── Cash ──────────────────────────────────────

    /// Credit revenue. Non-positive amounts are ignored.
    pub fn add_cash(&mut self, amount: f64) {
        if amount <= 0.0 || !amount.is_finite() {
            log::warn!("add_cash ignored non-positive amount {amount}");
            return;
        }
        self.cash += amount;
        self.total_revenue += amount;
    }

    /// Spend if affordable. Returns false and leaves cash untouched otherwise.
    pub fn spend_cash(&mut self, amount: f64) -> bool {
        if amount < 0.0 || !amount.is_finite() || self.cash < amount {
            return false;
        }
        self.cash -= amount;
        self.total_expenses += amount;
        true
    }

    /// Deduct an unavoidable cost. Cash may go negative.
    pub fn charge(&mut self, amount: f64) {
        if amount <= 0.0 || !amount.is_finite() {
            return;
        }
        self.cash -= amount;
        self.total_expenses += amount;
    }

    // ── Reputation ────────────────────────────────

    pub fn reputation(&self) -> i32 {
        self.reputation
    }

    pub fn adjust_reputation(&mut self, delta: i32) {
        self.reputation = self.reputation.saturating_add(delta).clamp(REPUTATION_MIN, REPUTATION_MAX);
    }

    pub fn set_reputation(&mut self, value: i32) {
        self.reputation = value.clamp(REPUTATION_MIN, REPUTATION_MAX);
    }

    // ── Alerts ────────────────────────────────────

    pub fn add_alert(
        &mut self,
        kind: AlertKind,
        priority: AlertPriority,
        message: impl Into<String>,
    ) -> EntityId {
        let alert = Alert {
            id:       new_entity_id(),
            kind,
            priority,
            message:  message.into(),
            week:     self.game_week,
            date:     self.current_date,
        };
        let id = alert.id.clone();
        self.alerts.push(alert);
        id
    }

    pub fn dismiss_alert(&mut self, alert_id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != alert_id);
        self.alerts.len() != before
    }

    // ── Films ─────────────────────────────────────

    pub fn film(&self, film_id: &str) -> Option<&Film> {
        self.active_films.iter().find(|f| f.id == film_id)
    }

    pub fn film_mut(&mut self, film_id: &str) -> Option<&mut Film> {
        self.active_films.iter_mut().find(|f| f.id == film_id)
    }

    /// Move a film from active to completed. Returns false if the film is
    /// not active (including when it already completed).
    pub fn complete_film(&mut self, film_id: &str) -> bool {
        let Some(index) = self.active_films.iter().position(|f| f.id == film_id) else {
            return false;
        };
        let mut film = self.active_films.remove(index);
        film.status = FilmStatus::Completed;
        self.completed_films.push(film);
        true
    }

    // ── Terminal state ────────────────────────────

    pub fn game_ended(&self) -> bool {
        self.game_ended
    }

    pub fn ending_type(&self) -> Option<EndingType> {
        self.ending_type
    }

    /// Enter the terminal state. Returns false if the game had already ended.
    pub fn end_game(&mut self, ending: EndingType) -> bool {
        if self.game_ended {
            return false;
        }
        self.game_ended = true;
        self.ending_type = Some(ending);
        true
    }
}
