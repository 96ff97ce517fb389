//! Engine tuning constants.
//!
//! Loaded from `{data_dir}/engine_config.json` by the runner; tests use
//! `EngineConfig::default()`, which carries the reference values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{StudioError, StudioResult};

/// Fixed monthly cost components, before era scaling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BurnRates {
    /// Upkeep per sound stage per month.
    pub sound_stage_cost: f64,
    /// Administration, utilities and other fixed overhead.
    pub overhead: f64,
    /// Flat cost of running a contract-player program.
    pub contract_player_base: f64,
}

impl Default for BurnRates {
    fn default() -> Self {
        Self {
            sound_stage_cost:     10_000.0,
            overhead:             15_000.0,
            contract_player_base:  5_000.0,
        }
    }
}

/// Cash runway alert thresholds, in weeks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunwayThresholds {
    pub warning_weeks: i64,
    pub danger_weeks:  i64,
}

impl Default for RunwayThresholds {
    fn default() -> Self {
        Self { warning_weeks: 16, danger_weeks: 8 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub start_date:          NaiveDate,
    pub end_year:            i32,
    pub weeks_per_month:     u32,
    pub random_event_chance: f64,
    pub starting_cash:       f64,
    pub starting_reputation: i32,
    pub starting_stages:     u32,
    pub burn:                BurnRates,
    pub runway:              RunwayThresholds,
    /// Oscar ceremonies are held from this year on, every March.
    pub first_awards_year:   i32,
    /// Inclusive year window in which television events can fire.
    pub tv_window:           (i32, i32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_date:          NaiveDate::from_ymd_opt(1933, 1, 1).unwrap_or(NaiveDate::MIN),
            end_year:            2010,
            weeks_per_month:     4,
            random_event_chance: 0.08,
            starting_cash:       500_000.0,
            starting_reputation: 50,
            starting_stages:     2,
            burn:                BurnRates::default(),
            runway:              RunwayThresholds::default(),
            first_awards_year:   1934,
            tv_window:           (1950, 1970),
        }
    }
}

impl EngineConfig {
    /// Load from the data/ directory.
    /// In tests, use EngineConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/engine_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn start_year(&self) -> i32 {
        chrono::Datelike::year(&self.start_date)
    }

    pub fn validate(&self) -> StudioResult<()> {
        if self.weeks_per_month == 0 {
            return Err(StudioError::Config("weeks_per_month must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.random_event_chance) {
            return Err(StudioError::Config(format!(
                "random_event_chance must be in [0, 1], got {}",
                self.random_event_chance
            )));
        }
        if self.runway.danger_weeks > self.runway.warning_weeks {
            return Err(StudioError::Config(format!(
                "runway danger ({}) must not exceed warning ({})",
                self.runway.danger_weeks, self.runway.warning_weeks
            )));
        }
        if self.end_year < self.start_year() {
            return Err(StudioError::Config(format!(
                "end_year {} precedes start year {}",
                self.end_year,
                self.start_year()
            )));
        }
        Ok(())
    }
}
