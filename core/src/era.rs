//! Historical eras: year classification, economic scaling, and
//! era transition detection.
//!
//! Twelve fixed, contiguous, non-overlapping ranges cover 1933–2010
//! inclusive. Years outside that span have no era; scaling falls back to
//! identity multipliers so dependent calculations stay total.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EraKey {
    PreCode,
    GoldenAge,
    WarYears,
    PostWar,
    TvThreat,
    StudioDecline,
    NewHollywood,
    BlockbusterBirth,
    BlockbusterAge,
    IndieBoom,
    DigitalDawn,
    ModernEra,
}

/// Era-specific rules that shape what the studio may make and sell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EraRules {
    /// Production Code censorship is enforced on scripts.
    pub production_code:   bool,
    /// Film stock and materials are rationed.
    pub wartime_rationing: bool,
    /// Television competes for the audience.
    pub tv_competition:    bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EraScaling {
    pub inflation_mult:    f64,
    /// Typical (min, max) production budget, in nominal dollars.
    pub budget_range:      (f64, f64),
    pub monthly_burn_mult: f64,
    pub marketing_mult:    f64,
}

impl EraScaling {
    /// Identity scaling used when no era matches.
    pub const IDENTITY: EraScaling = EraScaling {
        inflation_mult:    1.0,
        budget_range:      (50_000.0, 500_000.0),
        monthly_burn_mult: 1.0,
        marketing_mult:    1.0,
    };
}

impl Default for EraScaling {
    fn default() -> Self { Self::IDENTITY }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Era {
    pub key:         EraKey,
    pub name:        &'static str,
    pub description: &'static str,
    pub start_year:  i32,
    pub end_year:    i32,
    pub rules:       EraRules,
    pub scaling:     EraScaling,
}

impl Era {
    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

const fn rules(production_code: bool, wartime_rationing: bool, tv_competition: bool) -> EraRules {
    EraRules { production_code, wartime_rationing, tv_competition }
}

const fn scaling(inflation: f64, min: f64, max: f64, burn: f64, marketing: f64) -> EraScaling {
    EraScaling {
        inflation_mult:    inflation,
        budget_range:      (min, max),
        monthly_burn_mult: burn,
        marketing_mult:    marketing,
    }
}

/// The era table, ordered by start year.
pub static ERAS: [Era; 12] = [
    Era {
        key: EraKey::PreCode,
        name: "Pre-Code Hollywood",
        description: "Sound is new, censorship is lax, and the Depression keeps ticket prices low.",
        start_year: 1933, end_year: 1934,
        rules: rules(false, false, false),
        scaling: scaling(1.0, 50_000.0, 500_000.0, 1.0, 1.0),
    },
    Era {
        key: EraKey::GoldenAge,
        name: "Golden Age",
        description: "The studio system at its peak, under the Production Code.",
        start_year: 1935, end_year: 1941,
        rules: rules(true, false, false),
        scaling: scaling(1.1, 75_000.0, 1_500_000.0, 1.1, 1.0),
    },
    Era {
        key: EraKey::WarYears,
        name: "The War Years",
        description: "Film stock is rationed, stars enlist, and audiences pack theaters.",
        start_year: 1942, end_year: 1945,
        rules: rules(true, true, false),
        scaling: scaling(1.3, 100_000.0, 2_000_000.0, 1.25, 0.9),
    },
    Era {
        key: EraKey::PostWar,
        name: "Post-War Reckoning",
        description: "HUAC hearings and the Paramount decree shake the studios.",
        start_year: 1946, end_year: 1949,
        rules: rules(true, false, false),
        scaling: scaling(1.5, 150_000.0, 2_500_000.0, 1.4, 1.1),
    },
    Era {
        key: EraKey::TvThreat,
        name: "The Television Threat",
        description: "Television keeps audiences home; widescreen and color fight back.",
        start_year: 1950, end_year: 1959,
        rules: rules(true, false, true),
        scaling: scaling(2.0, 250_000.0, 5_000_000.0, 1.75, 1.3),
    },
    Era {
        key: EraKey::StudioDecline,
        name: "Studio System Decline",
        description: "Contract rosters dissolve and costly epics sink studios.",
        start_year: 1960, end_year: 1966,
        rules: rules(true, false, true),
        scaling: scaling(2.5, 500_000.0, 10_000_000.0, 2.0, 1.5),
    },
    Era {
        key: EraKey::NewHollywood,
        name: "New Hollywood",
        description: "The ratings system replaces the Code and auteurs take over.",
        start_year: 1967, end_year: 1972,
        rules: rules(false, false, true),
        scaling: scaling(3.0, 750_000.0, 12_000_000.0, 2.4, 1.8),
    },
    Era {
        key: EraKey::BlockbusterBirth,
        name: "Birth of the Blockbuster",
        description: "Wide releases and summer tentpoles rewrite distribution.",
        start_year: 1973, end_year: 1979,
        rules: rules(false, false, false),
        scaling: scaling(4.5, 1_500_000.0, 20_000_000.0, 3.2, 2.5),
    },
    Era {
        key: EraKey::BlockbusterAge,
        name: "Age of the Blockbuster",
        description: "Home video and franchises dominate studio strategy.",
        start_year: 1980, end_year: 1989,
        rules: rules(false, false, false),
        scaling: scaling(7.0, 5_000_000.0, 50_000_000.0, 4.5, 3.5),
    },
    Era {
        key: EraKey::IndieBoom,
        name: "Independent Boom",
        description: "Festivals and mini-majors make room for independent films.",
        start_year: 1990, end_year: 1996,
        rules: rules(false, false, false),
        scaling: scaling(10.0, 8_000_000.0, 90_000_000.0, 5.5, 4.5),
    },
    Era {
        key: EraKey::DigitalDawn,
        name: "Digital Dawn",
        description: "DVD and digital effects transform budgets and revenue.",
        start_year: 1997, end_year: 2004,
        rules: rules(false, false, false),
        scaling: scaling(13.0, 15_000_000.0, 150_000_000.0, 6.5, 5.5),
    },
    Era {
        key: EraKey::ModernEra,
        name: "Modern Era",
        description: "Franchises, streaming and global markets.",
        start_year: 2005, end_year: 2010,
        rules: rules(false, false, false),
        scaling: scaling(16.0, 20_000_000.0, 250_000_000.0, 7.5, 7.0),
    },
];

/// Classify a year. Returns `None` outside 1933–2010.
pub fn era_for_year(year: i32) -> Option<EraKey> {
    ERAS.iter().find(|era| era.contains(year)).map(|era| era.key)
}

pub fn era_info(key: EraKey) -> &'static Era {
    // ERAS is indexed in declaration order of EraKey.
    &ERAS[key as usize]
}

pub fn scaling_for_year(year: i32) -> EraScaling {
    era_for_year(year)
        .map(|key| era_info(key).scaling)
        .unwrap_or(EraScaling::IDENTITY)
}

/// Display information attached to an era change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EraDisplayInfo {
    pub name:        String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EraTransition {
    pub old_era:  Option<EraKey>,
    pub new_era:  Option<EraKey>,
    pub year:     i32,
    pub era_info: Option<EraDisplayInfo>,
}

/// Compare eras either side of a year change. Returns `None` when both
/// years fall in the same era.
pub fn detect_transition(old_year: i32, new_year: i32) -> Option<EraTransition> {
    let old_era = era_for_year(old_year);
    let new_era = era_for_year(new_year);
    if old_era == new_era {
        return None;
    }

    let era_info = new_era.map(|key| {
        let era = era_info(key);
        EraDisplayInfo {
            name:        era.name.to_string(),
            description: era.description.to_string(),
        }
    });

    Some(EraTransition { old_era, new_era, year: new_year, era_info })
}
