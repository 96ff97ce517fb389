//! Deterministic title and name generation using curated word lists.
//!
//! Used for generated scripts and for the people named in incidents.
//! All generation is deterministic (same RNG seed = same titles).

use crate::rng::SubsystemRng;

/// Deterministic generator for film titles and period-appropriate names.
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically
    pub fn generate_full_name(rng: &mut SubsystemRng) -> String {
        let first = Self::pick(rng, Self::first_names());
        let last = Self::pick(rng, Self::last_names());
        format!("{first} {last}")
    }

    /// Generate a film title for `genre`.
    ///
    /// Format: "The Adjective Noun", "Noun of the Place", or "Adjective Place"
    pub fn generate_title(rng: &mut SubsystemRng, genre: &str) -> String {
        let nouns = Self::genre_nouns(genre);
        let noun = Self::pick(rng, nouns);
        let adjective = Self::pick(rng, Self::adjectives());
        let place = Self::pick(rng, Self::places());

        match rng.next_u64_below(3) {
            0 => format!("The {adjective} {noun}"),
            1 => format!("{noun} of {place}"),
            _ => format!("{adjective} {place}"),
        }
    }

    fn pick(rng: &mut SubsystemRng, words: &'static [&'static str]) -> &'static str {
        let index = rng.next_u64_below(words.len() as u64) as usize;
        words[index]
    }

    fn genre_nouns(genre: &str) -> &'static [&'static str] {
        match genre {
            "western" => &["Gunslinger", "Stagecoach", "Outlaw", "Marshal", "Frontier", "Drifter"],
            "crime"   => &["Racket", "Getaway", "Informer", "Syndicate", "Alibi", "Heist"],
            "musical" => &["Serenade", "Rhapsody", "Follies", "Melody", "Showboat", "Parade"],
            "horror"  => &["Phantom", "Curse", "Beast", "Shadow", "Crypt", "Specter"],
            "war"     => &["Convoy", "Battalion", "Patrol", "Squadron", "Beachhead", "Furlough"],
            "comedy"  => &["Honeymoon", "Mix-Up", "Bachelor", "Heiress", "Caper", "Weekend"],
            "sci-fi"  => &["Invasion", "Signal", "Orbit", "Colony", "Machine", "Visitor"],
            _         => &["Promise", "Stranger", "Letter", "Secret", "Journey", "Affair"],
        }
    }

    fn adjectives() -> &'static [&'static str] {
        &[
            "Midnight", "Golden", "Broken", "Silent", "Scarlet", "Lonely", "Reckless",
            "Last", "Hidden", "Wild", "Crimson", "Forgotten", "Dangerous", "Painted",
            "Restless", "Velvet", "Burning", "Savage", "Sweet", "Lost",
        ]
    }

    fn places() -> &'static [&'static str] {
        &[
            "Manhattan", "Santa Fe", "Casablanca", "Broadway", "the River", "the Desert",
            "Chinatown", "the Yukon", "Monte Carlo", "the Harbor", "Sunset Boulevard",
            "the Border", "Dodge City", "the Pacific", "Paris", "the Bayou",
        ]
    }

    /// Period-appropriate first names.
    fn first_names() -> &'static [&'static str] {
        &[
            "Clark", "Cary", "Spencer", "Errol", "Gary", "James", "Henry", "Humphrey",
            "Fred", "Tyrone", "Robert", "William", "Edward", "John", "Walter", "Ray",
            "Bette", "Joan", "Greta", "Carole", "Myrna", "Jean", "Katharine", "Barbara",
            "Ginger", "Olivia", "Vivien", "Rosalind", "Irene", "Claudette", "Norma", "Loretta",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Hale", "Marlowe", "Crane", "Whitmore", "Lang", "Prescott", "Dalton", "Sheridan",
            "Ashford", "Blaine", "Carroll", "Devereaux", "Ellison", "Forrest", "Garland", "Holloway",
            "Kendall", "Lowell", "Maddox", "Norwood", "Osborne", "Pierce", "Quinlan", "Russell",
            "Sterling", "Thorne", "Vance", "Wakefield", "Yardley", "Bancroft", "Calloway", "Drake",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, SubsystemSlot};

    #[test]
    fn title_generation_is_deterministic() {
        let mut rng1 = RngBank::new(12345).for_subsystem_at_week(SubsystemSlot::Scripts, 1);
        let mut rng2 = RngBank::new(12345).for_subsystem_at_week(SubsystemSlot::Scripts, 1);

        let t1 = NameGenerator::generate_title(&mut rng1, "western");
        let t2 = NameGenerator::generate_title(&mut rng2, "western");

        assert_eq!(t1, t2, "Same seed should produce same title");
    }

    #[test]
    fn generates_valid_full_names() {
        let mut rng = RngBank::new(12345).for_subsystem_at_week(SubsystemSlot::RandomEvents, 1);

        for _ in 0..100 {
            let name = NameGenerator::generate_full_name(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have exactly 2 parts: {}", name);
        }
    }

    #[test]
    fn titles_are_never_empty() {
        let mut rng = RngBank::new(99).for_subsystem_at_week(SubsystemSlot::Scripts, 3);
        for genre in ["drama", "crime", "musical", "unknown"] {
            for _ in 0..20 {
                let title = NameGenerator::generate_title(&mut rng, genre);
                assert!(title.split_whitespace().count() >= 2, "Title too short: {title}");
            }
        }
    }
}
