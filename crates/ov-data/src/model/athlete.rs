//! One athlete's appearance at a single games edition

use std::collections::BTreeSet;

/// Medal tiers, case-insensitively parsed from the participation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Parse a medal cell; anything other than the three tiers (e.g. "NA",
    /// empty) is no medal.
    pub fn from_cell(raw: &str) -> Option<Medal> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gold" => Some(Medal::Gold),
            "silver" => Some(Medal::Silver),
            "bronze" => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// One athlete's identity, physical attributes and the distinct events and
/// medals attributed during a single (country, games-edition) appearance.
///
/// Numeric physical fields are `None` when the source marks them
/// unavailable. De-duplication identity is `(name, events)`: records with
/// the same name and identical event set are the same appearance. Records
/// are only mutated during ingestion (event/medal accumulation) and are
/// read-only afterward.
#[derive(Debug, Clone)]
pub struct AthleteRecord {
    pub name: String,
    pub sex: String,
    pub age: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub sport: String,
    events: BTreeSet<String>,
    gold: u32,
    silver: u32,
    bronze: u32,
    /// Distinct (event, tier) pairs actually awarded; the country-level
    /// medal dedup counts these per identity.
    medal_events: BTreeSet<(String, Medal)>,
}

impl AthleteRecord {
    pub fn new(
        name: impl Into<String>,
        sex: impl Into<String>,
        age: Option<f64>,
        height: Option<f64>,
        weight: Option<f64>,
        sport: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sex: sex.into(),
            age,
            height,
            weight,
            sport: sport.into(),
            events: BTreeSet::new(),
            gold: 0,
            silver: 0,
            bronze: 0,
            medal_events: BTreeSet::new(),
        }
    }

    pub fn add_event(&mut self, event: &str) {
        if !event.is_empty() {
            self.events.insert(event.to_string());
        }
    }

    /// Record a medal won in a specific event.
    pub fn add_medal(&mut self, event: &str, medal: Medal) {
        match medal {
            Medal::Gold => self.gold += 1,
            Medal::Silver => self.silver += 1,
            Medal::Bronze => self.bronze += 1,
        }
        self.medal_events.insert((event.to_string(), medal));
    }

    pub fn events(&self) -> &BTreeSet<String> {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// (gold, silver, bronze) totals for this appearance.
    pub fn medal_counts(&self) -> (u32, u32, u32) {
        (self.gold, self.silver, self.bronze)
    }

    pub fn medal_events(&self) -> &BTreeSet<(String, Medal)> {
        &self.medal_events
    }

    /// De-duplication identity: the name plus the canonical event set.
    pub fn identity(&self) -> (&str, &BTreeSet<String>) {
        (&self.name, &self.events)
    }
}
