//! Per-country accumulation and per-period aggregates

use std::collections::BTreeSet;

use ahash::AHashMap;

use ov_core::{AxisVar, YearSeason};

use super::athlete::{AthleteRecord, Medal};

/// Per-country (NOC) aggregate: identity and alias fields, static stats,
/// participation years and the per-games-edition athlete/medal aggregates.
///
/// Built exclusively by `DataIngestion`; read-only once aggregation has
/// run. Transient per-frame screen fields (position, radius) deliberately
/// do not live here: they belong to the layout result.
#[derive(Debug, Clone)]
pub struct CountryAggregate {
    pub noc: String,
    pub country_name: String,
    pub olympic_team: String,
    pub region: String,
    pub other_alias: String,
    pub historic_alias: String,

    /// Static land area in km²; zero when unknown.
    pub land_area: f64,
    /// Sparse population by calendar year.
    pub population_by_year: AHashMap<i32, f64>,
    /// Calendar years of recorded participation from the alias table.
    pub valid_years: BTreeSet<i32>,

    athletes: AHashMap<YearSeason, EditionRoster>,
    medal_count: AHashMap<YearSeason, u32>,
    athlete_count: AHashMap<YearSeason, u32>,
}

/// The athletes of one (country, edition) appearance, in first-seen order,
/// with a name index so row merging stays O(1) over the large source table.
#[derive(Debug, Clone, Default)]
struct EditionRoster {
    list: Vec<AthleteRecord>,
    by_name: AHashMap<String, usize>,
}

impl EditionRoster {
    fn entry(&mut self, name: &str, make: impl FnOnce() -> AthleteRecord) -> &mut AthleteRecord {
        let index = match self.by_name.get(name) {
            Some(&i) => i,
            None => {
                self.list.push(make());
                self.by_name.insert(name.to_string(), self.list.len() - 1);
                self.list.len() - 1
            }
        };
        &mut self.list[index]
    }
}

impl CountryAggregate {
    pub(crate) fn new(
        noc: impl Into<String>,
        olympic_team: impl Into<String>,
        country_name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            noc: noc.into(),
            olympic_team: olympic_team.into(),
            country_name: country_name.into(),
            region: region.into(),
            other_alias: String::new(),
            historic_alias: String::new(),
            land_area: 0.0,
            population_by_year: AHashMap::new(),
            valid_years: BTreeSet::new(),
            athletes: AHashMap::new(),
            medal_count: AHashMap::new(),
            athlete_count: AHashMap::new(),
        }
    }

    /// Case-insensitive match against the four alias fields; used to join
    /// the stats and population tables onto countries.
    pub fn matches_name(&self, s: &str) -> bool {
        if s.is_empty() {
            return false;
        }
        let s = s.to_lowercase();
        s == self.country_name.to_lowercase()
            || s == self.olympic_team.to_lowercase()
            || s == self.other_alias.to_lowercase()
            || s == self.historic_alias.to_lowercase()
    }

    /// Mark a raw medal row for this edition. The entry is overwritten by
    /// the aggregation pass; it exists so participation is visible before
    /// aggregation runs.
    pub(crate) fn add_medal_row(&mut self, ys: YearSeason) {
        self.medal_count.entry(ys).or_insert(0);
    }

    /// Get or create the athlete for `name` in this edition's roster; rows
    /// merging into the same athlete extend its event and medal sets while
    /// the first row's identity fields win.
    pub(crate) fn athlete_entry(
        &mut self,
        ys: YearSeason,
        name: &str,
        make: impl FnOnce() -> AthleteRecord,
    ) -> &mut AthleteRecord {
        self.athletes.entry(ys).or_default().entry(name, make)
    }

    /// One aggregation pass after all raw rows are ingested: the unique
    /// athlete count is the number of distinct (name, event-set)
    /// identities, and the unique medal count the number of distinct
    /// (identity, event, tier) triples. The dedup collapses team-event
    /// rows that the source repeats once per team member and event.
    pub(crate) fn compute_aggregates(&mut self) {
        for (ys, roster) in &self.athletes {
            let identities: BTreeSet<_> = roster.list.iter().map(|a| a.identity()).collect();
            self.athlete_count.insert(*ys, identities.len() as u32);

            let mut medals: BTreeSet<(&str, &BTreeSet<String>, &str, Medal)> = BTreeSet::new();
            for athlete in &roster.list {
                for (event, tier) in athlete.medal_events() {
                    medals.insert((&athlete.name, athlete.events(), event, *tier));
                }
            }
            self.medal_count.insert(*ys, medals.len() as u32);
        }
    }

    /// A country participated in an edition iff it has any recorded
    /// aggregate for it; population or land data alone does not count.
    pub fn participated_in(&self, ys: YearSeason) -> bool {
        self.athletes.contains_key(&ys) || self.medal_count.contains_key(&ys)
    }

    /// Unique athletes for an edition; zero when the country did not
    /// participate.
    pub fn athlete_count(&self, ys: YearSeason) -> u32 {
        self.athlete_count.get(&ys).copied().unwrap_or(0)
    }

    /// Unique medals for an edition; zero when the country did not
    /// participate.
    pub fn medal_count(&self, ys: YearSeason) -> u32 {
        self.medal_count.get(&ys).copied().unwrap_or(0)
    }

    /// Raw athlete list for an edition (per-country detail views).
    pub fn athletes(&self, ys: YearSeason) -> &[AthleteRecord] {
        self.athletes
            .get(&ys)
            .map(|roster| roster.list.as_slice())
            .unwrap_or(&[])
    }

    /// Value of an axis variable for one edition; unparticipated editions
    /// and missing data read as zero.
    pub fn value_for(&self, var: AxisVar, ys: YearSeason) -> f64 {
        match var {
            AxisVar::TotalMedals => f64::from(self.medal_count(ys)),
            AxisVar::AthleteCount => f64::from(self.athlete_count(ys)),
            AxisVar::Population => self
                .population_by_year
                .get(&ys.year)
                .copied()
                .unwrap_or(0.0),
            AxisVar::LandArea => self.land_area,
        }
    }

    /// Every edition this country has any aggregate for (may repeat keys;
    /// callers collect into a set).
    pub fn all_year_seasons(&self) -> impl Iterator<Item = YearSeason> + '_ {
        self.athletes.keys().chain(self.medal_count.keys()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_core::Season;

    fn country() -> CountryAggregate {
        let mut c = CountryAggregate::new("URS", "Soviet Union", "Russia", "Europe");
        c.other_alias = "Russian Federation".to_string();
        c.historic_alias = "USSR".to_string();
        c
    }

    #[test]
    fn name_matching_is_case_insensitive_over_all_aliases() {
        let c = country();
        assert!(c.matches_name("russia"));
        assert!(c.matches_name("SOVIET UNION"));
        assert!(c.matches_name("ussr"));
        assert!(c.matches_name("Russian Federation"));
        assert!(!c.matches_name("Rus"));
        assert!(!c.matches_name(""));
    }

    #[test]
    fn population_and_land_do_not_count_as_participation() {
        let mut c = country();
        c.land_area = 17_098_246.0;
        c.population_by_year.insert(2000, 146_000_000.0);
        let ys = YearSeason::new(2000, Season::Summer);
        assert!(!c.participated_in(ys));
        assert_eq!(c.athlete_count(ys), 0);
        assert_eq!(c.medal_count(ys), 0);
        // the axis accessor still reads the static data
        assert_eq!(c.value_for(AxisVar::Population, ys), 146_000_000.0);
        assert_eq!(c.value_for(AxisVar::LandArea, ys), 17_098_246.0);
    }

    #[test]
    fn unparticipated_edition_reads_zero_not_absence() {
        let mut c = country();
        let played = YearSeason::new(1980, Season::Summer);
        let skipped = YearSeason::new(1984, Season::Summer);
        c.athlete_entry(played, "Ivan", || {
            AthleteRecord::new("Ivan", "M", None, None, None, "Gymnastics")
        })
        .add_event("Team all-around");
        c.compute_aggregates();
        assert!(c.participated_in(played));
        assert!(!c.participated_in(skipped));
        assert_eq!(c.value_for(AxisVar::AthleteCount, skipped), 0.0);
    }

    #[test]
    fn athlete_rows_merge_by_name_in_first_seen_order() {
        let mut c = country();
        let ys = YearSeason::new(2000, Season::Summer);
        c.athlete_entry(ys, "Ivan", || {
            AthleteRecord::new("Ivan", "M", Some(24.0), None, None, "Gymnastics")
        })
        .add_event("Rings");
        c.athlete_entry(ys, "Olga", || {
            AthleteRecord::new("Olga", "F", None, None, None, "Gymnastics")
        })
        .add_event("Vault");
        // a later row for Ivan extends the existing record in place
        c.athlete_entry(ys, "Ivan", || {
            AthleteRecord::new("Ivan", "M", Some(99.0), None, None, "Gymnastics")
        })
        .add_event("Floor");

        let names: Vec<_> = c.athletes(ys).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Ivan", "Olga"]);
        // first row's identity fields win over later rows
        assert_eq!(c.athletes(ys)[0].age, Some(24.0));
        assert_eq!(c.athletes(ys)[0].event_count(), 2);
    }
}
