//! Building country aggregates from the four source tables

use std::collections::BTreeSet;

use ahash::AHashMap;
use tracing::{info, warn};

use ov_core::{Season, YearSeason};

use crate::model::{AthleteRecord, CountryAggregate, Medal};
use crate::schema::{parse_finite, Table};

/// The fully-ingested, read-only dataset: one aggregate per NOC plus the
/// global sorted list of games editions observed anywhere.
pub struct OlympicsDataset {
    pub countries: AHashMap<String, CountryAggregate>,
    pub year_seasons: Vec<YearSeason>,
}

impl OlympicsDataset {
    /// Run the whole ingestion pipeline over the four tables.
    pub fn from_tables(
        aliases: &Table,
        stats: &Table,
        population: &Table,
        participation: &Table,
    ) -> Self {
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(aliases);
        ingestion.load_stats(stats);
        ingestion.load_population(population);
        ingestion.load_participation(participation);
        ingestion.finish()
    }

    pub fn nocs(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }
}

/// Accumulates the four tables, then `finish()` runs the per-country
/// aggregation pass and freezes the dataset.
///
/// No row-level error aborts ingestion: malformed numerics, unmatched
/// country names and unknown country codes are logged and skipped. A
/// country with zero valid rows simply has empty aggregates and never
/// participates.
#[derive(Default)]
pub struct DataIngestion {
    countries: AHashMap<String, CountryAggregate>,
    /// NOCs in alias-table order; name matching scans this so
    /// first-match-wins stays deterministic.
    order: Vec<String>,
}

impl DataIngestion {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `CountryAggregate` per alias row. The start/end year columns
    /// populate the participation-year set when both parse; a malformed
    /// pair skips only that range, never the country.
    pub fn load_aliases(&mut self, table: &Table) {
        for row in table.rows() {
            let noc = row.field("NOC").to_string();
            if noc.is_empty() {
                warn!("alias row without NOC skipped");
                continue;
            }
            let mut country = CountryAggregate::new(
                noc.clone(),
                row.field("olympic_team"),
                row.field("country_name"),
                row.field("region"),
            );
            // "other_allias" is how the source data spells the column
            country.other_alias = row.field("other_allias").to_string();
            country.historic_alias = row.field("historic_name").to_string();

            let start = parse_finite(row.field("start_year"));
            let end = parse_finite(row.field("end_year"));
            if let (Some(start), Some(end)) = (start, end) {
                for year in start as i32..=end as i32 {
                    country.valid_years.insert(year);
                }
            }

            if self.countries.insert(noc.clone(), country).is_none() {
                self.order.push(noc);
            }
        }
        info!(countries = self.countries.len(), "alias table loaded");
    }

    /// Join land area onto countries by name matching; unmatched rows are
    /// dropped without creating countries.
    pub fn load_stats(&mut self, table: &Table) {
        for row in table.rows() {
            let name = row.field("country");
            let land = parse_finite(row.field("land_area")).unwrap_or(0.0);
            match self.match_country_mut(name) {
                Some(country) => country.land_area = land,
                None => tracing::debug!(country = %name, "stats row matched no country"),
            }
        }
    }

    /// Population table: one row per country name, one column per calendar
    /// year, joined by the same name matching.
    pub fn load_population(&mut self, table: &Table) {
        let year_columns: Vec<(String, i32)> = table
            .headers()
            .iter()
            .filter_map(|h| h.parse::<i32>().ok().map(|year| (h.clone(), year)))
            .collect();

        for row in table.rows() {
            let name = row.field("country");
            let Some(country) = self.match_country_mut(name) else {
                continue;
            };
            for (column, year) in &year_columns {
                if let Some(value) = parse_finite(row.field(column)) {
                    country.population_by_year.insert(*year, value);
                }
            }
        }
    }

    /// Main participation table: one row per athlete per event, with
    /// repeated rows for team-event medals. Rows merge into per-edition
    /// athletes; the dedup happens later in the aggregation pass.
    pub fn load_participation(&mut self, table: &Table) {
        let mut skipped = 0usize;
        for row in table.rows() {
            let noc = row.field("NOC");
            let Some(country) = self.countries.get_mut(noc) else {
                skipped += 1;
                continue;
            };

            let year = match parse_finite(row.field("Year")) {
                Some(v) if v != 0.0 => v as i32,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            let season_raw = row.field("Season");
            if season_raw.is_empty() {
                skipped += 1;
                continue;
            }
            let ys = YearSeason::new(year, Season::from_cell(season_raw));

            let medal = Medal::from_cell(row.field("Medal"));
            if medal.is_some() {
                country.add_medal_row(ys);
            }

            let name = row.field("Name");
            let athlete = country.athlete_entry(ys, name, || {
                AthleteRecord::new(
                    name,
                    row.field("Sex"),
                    parse_finite(row.field("Age")),
                    parse_finite(row.field("Height")),
                    parse_finite(row.field("Weight")),
                    row.field("Sport"),
                )
            });
            let event = row.field("Event");
            athlete.add_event(event);
            if let Some(medal) = medal {
                athlete.add_medal(event, medal);
            }
        }
        if skipped > 0 {
            warn!(skipped, "participation rows skipped");
        }
    }

    /// Aggregation pass per country per edition, then the global sorted
    /// edition list.
    pub fn finish(mut self) -> OlympicsDataset {
        let mut seen = BTreeSet::new();
        for country in self.countries.values_mut() {
            country.compute_aggregates();
            seen.extend(country.all_year_seasons());
        }
        let year_seasons: Vec<YearSeason> = seen.into_iter().collect();
        info!(
            countries = self.countries.len(),
            editions = year_seasons.len(),
            "ingestion complete"
        );
        OlympicsDataset {
            countries: self.countries,
            year_seasons,
        }
    }

    /// First country (in alias-table order) whose aliases match `name`.
    fn match_country_mut(&mut self, name: &str) -> Option<&mut CountryAggregate> {
        if name.is_empty() {
            return None;
        }
        let noc = self
            .order
            .iter()
            .find(|noc| {
                self.countries
                    .get(noc.as_str())
                    .is_some_and(|c| c.matches_name(name))
            })?
            .clone();
        self.countries.get_mut(&noc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ys(key: &str) -> YearSeason {
        key.parse().unwrap()
    }

    fn alias_table() -> Table {
        Table::from_rows(
            vec![
                "NOC",
                "olympic_team",
                "country_name",
                "region",
                "other_allias",
                "historic_name",
                "start_year",
                "end_year",
            ],
            vec![
                vec!["USA", "United States", "United States of America", "Americas", "", "", "1896", "2024"],
                vec!["GER", "Germany", "Germany", "Europe", "Deutschland", "West Germany", "bad", "2024"],
            ],
        )
    }

    fn participation(rows: Vec<Vec<&str>>) -> Table {
        Table::from_rows(
            vec![
                "NOC", "Year", "Season", "Medal", "Name", "Sex", "Age", "Height", "Weight",
                "Sport", "Event",
            ],
            rows,
        )
    }

    fn empty() -> Table {
        Table::default()
    }

    #[test]
    fn alias_rows_create_countries_and_valid_years() {
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(&alias_table());
        let data = ingestion.finish();

        let usa = &data.countries["USA"];
        assert_eq!(usa.country_name, "United States of America");
        assert!(usa.valid_years.contains(&1896));
        assert!(usa.valid_years.contains(&2024));

        // malformed start_year skips the range, not the country
        let ger = &data.countries["GER"];
        assert!(ger.valid_years.is_empty());
        assert_eq!(ger.other_alias, "Deutschland");
    }

    #[test]
    fn stats_and_population_join_by_alias_first_match_wins() {
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(&alias_table());
        ingestion.load_stats(&Table::from_rows(
            vec!["country", "land_area"],
            vec![
                vec!["deutschland", "357022"],
                vec!["Atlantis", "123"], // silently dropped
                vec!["united states of america", "n/a"],
            ],
        ));
        ingestion.load_population(&Table::from_rows(
            vec!["country", "1996", "2000"],
            vec![vec!["West Germany", "81000000", "n/a"]],
        ));
        let data = ingestion.finish();

        assert_eq!(data.countries["GER"].land_area, 357_022.0);
        // sentinel land area reads as zero downstream
        assert_eq!(data.countries["USA"].land_area, 0.0);
        assert_eq!(
            data.countries["GER"].population_by_year.get(&1996),
            Some(&81_000_000.0)
        );
        // "n/a" population cell is simply absent
        assert_eq!(data.countries["GER"].population_by_year.get(&2000), None);
        assert!(!data.countries.contains_key("Atlantis"));
    }

    #[test]
    fn multi_event_athletes_deduplicate() {
        // Alice wins gold in two events, Bob silver in one: two unique
        // athletes, three unique (athlete, event, tier) medals.
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(&alias_table());
        ingestion.load_participation(&participation(vec![
            vec!["USA", "2000", "Summer", "Gold", "Alice", "F", "24", "170", "60", "Athletics", "100m"],
            vec!["USA", "2000", "Summer", "Gold", "Alice", "F", "24", "170", "60", "Athletics", "200m"],
            vec!["USA", "2000", "Summer", "Silver", "Bob", "M", "27", "185", "80", "Athletics", "100m"],
        ]));
        let data = ingestion.finish();

        let usa = &data.countries["USA"];
        assert_eq!(usa.athlete_count(ys("2000S")), 2);
        assert_eq!(usa.medal_count(ys("2000S")), 3);
        assert_eq!(data.year_seasons, vec![ys("2000S")]);
    }

    #[test]
    fn relay_rows_count_one_medal_per_distinct_athlete() {
        // Four team members, one event, one medal tier: the dedup keeps
        // one (athlete, event, tier) triple per distinct athlete.
        let rows = ["Ann", "Beth", "Cara", "Dana"]
            .iter()
            .map(|name| {
                vec!["USA", "2000", "Summer", "Gold", *name, "F", "25", "175", "65", "Athletics", "4x100m Relay"]
            })
            .collect();
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(&alias_table());
        ingestion.load_participation(&participation(rows));
        let data = ingestion.finish();

        let usa = &data.countries["USA"];
        assert_eq!(usa.athlete_count(ys("2000S")), 4);
        assert_eq!(usa.medal_count(ys("2000S")), 4);
    }

    #[test]
    fn duplicate_rows_never_inflate_medal_counts() {
        // Same athlete, same event, same medal, repeated: dedup reduces,
        // never inflates above the raw row count.
        let raw_rows = vec![
            vec!["USA", "2000", "Summer", "Gold", "Alice", "F", "24", "170", "60", "Athletics", "100m"],
            vec!["USA", "2000", "Summer", "Gold", "Alice", "F", "24", "170", "60", "Athletics", "100m"],
            vec!["USA", "2000", "Summer", "Bronze", "Bob", "M", "27", "185", "80", "Athletics", "100m"],
        ];
        let raw_medal_rows = raw_rows.len() as u32;
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(&alias_table());
        ingestion.load_participation(&participation(raw_rows));
        let data = ingestion.finish();

        let count = data.countries["USA"].medal_count(ys("2000S"));
        assert!(count <= raw_medal_rows);
        assert_eq!(count, 2);
    }

    #[test]
    fn unknown_noc_and_malformed_year_rows_are_skipped() {
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(&alias_table());
        ingestion.load_participation(&participation(vec![
            vec!["XXX", "2000", "Summer", "", "Ghost", "M", "", "", "", "Judo", "Heavyweight"],
            vec!["USA", "??", "Summer", "", "Alice", "F", "", "", "", "Judo", "Heavyweight"],
            vec!["USA", "2000", "", "", "Alice", "F", "", "", "", "Judo", "Heavyweight"],
        ]));
        let data = ingestion.finish();
        assert!(data.year_seasons.is_empty());
        assert!(!data.countries["USA"].participated_in(ys("2000S")));
    }

    #[test]
    fn winter_and_summer_editions_sort_into_one_timeline() {
        let mut ingestion = DataIngestion::new();
        ingestion.load_aliases(&alias_table());
        ingestion.load_participation(&participation(vec![
            vec!["USA", "1994", "Winter", "", "Carol", "F", "", "", "", "Skiing", "Slalom"],
            vec!["GER", "1992", "Summer", "", "Hans", "M", "", "", "", "Rowing", "Eights"],
            vec!["USA", "1992", "Winter", "", "Carol", "F", "", "", "", "Skiing", "Slalom"],
        ]));
        let data = ingestion.finish();
        assert_eq!(
            data.year_seasons,
            vec![ys("1992W"), ys("1992S"), ys("1994W")]
        );
    }

    #[test]
    fn empty_tables_produce_an_empty_dataset() {
        let data = OlympicsDataset::from_tables(&empty(), &empty(), &empty(), &empty());
        assert!(data.countries.is_empty());
        assert!(data.year_seasons.is_empty());
    }
}
