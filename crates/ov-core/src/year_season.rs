//! The (year, season) key identifying one Olympic Games edition

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Games season.
///
/// Winter sorts before Summer within the same year; the variant order here
/// is what the derived `Ord` relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Season {
    Winter,
    Summer,
}

impl Season {
    /// Single-letter code used in the canonical string key.
    pub fn code(&self) -> char {
        match self {
            Season::Winter => 'W',
            Season::Summer => 'S',
        }
    }

    /// Parse a season cell ("Summer", "Winter", "S", "W", any case).
    ///
    /// Anything that does not start with a 'w' is Summer, matching how the
    /// source tables are encoded.
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim().to_lowercase().starts_with('w') {
            Season::Winter
        } else {
            Season::Summer
        }
    }
}

/// One Olympic Games edition: a calendar year plus Summer or Winter.
///
/// Total order is year ascending, then Winter before Summer within a year.
/// `Display` renders the canonical key `"<year><S|W>"` used wherever the
/// edition serves as a mapping key; `FromStr` parses the same form back and
/// the round trip is exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct YearSeason {
    pub year: i32,
    pub season: Season,
}

impl YearSeason {
    pub fn new(year: i32, season: Season) -> Self {
        Self { year, season }
    }

    /// Human-readable form, e.g. `"1994 W"`; used for slider tick labels.
    pub fn label(&self) -> String {
        format!("{} {}", self.year, self.season.code())
    }
}

impl fmt::Display for YearSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.year, self.season.code())
    }
}

/// Errors parsing a canonical `"<year><S|W>"` key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseYearSeasonError {
    #[error("year-season key too short: {0:?}")]
    TooShort(String),
    #[error("invalid season code: {0:?}")]
    BadSeason(char),
    #[error("invalid year: {0:?}")]
    BadYear(String),
}

impl FromStr for YearSeason {
    type Err = ParseYearSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let code = chars
            .next_back()
            .ok_or_else(|| ParseYearSeasonError::TooShort(s.to_string()))?;
        let year_part = chars.as_str();
        let season = match code {
            'S' => Season::Summer,
            'W' => Season::Winter,
            other => return Err(ParseYearSeasonError::BadSeason(other)),
        };
        let year = year_part
            .parse::<i32>()
            .map_err(|_| ParseYearSeasonError::BadYear(year_part.to_string()))?;
        Ok(Self { year, season })
    }
}
