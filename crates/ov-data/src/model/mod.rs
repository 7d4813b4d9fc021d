//! The Olympic data model: athlete appearances and per-country aggregates

mod athlete;
mod country;

pub use athlete::{AthleteRecord, Medal};
pub use country::CountryAggregate;
