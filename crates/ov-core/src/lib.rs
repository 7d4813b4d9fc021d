//! Core types and interactive state for the Olympic Games visualiser
//!
//! This crate provides the fundamental abstractions shared by the data and
//! layout crates: the (year, season) games key, the closed set of axis
//! variables, the input events delivered by the windowing shell, and the
//! pan/zoom/slider/selection view state advanced once per frame.

pub mod axis;
pub mod events;
pub mod view;
pub mod year_season;

// Re-export commonly used types
pub use axis::AxisVar;
pub use events::InputEvent;
pub use view::{BubbleHit, DataExtents, ViewState};
pub use year_season::{ParseYearSeasonError, Season, YearSeason};
