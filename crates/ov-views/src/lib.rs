//! Per-frame chart layout
//!
//! Turns the read-only dataset plus the current view state into a list of
//! positioned, sized and coloured bubbles. The layout is a pure function of
//! its inputs; it holds no state of its own, so a frame can always be
//! recomputed from (dataset, view, clock).

pub mod chart;

pub use chart::colors;
pub use chart::{Bubble, ChartLayoutEngine, LayoutResult};
