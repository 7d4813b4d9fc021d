//! Fixed chart geometry shared by the view state, layout engine and shell

use egui::{pos2, Rect};

pub const SKETCH_W: f32 = 1280.0;
pub const SKETCH_H: f32 = 720.0;

pub const CHART_LEFT: f32 = 80.0;
pub const CHART_RIGHT: f32 = 1200.0;
pub const CHART_TOP: f32 = 80.0;
pub const CHART_BOTTOM: f32 = 580.0;
pub const CHART_W: f32 = CHART_RIGHT - CHART_LEFT;
pub const CHART_H: f32 = CHART_BOTTOM - CHART_TOP;

/// Fraction of the axis maximum added as margin so bubbles at the extremes
/// are not clipped by the chart edge.
pub const CHART_MARGIN_RATIO: f32 = 0.05;
/// Additive pad on top of the Y margin.
pub const CHART_MARGIN_Y_PAD: f32 = 10.0;

pub const NUM_VISIBLE_TICKS: usize = 10;
pub const TICK_SPACING: f32 = 80.0;
pub const SLIDER_WIDTH: f32 = NUM_VISIBLE_TICKS as f32 * TICK_SPACING;
pub const SLIDER_X: f32 = (SKETCH_W - SLIDER_WIDTH) / 2.0;
pub const SLIDER_Y: f32 = CHART_BOTTOM + 80.0;
/// Vertical grab band around the slider track.
pub const SLIDER_GRAB: f32 = 20.0;

/// Exponential easing constant applied once per frame to every
/// current-toward-target value.
pub const EASE: f32 = 0.1;

/// The chart plotting rectangle in screen coordinates.
pub fn chart_rect() -> Rect {
    Rect::from_min_max(pos2(CHART_LEFT, CHART_TOP), pos2(CHART_RIGHT, CHART_BOTTOM))
}
