//! Interaction and animation state for the bubble chart
//!
//! All "current" values (pan, zoom, slider offset) ease toward their
//! "target" counterparts once per frame; discrete input events only move
//! the targets, so mutations are applied atomically between frames. The
//! easing is one lerp step per frame and therefore frame-rate dependent by
//! construction; that is the documented behavior of the visualiser, not a
//! bug to fix silently.

pub mod geometry;

use ahash::AHashMap;
use egui::{remap, Pos2, Vec2};
use rand::Rng;

use crate::axis::AxisVar;
use crate::events::InputEvent;
use crate::year_season::YearSeason;
use geometry::{
    chart_rect, CHART_BOTTOM, CHART_H, CHART_LEFT, CHART_MARGIN_RATIO, CHART_MARGIN_Y_PAD,
    CHART_RIGHT, CHART_TOP, CHART_W, EASE, SLIDER_GRAB, SLIDER_WIDTH, SLIDER_X, SLIDER_Y,
    TICK_SPACING,
};

/// Wheel zoom clamp range.
pub const MIN_ZOOM: f32 = 0.8;
pub const MAX_ZOOM: f32 = 50.0;

/// Pop-in animation window per bubble, in milliseconds.
pub const POP_DURATION_MS: f64 = 300.0;
/// Hover/click radius growth window, in milliseconds.
pub const GROW_DURATION_MS: f64 = 200.0;
/// Maximum random stagger added to pop start times on a view reset.
pub const POP_STAGGER_MS: f64 = 500.0;

/// Zoom targets for the startup/reset view. Starting the current zoom well
/// above the target gives the zoom-in entrance animation.
const RESET_ZOOM_TARGET: f32 = 0.9;
const STARTUP_ZOOM: f32 = 5.0;

/// Slider tick selected when the application starts, clamped to the
/// timeline length.
const INITIAL_SLIDER_INDEX: usize = 27;

/// Screen-space hit target from the previous frame's layout, used for
/// bubble picking.
#[derive(Debug, Clone)]
pub struct BubbleHit {
    pub noc: String,
    pub center: Pos2,
    pub radius: f32,
}

impl BubbleHit {
    pub fn contains(&self, pos: Pos2) -> bool {
        self.center.distance(pos) < self.radius
    }
}

/// Current-period data maxima for the two selected axes. Pan and zoom
/// gestures are scaled by these so they feel consistent across zoom levels
/// and data ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataExtents {
    pub max_x: f32,
    pub max_y: f32,
}

/// Per-country pop-in bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct PopAnim {
    pub start_ms: f64,
    pub done: bool,
}

/// Interactive view state: axis selection, timeline position, hover/click
/// selection, eased pan/zoom/slider values and the per-country entrance
/// animation timers.
pub struct ViewState {
    pub selected_x: AxisVar,
    pub selected_y: AxisVar,

    year_seasons: Vec<YearSeason>,
    current_index: usize,

    /// Hover target; tracked only while nothing is click-selected.
    pub hovered: Option<String>,
    /// Click-selected country, at most one at a time.
    pub clicked: Option<String>,
    pub hover_started_ms: f64,
    pub click_started_ms: f64,

    pub pan: Vec2,
    pub pan_target: Vec2,
    pub zoom: f32,
    pub zoom_target: f32,

    slider_offset: f32,
    slider_target: f32,
    dragging_slider: bool,
    drag_start_x: f32,
    drag_start_offset: f32,
    panning: bool,

    pop: AHashMap<String, PopAnim>,
}

impl ViewState {
    /// Create the view state over a sorted timeline and the set of country
    /// codes that will ever appear.
    pub fn new(year_seasons: Vec<YearSeason>, nocs: impl IntoIterator<Item = String>) -> Self {
        let current_index = if year_seasons.is_empty() {
            0
        } else {
            INITIAL_SLIDER_INDEX.min(year_seasons.len() - 1)
        };
        let slider_offset = current_index as f32 * TICK_SPACING - SLIDER_WIDTH / 2.0;
        let pop = nocs
            .into_iter()
            .map(|noc| {
                (
                    noc,
                    PopAnim {
                        start_ms: 0.0,
                        done: false,
                    },
                )
            })
            .collect();
        Self {
            selected_x: AxisVar::AthleteCount,
            selected_y: AxisVar::TotalMedals,
            year_seasons,
            current_index,
            hovered: None,
            clicked: None,
            hover_started_ms: 0.0,
            click_started_ms: 0.0,
            pan: Vec2::ZERO,
            pan_target: Vec2::ZERO,
            zoom: STARTUP_ZOOM,
            zoom_target: RESET_ZOOM_TARGET,
            slider_offset,
            slider_target: slider_offset,
            dragging_slider: false,
            drag_start_x: 0.0,
            drag_start_offset: 0.0,
            panning: false,
            pop,
        }
    }

    pub fn year_seasons(&self) -> &[YearSeason] {
        &self.year_seasons
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The games edition currently shown, `None` on an empty timeline.
    pub fn current_year_season(&self) -> Option<YearSeason> {
        self.year_seasons.get(self.current_index).copied()
    }

    pub fn pop_anim(&self, noc: &str) -> Option<PopAnim> {
        self.pop.get(noc).copied()
    }

    pub fn is_dragging_slider(&self) -> bool {
        self.dragging_slider
    }

    /// Eased screen X of slider tick `i`; used by the shell to paint the
    /// slider exactly as the state sees it.
    pub fn slider_tick_x(&self, i: usize) -> f32 {
        SLIDER_X + i as f32 * TICK_SPACING - self.slider_offset
    }

    /// The tick currently nearest the slider anchor, given the eased
    /// offset; the shell highlights its label.
    pub fn aligned_slider_index(&self) -> usize {
        if self.year_seasons.is_empty() {
            return 0;
        }
        let exact = (self.slider_offset + SLIDER_WIDTH / 2.0) / TICK_SPACING;
        (exact.round().max(0.0) as usize).min(self.year_seasons.len() - 1)
    }

    /// Apply one discrete input event. `hits` are the previous frame's
    /// bubble hit targets; `extents` the current-period axis maxima.
    pub fn handle_event(&mut self, event: &InputEvent, hits: &[BubbleHit], extents: DataExtents) {
        match *event {
            InputEvent::PointerDown { pos, time_ms } => self.on_pointer_down(pos, time_ms, hits),
            InputEvent::PointerMoved { pos, time_ms } => self.on_pointer_moved(pos, time_ms, hits),
            InputEvent::PointerDragged { pos, delta, .. } => {
                self.on_pointer_dragged(pos, delta, extents)
            }
            InputEvent::PointerUp { time_ms, .. } => self.on_pointer_up(time_ms),
            InputEvent::Wheel { pos, delta, .. } => self.on_wheel(pos, delta, extents),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, now_ms: f64, hits: &[BubbleHit]) {
        if (pos.y - SLIDER_Y).abs() <= SLIDER_GRAB {
            self.dragging_slider = true;
            self.drag_start_x = pos.x;
            self.drag_start_offset = self.slider_target;
        }

        // Clicking inside a bubble selects it and starts the growth timer.
        for hit in hits {
            if hit.contains(pos) {
                self.clicked = Some(hit.noc.clone());
                self.click_started_ms = now_ms;
                return;
            }
        }

        if chart_rect().contains(pos) {
            self.panning = true;
        }

        // A press outside the selected bubble's radius clears the selection.
        if let Some(clicked) = self.clicked.clone() {
            let still_inside = hits
                .iter()
                .find(|h| h.noc == clicked)
                .is_some_and(|h| h.contains(pos));
            if !still_inside {
                self.clicked = None;
            }
        }
    }

    fn on_pointer_moved(&mut self, pos: Pos2, now_ms: f64, hits: &[BubbleHit]) {
        if self.clicked.is_some() {
            return;
        }
        let over = hits
            .iter()
            .find(|h| h.contains(pos))
            .map(|h| h.noc.clone());
        if over != self.hovered && over.is_some() {
            self.hover_started_ms = now_ms;
        }
        self.hovered = over;
    }

    fn on_pointer_dragged(&mut self, pos: Pos2, delta: Vec2, extents: DataExtents) {
        if self.dragging_slider {
            self.slider_target = self.drag_start_offset - (pos.x - self.drag_start_x);
        }
        if self.panning {
            // Inverse-proportional to zoom and the data ranges so panning
            // feels the same at every zoom level.
            self.pan_target.x -= delta.x * extents.max_x / CHART_W / self.zoom;
            self.pan_target.y += delta.y * extents.max_y / CHART_H / self.zoom;
        }
    }

    fn on_pointer_up(&mut self, now_ms: f64) {
        if self.dragging_slider {
            self.dragging_slider = false;
            self.snap_slider(now_ms);
        }
        self.panning = false;
    }

    /// Classic zoom-to-cursor: the data point under the pointer before the
    /// zoom change stays under the pointer after it.
    fn on_wheel(&mut self, pos: Pos2, delta: f32, extents: DataExtents) {
        let zoom_change = 1.0 - delta * 0.001;

        let data_x_under = (pos.x - CHART_LEFT) / CHART_W * extents.max_x / self.zoom + self.pan.x;
        let data_y_under =
            (CHART_BOTTOM - pos.y) / CHART_H * extents.max_y / self.zoom + self.pan.y;

        self.zoom_target = (self.zoom_target * zoom_change).clamp(MIN_ZOOM, MAX_ZOOM);

        let new_x_under =
            (pos.x - CHART_LEFT) / CHART_W * extents.max_x / self.zoom_target + self.pan_target.x;
        let new_y_under =
            (CHART_BOTTOM - pos.y) / CHART_H * extents.max_y / self.zoom_target + self.pan_target.y;

        self.pan_target.x += data_x_under - new_x_under;
        self.pan_target.y += data_y_under - new_y_under;
    }

    /// Releasing the slider snaps to the nearest discrete tick, updates the
    /// current edition and triggers a full view reset.
    fn snap_slider(&mut self, now_ms: f64) {
        if self.year_seasons.is_empty() {
            return;
        }
        let exact = (self.slider_target + SLIDER_WIDTH / 2.0) / TICK_SPACING;
        let index = (exact.round().max(0.0) as usize).min(self.year_seasons.len() - 1);
        self.current_index = index;
        self.slider_target = index as f32 * TICK_SPACING - SLIDER_WIDTH / 2.0;
        tracing::debug!(index, "slider snapped");
        self.reset_view(now_ms);
    }

    /// Select a new X-axis variable; the fixed Y variable is ignored.
    /// Changing the axis resets the view.
    pub fn select_x_axis(&mut self, var: AxisVar, now_ms: f64) {
        if var == self.selected_y || var == self.selected_x {
            return;
        }
        self.selected_x = var;
        tracing::debug!(axis = %var, "x axis changed");
        self.reset_view(now_ms);
    }

    /// Clear the selection, retarget zoom/pan to the home view and restart
    /// every country's pop-in with a random stagger so bubbles reappear in
    /// waves rather than all at once.
    pub fn reset_view(&mut self, now_ms: f64) {
        self.clicked = None;
        self.hovered = None;
        self.zoom_target = RESET_ZOOM_TARGET;
        self.pan_target = Vec2::ZERO;
        let mut rng = rand::thread_rng();
        for anim in self.pop.values_mut() {
            anim.done = false;
            anim.start_ms = now_ms + rng.gen_range(0.0..POP_STAGGER_MS);
        }
    }

    /// Retarget pan so the given data point glides to the chart center
    /// (used after selecting a bubble).
    pub fn center_on(&mut self, data_x: f32, data_y: f32, extents: DataExtents) {
        let margin_x = extents.max_x * CHART_MARGIN_RATIO;
        let margin_y = extents.max_y * CHART_MARGIN_RATIO + CHART_MARGIN_Y_PAD;
        let center_x = (CHART_LEFT + CHART_RIGHT) / 2.0;
        let center_y = (CHART_TOP + CHART_BOTTOM) / 2.0;
        let target_data_x = remap(
            center_x,
            CHART_LEFT..=CHART_RIGHT,
            -margin_x..=extents.max_x + margin_x,
        ) / self.zoom
            + self.pan.x;
        let target_data_y = remap(
            center_y,
            CHART_BOTTOM..=CHART_TOP,
            -margin_y..=extents.max_y + margin_y,
        ) / self.zoom
            + self.pan.y;
        self.pan_target.x = data_x - (target_data_x - self.pan.x);
        self.pan_target.y = data_y - (target_data_y - self.pan.y);
    }

    /// Advance all eased values one frame toward their targets and settle
    /// finished pop animations. This is the sole integration of time into
    /// the view state.
    pub fn advance(&mut self, now_ms: f64) {
        self.zoom += (self.zoom_target - self.zoom) * EASE;
        self.pan += (self.pan_target - self.pan) * EASE;
        self.slider_offset += (self.slider_target - self.slider_offset) * EASE;
        for anim in self.pop.values_mut() {
            if !anim.done && now_ms - anim.start_ms >= POP_DURATION_MS {
                anim.done = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn timeline() -> Vec<YearSeason> {
        (0..40)
            .map(|i| YearSeason::new(1900 + 2 * i, crate::Season::Summer))
            .collect()
    }

    fn state() -> ViewState {
        ViewState::new(timeline(), ["USA".to_string(), "GER".to_string()])
    }

    fn hit(noc: &str, x: f32, y: f32, r: f32) -> BubbleHit {
        BubbleHit {
            noc: noc.to_string(),
            center: pos2(x, y),
            radius: r,
        }
    }

    #[test]
    fn initial_slider_index_is_clamped() {
        let v = state();
        assert_eq!(v.current_index(), 27);
        let short = ViewState::new(timeline()[..5].to_vec(), std::iter::empty());
        assert_eq!(short.current_index(), 4);
        let empty = ViewState::new(Vec::new(), std::iter::empty());
        assert_eq!(empty.current_year_season(), None);
    }

    #[test]
    fn click_inside_bubble_selects_and_outside_clears() {
        let mut v = state();
        let hits = vec![hit("USA", 300.0, 300.0, 30.0)];
        v.handle_event(
            &InputEvent::PointerDown {
                pos: pos2(310.0, 300.0),
                time_ms: 1000.0,
            },
            &hits,
            DataExtents::default(),
        );
        assert_eq!(v.clicked.as_deref(), Some("USA"));
        assert_eq!(v.click_started_ms, 1000.0);

        v.handle_event(
            &InputEvent::PointerDown {
                pos: pos2(600.0, 300.0),
                time_ms: 1100.0,
            },
            &hits,
            DataExtents::default(),
        );
        assert_eq!(v.clicked, None);
    }

    #[test]
    fn hover_is_suppressed_while_selected() {
        let mut v = state();
        let hits = vec![hit("USA", 300.0, 300.0, 30.0)];
        v.clicked = Some("GER".to_string());
        v.handle_event(
            &InputEvent::PointerMoved {
                pos: pos2(300.0, 300.0),
                time_ms: 50.0,
            },
            &hits,
            DataExtents::default(),
        );
        assert_eq!(v.hovered, None);

        v.clicked = None;
        v.handle_event(
            &InputEvent::PointerMoved {
                pos: pos2(300.0, 300.0),
                time_ms: 60.0,
            },
            &hits,
            DataExtents::default(),
        );
        assert_eq!(v.hovered.as_deref(), Some("USA"));
        assert_eq!(v.hover_started_ms, 60.0);
    }

    #[test]
    fn slider_release_snaps_to_nearest_tick() {
        let mut v = state();
        let extents = DataExtents::default();
        v.handle_event(
            &InputEvent::PointerDown {
                pos: pos2(640.0, SLIDER_Y),
                time_ms: 0.0,
            },
            &[],
            extents,
        );
        assert!(v.is_dragging_slider());
        // Drag left by ~2.4 ticks worth of pixels; snapping rounds to 2.
        v.handle_event(
            &InputEvent::PointerDragged {
                pos: pos2(640.0 - 2.4 * TICK_SPACING, SLIDER_Y),
                delta: Vec2::ZERO,
                time_ms: 10.0,
            },
            &[],
            extents,
        );
        v.handle_event(
            &InputEvent::PointerUp {
                pos: pos2(640.0 - 2.4 * TICK_SPACING, SLIDER_Y),
                time_ms: 20.0,
            },
            &[],
            extents,
        );
        assert!(!v.is_dragging_slider());
        assert_eq!(v.current_index(), 29);
        assert_eq!(
            v.slider_target,
            29.0 * TICK_SPACING - SLIDER_WIDTH / 2.0
        );
        // The snap also resets the view.
        assert_eq!(v.zoom_target, 0.9);
        assert_eq!(v.pan_target, Vec2::ZERO);
    }

    #[test]
    fn zoom_to_cursor_keeps_data_point_under_pointer() {
        let mut v = state();
        // Settle current values onto the targets first.
        v.zoom = 1.5;
        v.zoom_target = 1.5;
        v.pan = Vec2::new(3.0, 7.0);
        v.pan_target = v.pan;
        let extents = DataExtents {
            max_x: 120.0,
            max_y: 40.0,
        };
        let cursor = pos2(500.0, 300.0);

        let data_under = |zoom: f32, pan: Vec2| {
            (
                (cursor.x - CHART_LEFT) / CHART_W * extents.max_x / zoom + pan.x,
                (CHART_BOTTOM - cursor.y) / CHART_H * extents.max_y / zoom + pan.y,
            )
        };
        let before = data_under(v.zoom, v.pan);

        v.handle_event(
            &InputEvent::Wheel {
                pos: cursor,
                delta: -120.0,
                time_ms: 0.0,
            },
            &[],
            extents,
        );
        let after = data_under(v.zoom_target, v.pan_target);
        assert!((before.0 - after.0).abs() < 1e-3);
        assert!((before.1 - after.1).abs() < 1e-3);
        assert!(v.zoom_target > 1.5, "scroll-up should zoom in");
    }

    #[test]
    fn wheel_zoom_is_clamped() {
        let mut v = state();
        let extents = DataExtents {
            max_x: 1.0,
            max_y: 1.0,
        };
        for _ in 0..200 {
            v.handle_event(
                &InputEvent::Wheel {
                    pos: pos2(640.0, 300.0),
                    delta: -500.0,
                    time_ms: 0.0,
                },
                &[],
                extents,
            );
        }
        assert!(v.zoom_target <= MAX_ZOOM);
        for _ in 0..200 {
            v.handle_event(
                &InputEvent::Wheel {
                    pos: pos2(640.0, 300.0),
                    delta: 500.0,
                    time_ms: 0.0,
                },
                &[],
                extents,
            );
        }
        assert!(v.zoom_target >= MIN_ZOOM);
    }

    #[test]
    fn easing_converges_toward_targets() {
        let mut v = state();
        v.zoom = 5.0;
        v.zoom_target = 0.9;
        for _ in 0..200 {
            v.advance(0.0);
        }
        assert!((v.zoom - 0.9).abs() < 1e-3);
    }

    #[test]
    fn reset_restaggers_pop_animations() {
        let mut v = state();
        v.advance(10_000.0); // everything popped long ago
        assert!(v.pop_anim("USA").unwrap().done);
        v.reset_view(10_000.0);
        let anim = v.pop_anim("USA").unwrap();
        assert!(!anim.done);
        assert!(anim.start_ms >= 10_000.0 && anim.start_ms < 10_000.0 + POP_STAGGER_MS);
    }

    #[test]
    fn axis_change_ignores_fixed_y_variable() {
        let mut v = state();
        v.pan_target = Vec2::new(5.0, 5.0);
        v.select_x_axis(AxisVar::TotalMedals, 0.0);
        assert_eq!(v.selected_x, AxisVar::AthleteCount);
        assert_eq!(v.pan_target, Vec2::new(5.0, 5.0));

        v.select_x_axis(AxisVar::Population, 0.0);
        assert_eq!(v.selected_x, AxisVar::Population);
        assert_eq!(v.pan_target, Vec2::ZERO);
    }
}
