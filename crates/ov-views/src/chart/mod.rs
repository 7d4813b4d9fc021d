//! Bubble chart layout engine
//!
//! One call per frame maps every participating country of the current games
//! edition to a screen bubble: data-to-screen mapping under pan/zoom, radius
//! from the Y value plus entrance/hover/click animation, one overlap
//! resolution pass, deterministic scatter for small bubbles and the tier
//! colour. Countries are processed in sorted code order, so two frames with
//! identical inputs produce identical layouts.

pub mod colors;

use egui::{lerp, pos2, remap, vec2, Color32, Pos2, Vec2};

use ov_core::view::geometry::{
    CHART_BOTTOM, CHART_LEFT, CHART_MARGIN_RATIO, CHART_MARGIN_Y_PAD, CHART_RIGHT, CHART_TOP,
};
use ov_core::view::{BubbleHit, DataExtents, GROW_DURATION_MS, POP_DURATION_MS};
use ov_core::{AxisVar, ViewState, YearSeason};
use ov_data::OlympicsDataset;

/// Bubble radius range mapped from the Y-axis value.
pub const MIN_RADIUS: f32 = 15.0;
pub const MAX_RADIUS: f32 = 70.0;
/// Bubbles at or above this radius scale with zoom and always repel.
pub const BIG_RADIUS: f32 = 20.0;
/// Below this zoom level, pairs of small bubbles are allowed to overlap.
pub const COLLIDE_ZOOM: f32 = 2.0;
/// Radius a click-selected bubble grows toward.
pub const SELECTED_RADIUS: f32 = 100.0;
/// Extra radius while hovered.
pub const HOVER_GROWTH: f32 = 15.0;
/// Scatter spread applied to small bubbles, in pixels.
pub const SCATTER_STRENGTH: f32 = 200.0;
/// Bubbles under this pop-in progress are not emitted at all.
pub const MIN_POP_VISIBLE: f32 = 0.1;

/// One positioned, sized and coloured country bubble.
#[derive(Debug, Clone)]
pub struct Bubble {
    pub noc: String,
    pub center: Pos2,
    pub radius: f32,
    pub color: Color32,
    /// Entrance animation progress in `[0, 1]`; the shell scales the
    /// selected bubble's name label by it.
    pub pop_t: f32,
}

/// The chart layout for one frame.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub bubbles: Vec<Bubble>,
}

impl LayoutResult {
    /// Screen-space hit targets for next frame's picking.
    pub fn hit_targets(&self) -> Vec<BubbleHit> {
        self.bubbles
            .iter()
            .map(|b| BubbleHit {
                noc: b.noc.clone(),
                center: b.center,
                radius: b.radius,
            })
            .collect()
    }
}

/// Stateless layout engine; see the module docs for the pass order.
#[derive(Debug, Default)]
pub struct ChartLayoutEngine;

impl ChartLayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Axis maxima over the countries participating in the current edition.
    pub fn extents(&self, dataset: &OlympicsDataset, view: &ViewState) -> DataExtents {
        let Some(ys) = view.current_year_season() else {
            return DataExtents::default();
        };
        DataExtents {
            max_x: max_value_for(dataset, view.selected_x, ys) as f32,
            max_y: max_value_for(dataset, view.selected_y, ys) as f32,
        }
    }

    /// Lay out all bubbles for the current frame.
    pub fn compute(
        &self,
        dataset: &OlympicsDataset,
        view: &ViewState,
        now_ms: f64,
    ) -> LayoutResult {
        let Some(ys) = view.current_year_season() else {
            return LayoutResult::default();
        };
        let extents = self.extents(dataset, view);
        // A degenerate axis range cannot be mapped to screen space.
        if extents.max_x <= 0.0 || extents.max_y <= 0.0 {
            tracing::debug!(%ys, "no positive axis extents; empty layout");
            return LayoutResult::default();
        }

        let mut nocs: Vec<&str> = dataset
            .countries
            .values()
            .filter(|c| c.participated_in(ys))
            .map(|c| c.noc.as_str())
            .collect();
        nocs.sort_unstable();

        let margin_x = extents.max_x * CHART_MARGIN_RATIO;
        let margin_y = extents.max_y * CHART_MARGIN_RATIO + CHART_MARGIN_Y_PAD;

        let mut bubbles = Vec::with_capacity(nocs.len());
        let mut values_y = Vec::with_capacity(nocs.len());
        for noc in nocs {
            let country = &dataset.countries[noc];
            let data_x = country.value_for(view.selected_x, ys) as f32;
            let data_y = country.value_for(view.selected_y, ys) as f32;

            let center = pos2(
                remap(
                    (data_x - view.pan.x) * view.zoom,
                    -margin_x..=extents.max_x + margin_x,
                    CHART_LEFT..=CHART_RIGHT,
                ),
                remap(
                    (data_y - view.pan.y) * view.zoom,
                    -margin_y..=extents.max_y + margin_y,
                    CHART_BOTTOM..=CHART_TOP,
                ),
            );

            let mut base = if data_y > 0.0 {
                if extents.max_y > 1.0 {
                    remap(data_y, 1.0..=extents.max_y, MIN_RADIUS..=MAX_RADIUS)
                } else {
                    MAX_RADIUS
                }
            } else {
                MIN_RADIUS
            };
            if base >= BIG_RADIUS {
                base *= view.zoom;
            }

            let pop_t = match view.pop_anim(noc) {
                Some(anim) if !anim.done => {
                    (((now_ms - anim.start_ms) / POP_DURATION_MS) as f32).clamp(0.0, 1.0)
                }
                _ => 1.0,
            };
            if pop_t < MIN_POP_VISIBLE {
                continue;
            }
            let mut radius = base * pop_t;

            // Hover and click growth override the entrance scaling; the
            // hover one only applies while nothing is selected.
            if view.clicked.as_deref() == Some(noc) {
                let t = (((now_ms - view.click_started_ms) / GROW_DURATION_MS) as f32)
                    .clamp(0.0, 1.0);
                radius = lerp(base..=SELECTED_RADIUS, t);
            } else if view.clicked.is_none() && view.hovered.as_deref() == Some(noc) {
                let t = (((now_ms - view.hover_started_ms) / GROW_DURATION_MS) as f32)
                    .clamp(0.0, 1.0);
                radius = lerp(base..=base + HOVER_GROWTH, t);
            }

            bubbles.push(Bubble {
                noc: noc.to_string(),
                center,
                radius,
                color: Color32::TRANSPARENT,
                pop_t,
            });
            values_y.push(data_y);
        }

        resolve_overlaps(&mut bubbles, view.zoom);

        for (bubble, data_y) in bubbles.iter_mut().zip(&values_y) {
            let country = &dataset.countries[&bubble.noc];
            if bubble.radius < BIG_RADIUS {
                bubble.center += scatter_offset(&country.country_name);
            }
            let mut color = colors::tier_color(f64::from(*data_y), f64::from(extents.max_y), ys.season);
            if view
                .clicked
                .as_deref()
                .is_some_and(|clicked| clicked != bubble.noc)
            {
                color = colors::dimmed(color);
            }
            bubble.color = color;
        }

        LayoutResult { bubbles }
    }
}

/// Maximum of an axis variable over the edition's participants.
pub fn max_value_for(dataset: &OlympicsDataset, var: AxisVar, ys: YearSeason) -> f64 {
    dataset
        .countries
        .values()
        .filter(|c| c.participated_in(ys))
        .map(|c| c.value_for(var, ys))
        .fold(0.0, f64::max)
}

/// One pairwise repulsion pass. Overlapping pairs are pushed apart half the
/// overlap each; pairs of small bubbles are exempt below the collision zoom
/// so dense clusters can overlap at the overview scale. Coincident centers
/// separate along a fixed axis rather than staying stacked.
fn resolve_overlaps(bubbles: &mut [Bubble], zoom: f32) {
    for i in 0..bubbles.len() {
        for j in i + 1..bubbles.len() {
            let min_dist = bubbles[i].radius + bubbles[j].radius + 1.0;
            let d = bubbles[j].center - bubbles[i].center;
            let dist_sq = d.length_sq();
            if dist_sq >= min_dist * min_dist {
                continue;
            }
            let either_big =
                bubbles[i].radius >= BIG_RADIUS || bubbles[j].radius >= BIG_RADIUS;
            if !either_big && zoom < COLLIDE_ZOOM {
                continue;
            }
            let dist = dist_sq.sqrt();
            let (dir, overlap) = if dist <= f32::EPSILON {
                (vec2(1.0, 0.0), min_dist * 0.5)
            } else {
                (d / dist, (min_dist - dist) * 0.5)
            };
            let push = dir * overlap;
            bubbles[i].center -= push;
            bubbles[j].center += push;
        }
    }
}

/// Deterministic scatter for a country name, spread over
/// `SCATTER_STRENGTH` pixels on each axis.
fn scatter_offset(country_name: &str) -> Vec2 {
    let seed = hash_name(country_name);
    vec2(
        (noise_sample(seed, 0) - 0.5) * SCATTER_STRENGTH,
        (noise_sample(seed, 100) - 0.5) * SCATTER_STRENGTH,
    )
}

/// 32-bit shift-add string hash; stable across runs by construction.
fn hash_name(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for c in s.chars() {
        hash = (c as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    hash.unsigned_abs()
}

/// Cheap hash-based noise in `[0, 1)`, decorrelated per channel.
fn noise_sample(seed: u32, channel: u32) -> f32 {
    let mut x = seed ^ channel.wrapping_mul(0x9e37_79b9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    (x >> 8) as f32 / (1 << 24) as f32
}
