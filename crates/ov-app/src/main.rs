//! Olympic Games stats visualiser: windowing shell and HUD
//!
//! The shell owns the dataset, the view state and the layout engine, wires
//! raw pointer input into view events once per frame and paints the chart,
//! slider, axis picker and reset button.

use std::path::{Path, PathBuf};

use anyhow::Result;
use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Stroke};
use tracing::{error, info};

use ov_core::view::geometry::{
    chart_rect, CHART_BOTTOM, CHART_LEFT, CHART_RIGHT, CHART_TOP, SKETCH_H, SKETCH_W, SLIDER_X,
    SLIDER_WIDTH, SLIDER_Y, TICK_SPACING,
};
use ov_core::view::{BubbleHit, DataExtents};
use ov_core::{AxisVar, InputEvent, ViewState};
use ov_data::{CsvTableSource, OlympicsDataset, Table};
use ov_views::{colors, ChartLayoutEngine, LayoutResult};

const RESET_BTN_W: f32 = 150.0;
const RESET_BTN_H: f32 = 30.0;
const RESET_BTN_Y: f32 = 80.0;
const DROPDOWN_W: f32 = 160.0;
/// Selected bubbles below this radius draw the code label instead of the
/// full detail card.
const DETAIL_MIN_RADIUS: f32 = 40.0;

const TEXT_COLOUR: Color32 = Color32::BLACK;

struct OlympicsApp {
    dataset: OlympicsDataset,
    view: ViewState,
    engine: ChartLayoutEngine,
    layout: LayoutResult,
    hits: Vec<BubbleHit>,
}

impl OlympicsApp {
    fn new(dataset: OlympicsDataset) -> Self {
        let view = ViewState::new(
            dataset.year_seasons.clone(),
            dataset.countries.keys().cloned().collect::<Vec<_>>(),
        );
        Self {
            dataset,
            view,
            engine: ChartLayoutEngine::new(),
            layout: LayoutResult::default(),
            hits: Vec::new(),
        }
    }

    /// Translate this frame's pointer state into discrete view events. The
    /// background response loses against widgets on top of it, so presses
    /// on the reset button or the axis picker never reach the chart.
    fn collect_input(
        ui: &egui::Ui,
        response: &egui::Response,
        now_ms: f64,
    ) -> Vec<InputEvent> {
        let (pos, delta, scroll) = ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.delta(),
                i.scroll_delta.y,
            )
        });
        let Some(pos) = pos else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if response.drag_started() {
            events.push(InputEvent::PointerDown { pos, time_ms: now_ms });
        }
        if response.dragged() {
            if delta != egui::Vec2::ZERO {
                events.push(InputEvent::PointerDragged {
                    pos,
                    delta,
                    time_ms: now_ms,
                });
            }
        } else if response.hovered() && delta != egui::Vec2::ZERO {
            events.push(InputEvent::PointerMoved { pos, time_ms: now_ms });
        }
        if response.drag_released() {
            events.push(InputEvent::PointerUp { pos, time_ms: now_ms });
        }
        if response.hovered() && scroll != 0.0 {
            // flip to the convention where positive wheel delta zooms out
            events.push(InputEvent::Wheel {
                pos,
                delta: -scroll,
                time_ms: now_ms,
            });
        }
        events
    }

    /// After a release, glide the selected country's data point to the
    /// chart center.
    fn center_selection(&mut self, extents: DataExtents) {
        let Some(noc) = self.view.clicked.clone() else {
            return;
        };
        let Some(ys) = self.view.current_year_season() else {
            return;
        };
        let Some(country) = self.dataset.countries.get(&noc) else {
            return;
        };
        if !country.participated_in(ys) {
            return;
        }
        let data_x = country.value_for(self.view.selected_x, ys) as f32;
        let data_y = country.value_for(self.view.selected_y, ys) as f32;
        self.view.center_on(data_x, data_y, extents);
    }

    fn draw_axes(&self, painter: &egui::Painter) {
        let stroke = Stroke::new(1.0, colors::LABEL_AND_LINE);
        // Y axis with an arrowhead at the top
        painter.line_segment(
            [pos2(CHART_LEFT, CHART_TOP), pos2(CHART_LEFT, CHART_BOTTOM)],
            stroke,
        );
        painter.line_segment(
            [pos2(CHART_LEFT, CHART_TOP), pos2(CHART_LEFT - 3.0, CHART_TOP + 5.0)],
            stroke,
        );
        painter.line_segment(
            [pos2(CHART_LEFT, CHART_TOP), pos2(CHART_LEFT + 3.0, CHART_TOP + 5.0)],
            stroke,
        );
        // X axis with an arrowhead at the right
        painter.line_segment(
            [pos2(CHART_LEFT, CHART_BOTTOM), pos2(CHART_RIGHT, CHART_BOTTOM)],
            stroke,
        );
        painter.line_segment(
            [
                pos2(CHART_RIGHT, CHART_BOTTOM),
                pos2(CHART_RIGHT - 5.0, CHART_BOTTOM - 3.0),
            ],
            stroke,
        );
        painter.line_segment(
            [
                pos2(CHART_RIGHT, CHART_BOTTOM),
                pos2(CHART_RIGHT - 5.0, CHART_BOTTOM + 3.0),
            ],
            stroke,
        );

        // Fixed Y-axis variable label, rotated along the axis
        let galley = painter.layout_no_wrap(
            "TOTAL MEDALS".to_owned(),
            FontId::proportional(16.0),
            TEXT_COLOUR,
        );
        let pos = pos2(
            CHART_LEFT - 15.0 - galley.size().y / 2.0,
            (CHART_TOP + CHART_BOTTOM) / 2.0 + galley.size().x / 2.0,
        );
        painter.add(egui::epaint::TextShape {
            pos,
            galley,
            underline: Stroke::NONE,
            override_text_color: None,
            angle: -std::f32::consts::FRAC_PI_2,
        });
    }

    fn draw_slider(&self, painter: &egui::Painter) {
        let anchor_x = SLIDER_X + SLIDER_WIDTH / 2.0;
        let triangle_y = SLIDER_Y + 8.0;
        painter.add(egui::Shape::convex_polygon(
            vec![
                pos2(anchor_x - 6.0, triangle_y + 6.0),
                pos2(anchor_x + 6.0, triangle_y + 6.0),
                pos2(anchor_x, triangle_y),
            ],
            colors::ACCENT,
            Stroke::NONE,
        ));

        let aligned = self.view.aligned_slider_index();
        for (i, ys) in self.view.year_seasons().iter().enumerate() {
            let x = self.view.slider_tick_x(i);
            if x < SLIDER_X - TICK_SPACING || x > SLIDER_X + SLIDER_WIDTH + TICK_SPACING {
                continue;
            }
            painter.line_segment(
                [pos2(x, SLIDER_Y - 5.0), pos2(x, SLIDER_Y + 5.0)],
                Stroke::new(1.0, colors::LABEL_AND_LINE),
            );
            let size = if i == aligned { 15.0 } else { 14.0 };
            painter.text(
                pos2(x, SLIDER_Y - 8.0),
                Align2::CENTER_BOTTOM,
                ys.label(),
                FontId::proportional(size),
                TEXT_COLOUR,
            );
        }
    }

    fn draw_bubbles(&self, painter: &egui::Painter) {
        let Some(ys) = self.view.current_year_season() else {
            return;
        };
        for bubble in &self.layout.bubbles {
            painter.circle_filled(bubble.center, bubble.radius, bubble.color);

            let selected = self.view.clicked.as_deref() == Some(bubble.noc.as_str());
            if selected && bubble.radius >= DETAIL_MIN_RADIUS {
                self.draw_detail_card(painter, bubble.center, &bubble.noc, bubble.pop_t, ys);
            } else {
                painter.text(
                    bubble.center,
                    Align2::CENTER_CENTER,
                    &bubble.noc,
                    FontId::proportional(12.0),
                    TEXT_COLOUR,
                );
            }
        }
    }

    /// Name, region, medal total and the X-variable stat inside a selected
    /// bubble.
    fn draw_detail_card(
        &self,
        painter: &egui::Painter,
        center: Pos2,
        noc: &str,
        pop_t: f32,
        ys: ov_core::YearSeason,
    ) {
        let Some(country) = self.dataset.countries.get(noc) else {
            return;
        };
        let medals = country.value_for(AxisVar::TotalMedals, ys) as i64;
        let extra = match self.view.selected_x {
            AxisVar::AthleteCount => format!(
                "Total Athlete: {}",
                country.value_for(AxisVar::AthleteCount, ys) as i64
            ),
            AxisVar::Population => {
                let pop = country.value_for(AxisVar::Population, ys);
                if pop == 0.0 {
                    "Historic state / No data".to_owned()
                } else {
                    format!("Population: {}", group_thousands(pop as i64))
                }
            }
            AxisVar::LandArea => {
                let land = country.value_for(AxisVar::LandArea, ys);
                if land == 0.0 {
                    "Historic state / No data".to_owned()
                } else {
                    format!("Area: {} km\u{b2}", group_thousands(land as i64))
                }
            }
            AxisVar::TotalMedals => String::new(),
        };

        painter.text(
            pos2(center.x, center.y - 42.0),
            Align2::CENTER_CENTER,
            &country.country_name,
            FontId::proportional(24.0 * pop_t),
            TEXT_COLOUR,
        );
        painter.text(
            pos2(center.x, center.y - 18.0),
            Align2::CENTER_CENTER,
            &country.region,
            FontId::proportional(14.0),
            TEXT_COLOUR,
        );
        painter.text(
            pos2(center.x, center.y + 8.0),
            Align2::CENTER_CENTER,
            medals.to_string(),
            FontId::proportional(32.0),
            TEXT_COLOUR,
        );
        painter.text(
            pos2(center.x, center.y + 34.0),
            Align2::CENTER_CENTER,
            extra,
            FontId::proportional(16.0),
            TEXT_COLOUR,
        );
    }

    fn draw_hud(&mut self, ui: &mut egui::Ui, now_ms: f64) {
        let reset_rect = Rect::from_min_size(
            pos2(SKETCH_W - RESET_BTN_W - 20.0, RESET_BTN_Y),
            vec2(RESET_BTN_W, RESET_BTN_H),
        );
        let reset = ui.put(
            reset_rect,
            egui::Button::new(egui::RichText::new("RESET VIEW").color(Color32::WHITE))
                .fill(Color32::BLACK),
        );
        if reset.clicked() {
            self.view.reset_view(now_ms);
        }

        let picker_rect = Rect::from_min_size(
            pos2((CHART_LEFT + CHART_RIGHT) / 2.0 - DROPDOWN_W / 2.0, CHART_BOTTOM + 10.0),
            vec2(DROPDOWN_W, 20.0),
        );
        let mut picker_ui = ui.child_ui(picker_rect, egui::Layout::top_down(egui::Align::Min));
        let mut selected = self.view.selected_x;
        egui::ComboBox::from_id_source("x-axis-picker")
            .width(DROPDOWN_W)
            .selected_text(selected.label().to_uppercase())
            .show_ui(&mut picker_ui, |ui| {
                for var in AxisVar::X_OPTIONS {
                    ui.selectable_value(&mut selected, var, var.label().to_uppercase());
                }
            });
        if selected != self.view.selected_x {
            self.view.select_x_axis(selected, now_ms);
        }

        ui.painter().text(
            pos2(CHART_RIGHT, CHART_TOP - 32.0),
            Align2::RIGHT_TOP,
            "OLYMPIC GAMES STATS VISUALISER",
            FontId::proportional(30.0),
            TEXT_COLOUR,
        );
    }
}

impl eframe::App for OlympicsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_ms = ctx.input(|i| i.time) * 1000.0;

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(colors::SCREEN_BG))
            .show(ctx, |ui| {
                let response = ui.interact(
                    ui.max_rect(),
                    ui.id().with("chart-background"),
                    egui::Sense::click_and_drag(),
                );
                let extents = self.engine.extents(&self.dataset, &self.view);
                for event in Self::collect_input(ui, &response, now_ms) {
                    self.view.handle_event(&event, &self.hits, extents);
                    if matches!(event, InputEvent::PointerUp { .. }) {
                        self.center_selection(extents);
                    }
                }

                self.view.advance(now_ms);
                self.layout = self.engine.compute(&self.dataset, &self.view, now_ms);
                self.hits = self.layout.hit_targets();

                let painter = ui.painter().clone();
                self.draw_slider(&painter);
                self.draw_axes(&painter);
                self.draw_bubbles(&painter.with_clip_rect(chart_rect().shrink(1.0)));
                self.draw_hud(ui, now_ms);
            });

        // the easing and entrance animations run every frame
        ctx.request_repaint();
    }
}

/// Load one CSV table, degrading to an empty table (and an error log) so a
/// missing or broken file never prevents startup.
fn load_table(dir: &Path, file: &str) -> Table {
    let source = CsvTableSource::new(dir.join(file));
    match source.load() {
        Ok(table) => table,
        Err(err) => {
            error!(file, %err, "failed to load table; continuing without it");
            Table::default()
        }
    }
}

fn load_dataset(dir: &Path) -> OlympicsDataset {
    let aliases = load_table(dir, "country_code_alias.csv");
    let stats = load_table(dir, "country_stats_2023.csv");
    let population = load_table(dir, "worldpop.csv");
    let participation = load_table(dir, "olympic.csv");
    OlympicsDataset::from_tables(&aliases, &stats, &population, &participation)
}

/// Insert thousands separators into a non-negative integer.
fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sources"));
    let dataset = load_dataset(&dir);
    info!(
        countries = dataset.countries.len(),
        editions = dataset.year_seasons.len(),
        "dataset loaded"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([SKETCH_W, SKETCH_H])
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        "Olympic Games Stats Visualiser",
        options,
        Box::new(move |_cc| Box::new(OlympicsApp::new(dataset))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run app: {e}"))?;

    Ok(())
}
