use eframe::egui::epaint::TextShape;
use eframe::egui::{self, Color32, FontId, ScrollArea, Stroke, Ui, Vec2};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, MarkerShape, Plot, PlotPoint, PlotPoints, PlotTransform, Points};

use rusty_eda::color::panel_color;
use rusty_eda::data::ColumnKind;
use rusty_eda::render::boxplot::format_axis_value;
use rusty_eda::render::{BoxplotPanel, NO_OUTLIERS_NOTICE};

use crate::state::AppState;

const TITLE_HEIGHT: f32 = 22.0;
const TICK_LABEL_SPACE: f32 = 56.0;
const AXIS_LABEL_HEIGHT: f32 = 20.0;
const MIN_PLOT_HEIGHT: f32 = 80.0;
const TICK_TARGET: usize = 6;

// ---------------------------------------------------------------------------
// Boxplot grid (central panel)
// ---------------------------------------------------------------------------

/// Render the figure grid, or the notice when nothing was flagged.
pub fn figure_grid(ui: &mut Ui, state: &AppState) {
    let Some(figure) = state.canvas.figure() else {
        let message = state.canvas.last_notice().unwrap_or(NO_OUTLIERS_NOTICE);
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    };

    let layout = figure.layout;
    let spacing = ui.spacing().item_spacing;
    let available = ui.available_size();
    let cell = egui::vec2(
        (available.x - spacing.x * (layout.cols - 1) as f32) / layout.cols as f32,
        ((available.y - spacing.y * (layout.rows - 1) as f32) / layout.rows as f32)
            .max(MIN_PLOT_HEIGHT + TITLE_HEIGHT + TICK_LABEL_SPACE + AXIS_LABEL_HEIGHT),
    );

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for row in 0..layout.rows {
                ui.horizontal(|ui: &mut Ui| {
                    for col in 0..layout.cols {
                        let slot = row * layout.cols + col;
                        match figure.slot(slot) {
                            Some(panel) => {
                                let color = panel_color(slot, layout.cells());
                                boxplot_panel(ui, slot, panel, color, cell);
                            }
                            // Unused or skipped cell: left blank.
                            None => {
                                ui.allocate_space(cell);
                            }
                        }
                    }
                });
            }
        });
}

/// One horizontal boxplot with its title, rotated ticks and axis label.
fn boxplot_panel(ui: &mut Ui, slot: usize, panel: &BoxplotPanel, color: Color32, size: Vec2) {
    ui.allocate_ui(size, |ui: &mut Ui| {
        ui.set_width(size.x);
        ui.vertical(|ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.strong(&panel.title);
            });

            let s = &panel.stats;
            let spread = BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker);
            let elem = BoxElem::new(0.0, spread)
                .name(&panel.column)
                .box_width(0.5)
                .whisker_width(0.25)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
            let outliers: PlotPoints = s.outliers.iter().map(|&v| [v, 0.0]).collect();
            let (lo, hi) = s.extent();
            let pad = ((hi - lo) * 0.05).max(f64::EPSILON);

            let plot_height =
                (size.y - TITLE_HEIGHT - TICK_LABEL_SPACE - AXIS_LABEL_HEIGHT).max(MIN_PLOT_HEIGHT);
            let response = Plot::new(("boxplot", slot))
                .width(size.x)
                .height(plot_height)
                .show_axes([false, true])
                .y_axis_label(panel.y_label.clone())
                .y_axis_formatter(|_, _| String::new())
                .show_grid([true, false])
                .include_x(lo - pad)
                .include_x(hi + pad)
                .include_y(-0.6)
                .include_y(0.6)
                .allow_boxed_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_zoom(false)
                .show(ui, |plot_ui| {
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).horizontal().name(&panel.column));
                    plot_ui.points(
                        Points::new(outliers)
                            .shape(MarkerShape::Diamond)
                            .radius(3.0)
                            .color(color)
                            .name("outliers"),
                    );
                });

            paint_rotated_ticks(ui, &response.transform, panel.kind, panel.tick_rotation_deg);
            ui.add_space(TICK_LABEL_SPACE);
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(&panel.x_label);
            });
        });
    });
}

/// Tick labels under the plot frame, rotated clockwise by `rotation_deg`.
fn paint_rotated_ticks(ui: &Ui, transform: &PlotTransform, kind: ColumnKind, rotation_deg: f32) {
    let bounds = transform.bounds();
    let frame = *transform.frame();
    let painter = ui.painter();
    let color = ui.visuals().text_color();
    let font = FontId::proportional(11.0);

    for tick in nice_ticks(bounds.min()[0], bounds.max()[0], TICK_TARGET) {
        let x = transform
            .position_from_point(&PlotPoint::new(tick, bounds.min()[1]))
            .x;
        let galley = painter.layout_no_wrap(format_axis_value(kind, tick), font.clone(), color);
        let pos = egui::pos2(x, frame.bottom() + 4.0);
        painter.add(TextShape::new(pos, galley, color).with_angle(rotation_deg.to_radians()));
    }
}

/// Round-numbered ticks (1, 2, 5 × 10ⁿ steps) covering `[lo, hi]`.
fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() || hi <= lo || target == 0 {
        return Vec::new();
    }
    let raw = (hi - lo) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil() * step;
    (0..)
        .map(|i| first + i as f64 * step)
        .take_while(|&v| v <= hi + step * 1e-9)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_use_round_steps() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(-1.5, 8.5, 2), vec![0.0, 5.0]);
    }

    #[test]
    fn degenerate_ranges_have_no_ticks() {
        assert!(nice_ticks(1.0, 1.0, 5).is_empty());
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
        assert!(nice_ticks(0.0, 1.0, 0).is_empty());
    }
}
