use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use rusty_eda::data::ColumnKind;
use rusty_eda::render::boxplot::format_axis_value;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// File name, shape and the outlier headline.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(state.file_name());
        ui.separator();

        let (rows, cols) = state.dataset.shape();
        ui.label(format!("{rows} rows x {cols} columns"));
        ui.separator();

        ui.label(format!("IQR multiplier {}", state.report.multiplier));
        ui.separator();

        let flagged = state.report.flagged_columns().len();
        let headline = RichText::new(format!("{flagged} column(s) with outliers"));
        if flagged > 0 {
            ui.label(headline.color(Color32::RED));
        } else {
            ui.label(headline);
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – classification and bounds
// ---------------------------------------------------------------------------

/// Read-only summary of the column split and per-column fences.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Columns");
    ui.separator();

    column_list(ui, "Numerical", &state.classification.numerical);
    ui.add_space(4.0);
    column_list(ui, "Categorical", &state.classification.categorical);

    ui.separator();
    ui.heading("Outlier bounds");

    if state.report.columns.is_empty() {
        ui.label("No numerical columns.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(TableColumn::auto().at_least(80.0))
        .columns(TableColumn::auto(), 3)
        .header(20.0, |mut header| {
            for title in ["Column", "Lower", "Upper", "Outliers"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for result in &state.report.columns {
                let kind = state
                    .dataset
                    .column(&result.column)
                    .map(|c| c.kind)
                    .unwrap_or(ColumnKind::Numeric);
                let (lower, upper) = match result.bounds {
                    Some(b) => (
                        format_axis_value(kind, b.lower),
                        format_axis_value(kind, b.upper),
                    ),
                    None => ("-".to_string(), "-".to_string()),
                };

                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&result.column);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(lower);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(upper);
                    });
                    row.col(|ui: &mut Ui| {
                        let count = RichText::new(result.rows.len().to_string());
                        if result.has_outliers() {
                            ui.label(count.color(Color32::RED));
                        } else {
                            ui.label(count);
                        }
                    });
                });
            }
        });
}

fn column_list(ui: &mut Ui, title: &str, names: &[String]) {
    ui.strong(format!("{title} ({})", names.len()));
    if names.is_empty() {
        ui.label(RichText::new("none").weak());
    }
    for name in names {
        ui.label(name);
    }
}
