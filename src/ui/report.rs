use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Table;
use crate::state::AppState;
use crate::stats::{Description, NumericSummary};

// ---------------------------------------------------------------------------
// Data info view – preview, full dump, summary statistics, schema report
// ---------------------------------------------------------------------------

pub fn data_info(ui: &mut Ui, state: &AppState) {
    let (Some(session), Some(description)) = (&state.session, &state.description) else {
        return;
    };
    let table = session.table();

    ui.heading("Data info");
    if table.is_empty() {
        ui.label("The table has no rows.");
    }
    ui.columns(2, |columns| {
        let left = &mut columns[0];
        left.strong("Preview of the uploaded data:");
        left.push_id("preview", |ui: &mut Ui| {
            table_grid(ui, &table.head(state.settings.preview_rows), 120.0);
        });
        left.add_space(8.0);
        left.strong("Full data:");
        left.push_id("full", |ui: &mut Ui| {
            table_grid(ui, table, 360.0);
        });

        let right = &mut columns[1];
        right.strong("Descriptive statistics:");
        summary_grid(right, description);
        right.add_space(8.0);
        right.strong("Columns:");
        ScrollArea::horizontal()
            .id_salt("info_text")
            .show(right, |ui: &mut Ui| {
                ui.label(RichText::new(description.info_text()).monospace());
            });
    });
}

/// Read-only grid of a table, virtualised over rows.
pub fn table_grid(ui: &mut Ui, table: &Table, max_height: f32) {
    let names = table.schema().column_names();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(max_height)
        .columns(TableColumn::auto().at_least(50.0), names.len())
        .header(20.0, |mut header| {
            for name in &names {
                header.col(|ui: &mut Ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.len(), |mut row| {
                let i = row.index();
                for col in 0..names.len() {
                    row.col(|ui: &mut Ui| {
                        ui.label(table.cell(i, col).to_string());
                    });
                }
            });
        });
}

fn summary_grid(ui: &mut Ui, description: &Description) {
    egui::Grid::new("summary_grid")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for s in &description.summary {
                ui.strong(&s.column);
            }
            ui.end_row();

            let rows: [(&str, fn(&NumericSummary) -> f64); 8] = [
                ("count", |s| s.count as f64),
                ("mean", |s| s.mean),
                ("std", |s| s.std),
                ("min", |s| s.min),
                ("25%", |s| s.q25),
                ("50%", |s| s.q50),
                ("75%", |s| s.q75),
                ("max", |s| s.max),
            ];
            for (label, value) in rows {
                ui.strong(label);
                for s in &description.summary {
                    ui.label(format_stat(value(s)));
                }
                ui.end_row();
            }
        });
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.3}")
    }
}
