use eframe::egui::{self, ScrollArea, TextEdit, Ui};

use crate::state::AppState;
use crate::ui::report::table_grid;

// ---------------------------------------------------------------------------
// Edit view – current data next to the editable grid
// ---------------------------------------------------------------------------

pub fn edit_data(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        return;
    };
    let names: Vec<String> = session
        .table()
        .schema()
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    ui.heading("Edit data");
    let mut save = false;

    ui.columns(2, |columns| {
        let left = &mut columns[0];
        left.strong("Current data:");
        if let Some(session) = &state.session {
            left.push_id("current", |ui: &mut Ui| {
                table_grid(ui, session.table(), 420.0);
            });
        }

        let right = &mut columns[1];
        right.strong("Change the data:");
        let Some(buffer) = state.edit_buffer.as_mut() else {
            return;
        };

        let mut remove = None;
        ScrollArea::both()
            .id_salt("edit_grid")
            .max_height(420.0)
            .show(right, |ui: &mut Ui| {
                egui::Grid::new("edit_grid")
                    .striped(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.label("");
                        for name in &names {
                            ui.strong(name);
                        }
                        ui.end_row();

                        for i in 0..buffer.rows.len() {
                            if ui.small_button("✖").on_hover_text("Delete row").clicked() {
                                remove = Some(i);
                            }
                            let editable: Vec<bool> =
                                (0..names.len()).map(|c| buffer.is_editable(i, c)).collect();
                            for (cell, enabled) in buffer.rows[i].cells.iter_mut().zip(editable) {
                                ui.add_enabled(enabled, TextEdit::singleline(cell).desired_width(90.0));
                            }
                            ui.end_row();
                        }
                    });
            });
        if let Some(i) = remove {
            buffer.remove_row(i);
        }

        right.horizontal(|ui: &mut Ui| {
            if ui.button("Add row").clicked() {
                buffer.add_row();
            }
            if ui.button("Save changes").clicked() {
                save = true;
            }
        });
    });

    if save {
        state.save_edits();
    }
}
