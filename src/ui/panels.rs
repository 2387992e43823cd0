use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{genre_options, selection_mask, year_options};
use crate::state::{AppState, Status, View};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the genre multiselect and the year sliders.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    site_info(ui);
    ui.heading("Filters");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };
    let table = session.table();
    let genres = genre_options(table);
    let years = year_options(table);
    let selected = selection_mask(table, &state.selection)
        .into_iter()
        .filter(|keep| *keep)
        .count();
    let gross = state.chart.as_ref().map_or(0.0, |c| c.pivot.total());

    ui.label(format!("{selected} of {} rows selected", table.len()));
    ui.label(format!("Selected gross: {gross:.0}"));
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        ui.label(format!("Years in data: {first}–{last}"));
    }
    ui.separator();

    // ---- Year range ----
    ui.strong("Years");
    let bounds = state.year_bounds();
    let mut lo = state.selection.years.lo();
    let mut hi = state.selection.years.hi();
    let lo_changed = ui
        .add(egui::Slider::new(&mut lo, bounds.lo()..=bounds.hi()).text("from"))
        .changed();
    let hi_changed = ui
        .add(egui::Slider::new(&mut hi, bounds.lo()..=bounds.hi()).text("to"))
        .changed();
    if lo_changed || hi_changed {
        // Dragging one handle past the other pushes it along.
        if lo_changed && lo > hi {
            hi = lo;
        } else if hi_changed && hi < lo {
            lo = hi;
        }
        state.set_years(lo, hi);
    }
    ui.separator();

    // ---- Genres ----
    let header_text = format!("Genres  ({}/{})", state.selection.genres.len(), genres.len());
    ui.strong(header_text);
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_genres();
        }
        if ui.small_button("None").clicked() {
            state.select_no_genres();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for genre in &genres {
                let mut checked = state.selection.genres.contains(genre);
                let text = RichText::new(genre).color(state.colors.color_for(genre));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_genre(genre);
                }
            }
        });
}

/// Collapsible note on what the app shows and how to drive it.
fn site_info(ui: &mut Ui) {
    egui::CollapsingHeader::new("About this app")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.strong("What is this?");
            ui.label("Box office revenue of film genres over the years.");
            ui.add_space(4.0);
            ui.strong("How to use it");
            ui.label("1. Open a CSV or JSON file with genre, year and gross columns.");
            ui.label("2. Pick the genres you are interested in.");
            ui.label("3. Choose the years with the sliders.");
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, the view switch and the status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}: {} rows",
                session.file_name(),
                session.table().len()
            ));
            ui.separator();

            for (view, label) in [
                (View::Chart, "Revenue chart"),
                (View::Describe, "Data info"),
                (View::Edit, "Edit data"),
            ] {
                if ui.selectable_label(state.view == view, label).clicked() {
                    state.show(view);
                }
            }
            ui.separator();
        }

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.label(msg);
            }
            Some(Status::Success(msg)) => {
                ui.label(RichText::new(msg).color(Color32::from_rgb(0, 160, 60)));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
