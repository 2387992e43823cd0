use eframe::egui::{CollapsingHeader, Grid, ScrollArea, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Revenue chart (central panel)
// ---------------------------------------------------------------------------

/// One line per selected genre across the selected years.
pub fn revenue_plot(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV or JSON file to explore revenue  (File → Open…)");
        });
        return;
    };

    if chart.cells.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No movies match the selected genres and years.");
        });
        return;
    }

    CollapsingHeader::new("Chart data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical()
                .id_salt("chart_data")
                .max_height(180.0)
                .show(ui, |ui: &mut Ui| {
                    Grid::new("chart_data_grid").striped(true).show(ui, |ui: &mut Ui| {
                        ui.strong("Year");
                        ui.strong("Genre");
                        ui.strong("Gross ($)");
                        ui.end_row();
                        for cell in &chart.cells {
                            ui.label(cell.year.to_string());
                            ui.label(&cell.genre);
                            ui.label(format!("{:.0}", cell.revenue));
                            ui.end_row();
                        }
                    });
                });
        });

    Plot::new("revenue_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Gross ($)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(|genre, point| {
            let year = point.x.round() as i64;
            match chart.pivot.get(year, genre) {
                Some(gross) => format!("{genre}\n{year}: {gross:.0}"),
                None => format!("{year}\n{:.0}", point.y),
            }
        })
        .show(ui, |plot_ui| {
            for genre in chart.pivot.genres() {
                let line = Line::new(PlotPoints::from(chart.pivot.series(genre)))
                    .name(genre)
                    .color(state.colors.color_for(genre))
                    .width(2.0);

                plot_ui.line(line);
            }
        });
}
