use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color;
use crate::data::display::{DisplayRow, RESIDUAL_DIGITS, T_STAT_DIGITS};
use crate::data::pipeline::Outcome;
use crate::data::rank::SortKey;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;
const TABLE_HEIGHT: f32 = 400.0;

// ---------------------------------------------------------------------------
// Leaderboard (right panel)
// ---------------------------------------------------------------------------

/// Render the sort selector, the ranked table and the download button.
pub fn leaderboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Leaderboard");

    let mut sort_key = state.sort_key;
    egui::ComboBox::from_id_salt("sort_by")
        .selected_text(format!("Sort by: {}", sort_key.label()))
        .show_ui(ui, |ui: &mut Ui| {
            for key in SortKey::ALL {
                ui.selectable_value(&mut sort_key, key, key.label());
            }
        });
    state.set_sort_key(sort_key);
    ui.add_space(4.0);

    let Outcome::Ready(result) = &state.outcome else {
        return;
    };

    ui.push_id("leaderboard_table", |ui: &mut Ui| {
        rows_table(ui, &result.display);
    });
    ui.add_space(8.0);

    if ui
        .add_sized(
            [ui.available_width(), 32.0],
            egui::Button::new(RichText::new("📥 Download Filtered Data").strong()),
        )
        .clicked()
    {
        save_file_dialog(state);
    }
}

fn rows_table(ui: &mut Ui, rows: &[DisplayRow]) {
    let elite_text = color::lighten(color::ELITE, 0.25);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .max_scroll_height(TABLE_HEIGHT)
        .header(ROW_HEIGHT, |mut header| {
            for title in DisplayRow::HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let r = &rows[row.index()];
                let batter = if r.elite {
                    RichText::new(&r.batter).color(elite_text)
                } else {
                    RichText::new(&r.batter)
                };
                row.col(|ui: &mut Ui| {
                    ui.label(batter);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(r.bowling_type.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.monospace(r.balls.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.monospace(format!("{:.*}", RESIDUAL_DIGITS as usize, r.residual));
                });
                row.col(|ui: &mut Ui| {
                    ui.monospace(format!("{:.*}", T_STAT_DIGITS as usize, r.t_stat));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Save dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(state.export_file_name())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(n) => state.status_message = Some(format!("Saved {n} records to {}", path.display())),
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
