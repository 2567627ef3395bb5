use eframe::egui::{self, Color32, RichText, Ui};

use crate::color;
use crate::data::filter::ELITE_T_STAT;
use crate::data::model::BowlingType;
use crate::data::pipeline::Outcome;
use crate::state::{AppState, BALLS_STEP, T_STAT_STEP};

pub const TITLE: &str = "Batter Outperformance";
const CAPTION: &str =
    "Interactive exploration of batter performance relative to an OLS expected-runs baseline";
const EMPTY_NOTICE: &str = "No batters match the current filters. Try adjusting your criteria.";
const WARNING: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Bowling type ----
    ui.strong("Bowling Type");
    for bowling_type in BowlingType::ALL {
        let mut checked = state.criteria.bowling_types.contains(&bowling_type);
        let text = format!("{} {bowling_type}", color::marker_glyph(bowling_type));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_bowling_type(bowling_type);
        }
    }
    ui.separator();

    // ---- Thresholds ----
    let (lo, hi) = state.balls_slider_range();
    let mut min_balls = state.criteria.min_balls;
    let balls = ui
        .add(
            egui::Slider::new(&mut min_balls, lo..=hi)
                .step_by(BALLS_STEP)
                .text("Minimum balls faced"),
        )
        .on_hover_text("Filter batters by minimum number of balls faced");

    let t_lo = state.criteria.min_t_stat.min(0.0);
    let mut min_t_stat = state.criteria.min_t_stat;
    let t_stat = ui
        .add(
            egui::Slider::new(&mut min_t_stat, t_lo..=state.t_stat_slider_max())
                .step_by(T_STAT_STEP)
                .fixed_decimals(1)
                .text("Minimum t-statistic"),
        )
        .on_hover_text("Statistical significance threshold");

    if balls.changed() || t_stat.changed() {
        state.criteria.min_balls = min_balls;
        state.criteria.min_t_stat = min_t_stat;
        state.recompute();
    }
    ui.separator();

    // ---- Dataset overview ----
    ui.strong("Dataset Overview");
    ui.columns(2, |cols| {
        metric(&mut cols[0], "Total Records", thousands(state.table.len() as u64), None);
        metric(
            &mut cols[1],
            "Unique Batters",
            thousands(state.table.unique_batters as u64),
            None,
        );
    });
    if state.table.dropped_rows > 0 {
        ui.small(format!("{} rows skipped while loading", state.table.dropped_rows));
    }
}

// ---------------------------------------------------------------------------
// Summary strip
// ---------------------------------------------------------------------------

/// Render the summary counters. Returns `false` (after showing the notice)
/// when nothing matches, in which case the caller draws nothing else.
pub fn summary_strip(ui: &mut Ui, state: &AppState) -> bool {
    ui.heading(TITLE);
    ui.label(CAPTION);
    ui.add_space(6.0);

    let result = match &state.outcome {
        Outcome::Ready(result) => result,
        Outcome::Empty => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new(format!("⚠ {EMPTY_NOTICE}")).color(WARNING).heading());
            });
            return false;
        }
    };
    let summary = &result.summary;

    ui.columns(4, |cols| {
        metric(
            &mut cols[0],
            "Filtered Batters",
            thousands(summary.count as u64),
            Some(format!("of {} unique batters in the dataset", summary.unique_batters)),
        );
        metric(
            &mut cols[1],
            "Elite Performers",
            thousands(summary.elite_count as u64),
            Some(format!("t-stat ≥ {ELITE_T_STAT:.1}")),
        );
        metric(&mut cols[2], "Avg Outperformance", format!("{:.3}", summary.avg_residual), None);
        metric(&mut cols[3], "Avg Balls Faced", thousands(summary.avg_balls_display()), None);
    });
    true
}

fn metric(ui: &mut Ui, label: &str, value: String, hover: Option<String>) {
    let response = ui
        .vertical(|ui: &mut Ui| {
            ui.label(RichText::new(value).size(24.0).strong());
            ui.small(label.to_uppercase());
        })
        .response;
    if let Some(text) = hover {
        response.on_hover_text(text);
    }
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let source = state
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| state.source.display().to_string());
        ui.label(format!("{} records loaded from {source}", state.table.len()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.small(
            "Mean residual > 0 indicates scoring above expectation given ball tracking features. \
             Use the bowling type filter to compare Pace vs Spin performance, or select both for combined analysis.",
        );
        if !state.criteria.bowling_types.is_empty() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                ui.small(format!("Currently viewing: {}", state.criteria.types_label(", ")));
            });
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open batter results")
        .add_filter("Supported files", &["xlsx", "xls", "csv", "parquet", "pq", "json"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
