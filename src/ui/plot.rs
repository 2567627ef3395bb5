use eframe::egui::{RichText, Ui};
use egui_plot::{Plot, PlotPoints, Points};

use crate::color;
use crate::data::filter::{AnnotatedRecord, ELITE_T_STAT};
use crate::data::model::BowlingType;
use crate::data::pipeline::Outcome;
use crate::state::AppState;

const MIN_RADIUS: f32 = 2.5;
const MAX_RADIUS: f32 = 11.0;

/// Marker radius for a t-statistic, scaled against the largest visible one.
fn marker_radius(t_stat: f64, max_t_stat: f64) -> f32 {
    if max_t_stat <= 0.0 {
        return MIN_RADIUS;
    }
    let frac = (t_stat / max_t_stat).clamp(0.0, 1.0) as f32;
    MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * frac.sqrt()
}

// ---------------------------------------------------------------------------
// Outperformance vs volume scatter (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter of mean residual (x) against balls faced (y).
/// Size follows the t-statistic, colour the elite flag, shape the bowling type.
pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let Outcome::Ready(result) = &state.outcome else {
        return;
    };

    ui.strong(format!(
        "Outperformance vs Volume ({})",
        state.criteria.types_label(" & ")
    ));
    legend(ui, state);

    let max_t_stat = result
        .records
        .iter()
        .map(|r| r.record.t_stat)
        .fold(0.0, f64::max);

    Plot::new("outperformance_plot")
        .x_axis_label("Mean Residual (Runs)")
        .y_axis_label("Balls Faced")
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!("{name}\nResidual: {:.3}\nBalls: {:.0}", value.x, value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for annotated in &result.records {
                let rec = &annotated.record;
                let points = Points::new(PlotPoints::new(vec![[
                    rec.mean_residual,
                    rec.n_balls as f64,
                ]]))
                .name(point_label(annotated))
                .shape(color::marker_for(rec.bowling_type))
                .color(color::elite_color(annotated.elite))
                .filled(true)
                .radius(marker_radius(rec.t_stat, max_t_stat));
                plot_ui.points(points);
            }
        });
}

/// Hover name of a point, e.g. `P1 (Pace, t = 12.00)`.
fn point_label(annotated: &AnnotatedRecord) -> String {
    let rec = &annotated.record;
    format!("{} ({}, t = {:.2})", rec.batter_id, rec.bowling_type, rec.t_stat)
}

/// Legend drawn above the plot; per-point names feed the hover label.
fn legend(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.small(format!("Elite (t ≥ {ELITE_T_STAT:.1}):"));
        ui.label(RichText::new("● yes").color(color::ELITE));
        ui.label(RichText::new("● no").color(color::OTHER));
        ui.separator();
        for bowling_type in BowlingType::ALL {
            if state.criteria.bowling_types.contains(&bowling_type) {
                ui.label(format!("{} {bowling_type}", color::marker_glyph(bowling_type)));
            }
        }
    });
}
