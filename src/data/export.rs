use anyhow::{Context, Result};
use serde::Serialize;

use super::filter::{AnnotatedRecord, FilterCriteria};
use super::model::BowlingType;

/// CSV row of the download. Column names match the source sheet so the
/// file can be loaded back; `elite` is extra and ignored on reload.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "BatterID")]
    batter_id: &'a str,
    bowling_type: BowlingType,
    n_balls: u32,
    mean_residual: f64,
    std_residual: Option<f64>,
    se: Option<f64>,
    t_stat: f64,
    elite: bool,
}

/// Serialize ranked records at full precision as UTF-8 CSV with a header.
pub fn export(records: &[AnnotatedRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for r in records {
        let rec = &r.record;
        writer
            .serialize(ExportRow {
                batter_id: &rec.batter_id,
                bowling_type: rec.bowling_type,
                n_balls: rec.n_balls,
                mean_residual: rec.mean_residual,
                std_residual: rec.std_residual,
                se: rec.se,
                t_stat: rec.t_stat,
                elite: r.elite,
            })
            .with_context(|| format!("serializing record for {}", rec.batter_id))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV export: {}", e.error()))
}

/// Download file name reflecting the active selection, e.g.
/// `batters_Pace_Spin.csv`.
pub fn export_file_name(criteria: &FilterCriteria) -> String {
    format!("batters_{}.csv", criteria.types_label("_"))
}
