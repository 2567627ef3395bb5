use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

// ---------------------------------------------------------------------------
// BowlingType – the delivery style a batter faced
// ---------------------------------------------------------------------------

/// Categorical bowling type. Ordered so `BTreeSet<BowlingType>` iterates
/// Pace before Spin, which fixes the order of titles and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum BowlingType {
    Pace,
    Spin,
}

impl BowlingType {
    pub const ALL: [BowlingType; 2] = [BowlingType::Pace, BowlingType::Spin];

    pub fn as_str(self) -> &'static str {
        match self {
            BowlingType::Pace => "Pace",
            BowlingType::Spin => "Spin",
        }
    }
}

impl fmt::Display for BowlingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BowlingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pace" => Ok(BowlingType::Pace),
            "Spin" => Ok(BowlingType::Spin),
            other => Err(format!("unknown bowling type '{other}' (expected Pace or Spin)")),
        }
    }
}

// ---------------------------------------------------------------------------
// BatterRecord – one row of the results sheet
// ---------------------------------------------------------------------------

/// One row per (batter, bowling type) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterRecord {
    pub batter_id: String,
    pub bowling_type: BowlingType,
    /// Balls faced.
    pub n_balls: u32,
    /// Average scoring residual versus the expected-runs baseline.
    pub mean_residual: f64,
    pub std_residual: Option<f64>,
    /// Standard error of `mean_residual`.
    pub se: Option<f64>,
    /// `mean_residual / se`.
    pub t_stat: f64,
}

/// A row as read from a source file, before validation.
///
/// Every cell is optional: unparseable values have already been coerced
/// to `None` by the loader.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub batter_id: Option<String>,
    pub bowling_type: Option<String>,
    pub n_balls: Option<f64>,
    pub mean_residual: Option<f64>,
    pub std_residual: Option<f64>,
    pub se: Option<f64>,
    pub t_stat: Option<f64>,
}

impl RawRow {
    /// Validate a raw row. Returns `None` when any required field is
    /// missing or outside its domain; such rows never enter the pipeline.
    pub fn into_record(self) -> Option<BatterRecord> {
        let batter_id = self
            .batter_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())?;
        let bowling_type = self.bowling_type?.trim().parse().ok()?;
        let n_balls = balls_from_f64(self.n_balls?)?;
        let mean_residual = self.mean_residual.filter(|v| v.is_finite())?;
        let t_stat = self.t_stat.filter(|v| v.is_finite())?;

        Some(BatterRecord {
            batter_id,
            bowling_type,
            n_balls,
            mean_residual,
            std_residual: self.std_residual.filter(|v| v.is_finite()),
            se: self.se.filter(|v| v.is_finite()),
            t_stat,
        })
    }
}

/// Ball counts arrive as floats from spreadsheets (`150.0`); only
/// non-negative integral values are accepted.
fn balls_from_f64(v: f64) -> Option<u32> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Some(v as u32)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// BatterTable – the immutable master table
// ---------------------------------------------------------------------------

/// The full loaded table plus dataset-wide figures computed once at load.
#[derive(Debug, Clone)]
pub struct BatterTable {
    pub records: Vec<BatterRecord>,
    /// Distinct `batter_id` values across all records.
    pub unique_batters: usize,
    /// Rows dropped during validation.
    pub dropped_rows: usize,
    pub min_balls: u32,
    pub max_balls: u32,
    pub max_t_stat: f64,
}

impl BatterTable {
    /// Build the table and its dataset-wide statistics.
    pub fn from_records(records: Vec<BatterRecord>, dropped_rows: usize) -> Self {
        let unique_batters = records
            .iter()
            .map(|r| r.batter_id.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let min_balls = records.iter().map(|r| r.n_balls).min().unwrap_or(0);
        let max_balls = records.iter().map(|r| r.n_balls).max().unwrap_or(0);
        let max_t_stat = records
            .iter()
            .map(|r| r.t_stat)
            .fold(f64::NEG_INFINITY, f64::max);

        BatterTable {
            records,
            unique_batters,
            dropped_rows,
            min_balls,
            max_balls,
            max_t_stat: if max_t_stat.is_finite() { max_t_stat } else { 0.0 },
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(
    id: &str,
    bowling_type: BowlingType,
    n_balls: u32,
    mean_residual: f64,
    t_stat: f64,
) -> BatterRecord {
    BatterRecord {
        batter_id: id.to_string(),
        bowling_type,
        n_balls,
        mean_residual,
        std_residual: Some(0.3),
        se: Some(0.1),
        t_stat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawRow {
        RawRow {
            batter_id: Some("P1".into()),
            bowling_type: Some("Pace".into()),
            n_balls: Some(150.0),
            mean_residual: Some(1.2),
            std_residual: Some(0.4),
            se: Some(0.1),
            t_stat: Some(12.0),
        }
    }

    #[test]
    fn valid_row_becomes_record() {
        let rec = raw().into_record().unwrap();
        assert_eq!(rec.batter_id, "P1");
        assert_eq!(rec.bowling_type, BowlingType::Pace);
        assert_eq!(rec.n_balls, 150);
        assert_eq!(rec.se, Some(0.1));
    }

    #[test]
    fn missing_required_fields_drop_the_row() {
        assert!(RawRow { batter_id: None, ..raw() }.into_record().is_none());
        assert!(RawRow { batter_id: Some("  ".into()), ..raw() }.into_record().is_none());
        assert!(RawRow { bowling_type: Some("Seam".into()), ..raw() }.into_record().is_none());
        assert!(RawRow { n_balls: None, ..raw() }.into_record().is_none());
        assert!(RawRow { mean_residual: None, ..raw() }.into_record().is_none());
        assert!(RawRow { t_stat: Some(f64::NAN), ..raw() }.into_record().is_none());
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let rec = RawRow { std_residual: None, se: None, ..raw() }
            .into_record()
            .unwrap();
        assert_eq!(rec.std_residual, None);
        assert_eq!(rec.se, None);
    }

    #[test]
    fn fractional_or_negative_balls_are_rejected() {
        assert!(RawRow { n_balls: Some(12.5), ..raw() }.into_record().is_none());
        assert!(RawRow { n_balls: Some(-1.0), ..raw() }.into_record().is_none());
    }

    #[test]
    fn table_statistics() {
        let table = BatterTable::from_records(
            vec![
                record("A", BowlingType::Pace, 120, 0.5, 2.5),
                record("A", BowlingType::Spin, 40, 0.1, 0.4),
                record("B", BowlingType::Pace, 300, -0.2, -1.0),
            ],
            2,
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.unique_batters, 2);
        assert_eq!(table.dropped_rows, 2);
        assert_eq!(table.min_balls, 40);
        assert_eq!(table.max_balls, 300);
        assert_eq!(table.max_t_stat, 2.5);
    }

    #[test]
    fn empty_table_has_neutral_bounds() {
        let table = BatterTable::from_records(Vec::new(), 0);
        assert!(table.is_empty());
        assert_eq!(table.max_t_stat, 0.0);
    }
}
