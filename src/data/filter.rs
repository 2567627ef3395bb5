use std::collections::BTreeSet;

use super::model::{BatterRecord, BowlingType};
use crate::error::DashboardError;

/// Records at or above this t-statistic are classed as elite. Independent
/// of the user's `min_t_stat` threshold.
pub const ELITE_T_STAT: f64 = 2.0;

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// User selection driving one recomputation of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// An empty set selects nothing.
    pub bowling_types: BTreeSet<BowlingType>,
    pub min_balls: u32,
    pub min_t_stat: f64,
}

impl FilterCriteria {
    /// Build criteria, rejecting values outside the declared domain.
    pub fn new(
        bowling_types: impl IntoIterator<Item = BowlingType>,
        min_balls: i64,
        min_t_stat: f64,
    ) -> Result<Self, DashboardError> {
        let min_balls = u32::try_from(min_balls).map_err(|_| {
            DashboardError::InvalidCriteria(format!("min_balls out of range: {min_balls}"))
        })?;
        if !min_t_stat.is_finite() {
            return Err(DashboardError::InvalidCriteria(format!(
                "min_t_stat must be finite, got {min_t_stat}"
            )));
        }
        Ok(FilterCriteria {
            bowling_types: bowling_types.into_iter().collect(),
            min_balls,
            min_t_stat,
        })
    }

    /// Whether a single record passes every predicate, including the fixed
    /// `mean_residual > 0` rule.
    pub fn accepts(&self, record: &BatterRecord) -> bool {
        self.bowling_types.contains(&record.bowling_type)
            && record.n_balls >= self.min_balls
            && record.t_stat >= self.min_t_stat
            && record.mean_residual > 0.0
    }

    /// Active bowling types joined with `sep`, or `"None"`.
    pub fn types_label(&self, sep: &str) -> String {
        if self.bowling_types.is_empty() {
            return "None".to_string();
        }
        self.bowling_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Return the records passing all predicates, in input order.
///
/// Only batters outperforming the baseline (`mean_residual > 0`) are ever
/// returned, whatever the criteria.
pub fn filter(records: &[BatterRecord], criteria: &FilterCriteria) -> Vec<BatterRecord> {
    records
        .iter()
        .filter(|r| criteria.accepts(r))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Elite annotation
// ---------------------------------------------------------------------------

/// A filtered record with its elite classification.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRecord {
    pub record: BatterRecord,
    pub elite: bool,
}

pub fn is_elite(record: &BatterRecord) -> bool {
    record.t_stat >= ELITE_T_STAT
}

pub fn annotate_elite(records: Vec<BatterRecord>) -> Vec<AnnotatedRecord> {
    records
        .into_iter()
        .map(|record| AnnotatedRecord {
            elite: is_elite(&record),
            record,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn scenario_a() -> Vec<BatterRecord> {
        vec![
            BatterRecord {
                batter_id: "P1".into(),
                bowling_type: BowlingType::Pace,
                n_balls: 150,
                mean_residual: 1.2,
                std_residual: Some(0.4),
                se: Some(0.1),
                t_stat: 12.0,
            },
            BatterRecord {
                batter_id: "P2".into(),
                bowling_type: BowlingType::Spin,
                n_balls: 50,
                mean_residual: 0.5,
                std_residual: Some(0.3),
                se: Some(0.2),
                t_stat: 2.5,
            },
        ]
    }

    fn pace_only() -> FilterCriteria {
        FilterCriteria::new([BowlingType::Pace], 100, 2.0).unwrap()
    }

    #[test]
    fn scenario_a_keeps_only_pace_batter() {
        let filtered = filter(&scenario_a(), &pace_only());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].batter_id, "P1");

        let annotated = annotate_elite(filtered);
        assert!(annotated[0].elite);
    }

    #[test]
    fn empty_selection_yields_nothing() {
        let criteria = FilterCriteria::new([], 0, f64::MIN).unwrap();
        assert!(filter(&scenario_a(), &criteria).is_empty());
    }

    #[test]
    fn non_positive_residual_is_always_excluded() {
        let records = vec![
            record("NEG", BowlingType::Pace, 500, -0.01, 5.0),
            record("ZERO", BowlingType::Pace, 500, 0.0, 5.0),
        ];
        let criteria = FilterCriteria::new(BowlingType::ALL, 0, -10.0).unwrap();
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn thresholds_are_inclusive_and_order_is_kept() {
        let records = vec![
            record("C", BowlingType::Spin, 100, 0.2, 2.0),
            record("A", BowlingType::Pace, 99, 0.9, 9.0),
            record("B", BowlingType::Pace, 250, 0.1, 1.99),
            record("D", BowlingType::Pace, 101, 0.4, 2.1),
        ];
        let criteria = FilterCriteria::new(BowlingType::ALL, 100, 2.0).unwrap();
        let ids: Vec<_> = filter(&records, &criteria)
            .into_iter()
            .map(|r| r.batter_id)
            .collect();
        assert_eq!(ids, ["C", "D"]);
    }

    #[test]
    fn filter_is_idempotent_and_results_satisfy_criteria() {
        let mut records = scenario_a();
        for i in 0..40u32 {
            let bt = if i % 3 == 0 { BowlingType::Spin } else { BowlingType::Pace };
            let residual = (i as f64 - 15.0) / 10.0;
            let t = (i % 7) as f64 * 0.6;
            records.push(record(&format!("X{i}"), bt, i * 10, residual, t));
        }
        let criteria = FilterCriteria::new(BowlingType::ALL, 120, 1.2).unwrap();

        let once = filter(&records, &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once, twice);
        assert!(!once.is_empty());
        for r in &once {
            assert!(r.mean_residual > 0.0);
            assert!(r.n_balls >= criteria.min_balls);
            assert!(r.t_stat >= criteria.min_t_stat);
        }
    }

    #[test]
    fn elite_flag_ignores_min_t_stat() {
        let records = vec![
            record("LOW", BowlingType::Pace, 200, 0.3, 0.5),
            record("EDGE", BowlingType::Pace, 200, 0.3, 2.0),
        ];
        let criteria = FilterCriteria::new([BowlingType::Pace], 0, 0.0).unwrap();
        let annotated = annotate_elite(filter(&records, &criteria));
        assert!(!annotated[0].elite);
        assert!(annotated[1].elite);
    }

    #[test]
    fn invalid_criteria_are_rejected() {
        assert!(matches!(
            FilterCriteria::new([BowlingType::Pace], -1, 2.0),
            Err(DashboardError::InvalidCriteria(_))
        ));
        assert!(matches!(
            FilterCriteria::new([BowlingType::Pace], 10, f64::NAN),
            Err(DashboardError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn types_label_follows_category_order() {
        let both = FilterCriteria::new([BowlingType::Spin, BowlingType::Pace], 0, 0.0).unwrap();
        assert_eq!(both.types_label(" & "), "Pace & Spin");
        let none = FilterCriteria::new([], 0, 0.0).unwrap();
        assert_eq!(none.types_label("_"), "None");
    }
}
