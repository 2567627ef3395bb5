use super::filter::AnnotatedRecord;

/// Aggregate figures over a non-empty filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub elite_count: usize,
    pub avg_residual: f64,
    pub avg_balls: f64,
    /// Distinct batters in the unfiltered master table.
    pub unique_batters: usize,
}

impl Summary {
    /// Average balls faced, truncated for display.
    pub fn avg_balls_display(&self) -> u64 {
        self.avg_balls.trunc() as u64
    }
}

/// Summarise the filtered set. `unique_batters` is the dataset-wide
/// constant from [`crate::data::model::BatterTable`].
///
/// Returns `None` for an empty set, where the means are undefined.
pub fn summarize(records: &[AnnotatedRecord], unique_batters: usize) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let residual_sum: f64 = records.iter().map(|r| r.record.mean_residual).sum();
    let balls_sum: f64 = records.iter().map(|r| r.record.n_balls as f64).sum();

    Some(Summary {
        count: records.len(),
        elite_count: records.iter().filter(|r| r.elite).count(),
        avg_residual: residual_sum / n,
        avg_balls: balls_sum / n,
        unique_batters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::annotate_elite;
    use crate::data::model::{BowlingType, record};

    #[test]
    fn empty_set_has_no_summary() {
        assert_eq!(summarize(&[], 10), None);
    }

    #[test]
    fn counts_and_means() {
        let annotated = annotate_elite(vec![
            record("A", BowlingType::Pace, 100, 0.5, 2.5),
            record("B", BowlingType::Pace, 151, 0.25, 1.5),
            record("C", BowlingType::Spin, 200, 0.75, 2.0),
        ]);
        let summary = summarize(&annotated, 42).unwrap();
        assert_eq!(summary.count, annotated.len());
        assert_eq!(summary.elite_count, 2);
        assert!((summary.avg_residual - 0.5).abs() < 1e-12);
        assert!((summary.avg_balls - 150.333_333_333).abs() < 1e-6);
        assert_eq!(summary.avg_balls_display(), 150);
        assert_eq!(summary.unique_batters, 42);
    }
}
