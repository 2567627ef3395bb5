use std::fmt;
use std::str::FromStr;

use super::filter::AnnotatedRecord;
use super::model::BatterRecord;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Sort key
// ---------------------------------------------------------------------------

/// Numeric column the leaderboard is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    MeanResidual,
    TStat,
    NBalls,
}

struct SortKeyInfo {
    key: SortKey,
    column: &'static str,
    label: &'static str,
    value: fn(&BatterRecord) -> f64,
}

static SORT_KEYS: [SortKeyInfo; 3] = [
    SortKeyInfo {
        key: SortKey::MeanResidual,
        column: "mean_residual",
        label: "Outperformance",
        value: |r| r.mean_residual,
    },
    SortKeyInfo {
        key: SortKey::TStat,
        column: "t_stat",
        label: "Significance",
        value: |r| r.t_stat,
    },
    SortKeyInfo {
        key: SortKey::NBalls,
        column: "n_balls",
        label: "Volume",
        value: |r| r.n_balls as f64,
    },
];

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::MeanResidual, SortKey::TStat, SortKey::NBalls];

    fn info(self) -> &'static SortKeyInfo {
        match self {
            SortKey::MeanResidual => &SORT_KEYS[0],
            SortKey::TStat => &SORT_KEYS[1],
            SortKey::NBalls => &SORT_KEYS[2],
        }
    }

    /// Source column name, e.g. `t_stat`.
    pub fn column(self) -> &'static str {
        self.info().column
    }

    /// Human-facing label for the sort selector.
    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn value(self, record: &BatterRecord) -> f64 {
        (self.info().value)(record)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SORT_KEYS
            .iter()
            .find(|info| info.column == s)
            .map(|info| info.key)
            .ok_or_else(|| DashboardError::InvalidCriteria(format!("unknown sort key '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Sort descending by `key`. The sort is stable: records with equal keys
/// keep their input order, and no secondary key is applied.
pub fn rank(records: &[AnnotatedRecord], key: SortKey) -> Vec<AnnotatedRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| key.value(&b.record).total_cmp(&key.value(&a.record)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::annotate_elite;
    use crate::data::model::{BowlingType, record};

    fn ids(records: &[AnnotatedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.record.batter_id.as_str()).collect()
    }

    #[test]
    fn ties_keep_input_order() {
        let input = annotate_elite(vec![
            record("A", BowlingType::Pace, 100, 0.1, 2.00),
            record("B", BowlingType::Pace, 300, 0.9, 2.00),
        ]);
        assert_eq!(ids(&rank(&input, SortKey::TStat)), ["A", "B"]);
    }

    #[test]
    fn sorts_descending_by_each_key() {
        let input = annotate_elite(vec![
            record("A", BowlingType::Pace, 120, 0.3, 4.0),
            record("B", BowlingType::Spin, 400, 0.1, 2.5),
            record("C", BowlingType::Pace, 250, 0.7, 3.1),
        ]);
        assert_eq!(ids(&rank(&input, SortKey::MeanResidual)), ["C", "A", "B"]);
        assert_eq!(ids(&rank(&input, SortKey::TStat)), ["A", "C", "B"]);
        assert_eq!(ids(&rank(&input, SortKey::NBalls)), ["B", "C", "A"]);
    }

    #[test]
    fn ties_among_many_stay_stable() {
        let input = annotate_elite(vec![
            record("A", BowlingType::Pace, 200, 0.5, 1.0),
            record("B", BowlingType::Pace, 100, 0.5, 1.0),
            record("C", BowlingType::Pace, 300, 0.9, 1.0),
            record("D", BowlingType::Pace, 150, 0.5, 1.0),
        ]);
        assert_eq!(ids(&rank(&input, SortKey::MeanResidual)), ["C", "A", "B", "D"]);
    }

    #[test]
    fn sort_key_names_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.column().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(SortKey::TStat.label(), "Significance");
    }

    #[test]
    fn unknown_sort_key_is_invalid_criteria() {
        assert_eq!(
            "std_residual".parse::<SortKey>(),
            Err(DashboardError::InvalidCriteria(
                "unknown sort key 'std_residual'".to_string()
            ))
        );
    }
}
