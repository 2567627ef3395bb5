use super::display::{DisplayRow, project_for_display};
use super::filter::{AnnotatedRecord, FilterCriteria, annotate_elite, filter};
use super::model::BatterTable;
use super::rank::{SortKey, rank};
use super::summary::{Summary, summarize};

/// Everything the dashboard shows for one set of criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredResult {
    /// Filtered records in table order, with elite flags.
    pub records: Vec<AnnotatedRecord>,
    pub summary: Summary,
    /// `records` ordered by the active sort key.
    pub ranked: Vec<AnnotatedRecord>,
    pub display: Vec<DisplayRow>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No record passed the filters. Nothing downstream is computed.
    Empty,
    Ready(FilteredResult),
}

/// Run `filter → annotate_elite → summarize → rank → project_for_display`.
pub fn run(table: &BatterTable, criteria: &FilterCriteria, sort_key: SortKey) -> Outcome {
    let filtered = filter(&table.records, criteria);
    if filtered.is_empty() {
        log::debug!("No records match {criteria:?}");
        return Outcome::Empty;
    }

    let records = annotate_elite(filtered);
    let Some(summary) = summarize(&records, table.unique_batters) else {
        return Outcome::Empty;
    };
    let ranked = rank(&records, sort_key);
    let display = project_for_display(&ranked);

    log::debug!(
        "Filtered {} of {} records ({} elite), ranked by {sort_key}",
        summary.count,
        table.len(),
        summary.elite_count
    );

    Outcome::Ready(FilteredResult {
        records,
        summary,
        ranked,
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{BowlingType, record};

    fn table() -> BatterTable {
        BatterTable::from_records(
            vec![
                record("P1", BowlingType::Pace, 150, 1.2, 12.0),
                record("P2", BowlingType::Spin, 50, 0.5, 2.5),
                record("P3", BowlingType::Pace, 400, 0.2, 2.6),
                record("P1", BowlingType::Spin, 180, -0.01, 3.0),
            ],
            0,
        )
    }

    #[test]
    fn ready_outcome_carries_all_views() {
        let criteria = FilterCriteria::new([BowlingType::Pace], 100, 2.0).unwrap();
        let Outcome::Ready(result) = run(&table(), &criteria, SortKey::NBalls) else {
            panic!("expected records");
        };

        assert_eq!(result.summary.count, result.records.len());
        assert_eq!(result.summary.count, 2);
        assert_eq!(result.summary.elite_count, 2);
        assert_eq!(result.summary.unique_batters, 3);
        assert_eq!(result.records[0].record.batter_id, "P1");
        assert_eq!(result.ranked[0].record.batter_id, "P3");
        assert_eq!(result.display.len(), 2);
        assert_eq!(result.display[0].batter, "P3");
    }

    #[test]
    fn empty_selection_short_circuits() {
        let criteria = FilterCriteria::new([], 0, 0.0).unwrap();
        assert_eq!(run(&table(), &criteria, SortKey::TStat), Outcome::Empty);
    }

    #[test]
    fn negative_residual_alone_gives_empty() {
        let table = BatterTable::from_records(
            vec![record("N", BowlingType::Spin, 500, -0.01, 9.0)],
            0,
        );
        let criteria = FilterCriteria::new([BowlingType::Spin], 0, 0.0).unwrap();
        assert_eq!(run(&table, &criteria, SortKey::MeanResidual), Outcome::Empty);
    }
}
