use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::data::cache::TableCache;
use crate::data::export::{export, export_file_name};
use crate::data::filter::FilterCriteria;
use crate::data::model::{BatterTable, BowlingType};
use crate::data::pipeline::{self, Outcome};
use crate::data::rank::SortKey;

/// Step of the minimum-balls slider.
pub const BALLS_STEP: f64 = 10.0;
/// Step of the minimum t-statistic slider.
pub const T_STAT_STEP: f64 = 0.1;
/// The t-statistic slider always reaches at least this value.
pub const T_STAT_SLIDER_FLOOR: f64 = 3.0;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Snapshot of the master table (shared, never mutated).
    pub table: Arc<BatterTable>,

    /// Where `table` was loaded from.
    pub source: PathBuf,

    pub cache: TableCache,

    /// Current user selection.
    pub criteria: FilterCriteria,
    pub sort_key: SortKey,

    /// Pipeline output for the current selection (recomputed, never patched).
    pub outcome: Outcome,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build state from a table already loaded through `cache`.
    pub fn new(config: Config, cache: TableCache, table: Arc<BatterTable>) -> Self {
        let outcome = pipeline::run(&table, &config.criteria, config.sort_key);
        Self {
            table,
            source: config.data,
            cache,
            criteria: config.criteria,
            sort_key: config.sort_key,
            outcome,
            status_message: None,
        }
    }

    /// Recompute the whole pipeline after any control change.
    pub fn recompute(&mut self) {
        self.outcome = pipeline::run(&self.table, &self.criteria, self.sort_key);
    }

    /// Upper bound of the t-statistic slider.
    pub fn t_stat_slider_max(&self) -> f64 {
        self.table.max_t_stat.max(T_STAT_SLIDER_FLOOR)
    }

    /// Range of the minimum-balls slider. The current value is folded in
    /// so a startup value outside the data range stays representable.
    pub fn balls_slider_range(&self) -> (u32, u32) {
        let lo = self.table.min_balls.min(self.criteria.min_balls);
        let hi = self.table.max_balls.max(self.criteria.min_balls);
        (lo, hi)
    }

    pub fn toggle_bowling_type(&mut self, bowling_type: BowlingType) {
        if !self.criteria.bowling_types.remove(&bowling_type) {
            self.criteria.bowling_types.insert(bowling_type);
        }
        self.recompute();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        if self.sort_key != key {
            self.sort_key = key;
            self.recompute();
        }
    }

    /// Replace the table with the one at `path`. On failure the current
    /// table is kept and the error is surfaced in the status line.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => {
                self.table = table;
                self.source = path.to_path_buf();
                self.status_message = None;
                log::debug!("{} source(s) cached", self.cache.len());
                self.recompute();
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Suggested name for the download.
    pub fn export_file_name(&self) -> String {
        export_file_name(&self.criteria)
    }

    /// Write the ranked records of the current outcome to `path`.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let Outcome::Ready(result) = &self.outcome else {
            return Ok(0);
        };
        let bytes = export(&result.ranked)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("writing export to {}", path.display()))?;
        log::info!("Exported {} records to {}", result.ranked.len(), path.display());
        Ok(result.ranked.len())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::record;

    fn state(min_balls: i64) -> AppState {
        let table = BatterTable::from_records(
            vec![
                record("P1", BowlingType::Pace, 150, 1.2, 12.0),
                record("P2", BowlingType::Spin, 130, 0.5, 2.5),
                record("P3", BowlingType::Spin, 60, 0.3, 1.1),
            ],
            0,
        );
        let config = Config {
            data: PathBuf::from("batters.csv"),
            criteria: FilterCriteria::new([BowlingType::Pace], min_balls, 2.0).unwrap(),
            sort_key: SortKey::MeanResidual,
        };
        AppState::new(config, TableCache::new(), Arc::new(table))
    }

    fn ready_ids(state: &AppState) -> Vec<String> {
        match &state.outcome {
            Outcome::Ready(r) => r.ranked.iter().map(|a| a.record.batter_id.clone()).collect(),
            Outcome::Empty => Vec::new(),
        }
    }

    #[test]
    fn toggling_types_recomputes() {
        let mut state = state(100);
        assert_eq!(ready_ids(&state), ["P1"]);

        state.toggle_bowling_type(BowlingType::Spin);
        assert_eq!(ready_ids(&state), ["P1", "P2"]);

        state.toggle_bowling_type(BowlingType::Pace);
        state.toggle_bowling_type(BowlingType::Spin);
        assert_eq!(state.outcome, Outcome::Empty);
    }

    #[test]
    fn slider_bounds_follow_dataset() {
        let narrow = state(100);
        assert_eq!(narrow.t_stat_slider_max(), 12.0);
        assert_eq!(narrow.balls_slider_range(), (60, 150));

        let wide = state(500);
        assert_eq!(wide.balls_slider_range(), (60, 500));
    }

    #[test]
    fn export_writes_ranked_records() {
        let mut state = state(0);
        state.toggle_bowling_type(BowlingType::Spin);
        state.set_sort_key(SortKey::NBalls);
        assert_eq!(state.export_file_name(), "batters_Pace_Spin.csv");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(state.export_file_name());
        assert_eq!(state.export_to(&path).unwrap(), 2);

        let reloaded = read_csv(std::fs::File::open(&path).unwrap()).unwrap();
        let ids: Vec<_> = reloaded.records.iter().map(|r| r.batter_id.as_str()).collect();
        assert_eq!(ids, ["P1", "P2"]);
    }

    #[test]
    fn failed_open_keeps_current_table() {
        let mut state = state(100);
        let mut bad = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(bad, "BatterID,n_balls\nP9,10\n").unwrap();
        bad.flush().unwrap();

        state.open(bad.path());
        assert!(state.status_message.as_deref().unwrap_or("").contains("missing"));
        assert_eq!(state.table.len(), 3);
        assert_eq!(ready_ids(&state), ["P1"]);
    }
}
