use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::FilterCriteria;
use crate::data::model::BowlingType;
use crate::data::rank::SortKey;
use crate::error::DashboardError;

/// Startup options. Everything after startup is driven by the UI.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "batter-dashboard",
    about = "Explore batter outperformance against an expected-runs baseline",
    version
)]
pub struct Cli {
    /// Results table to load (.xlsx, .xls, .csv, .parquet or .json).
    #[arg(long, default_value = "batter_outperformance_master.xlsx")]
    pub data: PathBuf,

    /// Initially selected bowling type; repeat for several.
    #[arg(long = "bowling-type", default_values_t = [BowlingType::Pace])]
    pub bowling_types: Vec<BowlingType>,

    /// Initial minimum balls faced.
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    pub min_balls: i64,

    /// Initial minimum t-statistic.
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub min_t_stat: f64,

    /// Initial leaderboard order: mean_residual, t_stat or n_balls.
    #[arg(long, default_value = "mean_residual")]
    pub sort: String,
}

/// Validated startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data: PathBuf,
    pub criteria: FilterCriteria,
    pub sort_key: SortKey,
}

impl Cli {
    /// Validate flag values; out-of-domain criteria are fatal at startup.
    pub fn into_config(self) -> Result<Config, DashboardError> {
        Ok(Config {
            criteria: FilterCriteria::new(self.bowling_types, self.min_balls, self.min_t_stat)?,
            sort_key: self.sort.parse()?,
            data: self.data,
        })
    }
}
