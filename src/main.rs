mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::BatterDashboardApp;
use clap::Parser;
use eframe::egui;

use crate::config::Cli;
use crate::data::cache::TableCache;
use crate::state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config()?;

    // A table that cannot be loaded at startup is fatal.
    let mut cache = TableCache::new();
    let table = cache
        .get_or_load(&config.data)
        .context("loading master results table")?;
    if table.is_empty() {
        log::warn!("{} contains no valid records", config.data.display());
    }
    let state = AppState::new(config, cache, table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::panels::TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(BatterDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
