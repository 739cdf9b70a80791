use std::path::PathBuf;

use anyhow::Context;
use automation_dashboard::app::DashboardApp;
use automation_dashboard::config::Config;
use automation_dashboard::data::store::DatasetStore;
use automation_dashboard::state::AppState;
use clap::Parser;
use eframe::egui;

#[derive(Parser)]
#[command(author, version, about = "Occupation automation probability dashboard")]
struct Args {
    /// JSON config file (defaults to ./automation-dashboard.json when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cumulative probability table (.xlsx, .csv or .parquet)
    #[arg(long)]
    cdf: Option<PathBuf>,
    /// Incremental probability table (.xlsx, .csv or .parquet)
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// Directory searched for the tables when no explicit path is set
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?
        .with_overrides(args.cdf, args.pdf, args.data_dir);
    log::info!("Starting with {config:?}");

    // Loaded exactly once; a failure is shown in the window, not fatal to the process.
    let loaded = DatasetStore::open(&config);
    let state = AppState::new(config, loaded);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Occupation Automation Probability Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
