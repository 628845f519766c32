mod app;
mod network;
mod query;
mod search;
mod timer;
mod util;

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory the network data is served from.
    #[arg(long, env = "BASE_PATH", default_value = "public")]
    base_path: PathBuf,

    /// Network JSON location relative to the base path.
    #[arg(long, default_value = "data/network.json")]
    data: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let data_path = util::asset_path(&args.base_path, &args.data);
    info!(path = %data_path.display(), "starting explorer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ensemble Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(app::NetworkExplorerApp::new(cc, data_path)))),
    )
    .map_err(|error| anyhow!("{error}"))
    .context("explorer window failed")
}
