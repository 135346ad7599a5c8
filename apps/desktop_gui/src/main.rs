mod backend_bridge;
mod controller;
mod media;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::InventHubApp;

/// Desktop client for the InventHub invention-sharing community.
#[derive(Debug, Parser)]
#[command(name = "inventhub", version)]
struct Args {
    /// Backend origin, e.g. http://127.0.0.1:8001 (`/api` is appended).
    #[arg(long)]
    backend_url: Option<String>,

    /// Name used for votes, comments, reviews and chat.
    #[arg(long)]
    display_name: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings = client_core::config::load_settings();
    if let Some(backend_url) = args.backend_url {
        settings.backend_url = backend_url;
    }
    if let Some(display_name) = args.display_name.filter(|name| !name.trim().is_empty()) {
        settings.display_name = display_name;
    }
    tracing::info!(
        backend_url = %settings.backend_url,
        display_name = %settings.display_name,
        "starting inventhub desktop"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("InventHub")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "InventHub",
        options,
        Box::new(move |_cc| Ok(Box::new(InventHubApp::new(cmd_tx, ui_rx, &settings)))),
    )
    .map_err(|err| anyhow!("desktop ui failed: {err}"))
}
