#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Fleetdeck dashboard.

mod app;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleetdeck_rendering::{Presentation, RenderingBackend, Scene, SKY_COLOR};
use fleetdeck_rendering_macroquad::{MacroquadBackend, Theme};
use fleetdeck_session::{LogFilter, DEFAULT_LOG_LIMIT};
use fleetdeck_transport_ws::WsTransport;

use crate::app::App;

#[derive(Debug, Parser)]
#[command(name = "fleetdeck", about = "Live-ops dashboard for a game bot fleet")]
struct Args {
    /// WebSocket URL of the fleet server.
    #[arg(long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Per-bot debug log retention limit.
    #[arg(long, default_value_t = DEFAULT_LOG_LIMIT)]
    log_limit: usize,

    /// Also mirror secure-transport (HTTPS) log traffic to the console.
    #[arg(long)]
    show_all_logs: bool,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,

    /// Draw a frames-per-second readout.
    #[arg(long)]
    show_fps: bool,

    /// Path to a TOML color theme manifest.
    #[arg(long)]
    theme: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let log_filter = LogFilter {
        show_all: args.show_all_logs,
        show_secure: args.show_all_logs,
    };

    let mut backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);
    if let Some(path) = args.theme {
        backend = backend.with_theme(Theme::from_manifest_path(path)?);
    }

    let transport = WsTransport::new(args.url);
    let mut app = App::new(transport, log_filter, args.log_limit);
    app.dial_now(Instant::now());

    let presentation = Presentation::new("Fleetdeck", SKY_COLOR, Scene::empty());
    backend.run(presentation, move |_frame_dt, input, scene| {
        app.frame(Instant::now(), input, scene);
    })
}
