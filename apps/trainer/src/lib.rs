pub mod cli;
pub mod commands;
pub mod config;
pub mod history;
pub mod session;
pub mod state;
pub mod store;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::state::{AppPaths, AppState};

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let paths = match cli.data_dir {
        Some(dir) => AppPaths::new(dir),
        None => AppPaths::resolve(),
    };

    let state = AppState::new(paths);
    commands::execute(&state, cli.command)
}
