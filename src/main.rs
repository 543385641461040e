use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use crate::config::{Command, Config};
use crate::controller::AppState;

pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod report;
pub mod repositories;
pub mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    match config.command {
        Command::Serve(serve_config) => {
            info!("Starting restaurant search API");
            let app_state = AppState::from_config(&serve_config)?;
            controller::serve(app_state, &serve_config).await
        }
        Command::Report(report_config) => {
            info!("Generating restaurant report from {}", report_config.api_url);
            report::generate_report(&report_config).await
        }
    }
}
