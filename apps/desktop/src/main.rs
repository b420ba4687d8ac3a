use std::{future::Future, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{FormFields, PredictionClient, PredictionForm, PredictionSession, SubmitOutcome};
use shared::domain::{District, LifecycleState};
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use config::{load_settings, Overrides, Settings};
use ui::render;

#[derive(Parser, Debug)]
#[command(
    name = "price-estimate",
    about = "Per-m² price estimates for Ho Chi Minh City real estate"
)]
struct Args {
    /// Base URL of the estimation backend.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Config file (defaults to ./price-estimate.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request one estimate and print it.
    Predict {
        #[arg(long, default_value_t = FormFields::INITIAL_LATITUDE, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, default_value_t = FormFields::INITIAL_LONGITUDE, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, default_value_t = FormFields::INITIAL_BEDROOMS)]
        bedrooms: u32,
        #[arg(long, default_value_t = District::Quan1)]
        district: District,
    },
    /// List selectable districts.
    Districts {
        /// Ask the backend which districts its model knows.
        #[arg(long)]
        remote: bool,
    },
    /// Edit the form and submit repeatedly from the terminal.
    Interactive,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(
        args.config.as_deref(),
        Overrides {
            api_base_url: args.api_url,
            request_timeout_secs: args.timeout_secs,
        },
    )?;
    tracing::debug!(
        api = %settings.api_base_url,
        timeout = ?settings.request_timeout(),
        "settings loaded"
    );

    match args.command {
        Command::Predict {
            lat,
            lon,
            bedrooms,
            district,
        } => block_on(predict_once(
            &settings,
            FormFields {
                latitude: Some(lat),
                longitude: Some(lon),
                bedrooms: Some(bedrooms),
                district: Some(district),
            },
        )),
        Command::Districts { remote: false } => {
            println!("{}", render::describe_local_districts());
            Ok(())
        }
        Command::Districts { remote: true } => block_on(print_remote_districts(&settings)),
        Command::Interactive => ui::terminal::run(settings),
    }
}

/// One-shot commands run on a single-threaded runtime.
fn block_on(future: impl Future<Output = Result<()>>) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?
        .block_on(future)
}

fn build_client(settings: &Settings) -> Result<PredictionClient> {
    PredictionClient::with_timeout(&settings.api_base_url, settings.request_timeout())
        .context("failed to build prediction client")
}

async fn predict_once(settings: &Settings, fields: FormFields) -> Result<()> {
    let mut session = PredictionSession::new(PredictionForm::new(fields), build_client(settings)?);

    match session.submit().await {
        SubmitOutcome::Dispatched(_) => {}
        SubmitOutcome::Rejected(err) => bail!("{} ({err})", err.user_message()),
        SubmitOutcome::AlreadyLoading => bail!("a prediction is already in progress"),
    }

    match session.form().state() {
        state @ LifecycleState::Success(_) => {
            if let Some(text) = render::describe_state(state) {
                println!("{text}");
            }
            Ok(())
        }
        LifecycleState::Failure(message) => bail!("{message}"),
        other => bail!("prediction ended in unexpected state {other:?}"),
    }
}

async fn print_remote_districts(settings: &Settings) -> Result<()> {
    let districts = build_client(settings)?
        .available_districts()
        .await
        .context("failed to fetch district list")?;
    for name in districts {
        println!("{name}");
    }
    Ok(())
}
