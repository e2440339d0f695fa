mod anilist;
mod config;
mod error;
mod lookup;
mod prompt;
mod seadex;
mod source;

use crate::anilist::AnilistClient;
use crate::config::{get_config, LookupConfig};
use crate::lookup::run_lookup;
use crate::prompt::ConsoleInput;
use crate::seadex::SeadexClient;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "animeid=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run() {
        let message = failure_message(&e);
        tracing::error!(error = %message, "Lookup aborted");
        println!("{}", message);
    }
}

/// The error and its causes on one line, never the backtrace.
fn failure_message(e: &anyhow::Error) -> String {
    format!("{:#}", e)
}

fn run() -> Result<()> {
    let cfg: LookupConfig = get_config()?;
    let client = Client::builder()
        .user_agent(concat!("animeid/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let anilist = AnilistClient::new(client.clone(), &cfg.anilist_url);
    let seadex = SeadexClient::new(client, &cfg.seadex_api_url, &cfg.seadex_base_url);

    run_lookup(
        &mut ConsoleInput::detect(),
        &mut io::stdout(),
        &anilist,
        &seadex,
        &cfg.nyaa_url,
    )
}
