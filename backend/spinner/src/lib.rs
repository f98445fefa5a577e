//! # Spinner
//!
//! Client side of the roulette: pick a random fid, ask for the profile, show it.
//!
//! ## Flow
//!
//! 1. Check the cooldown. A spin is only allowed 15 seconds after the previous one started.
//!
//! 2. Store the spin time **before** the request, so a slow upstream cannot be used to
//!    skip the cooldown.
//!
//! 3. Draw a fid uniformly from `[1, 500000]` and ask the gateway.
//!
//! 4. Not found / unavailable / malformed are retried right away with a fresh fid, at most
//!    3 lookups in total. After that the spin is reported as failed and the user spins again.
//!
//! ## Client State
//!
//! - Last spin time (epoch **ms**) in a JSON file, the only thing persisted
//! - Retry counter and current profile live on the [`controller::SpinController`]
//!
//! ## Gateways
//!
//! - [`gateway::ProxyGateway`]: the roulette server, `GET /api/random-user?fid=N`
//! - [`profiles::Directory`]: the user directory directly, no server needed
//!
//! ## Usage
//!
//! ```sh
//! spinner spin
//! spinner spin --wait
//! spinner status
//! spinner --direct spin
//! ```
use std::{path::PathBuf, time::Duration};

use anyhow::Error;
use profiles::Directory;
use reqwest::Client;
use tokio::time::sleep;
use tracing::info;

pub mod controller;
pub mod cooldown;
pub mod gateway;
pub mod sink;
pub mod store;
pub mod utils;

use controller::{Settings, SpinController, SpinError};
use cooldown::{Clock, Cooldown, SystemClock, format_remaining};
use gateway::{Gateway, ProxyGateway};
use sink::TerminalSink;
use store::FileStore;

const TICK: Duration = Duration::from_secs(1);

pub enum Source {
    Proxy { url: String },
    Directory { url: String, api_key: String },
}

pub enum Command {
    Spin { wait: bool },
    Status,
}

pub struct Options {
    pub source: Source,
    pub state_file: PathBuf,
    pub settings: Settings,
    pub muted: bool,
}

pub async fn run(options: Options, command: Command) -> Result<(), Error> {
    match command {
        Command::Status => {
            status(&options);
            Ok(())
        }
        Command::Spin { wait } => {
            let client = Client::new();

            match &options.source {
                Source::Proxy { url } => {
                    info!("Spinning through proxy {url}");
                    spin(ProxyGateway::new(client, url), &options, wait).await
                }
                Source::Directory { url, api_key } => {
                    info!("Spinning directly against {url}");
                    spin(Directory::new(client, url, api_key), &options, wait).await
                }
            }
        }
    }
}

fn status(options: &Options) {
    let cooldown = Cooldown::new(
        FileStore::new(&options.state_file),
        options.settings.cooldown,
    );

    match cooldown.remaining(SystemClock.now_ms()) {
        None => println!("A spin is available."),
        Some(remaining) => println!("Next spin in {}", format_remaining(remaining)),
    }
}

async fn spin<G: Gateway>(gateway: G, options: &Options, wait: bool) -> Result<(), Error> {
    let mut controller = SpinController::new(
        gateway,
        FileStore::new(&options.state_file),
        SystemClock,
        TerminalSink::new(options.muted),
        options.settings,
    );

    if wait {
        while controller.tick().is_some() {
            sleep(TICK).await;
        }
    }

    match controller.spin().await {
        Ok(_) | Err(SpinError::CooldownActive { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
