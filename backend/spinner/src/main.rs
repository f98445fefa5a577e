use std::{io::stderr, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use profiles::remote::{DEFAULT_DIRECTORY_URL, DEMO_API_KEY};
use spinner::{
    Command, Options, Source,
    controller::{MAX_RETRIES, Settings},
    utils::UPPER_BOUND,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "SPINNER_PROXY_URL", default_value = "http://localhost:1111")]
    proxy_url: String,

    /// Skip the proxy and query the user directory directly.
    #[arg(long, env = "SPINNER_DIRECT")]
    direct: bool,

    #[arg(long, env = "NEYNAR_API_URL", default_value = DEFAULT_DIRECTORY_URL)]
    directory_url: String,

    #[arg(long, env = "NEYNAR_API_KEY", default_value = DEMO_API_KEY, hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "SPINNER_STATE_FILE", default_value = ".roulette/state.json")]
    state_file: PathBuf,

    #[arg(long, env = "SPINNER_COOLDOWN_SECS", default_value_t = 15)]
    cooldown_secs: u64,

    #[arg(long, env = "SPINNER_MAX_RETRIES", default_value_t = MAX_RETRIES)]
    max_retries: u32,

    #[arg(long, env = "SPINNER_UPPER_BOUND", default_value_t = UPPER_BOUND)]
    upper_bound: u64,

    #[arg(long, env = "SPINNER_MUTE")]
    mute: bool,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Spin the wheel once.
    Spin {
        /// Wait out the cooldown instead of giving up.
        #[arg(long)]
        wait: bool,
    },
    /// Show whether a spin is available.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(stderr)
        .init();

    let args = Args::parse();

    let source = if args.direct {
        Source::Directory {
            url: args.directory_url,
            api_key: args.api_key,
        }
    } else {
        Source::Proxy {
            url: args.proxy_url,
        }
    };

    let options = Options {
        source,
        state_file: args.state_file,
        settings: Settings {
            cooldown: Duration::from_secs(args.cooldown_secs),
            max_retries: args.max_retries,
            upper_bound: args.upper_bound,
        },
        muted: args.mute,
    };

    let command = match args.command.unwrap_or(Action::Spin { wait: false }) {
        Action::Spin { wait } => Command::Spin { wait },
        Action::Status => Command::Status,
    };

    spinner::run(options, command).await
}
