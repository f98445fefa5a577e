use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use profiles::remote::{DEFAULT_DIRECTORY_URL, DEMO_API_KEY};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub directory_url: String,
    pub directory_key: String,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            directory_url: try_load("NEYNAR_API_URL", DEFAULT_DIRECTORY_URL),
            directory_key: read_secret("NEYNAR_API_KEY", DEMO_API_KEY),
            upstream_timeout: Duration::from_millis(try_load("UPSTREAM_TIMEOUT_MS", "10000")),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Docker secret first, then the environment, then `fallback`.
fn read_secret(secret_name: &str, fallback: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .or_else(|e| {
            info!("Secret file for {secret_name} unavailable ({e}), checking environment");
            var(secret_name)
        })
        .unwrap_or_else(|_| {
            warn!("{secret_name} not configured, falling back to the public demo key");
            fallback.to_string()
        })
}
