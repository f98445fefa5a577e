use std::future::Future;

use profiles::{Directory, FetchError, ProfileRecord};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

const RANDOM_USER_PATH: &str = "/api/random-user";

/// Where the controller gets profiles from. One call, one request, no retries.
pub trait Gateway {
    fn fetch(&self, fid: u64) -> impl Future<Output = Result<ProfileRecord, FetchError>> + Send;
}

impl Gateway for Directory {
    async fn fetch(&self, fid: u64) -> Result<ProfileRecord, FetchError> {
        self.lookup(fid).await
    }
}

/// Talks to the roulette server's `/api/random-user`.
#[derive(Clone)]
pub struct ProxyGateway {
    client: Client,
    base_url: String,
}

impl ProxyGateway {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Gateway for ProxyGateway {
    async fn fetch(&self, fid: u64) -> Result<ProfileRecord, FetchError> {
        let url = format!("{}{RANDOM_USER_PATH}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("fid", fid)])
            .send()
            .await
            .map_err(|e| {
                warn!("Proxy request for fid {fid} failed: {e}");
                FetchError::UpstreamUnavailable
            })?;

        let status = response.status();
        debug!("Proxy responded {status} for fid {fid}");

        match status {
            StatusCode::OK => response.json::<ProfileRecord>().await.map_err(|e| {
                warn!("Undecodable proxy body for fid {fid}: {e}");
                FetchError::Malformed
            }),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            _ => Err(FetchError::UpstreamUnavailable),
        }
    }
}
