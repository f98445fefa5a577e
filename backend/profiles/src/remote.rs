use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CACHE_CONTROL},
};
use tracing::{debug, warn};

use crate::{
    FetchError,
    models::{BulkResponse, ProfileRecord, into_record},
};

pub const DEFAULT_DIRECTORY_URL: &str = "https://api.neynar.com";
pub const DEMO_API_KEY: &str = "NEYNAR_API_DOCS";

const BULK_PATH: &str = "/v2/farcaster/user/bulk";
const API_KEY_HEADER: &str = "api_key";

/// Client for the external user directory.
///
/// One call to [`Directory::lookup`] is exactly one outbound request. Nothing is
/// cached and nothing is retried here.
#[derive(Clone)]
pub struct Directory {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Directory {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn lookup(&self, fid: u64) -> Result<ProfileRecord, FetchError> {
        let url = format!("{}{BULK_PATH}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("fids", fid)])
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                warn!("Directory request for fid {fid} failed: {e}");
                FetchError::UpstreamUnavailable
            })?;

        let status = response.status();
        debug!("Directory responded {status} for fid {fid}");

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }

        if !status.is_success() {
            warn!("Directory returned {status} for fid {fid}");
            return Err(FetchError::UpstreamUnavailable);
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!("Failed to read directory body for fid {fid}: {e}");
            FetchError::UpstreamUnavailable
        })?;

        let body: BulkResponse = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Undecodable directory body for fid {fid}: {e}");
            FetchError::Malformed
        })?;

        into_record(body)
    }
}
