use std::sync::Arc;

use profiles::Directory;
use reqwest::Client;

use super::config::Config;

pub struct State {
    pub config: Config,
    pub directory: Directory,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, reqwest::Error> {
        let client = Client::builder().timeout(config.upstream_timeout).build()?;
        let directory = Directory::new(client, &config.directory_url, &config.directory_key);

        Ok(Arc::new(Self { config, directory }))
    }
}
