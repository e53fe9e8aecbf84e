//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::repository::BackendConfig;

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    25
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Root of the REST backend, e.g. `https://api.example.org/api/`.
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Rows per list page when the query string does not say otherwise.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl ServerConfig {
    pub fn backend(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.api_base_url.clone(),
            token: self.api_token.clone().filter(|t| !t.trim().is_empty()),
            timeout_secs: self.request_timeout_secs,
        }
    }
}
