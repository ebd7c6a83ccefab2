use std::time::Duration;

use log::*;
use vsync_common::{
    helpers::env_parse,
    Secret,
};

pub const DEFAULT_API_VERSION: &str = "2024-04";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    pub api_version: String,
    /// The shared secret of the Shopify app. Webhook payloads are signed with this key.
    pub shared_secret: Secret<String>,
    /// Overrides `https://{shop}` as the root of every Admin API URL. Useful for proxies and test servers.
    pub base_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            shared_secret: Secret::default(),
            base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ShopifyConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_version = std::env::var("VSYNC_SHOPIFY_API_VERSION").unwrap_or_else(|_| {
            warn!("VSYNC_SHOPIFY_API_VERSION not set, using {DEFAULT_API_VERSION} as default");
            DEFAULT_API_VERSION.to_string()
        });
        let shared_secret = Secret::new(std::env::var("VSYNC_SHOPIFY_API_SECRET").unwrap_or_else(|_| {
            warn!("VSYNC_SHOPIFY_API_SECRET not set, webhook signatures cannot be verified");
            String::default()
        }));
        let base_url = std::env::var("VSYNC_SHOPIFY_BASE_URL").ok().filter(|s| !s.trim().is_empty());
        if let Some(url) = &base_url {
            info!("Shopify Admin API requests will be sent to {url}");
        }
        let request_timeout = env_parse::<u64>("VSYNC_SHOPIFY_REQUEST_TIMEOUT")
            .unwrap_or_else(|e| {
                warn!("{e} Using the default timeout.");
                None
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        Self { api_version, shared_secret, base_url, request_timeout }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
