use std::env;

use log::*;
use shopify_tools::ShopifyConfig;
use variant_engine::db_types::ShopCredentials;
use vsync_common::{
    helpers::{env_flag, env_parse},
    Secret,
};

const DEFAULT_VSYNC_HOST: &str = "127.0.0.1";
const DEFAULT_VSYNC_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/variant_store.db";
/// The header Shopify uses for the webhook signature.
pub const SHOPIFY_HMAC_HEADER: &str = "X-Shopify-Hmac-SHA256";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If false, webhook signatures are not verified. **DANGER**
    pub hmac_checks: bool,
    /// Shopify Admin API configuration. The shared secret doubles as the webhook signing key.
    pub shopify_config: ShopifyConfig,
    /// A shop and its Admin API access token, stored at start-up. Used for custom apps installed on a single shop.
    pub shop_access: Option<ShopCredentials>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_VSYNC_HOST.to_string(),
            port: DEFAULT_VSYNC_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            hmac_checks: true,
            shopify_config: ShopifyConfig::default(),
            shop_access: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("VSYNC_HOST").ok().unwrap_or_else(|| DEFAULT_VSYNC_HOST.into());
        let port = env_parse::<u16>("VSYNC_PORT")
            .unwrap_or_else(|e| {
                error!("🪛️ {e} Using the default, {DEFAULT_VSYNC_PORT}, instead.");
                None
            })
            .unwrap_or(DEFAULT_VSYNC_PORT);
        let database_url = env::var("VSYNC_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ VSYNC_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let hmac_checks = env_flag("VSYNC_SHOPIFY_HMAC_CHECKS", true);
        if !hmac_checks {
            warn!("🚨️ Webhook HMAC checks are disabled. Anyone can trigger price updates. 🚨️");
        }
        let shopify_config = ShopifyConfig::new_from_env_or_default();
        let shop_access = shop_access_from_env();
        Self { host, port, database_url, hmac_checks, shopify_config, shop_access }
    }

    /// The key used to verify webhook signatures.
    pub fn hmac_secret(&self) -> Secret<String> {
        self.shopify_config.shared_secret.clone()
    }
}

fn shop_access_from_env() -> Option<ShopCredentials> {
    let shop = env::var("VSYNC_SHOPIFY_SHOP").ok().filter(|s| !s.trim().is_empty());
    let token = env::var("VSYNC_SHOPIFY_ACCESS_TOKEN").ok().filter(|s| !s.trim().is_empty());
    match (shop, token) {
        (Some(shop), Some(token)) => {
            info!("🪛️ An access token for {shop} was supplied and will be stored");
            Some(ShopCredentials::new(shop.trim(), token.trim()))
        },
        (Some(shop), None) => {
            warn!("🪛️ VSYNC_SHOPIFY_SHOP is set to {shop}, but VSYNC_SHOPIFY_ACCESS_TOKEN is not. Ignoring it.");
            None
        },
        (None, Some(_)) => {
            warn!("🪛️ VSYNC_SHOPIFY_ACCESS_TOKEN is set, but VSYNC_SHOPIFY_SHOP is not. Ignoring it.");
            None
        },
        (None, None) => None,
    }
}
