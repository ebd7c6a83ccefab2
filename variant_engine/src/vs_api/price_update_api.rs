use std::fmt::Debug;

use log::*;
use vsync_common::round_to_cents;

use crate::{
    db_types::{NewUpdateStatus, Product, UpdateStatus},
    events::EventProducers,
    traits::{CommercePlatform, PlatformError, PriceUpdate, VariantStore},
    vs_api::{
        errors::SyncError,
        metafield_api::MetafieldReconciler,
        product_locks::ProductLocks,
        sync_objects::ProductUpdate,
    },
};

/// `PriceUpdateApi` reprices a product's synthesized variants when the price of its root product changes.
///
/// Prices are derived from the factors stored with each variant, so the variant groups are never consulted. Running
/// the same update twice produces the same prices.
pub struct PriceUpdateApi<B, P> {
    db: B,
    platform: P,
    locks: ProductLocks,
    producers: EventProducers,
}

impl<B, P> Debug for PriceUpdateApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PriceUpdateApi")
    }
}

impl<B, P> PriceUpdateApi<B, P> {
    pub fn new(db: B, platform: P, locks: ProductLocks, producers: EventProducers) -> Self {
        Self { db, platform, locks, producers }
    }
}

impl<B, P> PriceUpdateApi<B, P>
where
    B: VariantStore,
    P: CommercePlatform,
{
    /// Handles a change to the root product.
    ///
    /// Returns `None` if the product does not have synthesized variants. Otherwise, returns the final status record
    /// of the update. Failures are recorded in the status and never returned as errors.
    pub async fn on_base_price_changed(&self, shop: &str, update: ProductUpdate) -> Option<UpdateStatus> {
        let product_id = update.product_id;
        // The product must be read under the lock, after any running save or sync has stored its changes
        let _guard = self.locks.lock(product_id).await;
        let product = match self.db.fetch_product(product_id).await {
            Ok(Some(p)) if p.variant_shopify_product_id.is_some() => p,
            Ok(_) => {
                info!("💲️ Product {product_id} ({}) has no synthesized variants. Nothing to update", update.title);
                return None;
            },
            Err(e) => {
                error!("💲️ Could not look up product {product_id}: {e}");
                return None;
            },
        };
        let status = match self.db.create_status(NewUpdateStatus::in_progress(update.title.as_str())).await {
            Ok(s) => s,
            Err(e) => {
                error!("💲️ Could not record the price update for product {product_id}: {e}");
                return None;
            },
        };
        debug!("💲️ Updating variant prices of product {product_id} to a base price of {:.2}", update.price);
        let status = match self.propagate(shop, &product, update.price).await {
            Ok(count) => {
                info!("💲️ Updated {count} variant prices for product {product_id}");
                status.succeeded()
            },
            Err(SyncError::RemoteRejection(body)) => {
                warn!("💲️ Shopify rejected the price update for product {product_id}: {body}");
                status.failed(body)
            },
            Err(e) => {
                error!("💲️ Price update for product {product_id} failed: {e}");
                let message = format!("{e}\n\n{}", status.message);
                status.failed(message)
            },
        };
        let status = match self.db.update_status(&status).await {
            Ok(saved) => saved,
            Err(e) => {
                error!("💲️ Could not save the outcome of price update #{}: {e}", status.id);
                status
            },
        };
        Some(status)
    }

    /// The most recent price update records, newest first.
    pub async fn recent_statuses(&self, limit: i64) -> Result<Vec<UpdateStatus>, SyncError> {
        let statuses = self.db.fetch_statuses(limit).await?;
        Ok(statuses)
    }

    async fn propagate(&self, shop: &str, product: &Product, base_price: f64) -> Result<usize, SyncError> {
        let product_id = product.base_shopify_product_id;
        let remote_id = product.variant_shopify_product_id.ok_or(SyncError::ProductNotFound(product_id))?;
        let credentials = self.db.fetch_access_credential(shop).await?;
        let variants = self.db.fetch_all_synthesized_variants(product_id).await?;
        let prices = variants
            .iter()
            .filter_map(|v| match v.shopify_variant_id {
                Some(variant_id) => Some(PriceUpdate { variant_id, price: round_to_cents(v.price_for_base(base_price)) }),
                None => {
                    warn!("💲️ Variant '{}' of product {product_id} has no Shopify id. Skipping it", v.title);
                    None
                },
            })
            .collect::<Vec<_>>();
        let pushed = self.platform.update_product_variants_batch(&credentials, remote_id, &prices).await;
        // Metafields follow the new price even when the storefront refused the variant prices.
        let metafields = match &pushed {
            Ok(()) | Err(PlatformError::Rejected(_)) => {
                MetafieldReconciler::new(&self.db, &self.platform, &self.producers)
                    .reconcile_all(&credentials, product, base_price)
                    .await
                    .map(|_| ())
            },
            Err(_) => Ok(()),
        };
        pushed?;
        metafields?;
        Ok(prices.len())
    }
}
