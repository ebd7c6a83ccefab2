use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Product, ShopCredentials, SynthesizedVariant},
    events::{EventProducers, SyncStageEvent},
    synthesis::{build_option_descriptors, expand, sort_variant_groups, ValidationError, MAX_VARIANT_GROUPS},
    traits::{
        CommercePlatform,
        ProductSubmission,
        RemoteProduct,
        RemoteVariant,
        VariantStore,
        VariantSubmission,
        VARIANT_PRODUCT_TAG,
        VARIANT_PRODUCT_TITLE_PREFIX,
    },
    vs_api::{
        errors::SyncError,
        metafield_api::MetafieldReconciler,
        product_locks::ProductLocks,
        sync_objects::{ConfigurationPreview, SyncResult, SyncStage, VariantConfiguration},
    },
};

/// Logs and publishes every stage a single sync passes through.
struct StageTracker<'a> {
    shop: &'a str,
    product_id: i64,
    producers: &'a EventProducers,
}

impl<'a> StageTracker<'a> {
    async fn enter(&self, stage: SyncStage) {
        match &stage {
            SyncStage::Failed(reason) => warn!("🔄️ Sync of product {} failed: {reason}", self.product_id),
            stage if stage.is_terminal() => trace!("🔄️ Sync of product {} is complete", self.product_id),
            stage => debug!("🔄️ Sync of product {} entered {stage}", self.product_id),
        }
        self.producers.publish_sync_stage(SyncStageEvent::new(self.shop, self.product_id, stage)).await;
    }
}

/// `VariantSyncApi` handles the merchant-initiated actions on a product's variants: saving a new configuration,
/// re-synchronising the storefront with the stored configuration, and clearing the configuration.
pub struct VariantSyncApi<B, P> {
    db: B,
    platform: P,
    locks: ProductLocks,
    producers: EventProducers,
}

impl<B, P> Debug for VariantSyncApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VariantSyncApi")
    }
}

impl<B, P> VariantSyncApi<B, P> {
    pub fn new(db: B, platform: P, locks: ProductLocks, producers: EventProducers) -> Self {
        Self { db, platform, locks, producers }
    }
}

impl<B, P> VariantSyncApi<B, P>
where
    B: VariantStore,
    P: CommercePlatform,
{
    /// The stored configuration for a product. Products that have never been configured get the defaults.
    pub async fn fetch_configuration(&self, product_id: i64) -> Result<Product, SyncError> {
        let product = self.db.fetch_product_with_variant_groups(product_id).await?;
        Ok(product.unwrap_or_else(|| Product::new(product_id)))
    }

    /// Option prices for the stored configuration, at the root product's current price on the storefront.
    pub async fn preview_configuration(&self, shop: &str, product_id: i64) -> Result<ConfigurationPreview, SyncError> {
        let credentials = self.db.fetch_access_credential(shop).await?;
        let product = self.fetch_configuration(product_id).await?;
        let root = self.platform.get_root_product(&credentials, product_id).await?;
        let price = root
            .variants
            .first()
            .map(|v| v.price)
            .ok_or_else(|| SyncError::RemoteRejection(format!("Product {product_id} has no variants")))?;
        trace!("🔄️ Previewing {} variant groups of product {product_id} at {price:.2}", product.variant_groups.len());
        Ok(ConfigurationPreview::for_product(&product, price))
    }

    /// Replaces the stored configuration of a product with `config` and synchronises the storefront.
    ///
    /// Any failure is reported in the result rather than as an error.
    pub async fn save_variant_configuration(
        &self,
        shop: &str,
        product_id: i64,
        config: VariantConfiguration,
    ) -> SyncResult {
        let _guard = self.locks.lock(product_id).await;
        let result = self.save_locked(shop, product_id, &config).await;
        if let Err(e) = &result {
            warn!("🔄️ Could not save the variant configuration for product {product_id}: {e}");
        }
        result.into()
    }

    async fn save_locked(&self, shop: &str, product_id: i64, config: &VariantConfiguration) -> Result<(), SyncError> {
        config.validate()?;
        let product = match self.db.fetch_product_with_variant_groups(product_id).await? {
            Some(p) => p,
            None => {
                info!("🔄️ Product {product_id} is being configured for variants for the first time");
                self.db.create_product(&Product::new(product_id)).await?
            },
        };
        let groups = config
            .variant_groups
            .iter()
            .zip(1i64..)
            .map(|(group, position)| group.new_group_with_options(product_id, position))
            .collect::<Vec<_>>();
        self.db.replace_variant_configuration(&config.apply_to(product), &groups).await?;
        debug!("🔄️ Stored {} variant groups for product {product_id}", config.variant_groups.len());
        self.sync_locked(shop, product_id).await
    }

    async fn remove_variant_groups(&self, product: &Product) -> Result<(), SyncError> {
        for group in &product.variant_groups {
            for option in &group.options {
                self.db.delete_variant(option.id).await?;
            }
            self.db.delete_variant_group(group.id).await?;
        }
        Ok(())
    }

    /// Rebuilds the product's variants from its stored configuration and publishes them to the storefront.
    pub async fn sync_variants(&self, shop: &str, product_id: i64) -> SyncResult {
        let _guard = self.locks.lock(product_id).await;
        self.sync_locked(shop, product_id).await.into()
    }

    async fn sync_locked(&self, shop: &str, product_id: i64) -> Result<(), SyncError> {
        let tracker = StageTracker { shop, product_id, producers: &self.producers };
        let result = self.run_sync(&tracker, shop, product_id).await;
        match &result {
            Ok(()) => tracker.enter(SyncStage::Done).await,
            Err(e) => tracker.enter(SyncStage::Failed(e.to_string())).await,
        }
        result
    }

    async fn run_sync(&self, tracker: &StageTracker<'_>, shop: &str, product_id: i64) -> Result<(), SyncError> {
        tracker.enter(SyncStage::Start).await;
        let credentials = self.db.fetch_access_credential(shop).await?;
        let product =
            self.db.fetch_product_with_variant_groups(product_id).await?.ok_or(SyncError::ProductNotFound(product_id))?;
        if product.variant_groups.len() > MAX_VARIANT_GROUPS {
            return Err(ValidationError::TooManyGroups(product.variant_groups.len()).into());
        }

        tracker.enter(SyncStage::FetchRemoteRoot).await;
        let root = self.platform.get_root_product(&credentials, product_id).await?;
        let root_variant = match root.variants.as_slice() {
            [variant] => variant.clone(),
            [] => return Err(SyncError::RemoteRejection(format!("Product {product_id} has no variants"))),
            variants => return Err(ValidationError::RootHasMultipleVariants(variants.len()).into()),
        };

        tracker.enter(SyncStage::Expand).await;
        let groups = sort_variant_groups(product.variant_groups.clone())?;
        let variants = expand(&groups, root_variant.price, root_variant.taxable, product_id)?;
        let submission = ProductSubmission {
            options: build_option_descriptors(&groups),
            variants: variants.iter().map(VariantSubmission::from).collect(),
            ..ProductSubmission::default()
        };
        debug!("🔄️ Product {product_id} expands to {} variants", variants.len());

        tracker.enter(SyncStage::PushRemote).await;
        let remote = self.push(&credentials, &product, &root, submission).await?;

        tracker.enter(SyncStage::MapIds).await;
        let variants = map_remote_ids(variants, &remote.variants);

        tracker.enter(SyncStage::Persist).await;
        let product = Product { title: root.title.clone(), variant_shopify_product_id: Some(remote.id), ..product };
        let product = self.persist(product, &variants).await?;

        tracker.enter(SyncStage::ReconcileMetafields).await;
        MetafieldReconciler::new(&self.db, &self.platform, &self.producers)
            .reconcile_all(&credentials, &product, root_variant.price)
            .await?;
        info!("🔄️ Product {product_id} synced to variant product {} with {} variants", remote.id, variants.len());
        Ok(())
    }

    async fn push(
        &self,
        credentials: &ShopCredentials,
        product: &Product,
        root: &RemoteProduct,
        submission: ProductSubmission,
    ) -> Result<RemoteProduct, SyncError> {
        let remote = match product.variant_shopify_product_id {
            Some(id) => {
                let submission = ProductSubmission { id: Some(id), ..submission };
                self.platform.update_product(credentials, &submission).await?
            },
            None => {
                let submission = ProductSubmission {
                    title: Some(format!("{VARIANT_PRODUCT_TITLE_PREFIX}{}", root.title)),
                    tags: Some(VARIANT_PRODUCT_TAG.to_string()),
                    ..submission
                };
                let remote = self.platform.create_product(credentials, &submission).await?;
                info!("🔄️ Created variant product {} for product {}", remote.id, root.id);
                remote
            },
        };
        Ok(remote)
    }

    async fn persist(&self, product: Product, variants: &[SynthesizedVariant]) -> Result<Product, SyncError> {
        let product_id = product.base_shopify_product_id;
        let inconsistent = |e: &dyn std::fmt::Display| {
            error!(
                "🔄️ Data inconsistency! Variants for product {product_id} were published to Shopify but could not be \
                 saved locally. {e}"
            );
            SyncError::Persistence(e.to_string())
        };
        self.db.replace_synthesized_variants(product_id, variants).await.map_err(|e| inconsistent(&e))?;
        let saved = self.db.update_product(&product).await.map_err(|e| inconsistent(&e))?;
        Ok(Product { variant_groups: product.variant_groups, ..saved })
    }

    /// Deletes the product's synthesized variants from the storefront, then removes the stored variants and groups.
    pub async fn clear_variant_configuration(&self, shop: &str, product_id: i64) -> SyncResult {
        let _guard = self.locks.lock(product_id).await;
        match self.clear_locked(shop, product_id).await {
            Ok(count) => SyncResult::success(format!("Removed {count} variants")),
            Err(e) => {
                warn!("🔄️ Could not clear the variants of product {product_id}: {e}");
                e.into()
            },
        }
    }

    async fn clear_locked(&self, shop: &str, product_id: i64) -> Result<u64, SyncError> {
        let credentials = self.db.fetch_access_credential(shop).await?;
        let product =
            self.db.fetch_product_with_variant_groups(product_id).await?.ok_or(SyncError::ProductNotFound(product_id))?;
        let variants = self.db.fetch_all_synthesized_variants(product_id).await?;
        if let Some(remote_id) = product.variant_shopify_product_id {
            for variant_id in variants.iter().filter_map(|v| v.shopify_variant_id) {
                self.platform.delete_variant(&credentials, remote_id, variant_id).await?;
            }
        }
        let count = self.db.delete_all_synthesized_variants(product_id).await?;
        self.remove_variant_groups(&product).await?;
        info!("🔄️ Cleared {count} variants and {} groups from product {product_id}", product.variant_groups.len());
        Ok(count)
    }
}

/// Copies remote variant ids and positions onto the synthesized variants, matching them by their index.
///
/// The storefront returns variants in submission order. If the counts differ, only the overlapping prefix is mapped.
/// Prices are rounded to whole cents on the way through.
pub fn map_remote_ids(variants: Vec<SynthesizedVariant>, remote: &[RemoteVariant]) -> Vec<SynthesizedVariant> {
    if variants.len() != remote.len() {
        warn!(
            "🔄️ Submitted {} variants but the storefront returned {}. Only the first {} will be linked",
            variants.len(),
            remote.len(),
            variants.len().min(remote.len())
        );
    }
    variants
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            let v = v.rounded();
            match remote.get(i) {
                Some(r) => v.with_remote_ids(r.id, r.position.unwrap_or(i as i64 + 1)),
                None => v,
            }
        })
        .collect()
}
