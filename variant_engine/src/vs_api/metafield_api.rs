//! Keeps the storefront metafields of a variant product in line with the product's display settings.
//!
//! Each managed metafield follows the same rules:
//!
//! | wanted | stored id | action                               |
//! |--------|-----------|--------------------------------------|
//! | no     | yes       | delete it remotely and forget the id |
//! | no     | no        | nothing                              |
//! | yes    | no        | create it and remember the id        |
//! | yes    | yes       | update the value in place            |
use log::*;

use crate::{
    db_types::{Product, ShopCredentials},
    events::{EventProducers, MetafieldAction, MetafieldEvent},
    traits::{CommercePlatform, MetafieldInput, VariantStore},
    vs_api::errors::SyncError,
};

pub const PRICE_STRING_KEY: &str = "SellByWeightPriceString";
pub const PRICE_LABEL_KEY: &str = "PriceUnit";
pub const SUBTITLE_KEY: &str = "Subtitle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagedField {
    PriceString,
    PriceLabel,
    Subtitle,
}

impl ManagedField {
    fn key(&self) -> &'static str {
        match self {
            ManagedField::PriceString => PRICE_STRING_KEY,
            ManagedField::PriceLabel => PRICE_LABEL_KEY,
            ManagedField::Subtitle => SUBTITLE_KEY,
        }
    }

    /// The value the metafield should hold, or `None` if it should not exist.
    fn desired_value(&self, product: &Product, base_price: f64) -> Option<String> {
        match self {
            ManagedField::PriceString => {
                product.sell_by_weight.then(|| format!("${base_price:.2} {}", product.weight_unit))
            },
            ManagedField::PriceLabel => product.price_label.then(|| product.weight_unit.clone()),
            ManagedField::Subtitle => product.subtitle().map(String::from),
        }
    }

    fn stored_id(&self, product: &Product) -> Option<i64> {
        match self {
            ManagedField::PriceString => product.price_string_metafield_id,
            ManagedField::PriceLabel => product.price_label_metafield_id,
            ManagedField::Subtitle => product.additional_label_metafield_id,
        }
    }

    fn with_stored_id(&self, product: &Product, id: Option<i64>) -> Product {
        let product = product.clone();
        match self {
            ManagedField::PriceString => Product { price_string_metafield_id: id, ..product },
            ManagedField::PriceLabel => Product { price_label_metafield_id: id, ..product },
            ManagedField::Subtitle => Product { additional_label_metafield_id: id, ..product },
        }
    }
}

pub struct MetafieldReconciler<'a, B, P> {
    db: &'a B,
    platform: &'a P,
    producers: &'a EventProducers,
}

impl<'a, B, P> MetafieldReconciler<'a, B, P>
where
    B: VariantStore,
    P: CommercePlatform,
{
    pub fn new(db: &'a B, platform: &'a P, producers: &'a EventProducers) -> Self {
        Self { db, platform, producers }
    }

    /// Runs all three routines against the product's variant product, using `base_price` for the price string.
    ///
    /// Every routine is attempted even if an earlier one fails. The failures are reported together.
    pub async fn reconcile_all(
        &self,
        credentials: &ShopCredentials,
        product: &Product,
        base_price: f64,
    ) -> Result<Product, SyncError> {
        let mut current = product.clone();
        let mut errors = Vec::new();
        for field in [ManagedField::PriceString, ManagedField::PriceLabel, ManagedField::Subtitle] {
            match self.reconcile(field, credentials, &current, base_price).await {
                Ok(updated) => current = updated,
                Err(e) => {
                    warn!("🏷️ Could not reconcile the {} metafield: {e}", field.key());
                    errors.push(format!("{}: {e}", field.key()));
                },
            }
        }
        if errors.is_empty() {
            Ok(current)
        } else {
            Err(SyncError::Metafield(errors.join("; ")))
        }
    }

    pub async fn reconcile_price_string(
        &self,
        credentials: &ShopCredentials,
        product: &Product,
        base_price: f64,
    ) -> Result<Product, SyncError> {
        self.reconcile(ManagedField::PriceString, credentials, product, base_price).await
    }

    pub async fn reconcile_price_label(
        &self,
        credentials: &ShopCredentials,
        product: &Product,
    ) -> Result<Product, SyncError> {
        self.reconcile(ManagedField::PriceLabel, credentials, product, 0.0).await
    }

    pub async fn reconcile_subtitle(
        &self,
        credentials: &ShopCredentials,
        product: &Product,
    ) -> Result<Product, SyncError> {
        self.reconcile(ManagedField::Subtitle, credentials, product, 0.0).await
    }

    async fn reconcile(
        &self,
        field: ManagedField,
        credentials: &ShopCredentials,
        product: &Product,
        base_price: f64,
    ) -> Result<Product, SyncError> {
        let Some(remote_id) = product.variant_shopify_product_id else {
            debug!("🏷️ Product {} has no variant product yet. Skipping metafields", product.base_shopify_product_id);
            return Ok(product.clone());
        };
        let key = field.key();
        match (field.desired_value(product, base_price), field.stored_id(product)) {
            (None, None) => {
                trace!("🏷️ {key} is not wanted on product {remote_id}. Nothing to do");
                Ok(product.clone())
            },
            (None, Some(metafield_id)) => {
                self.platform.delete_metafield(credentials, remote_id, metafield_id).await?;
                info!("🏷️ Deleted {key} metafield {metafield_id} from product {remote_id}");
                self.publish(remote_id, metafield_id, key, MetafieldAction::Deleted).await;
                self.store(field.with_stored_id(product, None)).await
            },
            (Some(value), None) => {
                let input = MetafieldInput::new(key, value);
                let metafield_id = self.platform.create_metafield(credentials, remote_id, &input).await?;
                info!("🏷️ Created {key} metafield {metafield_id} on product {remote_id}");
                self.publish(remote_id, metafield_id, key, MetafieldAction::Created).await;
                self.store(field.with_stored_id(product, Some(metafield_id))).await
            },
            (Some(value), Some(metafield_id)) => {
                let input = MetafieldInput::new(key, value);
                self.platform.update_metafield(credentials, remote_id, metafield_id, &input).await?;
                debug!("🏷️ Updated {key} metafield {metafield_id} on product {remote_id}");
                self.publish(remote_id, metafield_id, key, MetafieldAction::Updated).await;
                Ok(product.clone())
            },
        }
    }

    async fn store(&self, product: Product) -> Result<Product, SyncError> {
        let saved = self.db.update_product(&product).await?;
        Ok(Product { variant_groups: product.variant_groups, ..saved })
    }

    async fn publish(&self, product_id: i64, metafield_id: i64, key: &str, action: MetafieldAction) {
        self.producers.publish_metafield(MetafieldEvent::new(product_id, metafield_id, key, action)).await;
    }
}
