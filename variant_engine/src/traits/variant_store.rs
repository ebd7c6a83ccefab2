use thiserror::Error;

use crate::db_types::{
    NewUpdateStatus,
    NewVariantGroup,
    NewVariantGroupWithOptions,
    NewVariantOption,
    Product,
    ShopCredentials,
    SynthesizedVariant,
    UpdateStatus,
    VariantGroup,
    VariantOption,
};

#[derive(Debug, Clone, Error)]
pub enum VariantStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("Product {0} already exists")]
    ProductAlreadyExists(i64),
    #[error("No access credential is stored for {0}")]
    CredentialNotFound(String),
    #[error("Update status {0} does not exist")]
    StatusNotFound(i64),
}

impl From<sqlx::Error> for VariantStoreError {
    fn from(e: sqlx::Error) -> Self {
        VariantStoreError::DatabaseError(e.to_string())
    }
}

/// The persistence contract for variant configurations, synthesized variants, update statuses and shop credentials.
///
/// Backends must return variant groups ordered by `position` (then `id`), each group's options ordered the same way,
/// and synthesized variants ordered by `position`.
#[allow(async_fn_in_trait)]
pub trait VariantStore {
    /// Fetches a product without its variant groups.
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, VariantStoreError>;
    /// Fetches a product along with its variant groups and their options.
    async fn fetch_product_with_variant_groups(&self, product_id: i64) -> Result<Option<Product>, VariantStoreError>;
    async fn create_product(&self, product: &Product) -> Result<Product, VariantStoreError>;
    /// Updates the product flags, labels and remote ids. Variant groups are not touched.
    async fn update_product(&self, product: &Product) -> Result<Product, VariantStoreError>;
    async fn create_variant_group(&self, group: NewVariantGroup) -> Result<VariantGroup, VariantStoreError>;
    async fn create_variant(&self, option: NewVariantOption) -> Result<VariantOption, VariantStoreError>;
    async fn delete_variant(&self, option_id: i64) -> Result<(), VariantStoreError>;
    /// Deletes a variant group and any options it still has.
    async fn delete_variant_group(&self, group_id: i64) -> Result<(), VariantStoreError>;
    /// Deletes every synthesized variant of the product, returning the number of records removed.
    async fn delete_all_synthesized_variants(&self, product_id: i64) -> Result<u64, VariantStoreError>;
    async fn create_synthesized_variants(&self, variants: &[SynthesizedVariant]) -> Result<(), VariantStoreError>;
    async fn fetch_all_synthesized_variants(&self, product_id: i64) -> Result<Vec<SynthesizedVariant>, VariantStoreError>;

    /// Replaces the synthesized variants of a product. Backends that support transactions should override this so
    /// that the delete and the inserts are atomic.
    async fn replace_synthesized_variants(
        &self,
        product_id: i64,
        variants: &[SynthesizedVariant],
    ) -> Result<(), VariantStoreError> {
        self.delete_all_synthesized_variants(product_id).await?;
        self.create_synthesized_variants(variants).await
    }

    /// Stores the product's settings and replaces all of its variant groups with `groups`. Backends that support
    /// transactions should override this so that a failure leaves the previous configuration in place.
    async fn replace_variant_configuration(
        &self,
        product: &Product,
        groups: &[NewVariantGroupWithOptions],
    ) -> Result<Product, VariantStoreError> {
        if let Some(previous) = self.fetch_product_with_variant_groups(product.base_shopify_product_id).await? {
            for group in &previous.variant_groups {
                self.delete_variant_group(group.id).await?;
            }
        }
        let mut stored = Vec::with_capacity(groups.len());
        for new_group in groups {
            let group = self.create_variant_group(new_group.group.clone()).await?;
            let mut options = Vec::with_capacity(new_group.options.len());
            for option in &new_group.options {
                options.push(self.create_variant(option.in_group(group.id)).await?);
            }
            stored.push(group.with_options(options));
        }
        let saved = self.update_product(product).await?;
        Ok(saved.with_variant_groups(stored))
    }

    async fn create_status(&self, status: NewUpdateStatus) -> Result<UpdateStatus, VariantStoreError>;
    async fn update_status(&self, status: &UpdateStatus) -> Result<UpdateStatus, VariantStoreError>;
    /// The most recent update statuses, newest first.
    async fn fetch_statuses(&self, limit: i64) -> Result<Vec<UpdateStatus>, VariantStoreError>;
    async fn fetch_access_credential(&self, shop: &str) -> Result<ShopCredentials, VariantStoreError>;
    async fn save_access_credential(&self, credentials: &ShopCredentials) -> Result<(), VariantStoreError>;
}
