//! `SqliteDatabase` is the concrete SQLite implementation of [`VariantStore`].
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, products, shop_access, statuses, synthesized_variants, variant_groups};
use crate::{
    db_types::{
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
    },
    traits::{VariantStore, VariantStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL in `VSYNC_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, VariantStoreError> {
        let url = db_url();
        SqliteDatabase::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, VariantStoreError> {
        trace!("🗃️ Creating new database connection pool for {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding schema migrations.
    pub async fn migrate(&self) -> Result<(), VariantStoreError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| VariantStoreError::DatabaseError(e.to_string()))?;
        debug!("🗃️ Database migrations are up to date");
        Ok(())
    }
}

impl VariantStore for SqliteDatabase {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_product_with_variant_groups(&self, product_id: i64) -> Result<Option<Product>, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let Some(product) = products::fetch_product(product_id, &mut conn).await? else {
            return Ok(None);
        };
        let groups = variant_groups::fetch_groups_with_options(product_id, &mut conn).await?;
        Ok(Some(product.with_variant_groups(groups)))
    }

    async fn create_product(&self, product: &Product) -> Result<Product, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn update_product(&self, product: &Product) -> Result<Product, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let updated = products::update_product(product, &mut conn).await?;
        trace!("🗃️ Product {} updated", product.base_shopify_product_id);
        Ok(updated)
    }

    async fn create_variant_group(&self, group: NewVariantGroup) -> Result<VariantGroup, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let group = variant_groups::insert_group(group, &mut conn).await?;
        Ok(group)
    }

    async fn create_variant(&self, option: NewVariantOption) -> Result<VariantOption, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let option = variant_groups::insert_option(option, &mut conn).await?;
        Ok(option)
    }

    async fn delete_variant(&self, option_id: i64) -> Result<(), VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        variant_groups::delete_option(option_id, &mut conn).await?;
        Ok(())
    }

    async fn delete_variant_group(&self, group_id: i64) -> Result<(), VariantStoreError> {
        let mut tx = self.pool.begin().await?;
        variant_groups::delete_group(group_id, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_all_synthesized_variants(&self, product_id: i64) -> Result<u64, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let count = synthesized_variants::delete_for_product(product_id, &mut conn).await?;
        debug!("🗃️ Deleted {count} synthesized variants for product {product_id}");
        Ok(count)
    }

    async fn create_synthesized_variants(&self, variants: &[SynthesizedVariant]) -> Result<(), VariantStoreError> {
        let mut tx = self.pool.begin().await?;
        for variant in variants {
            synthesized_variants::insert_variant(variant, &mut tx).await?;
        }
        tx.commit().await?;
        debug!("🗃️ Inserted {} synthesized variants", variants.len());
        Ok(())
    }

    async fn fetch_all_synthesized_variants(&self, product_id: i64) -> Result<Vec<SynthesizedVariant>, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let variants = synthesized_variants::fetch_for_product(product_id, &mut conn).await?;
        Ok(variants)
    }

    /// Deletes and re-inserts the variants in a single transaction.
    async fn replace_synthesized_variants(
        &self,
        product_id: i64,
        variants: &[SynthesizedVariant],
    ) -> Result<(), VariantStoreError> {
        let mut tx = self.pool.begin().await?;
        let removed = synthesized_variants::delete_for_product(product_id, &mut tx).await?;
        for variant in variants {
            synthesized_variants::insert_variant(variant, &mut tx).await?;
        }
        tx.commit().await?;
        debug!("🗃️ Replaced {removed} synthesized variants of product {product_id} with {}", variants.len());
        Ok(())
    }

    /// Replaces the groups and updates the product in a single transaction.
    async fn replace_variant_configuration(
        &self,
        product: &Product,
        groups: &[NewVariantGroupWithOptions],
    ) -> Result<Product, VariantStoreError> {
        let product_id = product.base_shopify_product_id;
        let mut tx = self.pool.begin().await?;
        let removed = variant_groups::delete_groups_for_product(product_id, &mut tx).await?;
        let mut stored = Vec::with_capacity(groups.len());
        for new_group in groups {
            let group = variant_groups::insert_group(new_group.group.clone(), &mut tx).await?;
            let mut options = Vec::with_capacity(new_group.options.len());
            for option in &new_group.options {
                options.push(variant_groups::insert_option(option.in_group(group.id), &mut tx).await?);
            }
            stored.push(group.with_options(options));
        }
        let saved = products::update_product(product, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Replaced {removed} variant groups of product {product_id} with {}", stored.len());
        Ok(saved.with_variant_groups(stored))
    }

    async fn create_status(&self, status: NewUpdateStatus) -> Result<UpdateStatus, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let status = statuses::insert_status(status, &mut conn).await?;
        trace!("🗃️ Update status #{} created for {}", status.id, status.product_name);
        Ok(status)
    }

    async fn update_status(&self, status: &UpdateStatus) -> Result<UpdateStatus, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        statuses::update_status(status, &mut conn).await?.ok_or(VariantStoreError::StatusNotFound(status.id))
    }

    async fn fetch_statuses(&self, limit: i64) -> Result<Vec<UpdateStatus>, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        let statuses = statuses::fetch_recent(limit, &mut conn).await?;
        Ok(statuses)
    }

    async fn fetch_access_credential(&self, shop: &str) -> Result<ShopCredentials, VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        shop_access::fetch_access(shop, &mut conn).await?.ok_or_else(|| VariantStoreError::CredentialNotFound(shop.to_string()))
    }

    async fn save_access_credential(&self, credentials: &ShopCredentials) -> Result<(), VariantStoreError> {
        let mut conn = self.pool.acquire().await?;
        shop_access::upsert_access(credentials, &mut conn).await?;
        info!("🗃️ Access credential saved for {}", credentials.shop);
        Ok(())
    }
}
