//! [`CommercePlatform`] backed by the Shopify Admin REST API.
use log::*;
use shopify_tools::{
    helpers::{parse_shopify_price, shopify_price},
    NewMetafield,
    ProductInput,
    ProductOption,
    ShopifyApi,
    ShopifyApiError,
    ShopifyProduct,
    VariantInput,
};
use variant_engine::{
    db_types::ShopCredentials,
    traits::{
        CommercePlatform,
        MetafieldInput,
        OptionDescriptor,
        PlatformError,
        PriceUpdate,
        ProductSubmission,
        RemoteProduct,
        RemoteVariant,
        VariantSubmission,
    },
};

#[derive(Clone)]
pub struct ShopifyPlatform {
    api: ShopifyApi,
}

impl ShopifyPlatform {
    pub fn new(api: ShopifyApi) -> Self {
        Self { api }
    }
}

/// Sorts client errors into the categories the engine acts on.
pub fn platform_error(e: ShopifyApiError) -> PlatformError {
    if e.is_transient() {
        return PlatformError::Transport(e.to_string());
    }
    match e {
        ShopifyApiError::QueryError { message, .. } => PlatformError::Rejected(message),
        ShopifyApiError::UserErrors(message) => PlatformError::Rejected(message),
        e => PlatformError::InvalidResponse(e.to_string()),
    }
}

fn remote_product(product: ShopifyProduct) -> Result<RemoteProduct, PlatformError> {
    let variants = product
        .variants
        .into_iter()
        .map(|v| {
            let price = parse_shopify_price(&v.price).map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;
            Ok(RemoteVariant { id: v.id, price, taxable: v.taxable.unwrap_or(true), position: v.position })
        })
        .collect::<Result<Vec<_>, PlatformError>>()?;
    Ok(RemoteProduct { id: product.id, title: product.title, variants })
}

fn variant_input(v: &VariantSubmission) -> VariantInput {
    VariantInput {
        id: None,
        title: Some(v.title.clone()),
        option1: v.option1.clone(),
        option2: v.option2.clone(),
        option3: v.option3.clone(),
        price: shopify_price(v.price),
        weight: v.weight,
        weight_unit: v.weight_unit.clone(),
        taxable: Some(v.taxable),
        inventory_policy: Some(v.inventory_policy.clone()),
    }
}

fn option_input(o: &OptionDescriptor) -> ProductOption {
    ProductOption { name: o.name.clone(), position: Some(o.position), values: o.values.clone() }
}

fn product_input(product: &ProductSubmission) -> ProductInput {
    ProductInput {
        id: product.id,
        title: product.title.clone(),
        tags: product.tags.clone(),
        options: Some(product.options.iter().map(option_input).collect()),
        variants: product.variants.iter().map(variant_input).collect(),
    }
}

fn metafield_input(m: &MetafieldInput) -> NewMetafield {
    NewMetafield::text(&m.namespace, &m.key, &m.value)
}

impl CommercePlatform for ShopifyPlatform {
    async fn get_root_product(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
    ) -> Result<RemoteProduct, PlatformError> {
        let product = self
            .api
            .get_product(&credentials.shop, credentials.access_token.reveal(), product_id)
            .await
            .map_err(platform_error)?;
        remote_product(product)
    }

    async fn create_product(
        &self,
        credentials: &ShopCredentials,
        product: &ProductSubmission,
    ) -> Result<RemoteProduct, PlatformError> {
        let input = product_input(product);
        let created = self
            .api
            .create_product(&credentials.shop, credentials.access_token.reveal(), &input)
            .await
            .map_err(platform_error)?;
        remote_product(created)
    }

    async fn update_product(
        &self,
        credentials: &ShopCredentials,
        product: &ProductSubmission,
    ) -> Result<RemoteProduct, PlatformError> {
        let input = product_input(product);
        let updated = self
            .api
            .update_product(&credentials.shop, credentials.access_token.reveal(), &input)
            .await
            .map_err(platform_error)?;
        remote_product(updated)
    }

    async fn update_product_variants_batch(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        prices: &[PriceUpdate],
    ) -> Result<(), PlatformError> {
        if prices.is_empty() {
            debug!("🛍️ No variant prices to update on product {product_id}");
            return Ok(());
        }
        let variants = prices.iter().map(|p| VariantInput::price_update(p.variant_id, shopify_price(p.price))).collect();
        self.api
            .update_variant_prices(&credentials.shop, credentials.access_token.reveal(), product_id, variants)
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    async fn create_metafield(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        metafield: &MetafieldInput,
    ) -> Result<i64, PlatformError> {
        let created = self
            .api
            .create_metafield(&credentials.shop, credentials.access_token.reveal(), product_id, &metafield_input(metafield))
            .await
            .map_err(platform_error)?;
        Ok(created.id)
    }

    async fn update_metafield(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        metafield_id: i64,
        metafield: &MetafieldInput,
    ) -> Result<(), PlatformError> {
        self.api
            .update_metafield(
                &credentials.shop,
                credentials.access_token.reveal(),
                product_id,
                metafield_id,
                &metafield_input(metafield),
            )
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    async fn delete_metafield(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        metafield_id: i64,
    ) -> Result<(), PlatformError> {
        self.api
            .delete_metafield(&credentials.shop, credentials.access_token.reveal(), product_id, metafield_id)
            .await
            .map_err(platform_error)
    }

    async fn delete_variant(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        variant_id: i64,
    ) -> Result<(), PlatformError> {
        self.api
            .delete_variant(&credentials.shop, credentials.access_token.reveal(), product_id, variant_id)
            .await
            .map_err(platform_error)
    }
}
