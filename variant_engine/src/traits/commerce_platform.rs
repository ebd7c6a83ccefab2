use thiserror::Error;

use super::data_objects::{MetafieldInput, PriceUpdate, ProductSubmission, RemoteProduct};
use crate::db_types::ShopCredentials;

#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The platform understood the request and refused it. The message carries the platform's explanation.
    #[error("{0}")]
    Rejected(String),
    /// The request did not complete. Retrying later may succeed.
    #[error("Transport error. {0}")]
    Transport(String),
    #[error("Unexpected response from the platform. {0}")]
    InvalidResponse(String),
}

/// The remote e-commerce platform that hosts the products.
///
/// Every call is made on behalf of a single shop using that shop's credentials.
#[allow(async_fn_in_trait)]
pub trait CommercePlatform {
    async fn get_root_product(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
    ) -> Result<RemoteProduct, PlatformError>;
    async fn create_product(
        &self,
        credentials: &ShopCredentials,
        product: &ProductSubmission,
    ) -> Result<RemoteProduct, PlatformError>;
    /// Replaces the options and variants of the product identified by `product.id`. The platform must return the
    /// variants in submission order.
    async fn update_product(
        &self,
        credentials: &ShopCredentials,
        product: &ProductSubmission,
    ) -> Result<RemoteProduct, PlatformError>;
    /// Sets new prices on existing variants in a single request.
    async fn update_product_variants_batch(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        prices: &[PriceUpdate],
    ) -> Result<(), PlatformError>;
    /// Creates a metafield on a product and returns its id.
    async fn create_metafield(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        metafield: &MetafieldInput,
    ) -> Result<i64, PlatformError>;
    async fn update_metafield(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        metafield_id: i64,
        metafield: &MetafieldInput,
    ) -> Result<(), PlatformError>;
    async fn delete_metafield(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        metafield_id: i64,
    ) -> Result<(), PlatformError>;
    async fn delete_variant(
        &self,
        credentials: &ShopCredentials,
        product_id: i64,
        variant_id: i64,
    ) -> Result<(), PlatformError>;
}
