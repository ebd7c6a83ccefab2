//! A small client for the parts of the Shopify Admin REST API used to publish synthesized variants: products,
//! product variants and product metafields.
mod api;
mod config;
mod error;
mod shopify_product;

pub mod data_objects;
pub mod helpers;

pub use api::ShopifyApi;
pub use config::{ShopifyConfig, DEFAULT_API_VERSION, DEFAULT_REQUEST_TIMEOUT};
pub use data_objects::{Metafield, NewMetafield, ProductInput, VariantInput};
pub use error::ShopifyApiError;
pub use shopify_product::{ProductOption, ShopifyProduct, Variant};
