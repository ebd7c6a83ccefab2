//! # Backend contracts
//!
//! The engine talks to two outside systems, each behind a trait:
//!
//! * [`VariantStore`] persists variant configurations, synthesized variants, update statuses and shop credentials.
//! * [`CommercePlatform`] is the remote storefront that hosts the products and their metafields.
//!
//! The data objects exchanged with the platform are provider-agnostic. Adapters for a concrete platform
//! convert them to and from the platform's wire format.
mod commerce_platform;
mod data_objects;
mod variant_store;

pub use commerce_platform::{CommercePlatform, PlatformError};
pub use data_objects::{
    MetafieldInput,
    OptionDescriptor,
    PriceUpdate,
    ProductSubmission,
    RemoteProduct,
    RemoteVariant,
    VariantSubmission,
    METAFIELD_NAMESPACE,
    VARIANT_PRODUCT_TAG,
    VARIANT_PRODUCT_TITLE_PREFIX,
};
pub use variant_store::{VariantStore, VariantStoreError};
