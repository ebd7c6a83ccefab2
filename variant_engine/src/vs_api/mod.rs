//! # Variant engine public API
//!
//! * [`variant_sync_api`] handles merchant actions: saving a variant configuration, re-synchronising a product with
//!   the storefront, and clearing a configuration.
//! * [`price_update_api`] reprices synthesized variants when the root product's price changes.
//! * [`metafield_api`] keeps the display metafields of the variant product current. Both of the APIs above call it.
//!
//! # API usage
//!
//! Each API is created from a [`crate::traits::VariantStore`] backend, a [`crate::traits::CommercePlatform`], a
//! shared [`ProductLocks`] instance and the event producers:
//!
//! ```rust,ignore
//! use variant_engine::{ProductLocks, SqliteDatabase, VariantSyncApi};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let locks = ProductLocks::new();
//! let api = VariantSyncApi::new(db, platform, locks.clone(), producers);
//! let result = api.sync_variants("my-shop.myshopify.com", 1001).await;
//! ```
//!
//! All APIs that touch a product share the same `ProductLocks`, so that work on one product never interleaves.
pub mod errors;
pub mod metafield_api;
pub mod price_update_api;
pub mod product_locks;
pub mod sync_objects;
pub mod variant_sync_api;

pub use product_locks::ProductLocks;
