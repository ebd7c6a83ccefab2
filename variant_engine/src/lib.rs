//! Variant Engine
//!
//! The variant engine turns a merchant's option groups (sizes sold by weight, add-ons that carry a fee, plain labels)
//! into the full set of concrete variants of a product, publishes them to the storefront, and keeps their prices in
//! step with the price of the product they were derived from. It is provider-agnostic.
//!
//! The library is divided into these main sections:
//! 1. Pure synthesis ([`mod@synthesis`]): the modifier rule, group ordering and the variant expander. Nothing in here
//!    performs I/O.
//! 2. Backend contracts ([`mod@traits`]). [`traits::VariantStore`] is the persistence contract and
//!    [`traits::CommercePlatform`] is the remote storefront. The SQLite backend lives in [`mod@sqlite`]. The data
//!    types it stores are defined in [`mod@db_types`] and are public.
//! 3. The public API ([`mod@vs_api`]): saving and synchronising variant configurations, propagating price changes and
//!    reconciling product metafields.
//!
//! The engine also publishes events (see [`mod@events`]) for every stage of a sync and every metafield operation, so
//! that callers can hook into them.
pub mod db_types;
pub mod events;
pub mod synthesis;
pub mod traits;
mod vs_api;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use vs_api::{
    errors::SyncError,
    metafield_api::{MetafieldReconciler, PRICE_LABEL_KEY, PRICE_STRING_KEY, SUBTITLE_KEY},
    price_update_api::PriceUpdateApi,
    product_locks::ProductLocks,
    sync_objects,
    variant_sync_api::{map_remote_ids, VariantSyncApi},
};
