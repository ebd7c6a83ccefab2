use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vs_api::sync_objects::SyncStage;

/// Published every time a variant sync moves to a new stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStageEvent {
    pub shop: String,
    pub product_id: i64,
    pub stage: SyncStage,
    pub timestamp: DateTime<Utc>,
}

impl SyncStageEvent {
    pub fn new<S: Into<String>>(shop: S, product_id: i64, stage: SyncStage) -> Self {
        Self { shop: shop.into(), product_id, stage, timestamp: Utc::now() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetafieldAction {
    Created,
    Updated,
    Deleted,
}

impl Display for MetafieldAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetafieldAction::Created => write!(f, "created"),
            MetafieldAction::Updated => write!(f, "updated"),
            MetafieldAction::Deleted => write!(f, "deleted"),
        }
    }
}

/// Published for every metafield operation performed on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldEvent {
    /// The remote (variant) product that owns the metafield.
    pub product_id: i64,
    pub metafield_id: i64,
    pub key: String,
    pub action: MetafieldAction,
}

impl MetafieldEvent {
    pub fn new<S: Into<String>>(product_id: i64, metafield_id: i64, key: S, action: MetafieldAction) -> Self {
        Self { product_id, metafield_id, key: key.into(), action }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    SyncStage(SyncStageEvent),
    Metafield(MetafieldEvent),
}
