//! Provider-agnostic shapes exchanged with a [`super::CommercePlatform`].
use serde::{Deserialize, Serialize};
use vsync_common::round_to_cents;

use crate::db_types::SynthesizedVariant;

/// Namespace used for every metafield the engine manages.
pub const METAFIELD_NAMESPACE: &str = "global";
/// Tag applied to products created by the engine.
pub const VARIANT_PRODUCT_TAG: &str = "auto";
/// Title prefix of products created by the engine. Merchants should not edit these products directly.
pub const VARIANT_PRODUCT_TITLE_PREFIX: &str = "AUTOMATIC (DO NOT TOUCH) ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteVariant {
    pub id: i64,
    pub price: f64,
    pub taxable: bool,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    pub title: String,
    pub variants: Vec<RemoteVariant>,
}

/// One product option definition, e.g. `Size` with values `8oz, 16oz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub name: String,
    pub position: i64,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSubmission {
    pub title: String,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    /// Rounded to whole cents.
    pub price: f64,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub taxable: bool,
    pub inventory_policy: String,
}

impl From<&SynthesizedVariant> for VariantSubmission {
    fn from(v: &SynthesizedVariant) -> Self {
        Self {
            title: v.title.clone(),
            option1: v.option1.clone(),
            option2: v.option2.clone(),
            option3: v.option3.clone(),
            price: round_to_cents(v.price),
            weight: v.weight,
            weight_unit: v.weight_unit.clone(),
            taxable: v.taxable,
            inventory_policy: v.inventory_policy.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductSubmission {
    /// The remote product to update. `None` when creating a product.
    pub id: Option<i64>,
    pub title: Option<String>,
    pub tags: Option<String>,
    pub options: Vec<OptionDescriptor>,
    pub variants: Vec<VariantSubmission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub variant_id: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldInput {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

impl MetafieldInput {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self { namespace: METAFIELD_NAMESPACE.to_string(), key: key.into(), value: value.into() }
    }
}
