use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use vsync_common::{round_to_cents, Secret};

/// Variant title used when a product has no populated option groups.
pub const DEFAULT_VARIANT_TITLE: &str = "Default Variant";
/// Inventory policy assigned to every synthesized variant.
pub const INVENTORY_POLICY_CONTINUE: &str = "continue";
pub const DEFAULT_WEIGHT_UNIT: &str = "lb";

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion from string: {0}")]
pub struct ConversionError(String);

//--------------------------------------   ModifierKind     ---------------------------------------------------------
/// How the options of a variant group affect the price of a synthesized variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ModifierKind {
    /// The option value is a weight in ounces and the base price is per pound.
    Weight,
    /// The option value is a flat amount added to the price.
    Fee,
    /// The option is a label only.
    None,
}

impl ModifierKind {
    /// Whether options in a group of this kind must carry a modifier value.
    pub fn requires_value(&self) -> bool {
        !matches!(self, ModifierKind::None)
    }
}

impl Display for ModifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModifierKind::Weight => write!(f, "WEIGHT"),
            ModifierKind::Fee => write!(f, "FEE"),
            ModifierKind::None => write!(f, "NONE"),
        }
    }
}

impl FromStr for ModifierKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WEIGHT" => Ok(Self::Weight),
            "FEE" => Ok(Self::Fee),
            "NONE" => Ok(Self::None),
            s => Err(ConversionError(format!("Invalid modifier kind: {s}"))),
        }
    }
}

//--------------------------------------   VariantGroup     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VariantOption {
    pub id: i64,
    pub group_id: i64,
    pub label: String,
    pub modifier_value: Option<f64>,
    pub position: i64,
}

/// An option of a group that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroupOption {
    pub label: String,
    pub modifier_value: Option<f64>,
    pub position: i64,
}

impl NewGroupOption {
    pub fn in_group(&self, group_id: i64) -> NewVariantOption {
        NewVariantOption {
            group_id,
            label: self.label.clone(),
            modifier_value: self.modifier_value,
            position: self.position,
        }
    }
}

/// A variant group and its options, stored together.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariantGroupWithOptions {
    pub group: NewVariantGroup,
    pub options: Vec<NewGroupOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VariantGroup {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub modifier_kind: ModifierKind,
    pub position: i64,
    #[sqlx(skip)]
    #[serde(default)]
    pub options: Vec<VariantOption>,
}

impl VariantGroup {
    pub fn with_options(self, options: Vec<VariantOption>) -> Self {
        Self { options, ..self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVariantGroup {
    pub product_id: i64,
    pub name: String,
    pub modifier_kind: ModifierKind,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVariantOption {
    pub group_id: i64,
    pub label: String,
    pub modifier_value: Option<f64>,
    pub position: i64,
}

//--------------------------------------      Product       ---------------------------------------------------------
/// A storefront product that has been configured for variant synthesis.
///
/// The merchant edits the *base* product. The synthesized variants live on a separate *variant* product, which is
/// created on the first sync and remembered in `variant_shopify_product_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub base_shopify_product_id: i64,
    pub title: String,
    pub variant_shopify_product_id: Option<i64>,
    pub sell_by_weight: bool,
    pub weight_unit: String,
    pub price_label: bool,
    pub additional_label: Option<String>,
    pub price_string_metafield_id: Option<i64>,
    pub price_label_metafield_id: Option<i64>,
    pub additional_label_metafield_id: Option<i64>,
    #[sqlx(skip)]
    #[serde(default)]
    pub variant_groups: Vec<VariantGroup>,
}

impl Product {
    pub fn new(base_shopify_product_id: i64) -> Self {
        Self {
            base_shopify_product_id,
            title: String::default(),
            variant_shopify_product_id: None,
            sell_by_weight: false,
            weight_unit: DEFAULT_WEIGHT_UNIT.to_string(),
            price_label: false,
            additional_label: None,
            price_string_metafield_id: None,
            price_label_metafield_id: None,
            additional_label_metafield_id: None,
            variant_groups: Vec::new(),
        }
    }

    pub fn with_variant_groups(self, variant_groups: Vec<VariantGroup>) -> Self {
        Self { variant_groups, ..self }
    }

    /// The subtitle text, if the merchant has set a non-blank one.
    pub fn subtitle(&self) -> Option<&str> {
        self.additional_label.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

//--------------------------------------  SynthesizedVariant  -------------------------------------------------------
/// One concrete purchasable variant, derived from a combination of options.
///
/// `to_multiply` and `to_add` record how the price was derived from the base price, so that the price can be
/// recomputed when the base price changes without expanding the groups again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SynthesizedVariant {
    /// The base product this variant was synthesized for.
    pub shopify_product_id: i64,
    pub title: String,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub option1_variant: Option<i64>,
    pub option2_variant: Option<i64>,
    pub option3_variant: Option<i64>,
    pub price: f64,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub to_multiply: Option<f64>,
    pub to_add: Option<f64>,
    pub taxable: bool,
    pub inventory_policy: String,
    pub shopify_variant_id: Option<i64>,
    pub position: Option<i64>,
}

impl SynthesizedVariant {
    pub fn default_variant(product_id: i64, base_price: f64, taxable: bool) -> Self {
        Self {
            shopify_product_id: product_id,
            title: DEFAULT_VARIANT_TITLE.to_string(),
            option1: None,
            option2: None,
            option3: None,
            option1_variant: None,
            option2_variant: None,
            option3_variant: None,
            price: base_price,
            weight: None,
            weight_unit: None,
            to_multiply: None,
            to_add: None,
            taxable,
            inventory_policy: INVENTORY_POLICY_CONTINUE.to_string(),
            shopify_variant_id: None,
            position: None,
        }
    }

    /// The price of this variant for the given base price: `base * to_multiply + to_add`, with absent terms
    /// treated as the identity.
    pub fn price_for_base(&self, base_price: f64) -> f64 {
        base_price * self.to_multiply.unwrap_or(1.0) + self.to_add.unwrap_or(0.0)
    }

    pub fn with_remote_ids(self, shopify_variant_id: i64, position: i64) -> Self {
        Self { shopify_variant_id: Some(shopify_variant_id), position: Some(position), ..self }
    }

    pub fn rounded(self) -> Self {
        Self { price: round_to_cents(self.price), ..self }
    }
}

//--------------------------------------    UpdateStatus     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusType {
    InProgress,
    Success,
    Failure,
}

impl Display for StatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusType::InProgress => write!(f, "IN_PROGRESS"),
            StatusType::Success => write!(f, "SUCCESS"),
            StatusType::Failure => write!(f, "FAILURE"),
        }
    }
}

impl FromStr for StatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "SUCCESS" => Ok(Self::Success),
            "FAILURE" => Ok(Self::Failure),
            s => Err(ConversionError(format!("Invalid status: {s}"))),
        }
    }
}

/// A record of one price propagation run, for display in the merchant UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UpdateStatus {
    pub id: i64,
    pub product_name: String,
    pub status: StatusType,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UpdateStatus {
    pub fn succeeded(self) -> Self {
        Self { status: StatusType::Success, ..self }
    }

    pub fn failed<S: Into<String>>(self, message: S) -> Self {
        Self { status: StatusType::Failure, message: message.into(), ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpdateStatus {
    pub product_name: String,
    pub status: StatusType,
    pub message: String,
}

impl NewUpdateStatus {
    pub fn in_progress<S: Into<String>>(product_name: S) -> Self {
        Self { product_name: product_name.into(), status: StatusType::InProgress, message: String::default() }
    }
}

//--------------------------------------  ShopCredentials   ---------------------------------------------------------
/// The offline access token a shop granted when it installed the app.
#[derive(Debug, Clone)]
pub struct ShopCredentials {
    pub shop: String,
    pub access_token: Secret<String>,
}

impl ShopCredentials {
    pub fn new<S: Into<String>, T: Into<String>>(shop: S, access_token: T) -> Self {
        Self { shop: shop.into(), access_token: Secret::new(access_token.into()) }
    }
}
