use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use vsync_common::parse_price;

use crate::{
    db_types::{ModifierKind, NewGroupOption, NewVariantGroup, NewVariantGroupWithOptions, Product},
    synthesis::{apply, preview_option_price, ValidationError, MAX_VARIANT_GROUPS},
    vs_api::errors::SyncError,
};

pub const MAX_OPTIONS_PER_GROUP: usize = 10;
pub const SUPPORTED_WEIGHT_UNITS: [&str; 2] = ["lb", "oz"];

//--------------------------------------     SyncStage      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStage {
    Start,
    FetchRemoteRoot,
    Expand,
    PushRemote,
    MapIds,
    Persist,
    ReconcileMetafields,
    Done,
    Failed(String),
}

impl SyncStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStage::Done | SyncStage::Failed(_))
    }
}

impl Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStage::Start => write!(f, "Start"),
            SyncStage::FetchRemoteRoot => write!(f, "FetchRemoteRoot"),
            SyncStage::Expand => write!(f, "Expand"),
            SyncStage::PushRemote => write!(f, "PushRemote"),
            SyncStage::MapIds => write!(f, "MapIds"),
            SyncStage::Persist => write!(f, "Persist"),
            SyncStage::ReconcileMetafields => write!(f, "ReconcileMetafields"),
            SyncStage::Done => write!(f, "Done"),
            SyncStage::Failed(reason) => write!(f, "Failed({reason})"),
        }
    }
}

//--------------------------------------     SyncResult     ---------------------------------------------------------
/// The outcome of a save or clear action, as reported back to the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub error: bool,
    pub message: String,
}

impl SyncResult {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self { error: false, message: message.into() }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self { error: true, message: message.into() }
    }
}

impl From<SyncError> for SyncResult {
    fn from(e: SyncError) -> Self {
        Self::failure(e.to_string())
    }
}

impl From<Result<(), SyncError>> for SyncResult {
    fn from(result: Result<(), SyncError>) -> Self {
        match result {
            Ok(()) => Self::success("Variants have been updated"),
            Err(e) => e.into(),
        }
    }
}

//--------------------------------------  ProductUpdate     ---------------------------------------------------------
/// A notification that the root product changed on the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub product_id: i64,
    pub title: String,
    /// The new price of the root product's only variant.
    pub price: f64,
}

//--------------------------------------  ConfigurationPreview -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPreview {
    pub group: String,
    pub label: String,
    /// The weighed price or the fee, formatted for display. Label-only options have none.
    pub price: Option<String>,
}

/// What each stored option would cost at the root product's current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationPreview {
    pub base_price: f64,
    pub options: Vec<OptionPreview>,
}

impl ConfigurationPreview {
    pub fn for_product(product: &Product, base_price: f64) -> Self {
        let options = product
            .variant_groups
            .iter()
            .flat_map(|g| {
                g.options.iter().map(move |o| OptionPreview {
                    group: g.name.clone(),
                    label: o.label.clone(),
                    price: preview_option_price(g.modifier_kind, base_price, o.modifier_value),
                })
            })
            .collect();
        Self { base_price, options }
    }
}

//--------------------------------------  VariantConfiguration -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionConfiguration {
    pub label: String,
    /// Accepts a number, a numeric string, an empty string or null.
    #[serde(default, deserialize_with = "deserialize_modifier_value")]
    pub modifier_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfiguration {
    pub name: String,
    pub modifier_kind: ModifierKind,
    #[serde(default)]
    pub options: Vec<OptionConfiguration>,
}

/// Everything the merchant submits when saving the variant editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantConfiguration {
    #[serde(default)]
    pub sell_by_weight: bool,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    #[serde(default)]
    pub price_label: bool,
    #[serde(default)]
    pub additional_label: Option<String>,
    #[serde(default)]
    pub variant_groups: Vec<GroupConfiguration>,
}

fn default_weight_unit() -> String {
    crate::db_types::DEFAULT_WEIGHT_UNIT.to_string()
}

fn deserialize_modifier_value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }
    match Option::<Raw>::deserialize(d)? {
        None => Ok(None),
        Some(Raw::Number(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => parse_price(&s).map(Some).map_err(serde::de::Error::custom),
    }
}

impl VariantConfiguration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let groups = &self.variant_groups;
        if groups.len() > MAX_VARIANT_GROUPS {
            return Err(ValidationError::TooManyGroups(groups.len()));
        }
        let weight_groups = groups.iter().filter(|g| g.modifier_kind == ModifierKind::Weight).count();
        if weight_groups > 1 {
            return Err(ValidationError::MultipleWeightGroups(weight_groups));
        }
        if !SUPPORTED_WEIGHT_UNITS.contains(&self.weight_unit.as_str()) {
            return Err(ValidationError::InvalidWeightUnit(self.weight_unit.clone()));
        }
        groups.iter().try_for_each(GroupConfiguration::validate)
    }

    /// A copy of `product` with this configuration's display settings applied. Variant groups are not copied.
    pub fn apply_to(&self, product: Product) -> Product {
        Product {
            sell_by_weight: self.sell_by_weight,
            weight_unit: self.weight_unit.clone(),
            price_label: self.price_label,
            additional_label: self.additional_label.clone().filter(|s| !s.trim().is_empty()),
            ..product
        }
    }
}

impl GroupConfiguration {
    fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyGroupName);
        }
        let count = self.options.len();
        if count == 0 || count > MAX_OPTIONS_PER_GROUP {
            return Err(ValidationError::InvalidOptionCount { group: name.to_string(), count, max: MAX_OPTIONS_PER_GROUP });
        }
        for option in &self.options {
            if option.label.trim().is_empty() {
                return Err(ValidationError::EmptyOptionLabel(name.to_string()));
            }
            if self.modifier_kind.requires_value() && option.modifier_value.is_none() {
                return Err(ValidationError::OptionValueRequired {
                    group: name.to_string(),
                    option: option.label.clone(),
                });
            }
            apply(self.modifier_kind, 0.0, option.modifier_value)?;
        }
        Ok(())
    }

    pub fn new_group(&self, product_id: i64, position: i64) -> NewVariantGroup {
        NewVariantGroup {
            product_id,
            name: self.name.trim().to_string(),
            modifier_kind: self.modifier_kind,
            position,
        }
    }

    /// The group and its options, ready to be stored. Values of label-only options are dropped.
    pub fn new_group_with_options(&self, product_id: i64, position: i64) -> NewVariantGroupWithOptions {
        NewVariantGroupWithOptions { group: self.new_group(product_id, position), options: self.new_options() }
    }

    fn new_options(&self) -> Vec<NewGroupOption> {
        self.options
            .iter()
            .zip(1i64..)
            .map(|(o, position)| NewGroupOption {
                label: o.label.trim().to_string(),
                modifier_value: if self.modifier_kind.requires_value() { o.modifier_value } else { None },
                position,
            })
            .collect()
    }
}
