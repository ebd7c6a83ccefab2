use serde::{Deserialize, Serialize};

/// A product, as returned by the Admin REST API.
///
/// Only the fields used for variant synchronisation are modelled. Anything else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopifyProduct {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub handle: Option<String>,
    pub status: Option<String>,
    pub tags: Option<String>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variant {
    pub id: i64,
    pub product_id: Option<i64>,
    pub title: Option<String>,
    pub price: String,
    pub position: Option<i64>,
    pub taxable: Option<bool>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub inventory_policy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub position: Option<i64>,
    #[serde(default)]
    pub values: Vec<String>,
}

impl ShopifyProduct {
    /// The first variant carries the price and tax flag of a product without options.
    pub fn root_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}
