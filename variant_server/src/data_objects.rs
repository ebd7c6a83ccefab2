use std::fmt::Display;

use serde::{Deserialize, Serialize};
use variant_engine::{
    db_types::{Product, UpdateStatus},
    sync_objects::{ConfigurationPreview, GroupConfiguration, OptionConfiguration, ProductUpdate, VariantConfiguration},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Query parameters naming the shop a request acts for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopQuery {
    pub shop: String,
}

/// Query parameters for reading a configuration. With a shop given, option prices are previewed as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewQuery {
    pub shop: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusQuery {
    pub limit: Option<i64>,
}

/// The subset of the `products/update` webhook payload that drives price propagation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWebhook {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variants: Vec<WebhookVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookVariant {
    pub id: i64,
    pub price: String,
}

impl ProductWebhook {
    /// Converts the payload into a price update, using the price of the first variant.
    ///
    /// Returns `None` if the product has no variants or the price cannot be read.
    pub fn product_update(&self) -> Option<ProductUpdate> {
        let root = self.variants.first()?;
        let price = shopify_tools::helpers::parse_shopify_price(&root.price).ok()?;
        Some(ProductUpdate { product_id: self.id, title: self.title.clone(), price })
    }
}

/// The stored variant configuration of a product, in the shape the variant editor submits it.
pub fn configuration_from_product(product: &Product) -> VariantConfiguration {
    let variant_groups = product
        .variant_groups
        .iter()
        .map(|g| GroupConfiguration {
            name: g.name.clone(),
            modifier_kind: g.modifier_kind,
            options: g
                .options
                .iter()
                .map(|o| OptionConfiguration { label: o.label.clone(), modifier_value: o.modifier_value })
                .collect(),
        })
        .collect();
    VariantConfiguration {
        sell_by_weight: product.sell_by_weight,
        weight_unit: product.weight_unit.clone(),
        price_label: product.price_label,
        additional_label: product.additional_label.clone(),
        variant_groups,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationResponse {
    #[serde(flatten)]
    pub configuration: VariantConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<ConfigurationPreview>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusList {
    pub statuses: Vec<UpdateStatus>,
}
