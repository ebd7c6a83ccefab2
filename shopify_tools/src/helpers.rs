use serde_json::Value;
use vsync_common::{format_price, parse_price};

use crate::ShopifyApiError;

/// Shopify expresses prices as decimal strings, e.g. `"10.00"`.
pub fn parse_shopify_price(price: &str) -> Result<f64, ShopifyApiError> {
    parse_price(price).map_err(|e| ShopifyApiError::InvalidCurrencyAmount(e.to_string()))
}

pub fn shopify_price(price: f64) -> String {
    format_price(price)
}

/// Renders the `errors` member of a Shopify REST response as a single line.
///
/// Shopify returns either a plain string, a list of strings, or an object mapping field names to lists of messages.
pub fn flatten_errors(errors: &Value) -> String {
    match errors {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten_errors).collect::<Vec<String>>().join(", "),
        Value::Object(fields) => fields
            .iter()
            .map(|(field, msgs)| format!("{field}: {}", flatten_errors(msgs)))
            .collect::<Vec<String>>()
            .join("; "),
        Value::Null => String::default(),
        other => other.to_string(),
    }
}
