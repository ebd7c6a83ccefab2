use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::ShopifyConfig,
    data_objects::{Metafield, NewMetafield, ProductInput, VariantInput},
    helpers::flatten_errors,
    ShopifyApiError,
    ShopifyProduct,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Admin REST API client.
///
/// The client is not bound to a single shop. Every call names the shop and supplies that shop's access token, so one
/// instance can serve every merchant that has installed the app.
#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

#[derive(Deserialize)]
struct ProductResponse {
    product: Option<ShopifyProduct>,
    errors: Option<Value>,
}

impl ProductResponse {
    fn into_product(self) -> Result<ShopifyProduct, ShopifyApiError> {
        if let Some(errors) = self.errors {
            return Err(ShopifyApiError::UserErrors(flatten_errors(&errors)));
        }
        self.product.ok_or(ShopifyApiError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct ProductBody<'a> {
    product: &'a ProductInput,
}

#[derive(Serialize)]
struct MetafieldBody<'a> {
    metafield: &'a NewMetafield,
}

#[derive(Deserialize)]
struct MetafieldResponse {
    metafield: Metafield,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        shop: &str,
        access_token: &str,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, ShopifyApiError> {
        let url = self.url(shop, path);
        trace!("Sending REST query: {method} {url}");
        let token = HeaderValue::from_str(access_token).map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        let mut req = self.client.request(method, url).header(ACCESS_TOKEN_HEADER, token);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ShopifyApiError::Timeout(e.to_string())
            } else {
                ShopifyApiError::RestResponseError(e.to_string())
            }
        })?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            // Validation failures come back as `{"errors": ...}`. Anything else is passed through verbatim.
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("errors").map(flatten_errors))
                .unwrap_or(body);
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, shop: &str, path: &str) -> String {
        let base = match &self.config.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{shop}"),
        };
        format!("{base}/admin/api/{}{path}", self.config.api_version)
    }

    pub async fn get_product(
        &self,
        shop: &str,
        access_token: &str,
        product_id: i64,
    ) -> Result<ShopifyProduct, ShopifyApiError> {
        let path = format!("/products/{product_id}.json");
        debug!("🛍️ Fetching product {product_id} from {shop}");
        let result = self.rest_query::<ProductResponse, ()>(shop, access_token, Method::GET, &path, None).await?;
        result.into_product()
    }

    pub async fn create_product(
        &self,
        shop: &str,
        access_token: &str,
        product: &ProductInput,
    ) -> Result<ShopifyProduct, ShopifyApiError> {
        debug!("🛍️ Creating product with {} variants on {shop}", product.variants.len());
        let body = ProductBody { product };
        let result = self
            .rest_query::<ProductResponse, ProductBody>(shop, access_token, Method::POST, "/products.json", Some(body))
            .await?;
        let product = result.into_product()?;
        info!("🛍️ Created product {} ({}) on {shop}", product.id, product.title);
        Ok(product)
    }

    /// Replaces the options and variants of an existing product.
    ///
    /// Shopify deletes any existing variant that is not present in `product.variants`.
    pub async fn update_product(
        &self,
        shop: &str,
        access_token: &str,
        product: &ProductInput,
    ) -> Result<ShopifyProduct, ShopifyApiError> {
        let id = product.id.ok_or(ShopifyApiError::MissingProductId)?;
        let path = format!("/products/{id}.json");
        debug!("🛍️ Updating product {id} with {} variants on {shop}", product.variants.len());
        let body = ProductBody { product };
        let result =
            self.rest_query::<ProductResponse, ProductBody>(shop, access_token, Method::PUT, &path, Some(body)).await?;
        let product = result.into_product()?;
        info!("🛍️ Updated product {id} on {shop}. It now has {} variants", product.variants.len());
        Ok(product)
    }

    /// Sets new prices on a batch of existing variants of one product in a single request.
    pub async fn update_variant_prices(
        &self,
        shop: &str,
        access_token: &str,
        product_id: i64,
        variants: Vec<VariantInput>,
    ) -> Result<ShopifyProduct, ShopifyApiError> {
        let count = variants.len();
        let input = ProductInput { id: Some(product_id), variants, ..Default::default() };
        debug!("🛍️ Updating prices for {count} variants of product {product_id}");
        self.update_product(shop, access_token, &input).await
    }

    pub async fn create_metafield(
        &self,
        shop: &str,
        access_token: &str,
        product_id: i64,
        metafield: &NewMetafield,
    ) -> Result<Metafield, ShopifyApiError> {
        let path = format!("/products/{product_id}/metafields.json");
        let body = MetafieldBody { metafield };
        let result = self
            .rest_query::<MetafieldResponse, MetafieldBody>(shop, access_token, Method::POST, &path, Some(body))
            .await?;
        debug!("🛍️ Created metafield {}.{} ({}) on product {product_id}", metafield.namespace, metafield.key, result.metafield.id);
        Ok(result.metafield)
    }

    pub async fn update_metafield(
        &self,
        shop: &str,
        access_token: &str,
        product_id: i64,
        metafield_id: i64,
        metafield: &NewMetafield,
    ) -> Result<Metafield, ShopifyApiError> {
        let path = format!("/products/{product_id}/metafields/{metafield_id}.json");
        let metafield = metafield.clone().with_id(metafield_id);
        let body = MetafieldBody { metafield: &metafield };
        let result = self
            .rest_query::<MetafieldResponse, MetafieldBody>(shop, access_token, Method::PUT, &path, Some(body))
            .await?;
        debug!("🛍️ Updated metafield {metafield_id} on product {product_id}");
        Ok(result.metafield)
    }

    pub async fn delete_metafield(
        &self,
        shop: &str,
        access_token: &str,
        product_id: i64,
        metafield_id: i64,
    ) -> Result<(), ShopifyApiError> {
        let path = format!("/products/{product_id}/metafields/{metafield_id}.json");
        let _ = self.rest_query::<Value, ()>(shop, access_token, Method::DELETE, &path, None).await?;
        debug!("🛍️ Deleted metafield {metafield_id} from product {product_id}");
        Ok(())
    }

    pub async fn delete_variant(
        &self,
        shop: &str,
        access_token: &str,
        product_id: i64,
        variant_id: i64,
    ) -> Result<(), ShopifyApiError> {
        let path = format!("/products/{product_id}/variants/{variant_id}.json");
        let _ = self.rest_query::<Value, ()>(shop, access_token, Method::DELETE, &path, None).await?;
        debug!("🛍️ Deleted variant {variant_id} from product {product_id}");
        Ok(())
    }
}
