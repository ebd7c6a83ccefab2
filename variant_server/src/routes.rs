//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a separate module.
//!
//! Handlers run on the worker's thread, so any I/O must be awaited rather than blocking. The webhook handler
//! acknowledges Shopify straight away and runs the price update in a task of its own.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use variant_engine::{
    sync_objects::VariantConfiguration,
    traits::{CommercePlatform, VariantStore},
    PriceUpdateApi,
    VariantSyncApi,
};

use crate::{
    data_objects::{
        configuration_from_product,
        ConfigurationResponse,
        JsonResponse,
        PreviewQuery,
        ProductWebhook,
        ShopQuery,
        StatusList,
        StatusQuery,
    },
    errors::ServerError,
};

pub const SHOP_DOMAIN_HEADER: &str = "X-Shopify-Shop-Domain";
const DEFAULT_STATUS_LIMIT: i64 = 50;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Variants  ----------------------------------------------------
route!(save_variants => Post "/variants/{product_id}" impl VariantStore, CommercePlatform);
/// Stores a new variant configuration for the product and publishes the resulting variants.
///
/// The response is always `{ "error": bool, "message": string }`.
pub async fn save_variants<B, P>(
    path: web::Path<i64>,
    query: web::Query<ShopQuery>,
    body: web::Json<VariantConfiguration>,
    api: web::Data<VariantSyncApi<B, P>>,
) -> HttpResponse
where
    B: VariantStore,
    P: CommercePlatform,
{
    let product_id = path.into_inner();
    let shop = query.into_inner().shop;
    debug!("💻️ POST variant configuration for product {product_id} on {shop}");
    let result = api.save_variant_configuration(&shop, product_id, body.into_inner()).await;
    HttpResponse::Ok().json(result)
}

route!(fetch_variants => Get "/variants/{product_id}" impl VariantStore, CommercePlatform);
/// The stored variant configuration. Given a `shop`, each option also carries its price at the product's current
/// storefront price. A preview that cannot be computed is left out rather than failing the request.
pub async fn fetch_variants<B, P>(
    path: web::Path<i64>,
    query: web::Query<PreviewQuery>,
    api: web::Data<VariantSyncApi<B, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: VariantStore,
    P: CommercePlatform,
{
    let product_id = path.into_inner();
    debug!("💻️ GET variant configuration for product {product_id}");
    let product = api.fetch_configuration(product_id).await?;
    let preview = match query.into_inner().shop {
        Some(shop) => match api.preview_configuration(&shop, product_id).await {
            Ok(preview) => Some(preview),
            Err(e) => {
                warn!("💻️ Could not preview prices for product {product_id} on {shop}. {e}");
                None
            },
        },
        None => None,
    };
    let configuration = configuration_from_product(&product);
    Ok(HttpResponse::Ok().json(ConfigurationResponse { configuration, preview }))
}

route!(clear_variants => Delete "/variants/{product_id}" impl VariantStore, CommercePlatform);
pub async fn clear_variants<B, P>(
    path: web::Path<i64>,
    query: web::Query<ShopQuery>,
    api: web::Data<VariantSyncApi<B, P>>,
) -> HttpResponse
where
    B: VariantStore,
    P: CommercePlatform,
{
    let product_id = path.into_inner();
    let shop = query.into_inner().shop;
    debug!("💻️ DELETE variant configuration for product {product_id} on {shop}");
    let result = api.clear_variant_configuration(&shop, product_id).await;
    HttpResponse::Ok().json(result)
}

//----------------------------------------------   Status  ----------------------------------------------------
route!(update_statuses => Get "/status" impl VariantStore, CommercePlatform);
pub async fn update_statuses<B, P>(
    query: web::Query<StatusQuery>,
    api: web::Data<PriceUpdateApi<B, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: VariantStore,
    P: CommercePlatform,
{
    let limit = query.limit.unwrap_or(DEFAULT_STATUS_LIMIT).max(1);
    trace!("💻️ GET the last {limit} update statuses");
    let statuses = api.recent_statuses(limit).await?;
    Ok(HttpResponse::Ok().json(StatusList { statuses }))
}

//----------------------------------------------   Webhooks  ----------------------------------------------------
route!(products_update => Post "/webhook/products_update" impl VariantStore, CommercePlatform);
/// Shopify's `products/update` webhook.
///
/// Webhook responses must always be in the 200 range, otherwise Shopify will retry. The price update itself runs in
/// the background and its outcome is recorded as an update status.
pub async fn products_update<B, P>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<PriceUpdateApi<B, P>>,
) -> HttpResponse
where
    B: VariantStore + 'static,
    P: CommercePlatform + 'static,
{
    trace!("🛍️ Received webhook request: {}", req.uri());
    let Some(shop) = req.headers().get(SHOP_DOMAIN_HEADER).and_then(|v| v.to_str().ok()).map(String::from) else {
        warn!("🛍️ Product update webhook arrived without a {SHOP_DOMAIN_HEADER} header. Ignoring it.");
        return HttpResponse::Ok().json(JsonResponse::failure("Missing shop domain"));
    };
    let payload = match serde_json::from_slice::<ProductWebhook>(&body) {
        Ok(p) => p,
        Err(e) => {
            warn!("🛍️ Could not read the product update from {shop}. {e}");
            return HttpResponse::Ok().json(JsonResponse::failure(format!("Invalid product payload. {e}")));
        },
    };
    let Some(update) = payload.product_update() else {
        info!("🛍️ Product {} from {shop} has no readable price. Ignoring the update.", payload.id);
        return HttpResponse::Ok().json(JsonResponse::failure("Product has no price"));
    };
    debug!("🛍️ Product {} ({}) on {shop} now costs {:.2}", update.product_id, update.title, update.price);
    let api = api.clone();
    actix_web::rt::spawn(async move {
        let product_id = update.product_id;
        match api.on_base_price_changed(&shop, update).await {
            Some(status) => info!("🛍️ Price update for product {product_id} finished: {}", status.status),
            None => trace!("🛍️ Product {product_id} does not need a price update"),
        }
    });
    HttpResponse::Ok().json(JsonResponse::success("Product update received"))
}
