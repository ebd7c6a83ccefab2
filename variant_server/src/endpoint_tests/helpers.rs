use actix_web::{
    http::StatusCode,
    test,
    test::TestRequest,
    web::{self, ServiceConfig},
    App,
};
use chrono::{TimeZone, Utc};
use log::debug;
use variant_engine::{
    db_types::{ShopCredentials, StatusType, UpdateStatus},
    events::EventProducers,
    traits::{RemoteProduct, RemoteVariant},
    PriceUpdateApi,
    ProductLocks,
    VariantSyncApi,
};

use super::mocks::{MockPlatform, MockStore};

pub const SHOP: &str = "test-shop.myshopify.com";

/// Sends `req` to an app configured by `configure` and returns the status and body.
///
/// Errors raised by middleware are rendered the same way the server would render them.
pub async fn call<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init();
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request");
    match test::try_call_service(&app, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => (e.error_response().status(), e.to_string()),
    }
}

pub fn sync_api(store: MockStore, platform: MockPlatform) -> web::Data<VariantSyncApi<MockStore, MockPlatform>> {
    web::Data::new(VariantSyncApi::new(store, platform, ProductLocks::new(), EventProducers::default()))
}

pub fn price_api(store: MockStore, platform: MockPlatform) -> web::Data<PriceUpdateApi<MockStore, MockPlatform>> {
    web::Data::new(PriceUpdateApi::new(store, platform, ProductLocks::new(), EventProducers::default()))
}

pub fn credentials() -> ShopCredentials {
    ShopCredentials::new(SHOP, "shpat_test_token")
}

/// A remote product whose variant ids are `id * 10 + position`.
pub fn remote_product(id: i64, title: &str, prices: &[f64]) -> RemoteProduct {
    let variants = prices
        .iter()
        .zip(1i64..)
        .map(|(&price, i)| RemoteVariant { id: id * 10 + i, price, taxable: true, position: Some(i) })
        .collect();
    RemoteProduct { id, title: title.into(), variants }
}

pub fn status(id: i64, name: &str, status: StatusType, message: &str) -> UpdateStatus {
    let timestamp = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    UpdateStatus { id, product_name: name.into(), status, message: message.into(), created_at: timestamp, updated_at: timestamp }
}
