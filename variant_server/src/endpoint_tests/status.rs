use actix_web::{http::StatusCode, test::TestRequest, web};
use serde_json::Value;
use variant_engine::db_types::StatusType;

use super::{
    helpers::{call, price_api, status},
    mocks::{MockPlatform, MockStore},
};
use crate::routes::UpdateStatusesRoute;

fn configure(store: MockStore) -> impl FnOnce(&mut web::ServiceConfig) {
    let api = price_api(store, MockPlatform::new());
    move |cfg| {
        cfg.app_data(api).service(web::scope("/api").service(UpdateStatusesRoute::<MockStore, MockPlatform>::new()));
    }
}

#[actix_web::test]
async fn recent_statuses_are_listed() {
    let mut store = MockStore::new();
    store.expect_fetch_statuses().withf(|limit| *limit == 2).times(1).returning(|_| {
        Ok(vec![
            status(8, "Ribs", StatusType::Success, ""),
            status(7, "Brisket", StatusType::Failure, "price: must be greater than or equal to 0"),
        ])
    });
    let (code, body) = call(TestRequest::get().uri("/api/status?limit=2"), configure(store)).await;
    assert_eq!(code, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    let statuses = body["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["product_name"], "Ribs");
    assert_eq!(statuses[0]["status"], "SUCCESS");
    assert_eq!(statuses[1]["status"], "FAILURE");
    assert_eq!(statuses[1]["message"], "price: must be greater than or equal to 0");
}

#[actix_web::test]
async fn the_limit_has_a_default() {
    let mut store = MockStore::new();
    store.expect_fetch_statuses().withf(|limit| *limit == 50).times(1).returning(|_| Ok(vec![]));
    let (code, body) = call(TestRequest::get().uri("/api/status"), configure(store)).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body, r#"{"statuses":[]}"#);
}
