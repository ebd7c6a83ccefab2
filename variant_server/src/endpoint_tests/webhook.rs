use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use actix_web::{http::StatusCode, test::TestRequest, web};
use serde_json::{json, Value};
use variant_engine::db_types::{NewUpdateStatus, Product, StatusType, SynthesizedVariant};
use vsync_common::Secret;

use super::{
    helpers::{call, credentials, price_api, status, SHOP},
    mocks::{MockPlatform, MockStore},
};
use crate::{
    config::SHOPIFY_HMAC_HEADER,
    helpers::calculate_hmac,
    middleware::WebhookSignature,
    routes::{ProductsUpdateRoute, SHOP_DOMAIN_HEADER},
};

const SECRET: &str = "webhook-test-secret";

fn configure(store: MockStore, platform: MockPlatform) -> impl FnOnce(&mut web::ServiceConfig) {
    let api = price_api(store, platform);
    move |cfg| {
        cfg.app_data(api).service(
            web::scope("/shopify")
                .wrap(WebhookSignature::new(SHOPIFY_HMAC_HEADER, Secret::new(SECRET.to_string()), true))
                .service(ProductsUpdateRoute::<MockStore, MockPlatform>::new()),
        );
    }
}

fn signed_request(body: &str) -> TestRequest {
    TestRequest::post()
        .uri("/shopify/webhook/products_update")
        .insert_header((SHOPIFY_HMAC_HEADER, calculate_hmac(SECRET, body.as_bytes())))
        .insert_header((SHOP_DOMAIN_HEADER, SHOP))
        .set_payload(body.to_string())
}

fn payload(price: &str) -> String {
    json!({
        "id": 1001,
        "title": "Brisket",
        "variants": [{"id": 10011, "price": price, "inventory_quantity": 3}]
    })
    .to_string()
}

fn linked_variant(title: &str, to_multiply: f64, remote_id: i64) -> SynthesizedVariant {
    SynthesizedVariant {
        title: title.into(),
        to_multiply: Some(to_multiply),
        shopify_variant_id: Some(remote_id),
        ..SynthesizedVariant::default_variant(1001, 10.0, true)
    }
}

#[actix_web::test]
async fn price_changes_are_propagated_in_the_background() {
    let completed = Arc::new(AtomicUsize::new(0));
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store
        .expect_fetch_product()
        .returning(|id| Ok(Some(Product { variant_shopify_product_id: Some(2002), ..Product::new(id) })));
    store
        .expect_create_status()
        .withf(|s: &NewUpdateStatus| s.product_name == "Brisket")
        .returning(|s| Ok(status(1, &s.product_name, s.status, "")));
    store.expect_fetch_access_credential().returning(|_| Ok(credentials()));
    store
        .expect_fetch_all_synthesized_variants()
        .returning(|_| Ok(vec![linked_variant("8oz", 0.5, 20021), linked_variant("16oz", 1.0, 20022)]));
    platform
        .expect_update_product_variants_batch()
        .times(1)
        .withf(|_, id, prices| {
            let prices = prices.iter().map(|p| (p.variant_id, p.price)).collect::<Vec<_>>();
            *id == 2002 && prices == [(20021, 6.0), (20022, 12.0)]
        })
        .returning(|_, _, _| Ok(()));
    let done = completed.clone();
    store.expect_update_status().times(1).returning(move |s| {
        assert_eq!(s.status, StatusType::Success);
        done.fetch_add(1, Ordering::SeqCst);
        Ok(s.clone())
    });

    let (code, body) = call(signed_request(&payload("12.00")), configure(store, platform)).await;
    assert_eq!(code, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], true);
    for _ in 0..50 {
        if completed.load(Ordering::SeqCst) > 0 {
            break;
        }
        actix_web::rt::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(completed.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn unsigned_webhooks_are_refused() {
    let req = TestRequest::post()
        .uri("/shopify/webhook/products_update")
        .insert_header((SHOP_DOMAIN_HEADER, SHOP))
        .set_payload(payload("12.00"));
    let (code, _) = call(req, configure(MockStore::new(), MockPlatform::new())).await;
    assert_eq!(code, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn tampered_webhooks_are_refused() {
    let req = TestRequest::post()
        .uri("/shopify/webhook/products_update")
        .insert_header((SHOPIFY_HMAC_HEADER, calculate_hmac(SECRET, payload("12.00").as_bytes())))
        .insert_header((SHOP_DOMAIN_HEADER, SHOP))
        .set_payload(payload("0.01"));
    let (code, _) = call(req, configure(MockStore::new(), MockPlatform::new())).await;
    assert_eq!(code, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unreadable_payloads_are_acknowledged() {
    let (code, body) = call(signed_request(r#"{"title": "no id"}"#), configure(MockStore::new(), MockPlatform::new())).await;
    assert_eq!(code, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid product payload."));
}

#[actix_web::test]
async fn webhooks_without_a_shop_are_acknowledged() {
    let body = payload("12.00");
    let req = TestRequest::post()
        .uri("/shopify/webhook/products_update")
        .insert_header((SHOPIFY_HMAC_HEADER, calculate_hmac(SECRET, body.as_bytes())))
        .set_payload(body);
    let (code, body) = call(req, configure(MockStore::new(), MockPlatform::new())).await;
    assert_eq!(code, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"success": false, "message": "Missing shop domain"}));
}
