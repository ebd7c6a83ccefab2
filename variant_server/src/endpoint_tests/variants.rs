use actix_web::{http::StatusCode, test::TestRequest, web};
use serde_json::{json, Value};
use variant_engine::{
    db_types::{ModifierKind, Product, VariantGroup, VariantOption},
    traits::VariantStoreError,
};

use super::{
    helpers::{call, credentials, remote_product, sync_api, SHOP},
    mocks::{MockPlatform, MockStore},
};
use crate::routes::{ClearVariantsRoute, FetchVariantsRoute, SaveVariantsRoute};

fn configure(store: MockStore, platform: MockPlatform) -> impl FnOnce(&mut web::ServiceConfig) {
    let api = sync_api(store, platform);
    move |cfg| {
        cfg.app_data(api).service(
            web::scope("/api")
                .service(SaveVariantsRoute::<MockStore, MockPlatform>::new())
                .service(FetchVariantsRoute::<MockStore, MockPlatform>::new())
                .service(ClearVariantsRoute::<MockStore, MockPlatform>::new()),
        );
    }
}

fn size_group() -> VariantGroup {
    let option = |id: i64, label: &str, value: f64| VariantOption {
        id,
        group_id: 3,
        label: label.into(),
        modifier_value: Some(value),
        position: id - 10,
    };
    VariantGroup {
        id: 3,
        product_id: 1001,
        name: "Size".into(),
        modifier_kind: ModifierKind::Weight,
        position: 1,
        options: vec![option(11, "8oz", 8.0), option(12, "16oz", 16.0)],
    }
}

#[actix_web::test]
async fn saving_a_configuration_publishes_the_variants() {
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    let mut fetches = 0;
    store.expect_fetch_product_with_variant_groups().times(2).returning(move |id| {
        fetches += 1;
        let product = Product { title: "Brisket".into(), ..Product::new(id) };
        // The second read happens after the new groups were stored
        Ok(Some(if fetches == 1 { product } else { product.with_variant_groups(vec![size_group()]) }))
    });
    store
        .expect_replace_variant_configuration()
        .times(1)
        .withf(|p, groups| {
            !p.sell_by_weight && groups.len() == 1 && groups[0].group.name == "Size" && groups[0].options.len() == 2
        })
        .returning(|p, _| Ok(p.clone()));
    store.expect_update_product().times(1).returning(|p| Ok(p.clone()));
    store.expect_fetch_access_credential().returning(|_| Ok(credentials()));
    store
        .expect_replace_synthesized_variants()
        .times(1)
        .withf(|id, variants| *id == 1001 && variants.iter().all(|v| v.shopify_variant_id.is_some()))
        .returning(|_, _| Ok(()));
    platform.expect_get_root_product().returning(|_, id| Ok(remote_product(id, "Brisket", &[10.0])));
    platform
        .expect_create_product()
        .times(1)
        .withf(|_, p| {
            let prices = p.variants.iter().map(|v| v.price).collect::<Vec<_>>();
            p.title.as_deref() == Some("AUTOMATIC (DO NOT TOUCH) Brisket") && prices == [5.0, 10.0]
        })
        .returning(|_, _| Ok(remote_product(2002, "AUTOMATIC (DO NOT TOUCH) Brisket", &[5.0, 10.0])));

    let config = json!({
        "sellByWeight": false,
        "variantGroups": [{
            "name": "Size",
            "modifierKind": "WEIGHT",
            "options": [{"label": "8oz", "modifierValue": "8"}, {"label": "16oz", "modifierValue": 16}]
        }]
    });
    let req = TestRequest::post().uri(&format!("/api/variants/1001?shop={SHOP}")).set_json(config);
    let (status, body) = call(req, configure(store, platform)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": false, "message": "Variants have been updated"}));
}

#[actix_web::test]
async fn invalid_configurations_are_reported() {
    let groups = (1..=4).map(|i| json!({"name": format!("Group {i}"), "modifierKind": "NONE"})).collect::<Vec<_>>();
    let req = TestRequest::post()
        .uri(&format!("/api/variants/1001?shop={SHOP}"))
        .set_json(json!({ "variantGroups": groups }));
    let (status, body) = call(req, configure(MockStore::new(), MockPlatform::new())).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": true, "message": "A product can have at most 3 variant groups, but 4 were supplied"})
    );
}

#[actix_web::test]
async fn unknown_products_have_the_default_configuration() {
    let mut store = MockStore::new();
    store.expect_fetch_product_with_variant_groups().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/api/variants/1001");
    let (status, body) = call(req, configure(store, MockPlatform::new())).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "sellByWeight": false,
            "weightUnit": "lb",
            "priceLabel": false,
            "additionalLabel": null,
            "variantGroups": []
        })
    );
}

#[actix_web::test]
async fn stored_configurations_are_returned() {
    let mut store = MockStore::new();
    store.expect_fetch_product_with_variant_groups().returning(|id| {
        Ok(Some(Product { sell_by_weight: true, ..Product::new(id) }.with_variant_groups(vec![size_group()])))
    });
    let req = TestRequest::get().uri("/api/variants/1001");
    let (status, body) = call(req, configure(store, MockPlatform::new())).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["sellByWeight"], true);
    assert_eq!(body["variantGroups"][0]["name"], "Size");
    assert_eq!(body["variantGroups"][0]["options"][1], json!({"label": "16oz", "modifierValue": 16.0}));
}

#[actix_web::test]
async fn option_prices_are_previewed_for_a_shop() {
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_product_with_variant_groups().returning(|id| {
        Ok(Some(Product { sell_by_weight: true, ..Product::new(id) }.with_variant_groups(vec![size_group()])))
    });
    store.expect_fetch_access_credential().times(1).returning(|_| Ok(credentials()));
    platform.expect_get_root_product().times(1).returning(|_, id| Ok(remote_product(id, "Brisket", &[12.5])));
    let req = TestRequest::get().uri(&format!("/api/variants/1001?shop={SHOP}"));
    let (status, body) = call(req, configure(store, platform)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["variantGroups"][0]["name"], "Size");
    assert_eq!(
        body["preview"],
        json!({
            "basePrice": 12.5,
            "options": [
                {"group": "Size", "label": "8oz", "price": "6.25"},
                {"group": "Size", "label": "16oz", "price": "12.50"}
            ]
        })
    );
}

#[actix_web::test]
async fn previews_that_fail_are_left_out() {
    let mut store = MockStore::new();
    store.expect_fetch_product_with_variant_groups().returning(|id| Ok(Some(Product::new(id))));
    store.expect_fetch_access_credential().returning(|shop| Err(VariantStoreError::CredentialNotFound(shop.into())));
    let req = TestRequest::get().uri(&format!("/api/variants/1001?shop={SHOP}"));
    let (status, body) = call(req, configure(store, MockPlatform::new())).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["weightUnit"], "lb");
    assert!(body.get("preview").is_none());
}

#[actix_web::test]
async fn store_failures_are_server_errors() {
    let mut store = MockStore::new();
    store
        .expect_fetch_product_with_variant_groups()
        .returning(|_| Err(VariantStoreError::DatabaseError("disk I/O error".into())));
    let req = TestRequest::get().uri("/api/variants/1001");
    let (status, body) = call(req, configure(store, MockPlatform::new())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("disk I/O error"));
}

#[actix_web::test]
async fn clearing_needs_a_stored_credential() {
    let mut store = MockStore::new();
    store.expect_fetch_access_credential().returning(|shop| Err(VariantStoreError::CredentialNotFound(shop.into())));
    let req = TestRequest::delete().uri(&format!("/api/variants/1001?shop={SHOP}"));
    let (status, body) = call(req, configure(store, MockPlatform::new())).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": true, "message": format!("No access credential is stored for {SHOP}")}));
}

#[actix_web::test]
async fn a_shop_is_required() {
    let req = TestRequest::delete().uri("/api/variants/1001");
    let (status, _) = call(req, configure(MockStore::new(), MockPlatform::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
