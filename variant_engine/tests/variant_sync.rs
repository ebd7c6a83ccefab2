use std::sync::{Arc, Mutex};

use support::{fixtures::*, mocks::*};
use variant_engine::{
    db_types::SynthesizedVariant,
    sync_objects::{SyncStage, VariantConfiguration},
    traits::PlatformError,
    ProductLocks,
    VariantSyncApi,
};

mod support;

#[tokio::test]
async fn first_sync_creates_the_variant_product() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_access_credential().times(1).returning(|_| Ok(credentials()));
    store.expect_fetch_product_with_variant_groups().times(1).returning(|_| Ok(Some(configured_product(None))));
    let saved = Arc::new(Mutex::new(Vec::<SynthesizedVariant>::new()));
    let saved2 = saved.clone();
    store.expect_replace_synthesized_variants().times(1).returning(move |product_id, variants| {
        assert_eq!(product_id, BASE_PRODUCT);
        *saved2.lock().unwrap() = variants.to_vec();
        Ok(())
    });
    store
        .expect_update_product()
        .times(1)
        .withf(|p| p.variant_shopify_product_id == Some(VARIANT_PRODUCT) && p.title == "Brisket")
        .returning(|p| Ok(p.clone()));
    platform.expect_get_root_product().times(1).returning(|_, _| Ok(root_product(10.0)));
    platform
        .expect_create_product()
        .times(1)
        .withf(|_, p| {
            p.id.is_none()
                && p.title.as_deref() == Some("AUTOMATIC (DO NOT TOUCH) Brisket")
                && p.tags.as_deref() == Some("auto")
                && p.options.len() == 2
                && p.options[0].name == "Size"
                && p.variants.len() == 4
        })
        .returning(|_, _| Ok(variant_product(4)));

    let (producers, stages, _) = recording_producers();
    let api = VariantSyncApi::new(store, platform, ProductLocks::new(), producers);
    let result = api.sync_variants(SHOP, BASE_PRODUCT).await;
    assert!(!result.error, "{}", result.message);
    drop(api);

    let saved = saved.lock().unwrap().clone();
    let titles = saved.iter().map(|v| v.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["8oz / Plain", "16oz / Plain", "8oz / Dry rub", "16oz / Dry rub"]);
    let prices = saved.iter().map(|v| v.price).collect::<Vec<_>>();
    assert_eq!(prices, vec![5.0, 10.0, 7.0, 12.0]);
    let ids = saved.iter().map(|v| v.shopify_variant_id.unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec![5001, 5002, 5003, 5004]);
    assert_eq!(saved[3].position, Some(4));

    let stages = drain(stages).await.into_iter().map(|e| e.stage).collect::<Vec<_>>();
    assert_eq!(stages, vec![
        SyncStage::Start,
        SyncStage::FetchRemoteRoot,
        SyncStage::Expand,
        SyncStage::PushRemote,
        SyncStage::MapIds,
        SyncStage::Persist,
        SyncStage::ReconcileMetafields,
        SyncStage::Done,
    ]);
}

#[tokio::test]
async fn later_syncs_update_the_variant_product() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_access_credential().returning(|_| Ok(credentials()));
    store
        .expect_fetch_product_with_variant_groups()
        .returning(|_| Ok(Some(configured_product(Some(VARIANT_PRODUCT)))));
    store.expect_replace_synthesized_variants().times(1).returning(|_, _| Ok(()));
    store.expect_update_product().times(1).returning(|p| Ok(p.clone()));
    platform.expect_get_root_product().returning(|_, _| Ok(root_product(10.0)));
    platform
        .expect_update_product()
        .times(1)
        .withf(|_, p| p.id == Some(VARIANT_PRODUCT) && p.title.is_none() && p.variants[2].price == 7.0)
        .returning(|_, _| Ok(variant_product(4)));

    let api = VariantSyncApi::new(store, platform, ProductLocks::new(), Default::default());
    let result = api.sync_variants(SHOP, BASE_PRODUCT).await;
    assert!(!result.error, "{}", result.message);
}

#[tokio::test]
async fn rejected_push_leaves_local_variants_untouched() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_access_credential().returning(|_| Ok(credentials()));
    store
        .expect_fetch_product_with_variant_groups()
        .returning(|_| Ok(Some(configured_product(Some(VARIANT_PRODUCT)))));
    store.expect_replace_synthesized_variants().times(0);
    store.expect_delete_all_synthesized_variants().times(0);
    store.expect_create_synthesized_variants().times(0);
    store.expect_update_product().times(0);
    platform.expect_get_root_product().returning(|_, _| Ok(root_product(10.0)));
    platform
        .expect_update_product()
        .times(1)
        .returning(|_, _| Err(PlatformError::Rejected("base: Option values must be unique".into())));

    let (producers, stages, _) = recording_producers();
    let api = VariantSyncApi::new(store, platform, ProductLocks::new(), producers);
    let result = api.sync_variants(SHOP, BASE_PRODUCT).await;
    assert!(result.error);
    assert!(result.message.contains("Option values must be unique"), "{}", result.message);
    drop(api);
    let stages = drain(stages).await;
    let last = stages.last().unwrap();
    assert!(matches!(&last.stage, SyncStage::Failed(reason) if reason.contains("must be unique")));
    assert!(!stages.iter().any(|e| e.stage == SyncStage::Persist));
}

#[tokio::test]
async fn transport_errors_fail_the_sync() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_access_credential().returning(|_| Ok(credentials()));
    store.expect_fetch_product_with_variant_groups().returning(|_| Ok(Some(configured_product(None))));
    platform.expect_get_root_product().returning(|_, _| Err(PlatformError::Transport("operation timed out".into())));

    let api = VariantSyncApi::new(store, platform, ProductLocks::new(), Default::default());
    let result = api.sync_variants(SHOP, BASE_PRODUCT).await;
    assert!(result.error);
    assert_eq!(result.message, "Could not reach Shopify. operation timed out");
}

#[tokio::test]
async fn root_products_with_several_variants_are_rejected() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_access_credential().returning(|_| Ok(credentials()));
    store.expect_fetch_product_with_variant_groups().returning(|_| Ok(Some(configured_product(None))));
    platform.expect_get_root_product().returning(|_, _| {
        let mut root = root_product(10.0);
        root.variants.push(root.variants[0].clone());
        Ok(root)
    });
    platform.expect_create_product().times(0);

    let api = VariantSyncApi::new(store, platform, ProductLocks::new(), Default::default());
    let result = api.sync_variants(SHOP, BASE_PRODUCT).await;
    assert!(result.error);
    assert!(result.message.contains("single variant"), "{}", result.message);
}

#[tokio::test]
async fn persistence_failures_are_reported_as_inconsistencies() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_access_credential().returning(|_| Ok(credentials()));
    store.expect_fetch_product_with_variant_groups().returning(|_| Ok(Some(configured_product(Some(VARIANT_PRODUCT)))));
    store.expect_replace_synthesized_variants().returning(|_, _| {
        Err(variant_engine::traits::VariantStoreError::DatabaseError("disk I/O error".into()))
    });
    platform.expect_get_root_product().returning(|_, _| Ok(root_product(10.0)));
    platform.expect_update_product().returning(|_, _| Ok(variant_product(4)));

    let api = VariantSyncApi::new(store, platform, ProductLocks::new(), Default::default());
    let result = api.sync_variants(SHOP, BASE_PRODUCT).await;
    assert!(result.error);
    assert!(result.message.starts_with("Variants were published to Shopify but could not be saved locally"));
}

#[tokio::test]
async fn missing_credentials() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    store.expect_fetch_access_credential().returning(|shop| {
        Err(variant_engine::traits::VariantStoreError::CredentialNotFound(shop.to_string()))
    });
    let api = VariantSyncApi::new(store, MockPlatform::new(), ProductLocks::new(), Default::default());
    let result = api.sync_variants(SHOP, BASE_PRODUCT).await;
    assert!(result.error);
    assert_eq!(result.message, format!("No access credential is stored for {SHOP}"));
}

#[tokio::test]
async fn invalid_configurations_are_not_saved() {
    let _ = env_logger::try_init();
    let config: VariantConfiguration = serde_json::from_str(
        r#"{ "variantGroups": [
            { "name": "Size", "modifierKind": "WEIGHT", "options": [{ "label": "8oz", "modifierValue": 8 }] },
            { "name": "Cut", "modifierKind": "WEIGHT", "options": [{ "label": "Flat", "modifierValue": 16 }] }
        ]}"#,
    )
    .unwrap();
    let api = VariantSyncApi::new(MockStore::new(), MockPlatform::new(), ProductLocks::new(), Default::default());
    let result = api.save_variant_configuration(SHOP, BASE_PRODUCT, config).await;
    assert!(result.error);
    assert_eq!(result.message, "Only one variant group can be sold by weight, but 2 were supplied");
}

#[tokio::test]
async fn a_failed_save_does_not_touch_the_storefront() {
    let _ = env_logger::try_init();
    let config: VariantConfiguration = serde_json::from_str(
        r#"{ "variantGroups": [
            { "name": "Size", "modifierKind": "WEIGHT", "options": [{ "label": "8oz", "modifierValue": 8 }] }
        ]}"#,
    )
    .unwrap();
    let mut store = MockStore::new();
    store.expect_fetch_product_with_variant_groups().returning(|_| Ok(Some(configured_product(Some(VARIANT_PRODUCT)))));
    store.expect_replace_variant_configuration().times(1).returning(|_, _| {
        Err(variant_engine::traits::VariantStoreError::DatabaseError("disk I/O error".into()))
    });
    let api = VariantSyncApi::new(store, MockPlatform::new(), ProductLocks::new(), Default::default());
    let result = api.save_variant_configuration(SHOP, BASE_PRODUCT, config).await;
    assert!(result.error);
    assert!(result.message.contains("disk I/O error"), "{}", result.message);
}

#[tokio::test]
async fn previews_use_the_current_root_price() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    let mut platform = MockPlatform::new();
    store.expect_fetch_access_credential().times(1).returning(|_| Ok(credentials()));
    store.expect_fetch_product_with_variant_groups().times(1).returning(|_| Ok(Some(configured_product(None))));
    platform.expect_get_root_product().times(1).returning(|_, _| Ok(root_product(12.0)));
    let api = VariantSyncApi::new(store, platform, ProductLocks::new(), Default::default());
    let preview = api.preview_configuration(SHOP, BASE_PRODUCT).await.unwrap();
    assert_eq!(preview.base_price, 12.0);
    let prices = preview.options.iter().map(|o| (o.label.as_str(), o.price.as_deref())).collect::<Vec<_>>();
    assert_eq!(
        prices,
        [("Plain", Some("0.00")), ("Dry rub", Some("2.00")), ("8oz", Some("6.00")), ("16oz", Some("12.00"))]
    );
}
