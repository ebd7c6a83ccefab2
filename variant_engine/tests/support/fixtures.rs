use chrono::Utc;
use tokio::sync::mpsc;
use variant_engine::{
    db_types::{
        ModifierKind,
        Product,
        ShopCredentials,
        StatusType,
        SynthesizedVariant,
        UpdateStatus,
        VariantGroup,
        VariantOption,
    },
    events::{EventProducer, EventProducers, MetafieldEvent, SyncStageEvent},
    traits::{RemoteProduct, RemoteVariant},
};

pub const SHOP: &str = "test-shop.myshopify.com";
pub const BASE_PRODUCT: i64 = 1001;
pub const VARIANT_PRODUCT: i64 = 2002;

pub fn credentials() -> ShopCredentials {
    ShopCredentials::new(SHOP, "shpat_test_token")
}

fn option(id: i64, group_id: i64, label: &str, value: Option<f64>) -> VariantOption {
    VariantOption { id, group_id, label: label.into(), modifier_value: value, position: id % 10 }
}

pub fn size_group() -> VariantGroup {
    VariantGroup {
        id: 1,
        product_id: BASE_PRODUCT,
        name: "Size".into(),
        modifier_kind: ModifierKind::Weight,
        position: 2,
        options: vec![option(11, 1, "8oz", Some(8.0)), option(12, 1, "16oz", Some(16.0))],
    }
}

pub fn rub_group() -> VariantGroup {
    VariantGroup {
        id: 2,
        product_id: BASE_PRODUCT,
        name: "Rub".into(),
        modifier_kind: ModifierKind::Fee,
        position: 1,
        options: vec![option(21, 2, "Plain", Some(0.0)), option(22, 2, "Dry rub", Some(2.0))],
    }
}

/// A configured product whose groups are stored fee-first, so that syncing has to reorder them.
pub fn configured_product(variant_product: Option<i64>) -> Product {
    Product {
        title: "Brisket".into(),
        variant_shopify_product_id: variant_product,
        ..Product::new(BASE_PRODUCT)
    }
    .with_variant_groups(vec![rub_group(), size_group()])
}

pub fn root_product(price: f64) -> RemoteProduct {
    RemoteProduct {
        id: BASE_PRODUCT,
        title: "Brisket".into(),
        variants: vec![RemoteVariant { id: 9000, price, taxable: true, position: Some(1) }],
    }
}

pub fn variant_product(count: usize) -> RemoteProduct {
    let variants = (0..count as i64)
        .map(|i| RemoteVariant { id: 5001 + i, price: 0.0, taxable: true, position: Some(i + 1) })
        .collect();
    RemoteProduct { id: VARIANT_PRODUCT, title: "AUTOMATIC (DO NOT TOUCH) Brisket".into(), variants }
}

pub fn stored_variant(title: &str, to_multiply: Option<f64>, to_add: Option<f64>, remote_id: Option<i64>) -> SynthesizedVariant {
    SynthesizedVariant {
        title: title.into(),
        to_multiply,
        to_add,
        shopify_variant_id: remote_id,
        ..SynthesizedVariant::default_variant(BASE_PRODUCT, 0.0, true)
    }
}

pub fn in_progress_status(id: i64, name: &str) -> UpdateStatus {
    let now = Utc::now();
    UpdateStatus {
        id,
        product_name: name.into(),
        status: StatusType::InProgress,
        message: String::new(),
        created_at: now,
        updated_at: now,
    }
}

/// Event producers that feed plain channels, so tests can read back what was published once the API is dropped.
pub fn recording_producers() -> (EventProducers, mpsc::Receiver<SyncStageEvent>, mpsc::Receiver<MetafieldEvent>) {
    let (stage_tx, stage_rx) = mpsc::channel(64);
    let (meta_tx, meta_rx) = mpsc::channel(64);
    let producers = EventProducers {
        sync_stage_producer: vec![EventProducer::new(stage_tx)],
        metafield_producer: vec![EventProducer::new(meta_tx)],
    };
    (producers, stage_rx, meta_rx)
}

pub async fn drain<E>(mut rx: mpsc::Receiver<E>) -> Vec<E> {
    let mut events = Vec::new();
    while let Some(ev) = rx.recv().await {
        events.push(ev);
    }
    events
}
