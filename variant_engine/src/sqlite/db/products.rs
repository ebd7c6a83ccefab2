use log::debug;
use sqlx::SqliteConnection;

use crate::{db_types::Product, traits::VariantStoreError};

const PRODUCT_COLUMNS: &str = "base_shopify_product_id, title, variant_shopify_product_id, sell_by_weight, \
                               weight_unit, price_label, additional_label, price_string_metafield_id, \
                               price_label_metafield_id, additional_label_metafield_id";

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE base_shopify_product_id = $1");
    let product = sqlx::query_as(&sql).bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Inserts a new product. Variant groups are not stored.
pub async fn insert_product(product: &Product, conn: &mut SqliteConnection) -> Result<Product, VariantStoreError> {
    let id = product.base_shopify_product_id;
    if fetch_product(id, &mut *conn).await?.is_some() {
        return Err(VariantStoreError::ProductAlreadyExists(id));
    }
    let sql = format!(
        r#"
        INSERT INTO products ({PRODUCT_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {PRODUCT_COLUMNS};
        "#
    );
    let product: Product = sqlx::query_as(&sql)
        .bind(product.base_shopify_product_id)
        .bind(&product.title)
        .bind(product.variant_shopify_product_id)
        .bind(product.sell_by_weight)
        .bind(&product.weight_unit)
        .bind(product.price_label)
        .bind(&product.additional_label)
        .bind(product.price_string_metafield_id)
        .bind(product.price_label_metafield_id)
        .bind(product.additional_label_metafield_id)
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Product {id} inserted");
    Ok(product)
}

/// Updates every column of the product except its id.
pub async fn update_product(product: &Product, conn: &mut SqliteConnection) -> Result<Product, VariantStoreError> {
    let id = product.base_shopify_product_id;
    let sql = format!(
        r#"
        UPDATE products SET
            title = $1,
            variant_shopify_product_id = $2,
            sell_by_weight = $3,
            weight_unit = $4,
            price_label = $5,
            additional_label = $6,
            price_string_metafield_id = $7,
            price_label_metafield_id = $8,
            additional_label_metafield_id = $9,
            updated_at = CURRENT_TIMESTAMP
        WHERE base_shopify_product_id = $10
        RETURNING {PRODUCT_COLUMNS};
        "#
    );
    let updated: Option<Product> = sqlx::query_as(&sql)
        .bind(&product.title)
        .bind(product.variant_shopify_product_id)
        .bind(product.sell_by_weight)
        .bind(&product.weight_unit)
        .bind(product.price_label)
        .bind(&product.additional_label)
        .bind(product.price_string_metafield_id)
        .bind(product.price_label_metafield_id)
        .bind(product.additional_label_metafield_id)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    updated.ok_or(VariantStoreError::ProductNotFound(id))
}
